//! The `migration_assistant` tool. Works without credentials.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::mcp::context::ServerContext;
use crate::mcp::protocol::{InputSchema, ToolDefinition};
use crate::mcp::tools::{Tool, parse_args};
use crate::migration::{MigrationAssistant, MigrationRequest};

#[derive(Debug, Default)]
pub struct MigrationAssistantTool {
    assistant: MigrationAssistant,
}

#[async_trait]
impl Tool for MigrationAssistantTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "migration_assistant".into(),
            description: "Assists with API version migrations. With source_code: returns an \
                          analysis of deprecated endpoints and breaking changes, refactored \
                          code and a migration checklist. Without source_code: returns a \
                          migration guide with API mappings and attribute changes. \
                          Supported migrations: Orders API v0 to 2026-01-01."
                .into(),
            input_schema: InputSchema::object(
                json!({
                    "source_code": {
                        "type": "string",
                        "description": "Existing API integration code (optional; without it, general guidance is returned)"
                    },
                    "source_version": {
                        "type": "string",
                        "description": "Current API version (e.g. 'orders-v0')"
                    },
                    "target_version": {
                        "type": "string",
                        "description": "Target API version (e.g. 'orders-2026-01-01')"
                    },
                    "language": {
                        "type": "string",
                        "description": "Programming language of the source code"
                    },
                    "analysis_only": {
                        "type": "boolean",
                        "default": false,
                        "description": "Only analyze without generating code"
                    }
                }),
                &["source_version", "target_version"],
            ),
        }
    }

    fn failure_context(&self) -> &'static str {
        "Error in migration assistant"
    }

    async fn execute(&self, _ctx: &ServerContext, params: Value) -> Result<String> {
        let request: MigrationRequest = parse_args(params)?;
        self.assistant.run(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Error;

    #[tokio::test]
    async fn test_guidance_without_credentials() {
        let ctx = ServerContext::new(&Config::default());
        let text = MigrationAssistantTool::default()
            .execute(
                &ctx,
                json!({ "source_version": "orders-v0", "target_version": "orders-2026-01-01" }),
            )
            .await
            .unwrap();
        assert!(text.starts_with("# Orders API Migration Guide: v0 → 2026-01-01"));
    }

    #[tokio::test]
    async fn test_unsupported_path() {
        let ctx = ServerContext::new(&Config::default());
        let err = MigrationAssistantTool::default()
            .execute(
                &ctx,
                json!({ "source_version": "orders-v0", "target_version": "orders-v1" }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMigration { .. }));
    }
}
