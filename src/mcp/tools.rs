//! Tool trait and registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::context::ServerContext;
use super::protocol::{INVALID_PARAMS, ToolDefinition, ToolResponse};
use crate::error::{Error, Result};

/// Shown whenever a tool needs credentials that are not configured.
pub const CREDENTIALS_REQUIRED: &str = "\
SP-API Credentials Required

To use this tool, you need to configure SP-API credentials first.

Option 1: use the `credentials` tool
  {\"action\": \"configure\", \"clientId\": \"...\", \"clientSecret\": \"...\", \"refreshToken\": \"...\", \"baseUrl\": \"na\"}

Option 2: set environment variables before starting the server
  export SP_API_CLIENT_ID=\"your_client_id\"
  export SP_API_CLIENT_SECRET=\"your_client_secret\"
  export SP_API_REFRESH_TOKEN=\"your_refresh_token\"
  export SP_API_BASE_URL=\"https://sellingpartnerapi-na.amazon.com\"

The migration assistant tool does not require credentials.";

/// A tool exposed over `tools/call`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and input schema.
    fn definition(&self) -> ToolDefinition;

    /// Prefix of the message shown when the call fails.
    fn failure_context(&self) -> &'static str {
        "Error"
    }

    async fn execute(&self, ctx: &ServerContext, params: Value) -> Result<String>;
}

/// Deserializes tool arguments; a missing argument object counts as `{}`.
pub fn parse_args<T: DeserializeOwned>(params: Value) -> Result<T> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| Error::InvalidArguments(e.to_string()))
}

/// Renders a tool failure as user-facing text.
pub fn failure_text(context: &str, err: &Error) -> String {
    match err {
        Error::CredentialsMissing => CREDENTIALS_REQUIRED.to_string(),
        other => format!("{context}: {other}"),
    }
}

#[derive(Default)]
struct Registry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

/// A container for all registered tools.
#[derive(Default)]
pub struct ToolBox {
    registry: RwLock<Registry>,
}

impl ToolBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under its definition name. A later registration with
    /// the same name replaces the earlier one.
    pub fn add_tool(&self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        let mut registry = self.registry.write();
        if registry.tools.insert(name.clone(), tool).is_none() {
            registry.order.push(name);
        }
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let registry = self.registry.read();
        registry
            .order
            .iter()
            .filter_map(|name| registry.tools.get(name))
            .map(|tool| tool.definition())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registry.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs a tool by name. Tool failures become error responses; only an
    /// unknown tool name is reported as a protocol error.
    pub async fn run_tool(
        &self,
        ctx: &ServerContext,
        name: &str,
        params: Value,
    ) -> std::result::Result<ToolResponse, (i32, String)> {
        let tool = self.registry.read().tools.get(name).cloned();
        let Some(tool) = tool else {
            return Err((INVALID_PARAMS, format!("Unknown tool: {name}")));
        };

        match tool.execute(ctx, params).await {
            Ok(text) => Ok(ToolResponse::text(text)),
            Err(err) => {
                warn!(tool = name, error = %err, "Tool call failed");
                Ok(ToolResponse::error(failure_text(tool.failure_context(), &err)))
            }
        }
    }
}
