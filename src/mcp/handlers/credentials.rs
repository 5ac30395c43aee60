//! The `credentials` tool.

use std::fmt::Write;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::{CredentialStatus, CredentialUpdate};
use crate::error::{Error, Result};
use crate::mcp::context::ServerContext;
use crate::mcp::protocol::{InputSchema, ToolDefinition};
use crate::mcp::tools::{Tool, parse_args};

const SECURITY_NOTE: &str = "Security Note: credentials are stored in memory only and \
                             are cleared when the server restarts.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CredentialAction {
    Configure,
    Status,
    Clear,
}

#[derive(Debug, Deserialize)]
struct CredentialsArgs {
    action: CredentialAction,
    #[serde(flatten)]
    update: CredentialUpdate,
}

/// Configure, inspect or clear the in-memory SP-API credentials.
pub struct ManageCredentials;

#[async_trait]
impl Tool for ManageCredentials {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "credentials".into(),
            description: "Manage SP-API credentials: 'configure' to set them, 'status' to \
                          check the current configuration, 'clear' to remove them."
                .into(),
            input_schema: InputSchema::object(
                json!({
                    "action": {
                        "type": "string",
                        "enum": ["configure", "status", "clear"],
                        "description": "Action to perform"
                    },
                    "clientId": {
                        "type": "string",
                        "description": "LWA client ID (amzn1.application-oa2-client.xxx), configure only"
                    },
                    "clientSecret": {
                        "type": "string",
                        "description": "LWA client secret, configure only"
                    },
                    "refreshToken": {
                        "type": "string",
                        "description": "Refresh token (Atzr|xxx), configure only"
                    },
                    "baseUrl": {
                        "type": "string",
                        "description": "Region 'na', 'eu', 'fe' or a full URL, configure only"
                    }
                }),
                &["action"],
            ),
        }
    }

    fn failure_context(&self) -> &'static str {
        "Error managing credentials"
    }

    async fn execute(&self, ctx: &ServerContext, params: Value) -> Result<String> {
        let args: CredentialsArgs = parse_args(params)?;
        match args.action {
            CredentialAction::Configure => configure(ctx, args.update),
            CredentialAction::Status => Ok(render_status(&ctx.status())),
            CredentialAction::Clear => {
                ctx.clear();
                Ok("Credentials Cleared\n\n\
                    All SP-API credentials have been removed from memory.\n\n\
                    To reconfigure, use the `credentials` tool with action 'configure'."
                    .to_string())
            }
        }
    }
}

fn configure(ctx: &ServerContext, update: CredentialUpdate) -> Result<String> {
    let fields = update.fields();
    if fields.is_empty() {
        return Err(Error::InvalidArguments(
            "No credentials provided. Supply at least one of clientId, clientSecret, \
             refreshToken or baseUrl (na, eu, fe, or a full URL)."
                .into(),
        ));
    }

    ctx.configure(update);
    let status = ctx.status();

    let mut out = String::new();
    if status.is_configured {
        writeln!(
            out,
            "Credentials fully configured. You can now use the Orders API tools."
        )
        .unwrap();
    } else {
        writeln!(
            out,
            "Credentials partially configured. Some fields are still missing."
        )
        .unwrap();
    }
    writeln!(out).unwrap();
    writeln!(out, "Updated: {}", fields.join(", ")).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Current Configuration:").unwrap();
    writeln!(out, "| Field | Value |").unwrap();
    writeln!(out, "|-------|-------|").unwrap();
    writeln!(out, "| Client ID | {} |", status.client_id).unwrap();
    writeln!(out, "| Client Secret | {} |", status.client_secret).unwrap();
    writeln!(out, "| Refresh Token | {} |", status.refresh_token).unwrap();
    writeln!(out, "| Base URL | {} |", status.base_url).unwrap();
    writeln!(out).unwrap();
    if !status.is_configured {
        write_missing(&mut out, &status);
        writeln!(out).unwrap();
    }
    out.push_str(SECURITY_NOTE);
    Ok(out)
}

fn mark(present: bool) -> &'static str {
    if present { "set" } else { "missing" }
}

fn render_status(status: &CredentialStatus) -> String {
    let mut out = String::new();
    writeln!(out, "## SP-API Credential Status").unwrap();
    writeln!(out).unwrap();
    if status.is_configured {
        writeln!(out, "Status: Fully configured - ready to use Orders API").unwrap();
    } else {
        writeln!(out, "Status: Not fully configured - some credentials missing").unwrap();
    }
    writeln!(out).unwrap();

    let missing = |field: &str| status.missing.iter().any(|m| *m == field);
    writeln!(out, "| Field | Status | Value |").unwrap();
    writeln!(out, "|-------|--------|-------|").unwrap();
    writeln!(
        out,
        "| Client ID | {} | {} |",
        mark(!missing("clientId")),
        status.client_id
    )
    .unwrap();
    writeln!(
        out,
        "| Client Secret | {} | {} |",
        mark(!missing("clientSecret")),
        status.client_secret
    )
    .unwrap();
    writeln!(
        out,
        "| Refresh Token | {} | {} |",
        mark(!missing("refreshToken")),
        status.refresh_token
    )
    .unwrap();
    writeln!(out, "| Base URL | set | {} |", status.base_url).unwrap();
    writeln!(out).unwrap();

    if let Some(at) = status.configured_at {
        writeln!(out, "Last Updated: {}", at.format("%Y-%m-%d %H:%M:%S UTC")).unwrap();
        writeln!(out).unwrap();
    }

    if status.is_configured {
        writeln!(
            out,
            "Ready to use: search_orders, get_order, cancel_order and the other order tools."
        )
        .unwrap();
    } else {
        write_missing(&mut out, status);
    }
    writeln!(out).unwrap();

    writeln!(out, "Available Regions:").unwrap();
    writeln!(out, "- `na` - North America (US, CA, MX, BR)").unwrap();
    writeln!(out, "- `eu` - Europe (UK, DE, FR, IT, ES, etc.)").unwrap();
    write!(out, "- `fe` - Far East (JP, AU, SG, IN)").unwrap();
    out
}

fn write_missing(out: &mut String, status: &CredentialStatus) {
    writeln!(out, "Missing Fields: {}", status.missing.join(", ")).unwrap();
    writeln!(
        out,
        "To configure, use the `credentials` tool with action 'configure'."
    )
    .unwrap();
}
