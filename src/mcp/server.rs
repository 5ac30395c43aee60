//! The MCP server loop.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::context::ServerContext;
use super::handlers;
use super::protocol::{
    CallToolParams, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use super::tools::ToolBox;
use super::transport::{LineReader, LineWriter};
use crate::config::Config;
use crate::error::Result;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "sp-orders-mcp";

/// The main MCP server. Cloning shares the tools and context.
#[derive(Clone)]
pub struct McpServer {
    toolbox: Arc<ToolBox>,
    context: Arc<ServerContext>,
}

impl McpServer {
    /// Creates a server with every tool registered.
    pub fn new(config: &Config) -> Self {
        let toolbox = ToolBox::new();
        handlers::register_tools(&toolbox);
        Self {
            toolbox: Arc::new(toolbox),
            context: Arc::new(ServerContext::new(config)),
        }
    }

    pub fn context(&self) -> &ServerContext {
        &self.context
    }

    pub fn toolbox(&self) -> &ToolBox {
        &self.toolbox
    }

    /// Serves requests on stdin/stdout until stdin closes.
    pub async fn run(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serves newline-delimited requests from `reader`, writing responses to
    /// `writer`. Each request runs on its own task; responses may therefore
    /// arrive out of order. Returns once the input is exhausted and every
    /// in-flight request has answered.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        info!(tools = self.toolbox.len(), "MCP server started. Listening for messages...");
        let mut lines = LineReader::new(reader);
        let writer = Arc::new(LineWriter::new(writer));
        let mut tasks = JoinSet::new();

        while let Some(line) = lines.next_line().await? {
            let server = self.clone();
            let writer = Arc::clone(&writer);
            tasks.spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    if let Err(e) = writer.write_message(&response).await {
                        error!(error = %e, "Failed to write response");
                    }
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Request task failed");
            }
        }
        info!("Input stream closed. Shutting down.");
        Ok(())
    }

    /// Handles one raw message line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::failure(
                id,
                INVALID_REQUEST,
                format!("Invalid request: {e}"),
            )),
        }
    }

    /// Dispatches a decoded request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let span = info_span!("request", method = %request.method, id = ?request.id);
        self.dispatch(request).instrument(span).await
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            debug!("Received notification");
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize_result()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => {
                JsonRpcResponse::success(id, json!({ "tools": self.toolbox.definitions() }))
            }
            "tools/call" => self.call_tool(id, request.params).await,
            other => {
                warn!(method = other, "Unknown method");
                JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}"))
            }
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    async fn call_tool(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {e}"));
            }
            None => {
                return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params");
            }
        };

        info!(tool = %params.name, "Received tool call");
        let arguments = params.arguments.unwrap_or(Value::Null);
        match self
            .toolbox
            .run_tool(&self.context, &params.name, arguments)
            .await
        {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::failure(id, INTERNAL_ERROR, e.to_string()),
            },
            Err((code, message)) => JsonRpcResponse::failure(id, code, message),
        }
    }
}
