//! Model Context Protocol server over stdio.
//!
//! Messages are JSON-RPC 2.0, one per line. Tools report their own failures
//! as results with `isError` set; JSON-RPC errors are reserved for protocol
//! problems such as unknown methods or malformed parameters.

pub mod context;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use context::ServerContext;
pub use protocol::{JsonRpcRequest, JsonRpcResponse, ToolDefinition, ToolResponse};
pub use server::{McpServer, SERVER_NAME};
pub use tools::{Tool, ToolBox};
