//! # SP-API Orders MCP
//!
//! A Model Context Protocol server for the Selling Partner Orders API, plus
//! an offline assistant that migrates client code from Orders API v0 to
//! 2026-01-01.
//!
//! This crate provides:
//! - An MCP stdio server exposing order search, lookup, cancellation and the
//!   legacy shipment and verification operations as tools
//! - An in-memory credential store with masked status reporting
//! - An API client that caches its LWA access token until shortly before expiry
//! - A lexical migration pipeline: analyze, rewrite, report
//!
//! ## Migration Assistant
//!
//! ```rust
//! use sp_orders_mcp::prelude::*;
//!
//! let request = MigrationRequest::new(ORDERS_V0, ORDERS_2026_01_01)
//!     .with_source("const orders = await getOrders({ CreatedAfter: since });");
//!
//! let report = MigrationAssistant::new().run(&request)?;
//! assert!(report.contains("searchOrders"));
//! # Ok::<(), sp_orders_mcp::error::Error>(())
//! ```
//!
//! ## Lower-level Pipeline
//!
//! ```rust
//! use sp_orders_mcp::prelude::*;
//!
//! let data = MigrationData::orders_v0();
//! let source = "fetch('/orders/v0/orders/' + id)";
//!
//! let analysis = analyze(source, &data);
//! let migrated = generate(source, &analysis, ORDERS_2026_01_01)?;
//! assert!(migrated.contains("/orders/2026-01-01/orders/"));
//! # Ok::<(), sp_orders_mcp::error::Error>(())
//! ```
//!
//! ## Running the Server
//!
//! ```rust,no_run
//! use sp_orders_mcp::prelude::*;
//!
//! # async fn run() -> sp_orders_mcp::error::Result<()> {
//! let config = Config::from_env()?;
//! McpServer::new(&config).run().await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod diff;
pub mod error;
pub mod mcp;
pub mod migration;
pub mod orders;
pub mod transform;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::auth::{CredentialStatus, CredentialStore, CredentialUpdate, Credentials};
    pub use crate::client::{HttpMethod, SpApiClient};
    pub use crate::config::Config;
    pub use crate::diff::{ChangeSummary, unified_diff};
    pub use crate::error::{Error, Result};
    pub use crate::mcp::{McpServer, ServerContext, Tool, ToolBox, ToolResponse};
    pub use crate::migration::{
        Availability, CodeAnalysis, CodeAnalyzer, CodeGenerator, MigrationAssistant,
        MigrationData, MigrationRequest, ORDERS_2026_01_01, ORDERS_V0, analyze, generate,
    };
    pub use crate::orders::OrdersApi;
    pub use crate::transform::{TextTransform, Transform, TransformBuilder};
}
