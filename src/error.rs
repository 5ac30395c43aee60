//! Error types for the Orders MCP server.

use thiserror::Error;

/// The main error type for tool, client and migration operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("SP-API credentials are not configured")]
    CredentialsMissing,

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Authentication(String),

    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(
        "Unsupported migration path: {source_version} → {target_version}\n\nSupported migrations:\n{list}",
        list = bullet_list(.supported)
    )]
    UnsupportedMigration {
        source_version: String,
        target_version: String,
        supported: Vec<String>,
    },

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Returns true for failures detected before any network call was made.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::CredentialsMissing
                | Error::InvalidArguments(_)
                | Error::UnsupportedMigration { .. }
        )
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A specialized Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;
