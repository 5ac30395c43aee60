//! Runtime configuration read from the environment.

use url::Url;

use crate::auth::{CredentialUpdate, LWA_TOKEN_ENDPOINT};
use crate::error::Result;

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "SP_ORDERS_MCP_LOG";

/// Environment variable overriding the LWA token endpoint.
pub const TOKEN_ENDPOINT_ENV: &str = "SP_API_TOKEN_ENDPOINT";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credentials seeded into the store at startup.
    pub credentials: CredentialUpdate,
    /// `EnvFilter` directive for logging.
    pub log_filter: String,
    /// Where refresh tokens are exchanged for access tokens.
    pub token_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: CredentialUpdate::default(),
            log_filter: default_log_filter(),
            token_endpoint: LWA_TOKEN_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint override is not a valid URL.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token_endpoint = lookup(TOKEN_ENDPOINT_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| LWA_TOKEN_ENDPOINT.to_string());
        Url::parse(&token_endpoint)?;

        Ok(Self {
            credentials: CredentialUpdate::from_lookup(&lookup),
            log_filter: lookup(LOG_ENV)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(default_log_filter),
            token_endpoint,
        })
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.token_endpoint, LWA_TOKEN_ENDPOINT);
        assert!(config.credentials.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (LOG_ENV, "sp_orders_mcp=debug"),
            (TOKEN_ENDPOINT_ENV, "http://127.0.0.1:9999/auth/o2/token"),
            ("SP_API_CLIENT_ID", "client"),
        ]))
        .unwrap();
        assert_eq!(config.log_filter, "sp_orders_mcp=debug");
        assert_eq!(config.token_endpoint, "http://127.0.0.1:9999/auth/o2/token");
        assert_eq!(config.credentials.client_id.as_deref(), Some("client"));
    }

    #[test]
    fn test_invalid_token_endpoint() {
        let result = Config::from_lookup(lookup(&[(TOKEN_ENDPOINT_ENV, "not a url")]));
        assert!(matches!(result, Err(Error::Url(_))));
    }
}
