//! In-memory SP-API credential store.
//!
//! Credentials live for the lifetime of the process and are never written to
//! disk. Secrets are held as [`SecretString`] and only shown masked.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://sellingpartnerapi-na.amazon.com";

/// Region shorthands accepted in place of a full base URL.
const REGIONS: &[(&str, &str)] = &[
    ("na", "https://sellingpartnerapi-na.amazon.com"),
    ("eu", "https://sellingpartnerapi-eu.amazon.com"),
    ("fe", "https://sellingpartnerapi-fe.amazon.com"),
    ("north_america", "https://sellingpartnerapi-na.amazon.com"),
    ("europe", "https://sellingpartnerapi-eu.amazon.com"),
    ("far_east", "https://sellingpartnerapi-fe.amazon.com"),
];

/// Resolves a region shorthand (case-insensitive) or returns the URL as given.
pub fn resolve_base_url(value: &str) -> String {
    let value = value.trim();
    REGIONS
        .iter()
        .find(|(region, _)| region.eq_ignore_ascii_case(value))
        .map(|(_, url)| url.to_string())
        .unwrap_or_else(|| value.trim_end_matches('/').to_string())
}

/// Masks a credential for display.
///
/// Unset values render as `(not set)`, short values are fully hidden and
/// longer ones keep their first and last four characters.
pub fn mask(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return "(not set)".to_string();
    };

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

/// A snapshot of the configured credentials.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
    pub base_url: Option<String>,
}

impl Credentials {
    /// True when client id, client secret and refresh token are all non-empty.
    pub fn is_configured(&self) -> bool {
        self.client_id.as_deref().is_some_and(|v| !v.is_empty())
            && secret_present(&self.client_secret)
            && secret_present(&self.refresh_token)
    }

    /// The configured base URL, or [`DEFAULT_BASE_URL`].
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Names of the required fields that are still missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.client_id.as_deref().is_some_and(|v| !v.is_empty()) {
            missing.push("clientId");
        }
        if !secret_present(&self.client_secret) {
            missing.push("clientSecret");
        }
        if !secret_present(&self.refresh_token) {
            missing.push("refreshToken");
        }
        missing
    }
}

fn secret_present(secret: &Option<SecretString>) -> bool {
    secret
        .as_ref()
        .is_some_and(|s| !s.expose_secret().is_empty())
}

/// A partial credential update. Empty or absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialUpdate {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// A full URL or a region shorthand such as `eu`.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl CredentialUpdate {
    /// Reads `SP_API_CLIENT_ID`, `SP_API_CLIENT_SECRET`,
    /// `SP_API_REFRESH_TOKEN` and `SP_API_BASE_URL` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the same variables as [`from_env`](Self::from_env) through
    /// an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            client_id: lookup("SP_API_CLIENT_ID"),
            client_secret: lookup("SP_API_CLIENT_SECRET"),
            refresh_token: lookup("SP_API_REFRESH_TOKEN"),
            base_url: lookup("SP_API_BASE_URL"),
        }
    }

    /// Names of the fields this update would change.
    pub fn fields(&self) -> Vec<&'static str> {
        [
            ("clientId", &self.client_id),
            ("clientSecret", &self.client_secret),
            ("refreshToken", &self.refresh_token),
            ("baseUrl", &self.base_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| !v.is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// True if the update carries no values.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Masked view of the store, safe to show to users.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub is_configured: bool,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub base_url: String,
    pub missing: Vec<&'static str>,
    pub configured_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct StoreState {
    credentials: Credentials,
    configured_at: Option<DateTime<Utc>>,
}

/// Process-lifetime credential holder. Updates are last-write-wins.
#[derive(Debug, Default)]
pub struct CredentialStore {
    state: RwLock<StoreState>,
}

impl CredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded from the environment.
    pub fn from_env() -> Self {
        Self::with_update(CredentialUpdate::from_env())
    }

    /// Creates a store seeded with `update`. An empty update leaves the store
    /// unconfigured.
    pub fn with_update(update: CredentialUpdate) -> Self {
        let store = Self::new();
        if !update.is_empty() {
            store.set(update);
        }
        store
    }

    /// Applies an update, touching only the fields it provides.
    #[instrument(skip_all, fields(fields = ?update.fields()))]
    pub fn set(&self, update: CredentialUpdate) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let creds = &mut state.credentials;

        if let Some(client_id) = non_empty(&update.client_id) {
            creds.client_id = Some(client_id.to_string());
        }
        if let Some(secret) = non_empty(&update.client_secret) {
            creds.client_secret = Some(SecretString::from(secret.to_string()));
        }
        if let Some(token) = non_empty(&update.refresh_token) {
            creds.refresh_token = Some(SecretString::from(token.to_string()));
        }
        if let Some(base_url) = non_empty(&update.base_url) {
            creds.base_url = Some(resolve_base_url(base_url));
        }
        state.configured_at = Some(Utc::now());

        info!(configured = state.credentials.is_configured(), "Credentials updated");
    }

    /// Returns a snapshot of the current credentials.
    pub fn get(&self) -> Credentials {
        self.read().credentials.clone()
    }

    /// True when the required fields are all present.
    pub fn is_configured(&self) -> bool {
        self.read().credentials.is_configured()
    }

    /// Returns a masked status view.
    pub fn status(&self) -> CredentialStatus {
        let state = self.read();
        let creds = &state.credentials;

        CredentialStatus {
            is_configured: creds.is_configured(),
            client_id: mask(creds.client_id.as_deref()),
            client_secret: mask(creds.client_secret.as_ref().map(|s| s.expose_secret())),
            refresh_token: mask(creds.refresh_token.as_ref().map(|s| s.expose_secret())),
            base_url: creds.base_url().to_string(),
            missing: creds.missing_fields(),
            configured_at: state.configured_at,
        }
    }

    /// Removes every credential. The base URL falls back to the default.
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = StoreState::default();
        info!("Credentials cleared");
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
