//! Login with Amazon (LWA) refresh-token exchange.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// LWA token endpoint.
pub const LWA_TOKEN_ENDPOINT: &str = "https://api.amazon.com/auth/o2/token";

/// Seconds subtracted from the reported lifetime before a token is
/// considered expired.
pub const EXPIRY_MARGIN_SECS: i64 = 300;

/// A bearer token together with the instant it stops being used.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub token: SecretString,
    /// Milliseconds since the Unix epoch.
    pub expires_at_ms: i64,
}

impl CachedToken {
    /// Builds a token obtained at `now_ms` with a lifetime of `expires_in`
    /// seconds.
    pub fn new(token: SecretString, expires_in: i64, now_ms: i64) -> Self {
        Self {
            token,
            expires_at_ms: now_ms.saturating_add(
                expires_in
                    .saturating_sub(EXPIRY_MARGIN_SECS)
                    .saturating_mul(1000),
            ),
        }
    }

    /// True strictly before the recorded expiry.
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms
    }
}

/// Client credentials presented to the token endpoint.
pub struct RefreshGrant<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a SecretString,
    pub refresh_token: &'a SecretString,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchanges a refresh token for a short-lived access token.
///
/// # Errors
///
/// Returns `Error::Authentication` carrying the upstream `error_description`
/// when the endpoint provides one. No retry is attempted.
#[instrument(skip(http, grant), fields(endpoint = %endpoint))]
pub async fn exchange_refresh_token(
    http: &reqwest::Client,
    endpoint: &str,
    grant: &RefreshGrant<'_>,
) -> Result<CachedToken> {
    let now_ms = Utc::now().timestamp_millis();

    let form = [
        ("grant_type", "refresh_token"),
        ("client_id", grant.client_id),
        ("client_secret", grant.client_secret.expose_secret()),
        ("refresh_token", grant.refresh_token.expose_secret()),
    ];

    let response = http
        .post(endpoint)
        .form(&form)
        .send()
        .await
        .map_err(|e| auth_failure(e.to_string()))?;

    let status = response.status();

    if status.is_success() {
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| auth_failure(e.to_string()))?;
        debug!(expires_in = body.expires_in, "Obtained access token");
        return Ok(CachedToken::new(
            SecretString::from(body.access_token),
            body.expires_in,
            now_ms,
        ));
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<TokenErrorResponse>(&text)
        .ok()
        .and_then(|e| e.error_description.or(e.error))
        .unwrap_or_else(|| format!("token endpoint returned HTTP {status}"));

    warn!(%status, "Token exchange failed");
    Err(auth_failure(message))
}

fn auth_failure(detail: String) -> Error {
    Error::Authentication(format!("Failed to get access token: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_includes_margin() {
        let token = CachedToken::new(SecretString::from("t".to_string()), 3600, 1_000);
        assert_eq!(token.expires_at_ms, 1_000 + 3_300_000);
        assert!(token.is_valid_at(token.expires_at_ms - 1));
        assert!(!token.is_valid_at(token.expires_at_ms));
    }

    #[test]
    fn test_short_lifetime_is_already_expired() {
        let token = CachedToken::new(SecretString::from("t".to_string()), 120, 0);
        assert!(!token.is_valid_at(0));
    }

    #[test]
    fn test_huge_lifetime_saturates() {
        let token = CachedToken::new(SecretString::from("t".to_string()), i64::MAX, 1_000);
        assert_eq!(token.expires_at_ms, i64::MAX);
        assert!(token.is_valid_at(i64::MAX - 1));

        let token = CachedToken::new(SecretString::from("t".to_string()), i64::MIN, 1_000);
        assert!(!token.is_valid_at(0));
    }

    #[test]
    fn test_auth_failure_message() {
        assert_eq!(
            auth_failure("The request has an invalid grant parameter".into()).to_string(),
            "Failed to get access token: The request has an invalid grant parameter"
        );
    }
}
