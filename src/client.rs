//! Authenticated HTTP client for the Selling Partner API.
//!
//! The client caches one LWA access token. A cached token is reused strictly
//! before its recorded expiry; otherwise it is refreshed before the call
//! proceeds. The token slot stays locked while a refresh is in flight, so
//! concurrent calls on a cold cache share a single token exchange.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::auth::{
    CachedToken, Credentials, LWA_TOKEN_ENDPOINT, RefreshGrant, exchange_refresh_token,
};
use crate::error::{Error, Result};

/// Identifier sent as the `User-Agent` of every API call.
pub const CLIENT_IDENTIFIER: &str = concat!("sp-orders-mcp/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the LWA access token.
const ACCESS_TOKEN_HEADER: &str = "x-amz-access-token";

/// HTTP verbs used by the Orders API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    /// True for verbs that carry a request body.
    pub fn accepts_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Client for authenticated Selling Partner API calls.
#[derive(Clone)]
pub struct SpApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    refresh_token: SecretString,
    base_url: String,
    token_endpoint: String,
    /// Cached token; held across a refresh.
    token: Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Deserialize)]
struct ApiErrorEntry {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl SpApiClient {
    /// Create a client from configured credentials.
    ///
    /// # Errors
    ///
    /// Returns `Error::CredentialsMissing` if any required field is absent.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_token_endpoint(credentials, LWA_TOKEN_ENDPOINT)
    }

    /// Create a client that exchanges tokens at a custom endpoint.
    pub fn with_token_endpoint(credentials: &Credentials, token_endpoint: &str) -> Result<Self> {
        if !credentials.is_configured() {
            return Err(Error::CredentialsMissing);
        }
        let (Some(client_id), Some(client_secret), Some(refresh_token)) = (
            credentials.client_id.clone(),
            credentials.client_secret.clone(),
            credentials.refresh_token.clone(),
        ) else {
            return Err(Error::CredentialsMissing);
        };

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                client_id,
                client_secret,
                refresh_token,
                base_url: credentials.base_url().trim_end_matches('/').to_string(),
                token_endpoint: token_endpoint.to_string(),
                token: Mutex::new(None),
            }),
        })
    }

    /// The API host this client talks to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns a valid access token, refreshing it if needed.
    pub async fn access_token(&self) -> Result<SecretString> {
        let mut slot = self.inner.token.lock().await;

        let now_ms = Utc::now().timestamp_millis();
        if let Some(cached) = slot.as_ref().filter(|t| t.is_valid_at(now_ms)) {
            return Ok(cached.token.clone());
        }

        debug!("Access token missing or expired, refreshing");
        let grant = RefreshGrant {
            client_id: &self.inner.client_id,
            client_secret: &self.inner.client_secret,
            refresh_token: &self.inner.refresh_token,
        };
        let fresh =
            exchange_refresh_token(&self.inner.http, &self.inner.token_endpoint, &grant).await?;
        let token = fresh.token.clone();
        *slot = Some(fresh);

        Ok(token)
    }

    /// Resolve an API path against the base URL.
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.inner.base_url, path))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Issue an authenticated call and return the decoded JSON body.
    ///
    /// An empty response body decodes to `Value::Null`. The body argument is
    /// only sent for verbs that accept one.
    #[instrument(skip(self, query, body), fields(method = ?method))]
    pub async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.endpoint(path, query)?;
        let token = self.access_token().await?;

        let mut request = self
            .inner
            .http
            .request(method.into(), url)
            .headers(self.headers(&token)?);

        if let Some(body) = body.filter(|_| method.accepts_body()) {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(%status, "API request failed");
            return Err(Error::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn headers(&self, token: &SecretString) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(token.expose_secret())
            .map_err(|_| Error::Authentication("Access token is not a valid header value".into()))?;
        value.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_IDENTIFIER));
        Ok(headers)
    }
}

/// Extracts the `errors[].message` entries of an SP-API error body, falling
/// back to the raw text.
fn api_error_message(text: &str) -> String {
    let messages: Vec<String> = serde_json::from_str::<ApiErrorBody>(text)
        .map(|body| {
            body.errors
                .into_iter()
                .filter_map(|e| match (e.code, e.message) {
                    (Some(code), Some(message)) => Some(format!("{code}: {message}")),
                    (None, Some(message)) => Some(message),
                    (Some(code), None) => Some(code),
                    (None, None) => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if messages.is_empty() {
        text.trim().to_string()
    } else {
        messages.join("; ")
    }
}
