//! Shared state handed to every tool call.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::auth::{CredentialStatus, CredentialStore, CredentialUpdate, Credentials};
use crate::client::SpApiClient;
use crate::config::Config;
use crate::error::{Error, Result};

/// Credential store plus a lazily built API client.
///
/// The client is rebuilt after every credential change so that a token
/// minted for old credentials is never reused. Credential writes and client
/// builds both happen under the `client` lock, so a cached client always
/// matches the stored credentials.
pub struct ServerContext {
    credentials: CredentialStore,
    token_endpoint: String,
    client: Mutex<Option<SpApiClient>>,
}

impl ServerContext {
    pub fn new(config: &Config) -> Self {
        Self {
            credentials: CredentialStore::with_update(config.credentials.clone()),
            token_endpoint: config.token_endpoint.clone(),
            client: Mutex::new(None),
        }
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials.get()
    }

    pub fn status(&self) -> CredentialStatus {
        self.credentials.status()
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_configured()
    }

    /// Applies a credential update and drops the cached client.
    pub fn configure(&self, update: CredentialUpdate) {
        let mut slot = self.lock_client();
        self.credentials.set(update);
        *slot = None;
    }

    /// Clears every credential and drops the cached client.
    pub fn clear(&self) {
        let mut slot = self.lock_client();
        self.credentials.clear();
        *slot = None;
    }

    /// Returns the API client, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns `Error::CredentialsMissing` while the store is unconfigured.
    pub fn api_client(&self) -> Result<SpApiClient> {
        let mut slot = self.lock_client();
        let credentials = self.credentials.get();
        if !credentials.is_configured() {
            return Err(Error::CredentialsMissing);
        }
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        debug!(base_url = credentials.base_url(), "Building API client");
        let client = SpApiClient::with_token_endpoint(&credentials, &self.token_endpoint)?;
        *slot = Some(client.clone());
        Ok(client)
    }

    fn lock_client(&self) -> MutexGuard<'_, Option<SpApiClient>> {
        self.client.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
