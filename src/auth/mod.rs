//! Credentials and access tokens for the Selling Partner API.

pub mod credentials;
pub mod token;

pub use credentials::{
    CredentialStatus, CredentialStore, CredentialUpdate, Credentials, DEFAULT_BASE_URL, mask,
    resolve_base_url,
};
pub use token::{CachedToken, LWA_TOKEN_ENDPOINT, RefreshGrant, exchange_refresh_token};
