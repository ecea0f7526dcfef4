//! Remote OAuth capability
//!
//! The authorization flow only needs a service that can issue a request
//! token with its authorization URL, exchange a verifier for an access token,
//! and verify a credential. [`OAuthService`] is that seam;
//! [`TwitterService`] implements it over HTTP with OAuth 1.0a signing.

pub mod client;
pub mod signing;
pub mod twitter;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::auth::AccessToken;
use crate::session::Principal;

pub use client::AuthorizedClient;
pub use twitter::{TwitterEndpoints, TwitterService};

/// Callback value selecting out-of-band (PIN) mode
pub const OUT_OF_BAND: &str = "oob";

/// Errors reported by an [`OAuthService`]
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Server answered with something that could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A URL could not be built
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A request could not be built from the given parts
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The service refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Application (consumer) credentials
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerCredentials {
    /// API key
    pub key: String,
    /// API key secret
    pub secret: String,
}

impl ConsumerCredentials {
    /// Create consumer credentials
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

/// A freshly issued request token and where the user should approve it
#[derive(Debug, Clone)]
pub struct RequestTokenGrant {
    /// Request token
    pub token: String,
    /// URL the user opens to authorize the application and obtain a PIN
    pub authorization_url: Url,
}

/// Capability used by the authorization flow
///
/// Implementations hold the consumer credentials they sign with.
#[async_trait]
pub trait OAuthService: Send + Sync {
    /// Obtain a request token in out-of-band mode
    ///
    /// # Errors
    /// Returns error if the service refuses or cannot be reached
    async fn issue_request_token(&self) -> Result<RequestTokenGrant, ServiceError>;

    /// Exchange a request token and the user's verifier for access credentials
    ///
    /// # Errors
    /// Returns error if the verifier is rejected or the service cannot be reached
    async fn exchange_verifier(
        &self,
        request_token: &str,
        verifier: &str,
    ) -> Result<AccessToken, ServiceError>;

    /// Resolve the account behind an authenticated client
    ///
    /// # Errors
    /// Returns error if the credentials are invalid or revoked
    async fn verify_credentials(&self, client: &AuthorizedClient) -> Result<Principal, ServiceError>;

    /// Consumer credentials used to build authenticated clients
    fn consumer(&self) -> &ConsumerCredentials;
}
