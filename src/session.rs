//! Authenticated sessions

use crate::auth::AccessToken;
use crate::error::{AuthError, Result};
use crate::service::{AuthorizedClient, OAuthService};

/// Account an access token acts on behalf of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Display name
    pub display_name: String,
    /// Handle, without the leading `@`
    pub handle: String,
}

impl Principal {
    /// Create a principal
    pub fn new(display_name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            handle: handle.into(),
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (@{})", self.display_name, self.handle)
    }
}

/// Verified, ready to use client plus the account it belongs to
///
/// Sessions live for the process lifetime and are never persisted.
#[derive(Debug, Clone)]
pub struct Session {
    client: AuthorizedClient,
    principal: Principal,
    principal_label: String,
}

impl Session {
    /// Build an authenticated client and verify it with one round-trip.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Verification` if the service rejects the
    /// credentials, for example after the user revoked access. The token is
    /// then unusable: reset the stored state and authorize again.
    pub async fn create<S: OAuthService + ?Sized>(
        service: &S,
        access_token: AccessToken,
    ) -> Result<Self> {
        let client = AuthorizedClient::new(service.consumer().clone(), access_token);

        let principal = service.verify_credentials(&client).await.map_err(|e| {
            tracing::warn!("Credential verification failed: {e}");
            AuthError::Verification(e)
        })?;
        tracing::info!(principal = %principal, "Authenticated");

        Ok(Self {
            client,
            principal_label: principal.to_string(),
            principal,
        })
    }

    /// Authenticated client handle
    #[must_use]
    pub fn client(&self) -> &AuthorizedClient {
        &self.client
    }

    /// Account behind this session
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Human readable principal, e.g. `"Jack (@jack)"`
    #[must_use]
    pub fn principal_label(&self) -> &str {
        &self.principal_label
    }
}
