//! Authorization flow controller

use url::Url;

use super::state::{AuthPhase, AuthState};
use super::store::CredentialStore;
use crate::config::AuthConfig;
use crate::error::{AuthError, FlowStep, Result};
use crate::service::{OAuthService, ServiceError, TwitterService};
use crate::session::Session;
use crate::utils::mask_secret;

/// Result of [`Authenticator::initialize`]
#[derive(Debug)]
pub enum InitOutcome {
    /// The user must open this URL, approve, and call `initialize` again
    /// with the displayed PIN as verifier
    NeedsAuthorization(Url),
    /// Authorization is complete and verified
    Ready(Session),
}

impl InitOutcome {
    /// Authorization URL, if the user still has to approve
    #[must_use]
    pub fn authorization_url(&self) -> Option<&Url> {
        match self {
            Self::NeedsAuthorization(url) => Some(url),
            Self::Ready(_) => None,
        }
    }

    /// Session, if authorization is complete
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::NeedsAuthorization(_) => None,
            Self::Ready(session) => Some(session),
        }
    }
}

/// Drives the out-of-band authorization state machine
///
/// Lifecycle is owned by the caller: construct, [`initialize`](Self::initialize),
/// use the session, then [`save_state`](Self::save_state) before exiting.
/// Only one `Authenticator` (and one process) should use a state file at a time.
#[derive(Debug)]
pub struct Authenticator<S: OAuthService = TwitterService> {
    config: AuthConfig,
    store: CredentialStore,
    service: S,
    state: AuthState,
    session: Option<Session>,
}

impl Authenticator<TwitterService> {
    /// Create an authenticator talking to the Twitter API
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidConfig` if the consumer credentials are empty.
    pub fn new(config: AuthConfig) -> Result<Self> {
        config.validate()?;
        let service = TwitterService::new(config.consumer());
        Ok(Self::with_service(config, service))
    }
}

impl<S: OAuthService> Authenticator<S> {
    /// Create an authenticator using a custom OAuth service
    pub fn with_service(config: AuthConfig, service: S) -> Self {
        let store = CredentialStore::new(config.state_path());
        Self {
            config,
            store,
            service,
            state: AuthState::default(),
            session: None,
        }
    }

    /// Restore the stored state and advance the authorization as far as possible
    ///
    /// - No stored state: a request token is issued and saved, and the
    ///   authorization URL is returned. No credential verification happens.
    /// - Pending authorization: the configured verifier is exchanged for an
    ///   access token, which is saved, then verified.
    /// - Stored access token: verified directly.
    ///
    /// A failed remote call leaves the state untouched in memory and on disk,
    /// so calling again with the same configuration is safe.
    ///
    /// Once the verifier exchange has succeeded the access token is kept in
    /// memory even if writing the state file fails. The request token has
    /// been consumed by the server, so recover from that `AuthError::Io` with
    /// [`save_state`](Self::save_state) rather than another `initialize`.
    ///
    /// # Errors
    ///
    /// - `AuthError::Io` / `AuthError::Decode` if the state file cannot be used
    /// - `AuthError::MissingVerifier` if authorization is pending and no
    ///   verifier is configured
    /// - `AuthError::ExternalService` if a token step fails remotely
    /// - `AuthError::Verification` if the access token is rejected. The
    ///   stored token is kept; call [`reset`](Self::reset) to start over.
    pub async fn initialize(&mut self) -> Result<InitOutcome> {
        self.session = None;
        self.state = self.store.load()?;

        match self.state.phase() {
            AuthPhase::Empty => {
                let url = self.begin_authorization().await?;
                return Ok(InitOutcome::NeedsAuthorization(url));
            }
            AuthPhase::PendingVerification => self.finalize_authorization().await?,
            AuthPhase::Finalized => tracing::debug!("Using stored access token"),
        }

        let token = self
            .state
            .access_token
            .clone()
            .ok_or(AuthError::NotAuthenticated)?;
        let session = Session::create(&self.service, token).await?;
        self.session = Some(session.clone());

        Ok(InitOutcome::Ready(session))
    }

    /// Empty -> PendingVerification
    async fn begin_authorization(&mut self) -> Result<Url> {
        tracing::debug!("No stored authorization, requesting a request token");
        let grant = self
            .service
            .issue_request_token()
            .await
            .map_err(|e| AuthError::external(FlowStep::RequestToken, e))?;
        if grant.token.is_empty() {
            return Err(AuthError::external(
                FlowStep::RequestToken,
                ServiceError::InvalidResponse("empty request token".to_string()),
            ));
        }

        let next = AuthState::pending(grant.token);
        self.store.save(&next)?;
        self.state = next;

        tracing::info!(
            store = %self.store.path().display(),
            "Authorization pending, waiting for the user's PIN"
        );
        Ok(grant.authorization_url)
    }

    /// PendingVerification -> Finalized
    async fn finalize_authorization(&mut self) -> Result<()> {
        let verifier = self
            .config
            .verifier()
            .ok_or(AuthError::MissingVerifier)?
            .to_string();
        let request_token = self.state.request_token.clone().unwrap_or_default();

        tracing::debug!(
            request_token = %mask_secret(&request_token),
            "Exchanging verifier for an access token"
        );
        let access_token = self
            .service
            .exchange_verifier(&request_token, &verifier)
            .await
            .map_err(|e| AuthError::external(FlowStep::VerifierExchange, e))?;

        // Kept in memory before the write so save_state() can retry it.
        self.state = AuthState::finalized(access_token);
        self.store.save(&self.state)?;

        tracing::info!("Authorization finalized");
        Ok(())
    }

    /// Write the in-memory state to the state file
    ///
    /// Also the recovery path when `initialize` obtained a token but failed
    /// with `AuthError::Io` while saving it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Io` if the file cannot be written.
    pub fn save_state(&self) -> Result<()> {
        self.store.save(&self.state)
    }

    /// Remove the state file and forget the session
    ///
    /// The next [`initialize`](Self::initialize) starts a new authorization.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Io` if the file exists but cannot be removed.
    pub fn reset(&mut self) -> Result<()> {
        self.store.delete()?;
        self.state = AuthState::default();
        self.session = None;
        tracing::info!(store = %self.store.path().display(), "Authorization state reset");
        Ok(())
    }

    /// Authenticated account, e.g. `"Jack (@jack)"`
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` until `initialize` returned a session.
    pub fn authenticated_principal(&self) -> Result<&str> {
        self.session
            .as_ref()
            .map(Session::principal_label)
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Verified session, if any
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// In-memory authorization state
    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Current state machine phase
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.state.phase()
    }

    /// Get the credential store
    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Get the OAuth service
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }
}

/// Build a Twitter [`Authenticator`] from `config` and run
/// [`initialize`](Authenticator::initialize).
///
/// # Errors
///
/// See [`Authenticator::new`] and [`Authenticator::initialize`].
pub async fn initialize(config: AuthConfig) -> Result<(Authenticator, InitOutcome)> {
    let mut authenticator = Authenticator::new(config)?;
    let outcome = authenticator.initialize().await?;
    Ok((authenticator, outcome))
}
