//! # twitter-oob-auth
//!
//! Resumable out-of-band (PIN) OAuth 1.0a authorization for Twitter API
//! clients. Intermediate and final credentials are kept in a local JSON file,
//! so a process can pick the authorization up again after a restart without
//! asking the user twice.
//!
//! ## Quick Start
//!
//! ```no_run
//! use twitter_oob_auth::{AuthConfig, InitOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuthConfig::builder()
//!         .api_key("consumer-key")
//!         .api_key_secret("consumer-secret")
//!         .build();
//!
//!     let (auth, outcome) = twitter_oob_auth::initialize(config).await?;
//!     match outcome {
//!         InitOutcome::NeedsAuthorization(url) => {
//!             // Show the URL, get the PIN, call initialize again with `.verifier(pin)`
//!             println!("Authorize at: {url}");
//!         }
//!         InitOutcome::Ready(_session) => {
//!             println!("Signed in as {}", auth.authenticated_principal()?);
//!         }
//!     }
//!     auth.save_state()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`auth`]: state machine, persisted state and its file store
//! - [`session`]: verified sessions and the authenticated principal
//! - [`service`]: the [`OAuthService`] seam and its Twitter implementation
//! - [`config`]: configuration, from a builder or the environment
//! - [`error`]: error types
//!
//! Swap in your own [`OAuthService`] with [`Authenticator::with_service`] to
//! target another OAuth 1.0a provider or to test without a network.
//!
//! ## Logging
//!
//! This crate uses [`tracing`](https://crates.io/crates/tracing). Tokens are
//! masked before they reach a log line. Attach a subscriber to see events:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, AuthError>`](Result). Nothing is
//! retried internally. [`AuthError::is_retryable`] tells which failures can be
//! retried by simply calling `initialize` again.
//!
//! ## Limitations
//!
//! The state file has no locking. Run a single process per state file.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod error;
pub mod service;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use auth::{
    AccessToken, AuthPhase, AuthState, Authenticator, CredentialStore, InitOutcome, initialize,
};
pub use config::AuthConfig;
pub use error::{AuthError, FlowStep, Result};
pub use service::{
    AuthorizedClient, ConsumerCredentials, OAuthService, RequestTokenGrant, ServiceError,
    TwitterEndpoints, TwitterService,
};
pub use session::{Principal, Session};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
