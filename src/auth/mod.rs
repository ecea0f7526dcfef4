//! Out-of-band OAuth 1.0a authorization
//!
//! # Overview
//!
//! Out-of-band (PIN) mode needs no callback server. The user approves the
//! application in a browser and copies a short verifier by hand, so the flow
//! is split over two calls to [`Authenticator::initialize`]:
//!
//! 1. First call: a request token is issued, saved to disk, and the
//!    authorization URL is returned as [`InitOutcome::NeedsAuthorization`]
//! 2. The user opens the URL, approves, and reads the PIN
//! 3. Second call, with the PIN in [`AuthConfig`](crate::AuthConfig): the
//!    request token is exchanged for an access token, saved, verified, and a
//!    [`Session`](crate::Session) is returned as [`InitOutcome::Ready`]
//!
//! Later runs find the access token on disk and go straight to step 3's
//! verification.
//!
//! # Example
//!
//! ```no_run
//! use twitter_oob_auth::{AuthConfig, Authenticator, InitOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuthConfig::from_env()?;
//!     let mut auth = Authenticator::new(config)?;
//!
//!     match auth.initialize().await? {
//!         InitOutcome::NeedsAuthorization(url) => {
//!             println!("Open {url} and rerun with TWITTER_PIN set");
//!         }
//!         InitOutcome::Ready(session) => {
//!             println!("Authenticated as {}", session.principal_label());
//!         }
//!     }
//!     auth.save_state()?;
//!     Ok(())
//! }
//! ```
//!
//! # State File
//!
//! State is kept in `token_credentials.json` in the working directory unless
//! configured otherwise. The file is written with user-only permissions
//! (600) and is never removed automatically; see [`Authenticator::reset`].

mod flow;
pub(crate) mod state;
pub(crate) mod store;

pub use flow::{Authenticator, InitOutcome, initialize};
pub use state::{AccessToken, AuthPhase, AuthState};
pub use store::{CredentialStore, DEFAULT_STATE_FILE};
