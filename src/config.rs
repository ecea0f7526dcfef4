//! Authorization configuration

use std::path::{Path, PathBuf};
use typed_builder::TypedBuilder;

use crate::auth::store::DEFAULT_STATE_FILE;
use crate::error::{AuthError, Result};
use crate::service::ConsumerCredentials;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "TWITTER_API_KEY";
/// Environment variable holding the API key secret
pub const ENV_API_KEY_SECRET: &str = "TWITTER_API_KEY_SECRET";
/// Environment variable holding the verifier (PIN)
pub const ENV_PIN: &str = "TWITTER_PIN";
/// Environment variable overriding the state file path
pub const ENV_STATE_PATH: &str = "TWITTER_STATE_PATH";

/// Inputs of one initialization attempt
///
/// ```
/// use twitter_oob_auth::AuthConfig;
///
/// let config = AuthConfig::builder()
///     .api_key("consumer-key")
///     .api_key_secret("consumer-secret")
///     .verifier("1234567")
///     .build();
/// assert_eq!(config.verifier(), Some("1234567"));
/// ```
#[derive(Clone, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for AuthConfig"),
    builder_type(doc = "Builder for AuthConfig", vis = "pub"),
    build_method(doc = "Build the AuthConfig")
)]
pub struct AuthConfig {
    /// Application API key
    #[builder(setter(into))]
    pub api_key: String,

    /// Application API key secret
    #[builder(setter(into))]
    pub api_key_secret: String,

    /// Verifier (PIN) the user copied after authorizing
    #[builder(default, setter(strip_option, into))]
    pub verifier: Option<String>,

    /// State file path, `token_credentials.json` in the working directory if unset
    #[builder(default, setter(strip_option, into))]
    pub state_path: Option<PathBuf>,
}

impl AuthConfig {
    /// Read the configuration from `TWITTER_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidConfig` if the API key or secret is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AuthError::invalid_config(format!("{name} is not set")))
        };

        let config = Self {
            api_key: required(ENV_API_KEY)?,
            api_key_secret: required(ENV_API_KEY_SECRET)?,
            verifier: lookup(ENV_PIN),
            state_path: lookup(ENV_STATE_PATH)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the consumer credentials are present
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidConfig` if the API key or secret is empty.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AuthError::invalid_config("API key is empty"));
        }
        if self.api_key_secret.trim().is_empty() {
            return Err(AuthError::invalid_config("API key secret is empty"));
        }
        Ok(())
    }

    /// Verifier, with blank values treated as absent
    #[must_use]
    pub fn verifier(&self) -> Option<&str> {
        self.verifier
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Effective state file path
    #[must_use]
    pub fn state_path(&self) -> &Path {
        self.state_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_STATE_FILE))
    }

    /// Consumer credentials for signing
    #[must_use]
    pub fn consumer(&self) -> ConsumerCredentials {
        ConsumerCredentials::new(&self.api_key, &self.api_key_secret)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key)
            .field("api_key_secret", &"***")
            .field("verifier", &self.verifier.as_ref().map(|_| "***"))
            .field("state_path", &self.state_path)
            .finish()
    }
}
