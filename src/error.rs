//! Error types for the authorization flow

use std::path::PathBuf;
use thiserror::Error;

use crate::service::ServiceError;

/// Step of the authorization flow that talks to the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    /// Obtaining a request token and authorization URL
    RequestToken,
    /// Exchanging the request token and verifier for an access token
    VerifierExchange,
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestToken => write!(f, "request token issuance"),
            Self::VerifierExchange => write!(f, "verifier exchange"),
        }
    }
}

/// Main error type for the authorization flow
#[derive(Error, Debug)]
pub enum AuthError {
    /// State file could not be opened, read, written or removed
    #[error("IO error on state file {}: {source}", .path.display())]
    Io {
        /// State file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// State file content is not a valid auth state
    #[error("Malformed state file {}: {source}", .path.display())]
    Decode {
        /// State file path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Auth state could not be serialized
    #[error("Encoding auth state failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Remote service failed during a token step
    #[error("{step} failed: {source}")]
    ExternalService {
        /// Step that failed
        step: FlowStep,
        /// Underlying service error
        #[source]
        source: ServiceError,
    },

    /// Credential verification failed for a finalized access token.
    ///
    /// The persisted state is left as is. Call `Authenticator::reset` and
    /// start the authorization over.
    #[error("Credential verification failed: {0}\nSuggestion: reset the auth state and authorize again")]
    Verification(#[source] ServiceError),

    /// Authorization is pending but no verifier (PIN) was supplied
    #[error("Ongoing authorization loaded but no verifier (PIN) provided")]
    MissingVerifier,

    /// No verified session exists yet
    #[error("Not authenticated. Complete initialize() before using the session.")]
    NotAuthenticated,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for authorization operations
pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    /// Create an I/O error for a state file path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a decode error for a state file path
    pub fn decode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// Create an external service error for a flow step
    #[must_use]
    pub fn external(step: FlowStep, source: ServiceError) -> Self {
        Self::ExternalService { step, source }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether calling `initialize()` again with the same inputs is safe
    ///
    /// An `Io` error while saving a freshly exchanged access token is the
    /// exception: retry with `save_state()` instead.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::ExternalService { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_error_names_step() {
        let err = AuthError::external(
            FlowStep::VerifierExchange,
            ServiceError::Rejected("invalid PIN".to_string()),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("verifier exchange failed"));
        assert!(msg.contains("invalid PIN"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_usage_errors_not_retryable() {
        assert!(!AuthError::MissingVerifier.is_retryable());
        assert!(!AuthError::NotAuthenticated.is_retryable());
        assert!(!AuthError::Verification(ServiceError::Rejected("revoked".into())).is_retryable());
    }
}
