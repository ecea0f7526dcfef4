//! Persisted authorization state

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// OAuth 1.0a access credentials (token + secret)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Access token
    #[serde(rename = "Token")]
    pub token: String,

    /// Access token secret
    #[serde(rename = "TokenSecret")]
    pub secret: String,
}

impl AccessToken {
    /// Create access credentials from a token/secret pair
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

// Secrets stay out of debug output.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &crate::utils::mask_secret(&self.token))
            .field("secret", &"***")
            .finish()
    }
}

/// Phase of the authorization state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// No request token and no access token
    Empty,
    /// A request token was issued, waiting for the user's verifier
    PendingVerification,
    /// An access token has been obtained
    Finalized,
}

/// Authorization state mirrored to the state file
///
/// Serialized as `{"RequestToken": "...", "AccessToken": {...} | null}`.
/// An absent request token is written as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Request token of an ongoing authorization
    #[serde(rename = "RequestToken", default, with = "empty_as_none")]
    pub request_token: Option<String>,

    /// Access credentials once authorization is complete
    #[serde(rename = "AccessToken", default)]
    pub access_token: Option<AccessToken>,
}

impl AuthState {
    /// State after a request token has been issued
    ///
    /// An empty token is stored as absent, the same way it is decoded.
    pub fn pending(request_token: impl Into<String>) -> Self {
        Self {
            request_token: Some(request_token.into()).filter(|t| !t.is_empty()),
            access_token: None,
        }
    }

    /// State after the verifier exchange; the request token is cleared
    #[must_use]
    pub fn finalized(access_token: AccessToken) -> Self {
        Self {
            request_token: None,
            access_token: Some(access_token),
        }
    }

    /// Current state machine phase
    ///
    /// An access token takes precedence over a leftover request token.
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        match (&self.access_token, &self.request_token) {
            (Some(_), _) => AuthPhase::Finalized,
            (None, Some(_)) => AuthPhase::PendingVerification,
            (None, None) => AuthPhase::Empty,
        }
    }

    /// Whether no authorization has started
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phase() == AuthPhase::Empty
    }
}

mod empty_as_none {
    use super::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(d)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        assert_eq!(AuthState::default().phase(), AuthPhase::Empty);
        assert_eq!(AuthState::pending("req").phase(), AuthPhase::PendingVerification);

        let done = AuthState::finalized(AccessToken::new("tok", "sec"));
        assert_eq!(done.phase(), AuthPhase::Finalized);
        assert!(done.request_token.is_none());
    }

    #[test]
    fn test_access_token_wins_over_stale_request_token() {
        let state = AuthState {
            request_token: Some("stale".to_string()),
            access_token: Some(AccessToken::new("tok", "sec")),
        };
        assert_eq!(state.phase(), AuthPhase::Finalized);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(AuthState::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"RequestToken": "", "AccessToken": null})
        );

        let json = serde_json::to_value(AuthState::finalized(AccessToken::new("t", "s"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "RequestToken": "",
                "AccessToken": {"Token": "t", "TokenSecret": "s"}
            })
        );
    }

    #[test]
    fn test_round_trip() {
        let states = [
            AuthState::default(),
            AuthState::pending("req-123"),
            AuthState::finalized(AccessToken::new("tok-1", "sec-1")),
        ];
        for state in states {
            let encoded = serde_json::to_string(&state).unwrap();
            let decoded: AuthState = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, state);
        }
    }

    #[test]
    fn test_empty_request_token_is_absent() {
        let state = AuthState::pending("");
        assert_eq!(state.phase(), AuthPhase::Empty);

        let encoded = serde_json::to_string(&state).unwrap();
        let decoded: AuthState = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_missing_fields_decode_as_absent() {
        let state: AuthState = serde_json::from_str("{}").unwrap();
        assert!(state.is_empty());

        let state: AuthState = serde_json::from_str(r#"{"RequestToken": null}"#).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_debug_hides_secret() {
        let token = AccessToken::new("1234567890-abcdefghijkl", "very-secret-value");
        let debug = format!("{token:?}");
        assert!(!debug.contains("very-secret-value"));
        assert!(!debug.contains("abcdefghijkl"));
    }
}
