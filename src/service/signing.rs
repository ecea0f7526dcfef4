//! OAuth 1.0a request signing (HMAC-SHA1)
//!
//! Thin adapter over [`oauth1_request`]: it picks the credentials and
//! protocol parameters for each step of the flow and returns the
//! `Authorization` header value.

use oauth1_request::{Builder, Credentials, HmacSha1, Request};

use super::ConsumerCredentials;

/// Signs requests for one consumer and, optionally, one token
#[derive(Debug, Clone, Copy)]
pub struct Signer<'a> {
    consumer: &'a ConsumerCredentials,
    token: Option<(&'a str, &'a str)>,
    callback: Option<&'a str>,
    verifier: Option<&'a str>,
}

impl<'a> Signer<'a> {
    /// Signer without a token (request token step)
    #[must_use]
    pub fn new(consumer: &'a ConsumerCredentials) -> Self {
        Self {
            consumer,
            token: None,
            callback: None,
            verifier: None,
        }
    }

    /// Sign on behalf of a token
    #[must_use]
    pub fn with_token(mut self, token: &'a str, token_secret: &'a str) -> Self {
        self.token = Some((token, token_secret));
        self
    }

    /// Send `oauth_callback`
    #[must_use]
    pub fn callback(mut self, callback: &'a str) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Send `oauth_verifier`
    #[must_use]
    pub fn verifier(mut self, verifier: &'a str) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Build the `Authorization` header value for a request
    ///
    /// `uri` must not carry a query string. Query or form parameters go in
    /// `params` so they are covered by the signature.
    #[must_use]
    pub fn authorization_header<R: Request + ?Sized>(
        &self,
        method: &str,
        uri: &str,
        params: &R,
    ) -> String {
        let client = Credentials::new(self.consumer.key.as_str(), self.consumer.secret.as_str());
        let mut builder = Builder::new(client, HmacSha1::new());
        if let Some((token, secret)) = self.token {
            builder.token(Credentials::new(token, secret));
        }
        builder.callback(self.callback).verifier(self.verifier);
        builder.authorize(method, uri, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";

    fn consumer() -> ConsumerCredentials {
        ConsumerCredentials::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
    }

    #[derive(oauth1_request::Request)]
    struct Photos {
        file: &'static str,
        size: &'static str,
    }

    #[test]
    fn test_request_token_header() {
        let consumer = consumer();
        let header = Signer::new(&consumer)
            .callback("oob")
            .authorization_header("POST", REQUEST_TOKEN_URL, &());

        assert!(header.starts_with("OAuth "));
        assert!(header.contains(r#"oauth_consumer_key="dpf43f3p2l4k3l03""#));
        assert!(header.contains(r#"oauth_callback="oob""#));
        assert!(header.contains(r#"oauth_signature_method="HMAC-SHA1""#));
        assert!(header.contains("oauth_signature="));
        assert!(!header.contains("oauth_token="));
        assert!(!header.contains("kd94hf93k423kf44"));
    }

    #[test]
    fn test_verifier_exchange_header() {
        let consumer = consumer();
        let header = Signer::new(&consumer)
            .with_token("hh5s93j4hdidpola", "")
            .verifier("4242424")
            .authorization_header("POST", "https://api.twitter.com/oauth/access_token", &());

        assert!(header.contains(r#"oauth_token="hh5s93j4hdidpola""#));
        assert!(header.contains(r#"oauth_verifier="4242424""#));
        assert!(!header.contains("oauth_callback="));
    }

    #[test]
    fn test_params_signed_not_sent_in_header() {
        let consumer = consumer();
        let params = Photos {
            file: "vacation.jpg",
            size: "original",
        };
        let header = Signer::new(&consumer)
            .with_token("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00")
            .authorization_header("GET", "http://photos.example.net/photos", &params);

        assert!(header.contains(r#"oauth_token="nnch734d00sl2jdk""#));
        assert!(!header.contains("vacation"));
        assert!(!header.contains("pfkkdhi9sl3r4s00"));
    }

    #[test]
    fn test_nonce_changes_per_request() {
        let consumer = consumer();
        let signer = Signer::new(&consumer).callback("oob");
        let a = signer.authorization_header("POST", REQUEST_TOKEN_URL, &());
        let b = signer.authorization_header("POST", REQUEST_TOKEN_URL, &());
        assert_ne!(a, b);
    }
}
