//! HTTP client that signs every request with the user's access token

use oauth1_request::Request;
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use super::signing::Signer;
use super::{ConsumerCredentials, ServiceError};
use crate::auth::AccessToken;
use crate::utils::truncate_for_display;

/// Longest response body kept in error messages
const MAX_ERROR_BODY: usize = 512;

/// Authenticated client handle
///
/// Holds the consumer and access credentials and signs each request it
/// builds. Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct AuthorizedClient {
    consumer: ConsumerCredentials,
    token: AccessToken,
    http: reqwest::Client,
}

impl AuthorizedClient {
    /// Create a client with a fresh HTTP connection pool
    #[must_use]
    pub fn new(consumer: ConsumerCredentials, token: AccessToken) -> Self {
        Self::with_http_client(consumer, token, reqwest::Client::new())
    }

    /// Create a client reusing an existing HTTP client
    #[must_use]
    pub fn with_http_client(
        consumer: ConsumerCredentials,
        token: AccessToken,
        http: reqwest::Client,
    ) -> Self {
        Self {
            consumer,
            token,
            http,
        }
    }

    /// Access credentials this client acts with
    #[must_use]
    pub fn access_token(&self) -> &AccessToken {
        &self.token
    }

    /// Build a signed request
    ///
    /// Query parameters are passed as `params` (a type deriving
    /// [`oauth1_request::Request`], or `&()` for none) so they are covered by
    /// the signature and appended to `url`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Url` if `url` is not a valid absolute URL and
    /// `ServiceError::InvalidRequest` if it already carries a query string.
    pub fn request<R: Request + ?Sized>(
        &self,
        method: Method,
        url: &str,
        params: &R,
    ) -> Result<reqwest::RequestBuilder, ServiceError> {
        if Url::parse(url)?.query().is_some() {
            return Err(ServiceError::InvalidRequest(format!(
                "query string in {url}; pass query parameters separately"
            )));
        }
        let header = Signer::new(&self.consumer)
            .with_token(&self.token.token, &self.token.secret)
            .authorization_header(method.as_str(), url, params);
        let url = Url::parse(&oauth1_request::to_query(url.to_string(), params))?;

        Ok(self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, header))
    }

    /// Signed GET returning a decoded JSON body
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a body
    /// that does not decode as `T`.
    pub async fn get_json<T, R>(&self, url: &str, params: &R) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
        R: Request + ?Sized,
    {
        let response = self.request(Method::GET, url, params)?.send().await?;
        let body = success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            ServiceError::InvalidResponse(format!(
                "{e} - Response: {}",
                truncate_for_display(&body, MAX_ERROR_BODY)
            ))
        })
    }
}

/// Read a response body, turning non-success statuses into errors
pub(crate) async fn success_body(response: reqwest::Response) -> Result<String, ServiceError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: truncate_for_display(&body, MAX_ERROR_BODY),
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AuthorizedClient {
        AuthorizedClient::new(
            ConsumerCredentials::new("consumer-key", "consumer-secret"),
            AccessToken::new("access-token", "access-secret"),
        )
    }

    #[derive(oauth1_request::Request)]
    struct Lookup {
        skip_status: bool,
    }

    fn authorization(request: &reqwest::Request) -> &str {
        request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn test_request_is_signed() {
        let request = client()
            .request(Method::GET, "https://api.twitter.com/1.1/account/settings.json", &())
            .unwrap()
            .build()
            .unwrap();

        let header = authorization(&request);
        assert!(header.starts_with("OAuth "));
        assert!(header.contains(r#"oauth_token="access-token""#));
        assert!(header.contains(r#"oauth_consumer_key="consumer-key""#));
        assert!(!header.contains("access-secret"));
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_request_appends_params() {
        let request = client()
            .request(
                Method::GET,
                "https://api.twitter.com/1.1/x.json",
                &Lookup { skip_status: true },
            )
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url().query(), Some("skip_status=true"));
        assert!(!authorization(&request).contains("skip_status"));
    }

    #[test]
    fn test_request_rejects_inline_query() {
        let result = client().request(Method::GET, "https://api.twitter.com/1.1/x.json?a=1", &());
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
    }

    #[test]
    fn test_request_rejects_relative_url() {
        let result = client().request(Method::GET, "/1.1/account/settings.json", &());
        assert!(matches!(result, Err(ServiceError::Url(_))));
    }
}
