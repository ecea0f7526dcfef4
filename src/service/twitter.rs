//! Twitter OAuth 1.0a endpoints

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

use super::client::success_body;
use super::signing::Signer;
use super::{
    AuthorizedClient, ConsumerCredentials, OAuthService, OUT_OF_BAND, RequestTokenGrant,
    ServiceError,
};
use crate::auth::AccessToken;
use crate::session::Principal;

const DEFAULT_REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
const DEFAULT_AUTHORIZE_URL: &str = "https://api.twitter.com/oauth/authorize";
const DEFAULT_ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";
const DEFAULT_VERIFY_CREDENTIALS_URL: &str =
    "https://api.twitter.com/1.1/account/verify_credentials.json";

/// Endpoint configuration
#[derive(Debug, Clone)]
pub struct TwitterEndpoints {
    /// Request token endpoint
    pub request_token_url: String,
    /// User authorization page
    pub authorize_url: String,
    /// Access token endpoint
    pub access_token_url: String,
    /// Credential verification endpoint, without query string
    pub verify_credentials_url: String,
}

impl Default for TwitterEndpoints {
    fn default() -> Self {
        Self {
            request_token_url: DEFAULT_REQUEST_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            access_token_url: DEFAULT_ACCESS_TOKEN_URL.to_string(),
            verify_credentials_url: DEFAULT_VERIFY_CREDENTIALS_URL.to_string(),
        }
    }
}

/// Query of the verify-credentials call
#[derive(oauth1_request::Request)]
struct VerifyCredentials {
    include_email: bool,
    skip_status: bool,
}

/// Account fields of the verify-credentials response
#[derive(Debug, Deserialize)]
struct VerifiedUser {
    name: String,
    screen_name: String,
}

/// [`OAuthService`] backed by the Twitter HTTP API
#[derive(Debug, Clone)]
pub struct TwitterService {
    consumer: ConsumerCredentials,
    endpoints: TwitterEndpoints,
    http: reqwest::Client,
}

impl TwitterService {
    /// Create a service using the production endpoints
    #[must_use]
    pub fn new(consumer: ConsumerCredentials) -> Self {
        Self::with_endpoints(consumer, TwitterEndpoints::default())
    }

    /// Create a service with custom endpoints
    #[must_use]
    pub fn with_endpoints(consumer: ConsumerCredentials, endpoints: TwitterEndpoints) -> Self {
        Self::with_http_client(consumer, endpoints, reqwest::Client::new())
    }

    /// Create a service with custom endpoints and HTTP client
    #[must_use]
    pub fn with_http_client(
        consumer: ConsumerCredentials,
        endpoints: TwitterEndpoints,
        http: reqwest::Client,
    ) -> Self {
        Self {
            consumer,
            endpoints,
            http,
        }
    }

    /// Get the endpoint configuration
    #[must_use]
    pub fn endpoints(&self) -> &TwitterEndpoints {
        &self.endpoints
    }

    /// Build the URL the user opens to approve a request token
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Url` if the authorize endpoint is not a valid URL.
    pub fn authorization_url(&self, request_token: &str) -> Result<Url, ServiceError> {
        Ok(Url::parse_with_params(
            &self.endpoints.authorize_url,
            [("oauth_token", request_token)],
        )?)
    }

    /// POST a signed token request and parse the form-encoded answer
    async fn token_request(
        &self,
        url: &str,
        signer: Signer<'_>,
    ) -> Result<HashMap<String, String>, ServiceError> {
        let header = signer.authorization_header(Method::POST.as_str(), url, &());
        let url = Url::parse(url)?;

        let response = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, header)
            .body("")
            .send()
            .await?;

        let body = success_body(response).await?;
        Ok(parse_form(&body))
    }
}

#[async_trait]
impl OAuthService for TwitterService {
    async fn issue_request_token(&self) -> Result<RequestTokenGrant, ServiceError> {
        let fields = self
            .token_request(
                &self.endpoints.request_token_url,
                Signer::new(&self.consumer).callback(OUT_OF_BAND),
            )
            .await?;

        if fields.get("oauth_callback_confirmed").map(String::as_str) != Some("true") {
            return Err(ServiceError::InvalidResponse(
                "callback not confirmed by request token endpoint".to_string(),
            ));
        }
        let token = required_field(&fields, "oauth_token")?;
        let authorization_url = self.authorization_url(&token)?;

        Ok(RequestTokenGrant {
            token,
            authorization_url,
        })
    }

    async fn exchange_verifier(
        &self,
        request_token: &str,
        verifier: &str,
    ) -> Result<AccessToken, ServiceError> {
        // The request token secret is not needed for an out-of-band exchange
        let signer = Signer::new(&self.consumer)
            .with_token(request_token, "")
            .verifier(verifier);
        let fields = self
            .token_request(&self.endpoints.access_token_url, signer)
            .await?;

        Ok(AccessToken::new(
            required_field(&fields, "oauth_token")?,
            required_field(&fields, "oauth_token_secret")?,
        ))
    }

    async fn verify_credentials(&self, client: &AuthorizedClient) -> Result<Principal, ServiceError> {
        let query = VerifyCredentials {
            include_email: false,
            skip_status: true,
        };
        let user: VerifiedUser = client
            .get_json(&self.endpoints.verify_credentials_url, &query)
            .await?;
        Ok(Principal::new(user.name, user.screen_name))
    }

    fn consumer(&self) -> &ConsumerCredentials {
        &self.consumer
    }
}

fn parse_form(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.trim().as_bytes())
        .into_owned()
        .collect()
}

fn required_field(fields: &HashMap<String, String>, name: &str) -> Result<String, ServiceError> {
    fields
        .get(name)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| ServiceError::InvalidResponse(format!("missing `{name}` in token response")))
}
