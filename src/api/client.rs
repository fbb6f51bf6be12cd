//! API client for the auth service.
//!
//! Every call is a single attempt. Non-2xx responses become
//! `ApiError::Rejected` carrying the server's `message`, transport
//! failures become `ApiError::NetworkError`.

use std::time::Duration;

use reqwest::{header, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::user::{LoginResponse, UpdateResponse};
use crate::models::{LoginForm, RegisterForm, UpdateRequest, UserProfile};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds when the config does not set one.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "/login";
const REGISTER_PATH: &str = "/register";
const USER_PATH: &str = "/user";
const UPDATE_PATH: &str = "/user/update";
const LOGOUT_PATH: &str = "/logout";

/// Client for the auth service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client for `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(Self::default_headers())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured base URL, shown in connection error messages
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn default_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let url = response.url().path().to_string();
            let body = response.text().await.unwrap_or_default();
            debug!(
                status = status.as_u16(),
                path = %url,
                body = %ApiError::truncate_body(&body),
                "Request rejected"
            );
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse {} response: {}", what, e))
        })
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, ApiError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        Self::check_response(response).await
    }

    // ===== Auth endpoints =====

    /// Exchange credentials for a bearer token
    pub async fn login(&self, form: &LoginForm) -> Result<String, ApiError> {
        let response = self.post_json(LOGIN_PATH, form).await?;
        let body: LoginResponse = Self::parse_json(response, "login").await?;

        match body.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                warn!("Login succeeded without a token in the response");
                Err(ApiError::InvalidResponse(
                    "Login response did not include a token".to_string(),
                ))
            }
        }
    }

    /// Create an account. The success body is informational and ignored.
    pub async fn register(&self, form: &RegisterForm) -> Result<(), ApiError> {
        self.post_json(REGISTER_PATH, form).await?;
        Ok(())
    }

    /// Fetch the profile that belongs to `token`
    pub async fn fetch_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .get(self.endpoint(USER_PATH))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, "user").await
    }

    /// Save profile changes and return the profile the server stored
    pub async fn update_user(
        &self,
        token: &str,
        request: &UpdateRequest<'_>,
    ) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .put(self.endpoint(UPDATE_PATH))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        let body: UpdateResponse = Self::parse_json(response, "update").await?;
        Ok(body.user)
    }

    /// Tell the server the token is no longer in use. The response body is ignored.
    pub async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(LOGOUT_PATH))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }
}
