//! github::client
//!
//! GitHub REST client.
//!
//! # Design
//!
//! This module implements the `GitHubApi` trait over `reqwest`. Requests are
//! anonymous unless a personal access token is attached with
//! [`GitHubClient::with_token`], in which case they carry a bearer header
//! and get the authenticated rate limit.
//!
//! There is no retry and no rate-limit handling: every non-success status
//! is mapped to a [`FetchError`] and returned to the caller.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::traits::{AuthenticatedUser, FetchError, GitHubApi, Profile, RepositorySummary};
use crate::core::config::DEFAULT_API_BASE;
use crate::core::types::{Handle, PageSize};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "githunts-cli";

/// REST API version pinned in every request.
const API_VERSION: &str = "2022-11-28";

/// GitHub REST client.
pub struct GitHubClient {
    client: Client,
    /// Personal access token, if signed in
    token: Option<String>,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("has_token", &self.token.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl GitHubClient {
    /// Create an anonymous client for the given API base.
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            token: None,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Attach a personal access token to every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Check if requests are authenticated.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Build common headers, using `token` for the bearer header if given.
    fn headers(&self, token: Option<&str>) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| FetchError::AuthFailed("token contains invalid characters".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// Issue a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<T, FetchError> {
        tracing::debug!(url, authenticated = token.is_some(), "GET");

        let response = self
            .client
            .get(url)
            .headers(self.headers(token)?)
            .send()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, FetchError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| FetchError::Decode(format!("failed to parse response: {}", e)))
        } else {
            Err(self.error_from_response(response, status).await)
        }
    }

    /// Map a non-success response to a `FetchError`.
    async fn error_from_response(&self, response: Response, status: StatusCode) -> FetchError {
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        tracing::debug!(status = status.as_u16(), %message, "GitHub request failed");

        match status {
            StatusCode::UNAUTHORIZED => FetchError::AuthFailed(message),
            StatusCode::NOT_FOUND => FetchError::NotFound(message),
            _ if status.is_server_error() => FetchError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => FetchError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_profile(&self, handle: &Handle) -> Result<Profile, FetchError> {
        let url = format!("{}/users/{}", self.api_base, handle);
        self.get_json(&url, self.token.as_deref()).await
    }

    async fn list_repositories(
        &self,
        handle: &Handle,
        page_size: PageSize,
    ) -> Result<Vec<RepositorySummary>, FetchError> {
        let url = format!(
            "{}/users/{}/repos?sort=updated&per_page={}",
            self.api_base,
            handle,
            page_size.per_page()
        );
        let mut repos: Vec<RepositorySummary> = self.get_json(&url, self.token.as_deref()).await?;
        repos.truncate(page_size.get() as usize);
        Ok(repos)
    }

    async fn authenticated_user(&self, token: &str) -> Result<AuthenticatedUser, FetchError> {
        let url = format!("{}/user", self.api_base);
        self.get_json(&url, Some(token)).await
    }
}

/// Error body returned by GitHub.
#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}
