//! github::traits
//!
//! API trait and record types for the GitHub REST endpoints githunts reads.
//!
//! # Design
//!
//! The `GitHubApi` trait is async because every operation is a network
//! request. Record types deserialize straight from the GitHub JSON and keep
//! the upstream field names on the wire while exposing descriptive names in
//! Rust.
//!
//! # Example
//!
//! ```ignore
//! use githunts::core::types::{Handle, PageSize};
//! use githunts::github::GitHubApi;
//!
//! async fn show(api: &dyn GitHubApi) -> Result<(), githunts::github::FetchError> {
//!     let handle = Handle::new("octocat").unwrap();
//!     let profile = api.get_profile(&handle).await?;
//!     let repos = api.list_repositories(&handle, PageSize::default()).await?;
//!     println!("{} has {} recent repos", profile.handle, repos.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Handle, PageSize};

/// Errors from GitHub API operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Credentials were rejected (401).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// API returned any other non-success status.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// A success response whose body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl FetchError {
    /// HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::AuthFailed(_) => Some(401),
            FetchError::NotFound(_) => Some(404),
            FetchError::ApiError { status, .. } => Some(*status),
            FetchError::Decode(_) | FetchError::NetworkError(_) => None,
        }
    }
}

/// Public profile of a GitHub user.
///
/// An immutable snapshot; each lookup replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Login name
    #[serde(rename = "login")]
    pub handle: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: String,
    /// Profile page URL
    #[serde(default)]
    pub html_url: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form biography
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "followers")]
    pub follower_count: u64,
    #[serde(rename = "following")]
    pub following_count: u64,
    #[serde(rename = "public_repos")]
    pub public_repo_count: u64,
    #[serde(rename = "public_gists")]
    pub public_gist_count: u64,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

/// Summary of one repository from the user's repository list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    #[serde(rename = "stargazers_count")]
    pub star_count: u64,
    #[serde(rename = "forks_count")]
    pub fork_count: u64,
    /// Repository size in kilobytes
    #[serde(rename = "size")]
    pub size_kb: u64,
    pub updated_at: DateTime<Utc>,
    /// Primary language, absent when GitHub could not detect one
    #[serde(default)]
    pub language: Option<String>,
    #[serde(rename = "open_issues_count")]
    pub open_issue_count: u64,
    #[serde(rename = "watchers_count")]
    pub watcher_count: u64,
}

/// The user a personal access token belongs to (`GET /user`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Read-only access to the GitHub REST API.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so lookups can run on spawned
/// tasks.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Name of the implementation ("github", "mock").
    fn name(&self) -> &'static str;

    /// Fetch a public profile.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such user exists
    /// - `ApiError` for any other non-success status
    async fn get_profile(&self, handle: &Handle) -> Result<Profile, FetchError>;

    /// Fetch the user's repositories, most recently updated first.
    ///
    /// At most `page_size` entries are returned.
    async fn list_repositories(
        &self,
        handle: &Handle,
        page_size: PageSize,
    ) -> Result<Vec<RepositorySummary>, FetchError>;

    /// Resolve the user a personal access token belongs to.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the token is rejected
    async fn authenticated_user(&self, token: &str) -> Result<AuthenticatedUser, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_deserializes_from_api_json() {
        let json = r#"{
            "login": "octocat",
            "id": 583231,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
            "html_url": "https://github.com/octocat",
            "name": "The Octocat",
            "bio": null,
            "public_repos": 8,
            "public_gists": 8,
            "followers": 9000,
            "following": 9,
            "created_at": "2011-01-25T18:44:36Z"
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.handle, "octocat");
        assert_eq!(profile.follower_count, 9000);
        assert_eq!(profile.following_count, 9);
        assert_eq!(profile.public_repo_count, 8);
        assert_eq!(profile.public_gist_count, 8);
        assert_eq!(profile.bio, None);
        assert_eq!(profile.created_at.to_rfc3339(), "2011-01-25T18:44:36+00:00");
    }

    #[test]
    fn repository_null_language_is_none() {
        let json = r#"{
            "name": "dotfiles",
            "stargazers_count": 3,
            "forks_count": 1,
            "size": 120,
            "updated_at": "2024-03-01T12:00:00Z",
            "language": null,
            "open_issues_count": 0,
            "watchers_count": 3
        }"#;

        let repo: RepositorySummary = serde_json::from_str(json).unwrap();

        assert_eq!(repo.name, "dotfiles");
        assert_eq!(repo.size_kb, 120);
        assert!(repo.language.is_none());
    }

    #[test]
    fn fetch_error_status() {
        assert_eq!(FetchError::NotFound("x".into()).status(), Some(404));
        assert_eq!(
            FetchError::ApiError {
                status: 502,
                message: "bad gateway".into()
            }
            .status(),
            Some(502)
        );
        assert_eq!(FetchError::NetworkError("refused".into()).status(), None);
    }

    #[test]
    fn fetch_error_display() {
        assert_eq!(
            FetchError::NotFound("user 'ghost'".into()).to_string(),
            "not found: user 'ghost'"
        );
        assert_eq!(
            FetchError::ApiError {
                status: 422,
                message: "Validation failed".into()
            }
            .to_string(),
            "API error: 422 - Validation failed"
        );
    }
}
