//! github::mock
//!
//! Mock GitHub API for deterministic testing.
//!
//! # Design
//!
//! Profiles, repository lists, and token owners are held in memory. Each
//! call is recorded so tests can assert that no request was issued, and a
//! per-handle delay lets tests force responses to resolve out of order.
//!
//! # Example
//!
//! ```
//! use githunts::core::types::{Handle, PageSize};
//! use githunts::github::mock::{sample_profile, MockGitHub};
//! use githunts::github::GitHubApi;
//!
//! # tokio_test_block_on(async {
//! let api = MockGitHub::new().with_profile(sample_profile("octocat"));
//!
//! let handle = Handle::new("octocat").unwrap();
//! let profile = api.get_profile(&handle).await.unwrap();
//! assert_eq!(profile.handle, "octocat");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::traits::{AuthenticatedUser, FetchError, GitHubApi, Profile, RepositorySummary};
use crate::core::types::{Handle, PageSize};

/// Mock GitHub API.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockGitHub {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    profiles: HashMap<String, Profile>,
    repositories: HashMap<String, Vec<RepositorySummary>>,
    users_by_token: HashMap<String, AuthenticatedUser>,
    delays: HashMap<String, Duration>,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    GetProfile(FetchError),
    ListRepositories(FetchError),
    AuthenticatedUser(FetchError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetProfile { handle: String },
    ListRepositories { handle: String, page_size: u32 },
    AuthenticatedUser,
}

impl MockGitHub {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a profile, keyed by its handle.
    pub fn with_profile(self, profile: Profile) -> Self {
        self.lock()
            .profiles
            .insert(profile.handle.to_lowercase(), profile);
        self
    }

    /// Register the repository list returned for a handle.
    pub fn with_repositories(self, handle: &str, repos: Vec<RepositorySummary>) -> Self {
        self.lock()
            .repositories
            .insert(handle.to_lowercase(), repos);
        self
    }

    /// Register the user a token resolves to.
    pub fn with_token_user(self, token: &str, user: AuthenticatedUser) -> Self {
        self.lock()
            .users_by_token
            .insert(token.to_string(), user);
        self
    }

    /// Delay every response for a handle.
    pub fn with_delay(self, handle: &str, delay: Duration) -> Self {
        self.lock().delays.insert(handle.to_lowercase(), delay);
        self
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Start failing on a specific operation after construction.
    pub fn set_fail_on(&self, fail_on: FailOn) {
        self.lock().fail_on = Some(fail_on);
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Forget recorded operations.
    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }

    fn record(&self, op: MockOperation) {
        self.lock().operations.push(op);
    }

    fn delay_for(&self, handle: &Handle) -> Option<Duration> {
        self.lock()
            .delays
            .get(&handle.as_str().to_lowercase())
            .copied()
    }

    fn check_fail(&self, op: &MockOperation) -> Option<FetchError> {
        let inner = self.lock();
        match (&inner.fail_on, op) {
            (Some(FailOn::GetProfile(e)), MockOperation::GetProfile { .. })
            | (Some(FailOn::ListRepositories(e)), MockOperation::ListRepositories { .. })
            | (Some(FailOn::AuthenticatedUser(e)), MockOperation::AuthenticatedUser) => {
                Some(e.clone())
            }
            _ => None,
        }
    }
}

#[async_trait]
impl GitHubApi for MockGitHub {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_profile(&self, handle: &Handle) -> Result<Profile, FetchError> {
        let op = MockOperation::GetProfile {
            handle: handle.to_string(),
        };
        self.record(op.clone());

        if let Some(delay) = self.delay_for(handle) {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.check_fail(&op) {
            return Err(err);
        }

        self.lock()
            .profiles
            .get(&handle.as_str().to_lowercase())
            .cloned()
            .ok_or_else(|| FetchError::NotFound("Not Found".into()))
    }

    async fn list_repositories(
        &self,
        handle: &Handle,
        page_size: PageSize,
    ) -> Result<Vec<RepositorySummary>, FetchError> {
        let op = MockOperation::ListRepositories {
            handle: handle.to_string(),
            page_size: page_size.get(),
        };
        self.record(op.clone());

        if let Some(delay) = self.delay_for(handle) {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.check_fail(&op) {
            return Err(err);
        }

        let inner = self.lock();
        let key = handle.as_str().to_lowercase();
        if !inner.profiles.contains_key(&key) && !inner.repositories.contains_key(&key) {
            return Err(FetchError::NotFound("Not Found".into()));
        }
        let mut repos = inner.repositories.get(&key).cloned().unwrap_or_default();
        repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        repos.truncate(page_size.get() as usize);
        Ok(repos)
    }

    async fn authenticated_user(&self, token: &str) -> Result<AuthenticatedUser, FetchError> {
        let op = MockOperation::AuthenticatedUser;
        self.record(op.clone());

        if let Some(err) = self.check_fail(&op) {
            return Err(err);
        }

        self.lock()
            .users_by_token
            .get(token)
            .cloned()
            .ok_or_else(|| FetchError::AuthFailed("Bad credentials".into()))
    }
}

/// A profile with fixed, recognisable numbers.
pub fn sample_profile(handle: &str) -> Profile {
    Profile {
        handle: handle.to_string(),
        avatar_url: format!("https://avatars.example.com/{}", handle),
        html_url: format!("https://github.com/{}", handle),
        name: Some(format!("{} (sample)", handle)),
        bio: None,
        follower_count: 120,
        following_count: 8,
        public_repo_count: 30,
        public_gist_count: 4,
        created_at: Utc.with_ymd_and_hms(2015, 6, 1, 0, 0, 0).unwrap(),
    }
}

/// A repository summary with the given name and counts.
///
/// `day` orders repositories: later days are "more recently updated".
pub fn sample_repo(
    name: &str,
    stars: u64,
    forks: u64,
    language: Option<&str>,
    day: u32,
) -> RepositorySummary {
    RepositorySummary {
        name: name.to_string(),
        star_count: stars,
        fork_count: forks,
        size_kb: 100 * u64::from(day),
        updated_at: Utc.with_ymd_and_hms(2024, 1, day.clamp(1, 28), 0, 0, 0).unwrap(),
        language: language.map(str::to_string),
        open_issue_count: forks / 2,
        watcher_count: stars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(s: &str) -> Handle {
        Handle::new(s).unwrap()
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let api = MockGitHub::new();
        let err = api.get_profile(&handle("ghost")).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[tokio::test]
    async fn profile_lookup_is_case_insensitive() {
        let api = MockGitHub::new().with_profile(sample_profile("Octocat"));
        assert!(api.get_profile(&handle("octocat")).await.is_ok());
    }

    #[tokio::test]
    async fn repositories_sorted_and_truncated() {
        let api = MockGitHub::new()
            .with_profile(sample_profile("octocat"))
            .with_repositories(
                "octocat",
                vec![
                    sample_repo("old", 1, 0, None, 1),
                    sample_repo("new", 1, 0, None, 20),
                    sample_repo("mid", 1, 0, None, 10),
                ],
            );

        let repos = api
            .list_repositories(&handle("octocat"), PageSize::new(2).unwrap())
            .await
            .unwrap();

        let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn operations_are_recorded() {
        let api = MockGitHub::new().with_profile(sample_profile("octocat"));

        let _ = api.get_profile(&handle("octocat")).await;
        let _ = api
            .list_repositories(&handle("octocat"), PageSize::default())
            .await;

        assert_eq!(
            api.operations(),
            vec![
                MockOperation::GetProfile {
                    handle: "octocat".into()
                },
                MockOperation::ListRepositories {
                    handle: "octocat".into(),
                    page_size: 5
                },
            ]
        );
    }

    #[tokio::test]
    async fn fail_on_applies_only_to_matching_operation() {
        let api = MockGitHub::new()
            .with_profile(sample_profile("octocat"))
            .fail_on(FailOn::ListRepositories(FetchError::ApiError {
                status: 500,
                message: "boom".into(),
            }));

        assert!(api.get_profile(&handle("octocat")).await.is_ok());
        assert!(api
            .list_repositories(&handle("octocat"), PageSize::default())
            .await
            .is_err());

        api.clear_fail_on();
        assert!(api
            .list_repositories(&handle("octocat"), PageSize::default())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn token_user_lookup() {
        let user = AuthenticatedUser {
            login: "octocat".into(),
            name: Some("Mona".into()),
            email: None,
        };
        let api = MockGitHub::new().with_token_user("ghp_valid_token", user.clone());

        assert_eq!(api.authenticated_user("ghp_valid_token").await.unwrap(), user);
        assert!(matches!(
            api.authenticated_user("ghp_other").await,
            Err(FetchError::AuthFailed(_))
        ));
    }
}
