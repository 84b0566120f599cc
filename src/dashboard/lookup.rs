//! dashboard::lookup
//!
//! Profile and repository fetching, and the state they feed.
//!
//! # Design
//!
//! [`fetch_profile`] and [`fetch_repositories`] are single requests that
//! turn transport failures into the user-facing [`LookupError`]s. They
//! never retry.
//!
//! [`LookupController`] owns a [`DashboardState`] and sequences requests:
//! every lookup takes a ticket from a per-kind counter, and a response is
//! applied only if its ticket is still the newest issued for that kind.
//! A slow response for an earlier query can therefore never overwrite the
//! result of a later one. Starting a profile lookup also invalidates any
//! repository fetch in flight for the previous profile.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use githunts::dashboard::lookup::{LookupController, LookupOutcome};
//! use githunts::github::mock::{sample_profile, MockGitHub};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let api = Arc::new(MockGitHub::new().with_profile(sample_profile("octocat")));
//! let controller = LookupController::new(api, Default::default());
//!
//! assert_eq!(controller.submit("octocat").await, LookupOutcome::Applied);
//! assert!(controller.state().profile.is_some());
//! # });
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::core::types::{Handle, PageSize};
use crate::github::{FetchError, GitHubApi, Profile, RepositorySummary};

/// Failures shown to the user after a lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The profile request did not succeed.
    #[error("User not found!")]
    NotFound,

    /// The repository request did not succeed.
    #[error("Failed to fetch repositories")]
    FetchFailed,

    /// The profile request never reached GitHub.
    #[error("An error occurred. Please try again.")]
    Network(String),
}

/// Fetch the profile for raw user input.
///
/// Blank input returns `Ok(None)` without touching `api`. Input that cannot
/// be a GitHub login is reported as not found, also without a request.
pub async fn fetch_profile(api: &dyn GitHubApi, raw: &str) -> Result<Option<Profile>, LookupError> {
    let handle = match Handle::parse_input(raw) {
        Ok(Some(handle)) => handle,
        Ok(None) => return Ok(None),
        Err(err) => {
            tracing::debug!(error = %err, "rejecting handle without a request");
            return Err(LookupError::NotFound);
        }
    };

    match api.get_profile(&handle).await {
        Ok(profile) => Ok(Some(profile)),
        Err(FetchError::NetworkError(message)) => {
            tracing::debug!(%handle, %message, "profile request failed to send");
            Err(LookupError::Network(message))
        }
        Err(err) => {
            tracing::debug!(%handle, error = %err, "profile lookup failed");
            Err(LookupError::NotFound)
        }
    }
}

/// Fetch up to `page_size` repositories, most recently updated first.
pub async fn fetch_repositories(
    api: &dyn GitHubApi,
    handle: &Handle,
    page_size: PageSize,
) -> Result<Vec<RepositorySummary>, LookupError> {
    api.list_repositories(handle, page_size)
        .await
        .map_err(|err| {
            tracing::debug!(%handle, error = %err, "repository lookup failed");
            LookupError::FetchFailed
        })
}

/// What the dashboard currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub profile: Option<Profile>,
    pub profile_error: Option<LookupError>,
    pub profile_loading: bool,
    pub repositories: Vec<RepositorySummary>,
    pub repository_error: Option<LookupError>,
    pub repositories_loading: bool,
    pub page_size: PageSize,
}

impl DashboardState {
    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

/// Result of a controller request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Blank input or nothing to refresh; no request, no state change.
    Ignored,
    /// The response was applied to the state.
    Applied,
    /// A newer request was issued meanwhile; the response was discarded.
    Superseded,
}

/// Monotonic ticket counter for one request kind.
#[derive(Debug, Default)]
struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}

#[derive(Debug, Default)]
struct ControllerInner {
    state: DashboardState,
    profiles: RequestSequence,
    repositories: RequestSequence,
}

/// Sequenced profile and repository lookups over a shared state.
///
/// Clones share the same state, so overlapping lookups may run on
/// separate tasks.
#[derive(Clone)]
pub struct LookupController {
    api: Arc<dyn GitHubApi>,
    inner: Arc<Mutex<ControllerInner>>,
}

impl std::fmt::Debug for LookupController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupController")
            .field("api", &self.api.name())
            .finish()
    }
}

impl LookupController {
    pub fn new(api: Arc<dyn GitHubApi>, state: DashboardState) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(ControllerInner {
                state,
                ..ControllerInner::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> DashboardState {
        self.lock().state.clone()
    }

    /// Look up a profile, then its repositories.
    ///
    /// Returns the outcome of the profile step. Blank input is ignored.
    pub async fn submit(&self, raw: &str) -> LookupOutcome {
        if raw.trim().is_empty() {
            return LookupOutcome::Ignored;
        }

        let ticket = {
            let mut inner = self.lock();
            // A repository fetch for the previous profile must not land.
            inner.repositories.issue();
            inner.state.repositories_loading = false;
            inner.state.profile_loading = true;
            inner.profiles.issue()
        };

        let result = fetch_profile(self.api.as_ref(), raw).await;

        {
            let mut inner = self.lock();
            if !inner.profiles.is_latest(ticket) {
                tracing::debug!(ticket, "discarding superseded profile response");
                return LookupOutcome::Superseded;
            }
            let state = &mut inner.state;
            state.profile_loading = false;
            state.repositories.clear();
            state.repository_error = None;
            match result {
                Ok(profile) => {
                    state.profile = profile;
                    state.profile_error = None;
                }
                Err(err) => {
                    state.profile = None;
                    state.profile_error = Some(err);
                    return LookupOutcome::Applied;
                }
            }
        }

        self.refresh_repositories().await;
        LookupOutcome::Applied
    }

    /// Change the page size and refetch repositories for the current profile.
    pub async fn set_page_size(&self, page_size: PageSize) -> LookupOutcome {
        self.lock().state.page_size = page_size;
        self.refresh_repositories().await
    }

    /// Fetch repositories for the current profile.
    ///
    /// A failure clears the repository list and records the error but
    /// leaves the profile in place.
    pub async fn refresh_repositories(&self) -> LookupOutcome {
        let (ticket, handle, page_size) = {
            let mut inner = self.lock();
            let handle = match inner
                .state
                .profile
                .as_ref()
                .and_then(|p| Handle::new(&p.handle).ok())
            {
                Some(handle) => handle,
                None => return LookupOutcome::Ignored,
            };
            inner.state.repositories_loading = true;
            let page_size = inner.state.page_size;
            (inner.repositories.issue(), handle, page_size)
        };

        let result = fetch_repositories(self.api.as_ref(), &handle, page_size).await;

        let mut inner = self.lock();
        if !inner.repositories.is_latest(ticket) {
            tracing::debug!(ticket, "discarding superseded repository response");
            return LookupOutcome::Superseded;
        }
        let state = &mut inner.state;
        state.repositories_loading = false;
        match result {
            Ok(repos) => {
                state.repositories = repos;
                state.repository_error = None;
            }
            Err(err) => {
                state.repositories.clear();
                state.repository_error = Some(err);
            }
        }
        LookupOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::{sample_profile, sample_repo, FailOn, MockGitHub, MockOperation};
    use std::time::Duration;

    fn api_with(handles: &[&str]) -> MockGitHub {
        handles.iter().fold(MockGitHub::new(), |api, h| {
            api.with_profile(sample_profile(h))
                .with_repositories(h, vec![sample_repo(&format!("{}-repo", h), 1, 0, None, 1)])
        })
    }

    mod fetchers {
        use super::*;

        #[tokio::test]
        async fn blank_handle_issues_no_request() {
            let api = MockGitHub::new();

            for raw in ["", "   ", "\t\n"] {
                assert_eq!(fetch_profile(&api, raw).await, Ok(None));
            }
            assert!(api.operations().is_empty());
        }

        #[tokio::test]
        async fn invalid_handle_is_not_found_without_request() {
            let api = MockGitHub::new();

            assert_eq!(
                fetch_profile(&api, "no/such user").await,
                Err(LookupError::NotFound)
            );
            assert!(api.operations().is_empty());
        }

        #[tokio::test]
        async fn missing_user_is_not_found() {
            let api = MockGitHub::new();
            let err = fetch_profile(&api, "ghost").await.unwrap_err();

            assert_eq!(err, LookupError::NotFound);
            assert_eq!(err.to_string(), "User not found!");
        }

        #[tokio::test]
        async fn server_error_is_not_found() {
            let api = api_with(&["octocat"]).fail_on(FailOn::GetProfile(FetchError::ApiError {
                status: 502,
                message: "bad gateway".into(),
            }));

            assert_eq!(
                fetch_profile(&api, "octocat").await,
                Err(LookupError::NotFound)
            );
        }

        #[tokio::test]
        async fn network_failure_is_generic() {
            let api = api_with(&["octocat"]).fail_on(FailOn::GetProfile(
                FetchError::NetworkError("connection refused".into()),
            ));

            let err = fetch_profile(&api, "octocat").await.unwrap_err();
            assert!(matches!(err, LookupError::Network(_)));
            assert_eq!(err.to_string(), "An error occurred. Please try again.");
        }

        #[tokio::test]
        async fn repository_failure_message() {
            let api = api_with(&["octocat"]).fail_on(FailOn::ListRepositories(
                FetchError::NotFound("Not Found".into()),
            ));
            let handle = Handle::new("octocat").unwrap();

            let err = fetch_repositories(&api, &handle, PageSize::default())
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Failed to fetch repositories");
        }
    }

    mod controller {
        use super::*;

        #[tokio::test]
        async fn submit_fetches_profile_then_repositories() {
            let api = api_with(&["octocat"]);
            let controller = LookupController::new(Arc::new(api.clone()), DashboardState::default());

            assert_eq!(controller.submit("octocat").await, LookupOutcome::Applied);

            let state = controller.state();
            assert_eq!(state.profile.unwrap().handle, "octocat");
            assert_eq!(state.repositories.len(), 1);
            assert!(!state.profile_loading);
            assert!(!state.repositories_loading);
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
        async fn blank_submit_changes_nothing() {
            let api = api_with(&["octocat"]);
            let controller = LookupController::new(Arc::new(api.clone()), DashboardState::default());
            controller.submit("octocat").await;
            let before = controller.state();

            assert_eq!(controller.submit("  ").await, LookupOutcome::Ignored);
            assert_eq!(controller.state(), before);
            assert_eq!(api.operations().len(), 2);
        }

        #[tokio::test]
        async fn repository_failure_keeps_profile() {
            let api = api_with(&["octocat"]);
            let controller = LookupController::new(Arc::new(api.clone()), DashboardState::default());
            controller.submit("octocat").await;

            api.set_fail_on(FailOn::ListRepositories(FetchError::ApiError {
                status: 500,
                message: "boom".into(),
            }));
            assert_eq!(
                controller.set_page_size(PageSize::new(10).unwrap()).await,
                LookupOutcome::Applied
            );

            let state = controller.state();
            assert!(state.profile.is_some());
            assert!(state.repositories.is_empty());
            assert_eq!(state.repository_error, Some(LookupError::FetchFailed));
            assert_eq!(state.page_size.get(), 10);
        }

        #[tokio::test]
        async fn failed_profile_clears_previous_result() {
            let api = api_with(&["octocat"]);
            let controller = LookupController::new(Arc::new(api), DashboardState::default());
            controller.submit("octocat").await;

            controller.submit("ghost").await;

            let state = controller.state();
            assert!(state.profile.is_none());
            assert!(state.repositories.is_empty());
            assert_eq!(state.profile_error, Some(LookupError::NotFound));
        }

        #[tokio::test]
        async fn refresh_without_profile_is_ignored() {
            let api = MockGitHub::new();
            let controller = LookupController::new(Arc::new(api.clone()), DashboardState::default());

            assert_eq!(controller.refresh_repositories().await, LookupOutcome::Ignored);
            assert!(api.operations().is_empty());
        }

        #[tokio::test(start_paused = true)]
        async fn stale_profile_response_is_discarded() {
            let api = api_with(&["slowpoke", "speedy"])
                .with_delay("slowpoke", Duration::from_millis(500));
            let controller = LookupController::new(Arc::new(api), DashboardState::default());

            let slow = tokio::spawn({
                let controller = controller.clone();
                async move { controller.submit("slowpoke").await }
            });
            // Let the slow request get its ticket first.
            tokio::task::yield_now().await;

            assert_eq!(controller.submit("speedy").await, LookupOutcome::Applied);
            assert_eq!(slow.await.unwrap(), LookupOutcome::Superseded);

            let state = controller.state();
            assert_eq!(state.profile.unwrap().handle, "speedy");
            assert_eq!(state.repositories[0].name, "speedy-repo");
        }

        #[tokio::test(start_paused = true)]
        async fn failed_submit_clears_cancelled_repository_loading() {
            let api = api_with(&["octocat"]).with_delay("octocat", Duration::from_millis(500));
            let controller = LookupController::new(Arc::new(api), DashboardState::default());
            controller.submit("octocat").await;

            let refresh = tokio::spawn({
                let controller = controller.clone();
                async move { controller.refresh_repositories().await }
            });
            tokio::task::yield_now().await;
            assert!(controller.state().repositories_loading);

            controller.submit("ghost").await;
            assert_eq!(refresh.await.unwrap(), LookupOutcome::Superseded);

            let state = controller.state();
            assert!(state.profile.is_none());
            assert_eq!(state.profile_error, Some(LookupError::NotFound));
            assert!(!state.repositories_loading);
            assert!(!state.profile_loading);
        }
    }
}
