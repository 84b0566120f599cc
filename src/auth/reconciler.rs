//! auth::reconciler
//!
//! Merges the account feed and the session source into one
//! [`AuthViewModel`].
//!
//! # Architecture
//!
//! ```text
//!  account task ──┐
//!                 ├── mpsc<SourceEvent> ──> join task ──> watch<AuthViewModel> ──> AuthHandle(s)
//!  session task ──┘
//! ```
//!
//! - The account task subscribes to the [`IdentityFeed`] and forwards every
//!   value. A failed subscription is reported once as "signed out" and is
//!   not retried.
//! - The session task reads the [`SessionSource`] once, then again on every
//!   [`AuthReconciler::refresh_session`]. A failed read is reported as "no
//!   session".
//! - The join task owns the [`ReconcilerState`] and is the only writer of the
//!   view-model.
//!
//! # Invariants
//!
//! - `is_loading` is true until both sources have reported, then false for
//!   the rest of the reconciler's life.
//! - `identity` is the account identity if present, else the session
//!   identity, else `None`.
//! - After [`AuthReconciler::shutdown`] completes nothing further is
//!   published. Dropping the reconciler only requests cancellation, so on
//!   a multi-thread runtime the join task may publish once more after
//!   `drop` returns.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;

use super::feed::IdentityFeed;
use super::identity::{AuthViewModel, Identity};
use super::session::SessionSource;

/// One report from an identity source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Account(Option<Identity>),
    Session(Option<Identity>),
}

/// Two-slot, two-flag join over the identity sources.
///
/// Pure and synchronous; the async plumbing lives in [`AuthReconciler`].
#[derive(Debug, Clone, Default)]
pub struct ReconcilerState {
    account: Option<Identity>,
    session: Option<Identity>,
    account_reported: bool,
    session_reported: bool,
}

impl ReconcilerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_account(&mut self, identity: Option<Identity>) {
        self.account = identity;
        self.account_reported = true;
    }

    pub fn report_session(&mut self, identity: Option<Identity>) {
        self.session = identity;
        self.session_reported = true;
    }

    /// Apply an event and return the resulting view.
    pub fn apply(&mut self, event: SourceEvent) -> AuthViewModel {
        match event {
            SourceEvent::Account(identity) => self.report_account(identity),
            SourceEvent::Session(identity) => self.report_session(identity),
        }
        self.view()
    }

    pub fn view(&self) -> AuthViewModel {
        AuthViewModel {
            identity: self.account.clone().or_else(|| self.session.clone()),
            is_loading: !(self.account_reported && self.session_reported),
        }
    }
}

/// Read-only view of the reconciled auth state.
///
/// Cheap to clone; every clone observes the same state.
#[derive(Debug, Clone)]
pub struct AuthHandle {
    rx: watch::Receiver<AuthViewModel>,
}

impl AuthHandle {
    /// The latest view-model.
    pub fn current(&self) -> AuthViewModel {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. `None` once the reconciler is gone.
    pub async fn changed(&mut self) -> Option<AuthViewModel> {
        self.rx.changed().await.ok()?;
        let view = self.rx.borrow_and_update().clone();
        Some(view)
    }

    /// Wait until both sources have reported.
    ///
    /// Returns `None` if the reconciler was torn down before that happened.
    pub async fn wait_until_loaded(&mut self) -> Option<AuthViewModel> {
        let view = self.rx.wait_for(|view| !view.is_loading).await.ok()?;
        Some((*view).clone())
    }
}

/// Running reconciler. Dropping it aborts its tasks.
pub struct AuthReconciler {
    view: watch::Receiver<AuthViewModel>,
    refresh: Arc<Notify>,
    tasks: Vec<JoinHandle<()>>,
}

impl AuthReconciler {
    /// Start reconciling. Must be called from within a tokio runtime.
    pub fn start(feed: Arc<dyn IdentityFeed>, sessions: Arc<dyn SessionSource>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (view_tx, view_rx) = watch::channel(AuthViewModel::loading());
        let refresh = Arc::new(Notify::new());

        let join = tokio::spawn(join_sources(event_rx, view_tx));
        let account = tokio::spawn(watch_account(feed, event_tx.clone()));
        let session = tokio::spawn(poll_session(sessions, Arc::clone(&refresh), event_tx));

        Self {
            view: view_rx,
            refresh,
            tasks: vec![account, session, join],
        }
    }

    /// A reader for the view-model.
    pub fn handle(&self) -> AuthHandle {
        AuthHandle {
            rx: self.view.clone(),
        }
    }

    /// Ask the session task to read the session again.
    pub fn refresh_session(&self) {
        self.refresh.notify_one();
    }

    /// Stop all tasks and wait for them to finish.
    pub async fn shutdown(mut self) {
        let tasks = std::mem::take(&mut self.tasks);
        for task in &tasks {
            task.abort();
        }
        for task in tasks {
            // Cancelled tasks resolve to a JoinError; that is the expected outcome.
            let _ = task.await;
        }
        tracing::debug!("auth reconciler stopped");
    }
}

/// Requests cancellation of the source and join tasks without waiting.
///
/// An abort lands at the task's next await point, so one more view may be
/// published after `drop` returns. Use [`AuthReconciler::shutdown`] when
/// nothing may be published after teardown.
impl Drop for AuthReconciler {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn join_sources(
    mut events: mpsc::Receiver<SourceEvent>,
    view: watch::Sender<AuthViewModel>,
) {
    let mut state = ReconcilerState::new();
    while let Some(event) = events.recv().await {
        tracing::debug!(?event, "identity source reported");
        let next = state.apply(event);
        view.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

async fn watch_account(feed: Arc<dyn IdentityFeed>, events: mpsc::Sender<SourceEvent>) {
    let mut rx = match feed.subscribe() {
        Ok(rx) => rx,
        Err(err) => {
            tracing::warn!(error = %err, "account feed unavailable, treating as signed out");
            let _ = events.send(SourceEvent::Account(None)).await;
            return;
        }
    };

    loop {
        let identity = rx.borrow_and_update().clone();
        if events.send(SourceEvent::Account(identity)).await.is_err() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

async fn poll_session(
    sessions: Arc<dyn SessionSource>,
    refresh: Arc<Notify>,
    events: mpsc::Sender<SourceEvent>,
) {
    loop {
        let identity = match sessions.read_session().await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "session read failed, treating as no session");
                None
            }
        };
        if events.send(SourceEvent::Session(identity)).await.is_err() {
            return;
        }
        refresh.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::ProviderKind;

    fn account(name: &str) -> Identity {
        Identity::new(Some(name.into()), None, ProviderKind::Account)
    }

    fn session(email: &str) -> Identity {
        Identity::new(None, Some(email.into()), ProviderKind::Session)
    }

    #[test]
    fn loading_until_both_reported() {
        let mut state = ReconcilerState::new();
        assert!(state.view().is_loading);

        let view = state.apply(SourceEvent::Account(None));
        assert!(view.is_loading);

        let view = state.apply(SourceEvent::Session(None));
        assert!(!view.is_loading);
        assert_eq!(view.identity, None);
    }

    #[test]
    fn account_takes_precedence() {
        let mut state = ReconcilerState::new();
        state.report_session(Some(session("mona@example.com")));
        state.report_account(Some(account("Mona")));

        assert_eq!(state.view().identity, Some(account("Mona")));

        state.report_account(None);
        assert_eq!(state.view().identity, Some(session("mona@example.com")));
    }

    #[test]
    fn identity_visible_before_loading_completes() {
        let mut state = ReconcilerState::new();
        let view = state.apply(SourceEvent::Session(Some(session("mona@example.com"))));

        assert!(view.is_loading);
        assert!(view.is_authenticated());
    }

    #[test]
    fn loading_flips_exactly_once() {
        let events = vec![
            SourceEvent::Session(None),
            SourceEvent::Session(Some(session("a@example.com"))),
            SourceEvent::Account(Some(account("A"))),
            SourceEvent::Account(None),
            SourceEvent::Session(None),
        ];

        let mut state = ReconcilerState::new();
        let mut flips = 0;
        let mut was_loading = state.view().is_loading;
        for event in events {
            let loading = state.apply(event).is_loading;
            if was_loading && !loading {
                flips += 1;
            }
            assert!(!(loading && !was_loading), "is_loading went back to true");
            was_loading = loading;
        }
        assert_eq!(flips, 1);
    }
}
