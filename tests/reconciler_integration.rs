//! Integration tests for the auth reconciler over real identity providers.
//!
//! Both providers share one in-memory secret store, the same way the CLI
//! shares the file store between them.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as TtlDuration;

use githunts::auth::{
    AccountFeed, AccountRecord, AuthHandle, AuthReconciler, AuthViewModel, IdentityFeed,
    ProviderKind, SessionSource, SessionStore,
};
use githunts::secrets::{MemorySecretStore, SecretStore};

const WAIT: Duration = Duration::from_secs(5);

struct Fixture {
    store: MemorySecretStore,
    feed: Arc<AccountFeed>,
    sessions: Arc<SessionStore>,
}

impl Fixture {
    fn new() -> Self {
        let store = MemorySecretStore::new();
        let shared: Arc<dyn SecretStore> = Arc::new(store.clone());
        Self {
            store,
            feed: Arc::new(AccountFeed::new(Arc::clone(&shared))),
            sessions: Arc::new(SessionStore::new(shared)),
        }
    }

    fn start(&self) -> AuthReconciler {
        let feed: Arc<dyn IdentityFeed> = self.feed.clone();
        let sessions: Arc<dyn SessionSource> = self.sessions.clone();
        AuthReconciler::start(feed, sessions)
    }

    fn sign_in_account(&self, login: &str, name: &str) {
        self.feed
            .sign_in(AccountRecord::new(
                login,
                Some(name.to_string()),
                None,
                "ghp_0123456789abcdefghij",
            ))
            .unwrap();
    }

    fn open_session(&self, email: &str) {
        self.sessions
            .start_session(None, email, "correct-horse", TtlDuration::hours(1))
            .unwrap();
    }
}

async fn loaded(handle: &mut AuthHandle) -> AuthViewModel {
    tokio::time::timeout(WAIT, handle.wait_until_loaded())
        .await
        .expect("reconciler did not settle")
        .expect("reconciler stopped")
}

/// Wait for the next view matching `pred`.
async fn next_matching(
    handle: &mut AuthHandle,
    pred: impl Fn(&AuthViewModel) -> bool,
) -> AuthViewModel {
    tokio::time::timeout(WAIT, async {
        loop {
            let view = handle.changed().await.expect("reconciler stopped");
            if pred(&view) {
                return view;
            }
        }
    })
    .await
    .expect("expected view never published")
}

mod startup {
    use super::*;

    #[tokio::test]
    async fn nobody_signed_in() {
        let fx = Fixture::new();
        let reconciler = fx.start();
        let mut handle = reconciler.handle();

        let view = loaded(&mut handle).await;

        assert!(!view.is_loading);
        assert_eq!(view.identity, None);
        reconciler.shutdown().await;
    }

    #[tokio::test]
    async fn stored_account_is_reported() {
        let fx = Fixture::new();
        fx.sign_in_account("mona", "Mona Lisa");

        let reconciler = fx.start();
        let view = loaded(&mut reconciler.handle()).await;

        let identity = view.identity.unwrap();
        assert_eq!(identity.label(), "Mona Lisa");
        assert_eq!(identity.provider, ProviderKind::Account);
        reconciler.shutdown().await;
    }

    #[tokio::test]
    async fn stored_session_is_reported() {
        let fx = Fixture::new();
        fx.open_session("mona@example.com");

        let reconciler = fx.start();
        let view = loaded(&mut reconciler.handle()).await;

        let identity = view.identity.unwrap();
        assert_eq!(identity.label(), "mona@example.com");
        assert_eq!(identity.provider, ProviderKind::Session);
        reconciler.shutdown().await;
    }

    #[tokio::test]
    async fn account_wins_over_session() {
        let fx = Fixture::new();
        fx.open_session("mona@example.com");
        fx.sign_in_account("octocat", "The Octocat");

        let reconciler = fx.start();
        let view = loaded(&mut reconciler.handle()).await;

        assert_eq!(view.identity.unwrap().provider, ProviderKind::Account);
        reconciler.shutdown().await;
    }

    #[tokio::test]
    async fn unreadable_store_settles_signed_out() {
        let fx = Fixture::new();
        fx.sign_in_account("mona", "Mona Lisa");
        fx.store.fail_reads(true);

        let reconciler = fx.start();
        let view = loaded(&mut reconciler.handle()).await;

        assert!(!view.is_loading);
        assert_eq!(view.identity, None);
        reconciler.shutdown().await;
    }
}

mod updates {
    use super::*;

    #[tokio::test]
    async fn account_sign_in_is_pushed() {
        let fx = Fixture::new();
        let reconciler = fx.start();
        let mut handle = reconciler.handle();
        loaded(&mut handle).await;

        fx.sign_in_account("mona", "Mona Lisa");

        let view = next_matching(&mut handle, |v| v.identity.is_some()).await;
        assert_eq!(view.identity.unwrap().label(), "Mona Lisa");
        assert!(!view.is_loading);
        reconciler.shutdown().await;
    }

    #[tokio::test]
    async fn account_sign_out_falls_back_to_session() {
        let fx = Fixture::new();
        fx.open_session("mona@example.com");
        fx.sign_in_account("octocat", "The Octocat");
        let reconciler = fx.start();
        let mut handle = reconciler.handle();
        loaded(&mut handle).await;

        fx.feed.sign_out().unwrap();

        let view = next_matching(&mut handle, |v| {
            v.identity.as_ref().map(|i| i.provider) == Some(ProviderKind::Session)
        })
        .await;
        assert_eq!(view.identity.unwrap().label(), "mona@example.com");
        reconciler.shutdown().await;
    }

    #[tokio::test]
    async fn session_is_reread_on_refresh() {
        let fx = Fixture::new();
        let reconciler = fx.start();
        let mut handle = reconciler.handle();
        loaded(&mut handle).await;

        fx.open_session("mona@example.com");
        reconciler.refresh_session();

        let view = next_matching(&mut handle, |v| v.identity.is_some()).await;
        assert_eq!(view.identity.unwrap().provider, ProviderKind::Session);
        reconciler.shutdown().await;
    }

    #[tokio::test]
    async fn ended_session_clears_identity_on_refresh() {
        let fx = Fixture::new();
        fx.open_session("mona@example.com");
        let reconciler = fx.start();
        let mut handle = reconciler.handle();
        assert!(loaded(&mut handle).await.identity.is_some());

        fx.sessions.end_session().unwrap();
        reconciler.refresh_session();

        let view = next_matching(&mut handle, |v| v.identity.is_none()).await;
        assert!(!view.is_loading);
        reconciler.shutdown().await;
    }
}

mod teardown {
    use super::*;

    #[tokio::test]
    async fn nothing_published_after_shutdown() {
        let fx = Fixture::new();
        let reconciler = fx.start();
        let mut handle = reconciler.handle();
        loaded(&mut handle).await;

        reconciler.shutdown().await;
        fx.sign_in_account("mona", "Mona Lisa");

        let next = tokio::time::timeout(WAIT, handle.changed()).await.unwrap();
        assert_eq!(next, None);
        assert_eq!(handle.current().identity, None);
    }

    #[tokio::test]
    async fn dropping_stops_tasks() {
        let fx = Fixture::new();
        let reconciler = fx.start();
        let mut handle = reconciler.handle();
        loaded(&mut handle).await;

        drop(reconciler);

        let next = tokio::time::timeout(WAIT, handle.changed()).await.unwrap();
        assert_eq!(next, None);
    }
}
