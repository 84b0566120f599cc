//! auth::feed
//!
//! Push-based identity source backed by a signed-in GitHub account.
//!
//! # Design
//!
//! [`AccountFeed`] persists an [`AccountRecord`] (the account's display
//! attributes plus its personal access token) in the secret store under
//! [`ACCOUNT_SECRET_KEY`], and publishes the current [`Identity`] over a
//! `tokio::sync::watch` channel. Subscribers are woken on sign-in and
//! sign-out. Re-signing the same identity (a token refresh) stores the new
//! token but does not wake anyone.
//!
//! # Security
//!
//! The token is never logged. `AccountRecord` implements a redacting
//! `Debug`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use githunts::auth::{AccountFeed, AccountRecord, IdentityFeed};
//! use githunts::secrets::MemorySecretStore;
//!
//! let feed = AccountFeed::new(Arc::new(MemorySecretStore::new()));
//! let rx = feed.subscribe().unwrap();
//! assert!(rx.borrow().is_none());
//!
//! feed.sign_in(AccountRecord::new("octocat", Some("Mona".into()), None, "ghp_x")).unwrap();
//! assert_eq!(rx.borrow().as_ref().unwrap().label(), "Mona");
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::errors::AuthError;
use super::identity::{Identity, ProviderKind};
use crate::secrets::SecretStore;

/// Secret store key for the signed-in account.
pub const ACCOUNT_SECRET_KEY: &str = "account.v1";

/// Kind identifier for account records.
pub const ACCOUNT_RECORD_KIND: &str = "githunts.account";

/// Current schema version for account records.
pub const ACCOUNT_RECORD_VERSION: u32 = 1;

/// A source of identity changes pushed to subscribers.
///
/// `subscribe` may fail during setup (for example when the persisted state
/// cannot be read). Callers treat that as "signed out" and do not retry.
pub trait IdentityFeed: Send + Sync {
    /// Subscribe to identity changes. The receiver's current value is the
    /// identity at the time of subscription.
    fn subscribe(&self) -> Result<watch::Receiver<Option<Identity>>, AuthError>;
}

/// Persisted sign-in state for a GitHub account.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Record type identifier.
    pub kind: String,

    /// Schema version for forward compatibility.
    pub schema_version: u32,

    /// GitHub login the token belongs to.
    pub login: String,

    pub display_name: Option<String>,

    pub email: Option<String>,

    /// Personal access token.
    pub token: String,

    pub signed_in_at: DateTime<Utc>,
}

impl AccountRecord {
    /// Create a record for a freshly verified token.
    pub fn new(
        login: &str,
        display_name: Option<String>,
        email: Option<String>,
        token: &str,
    ) -> Self {
        Self {
            kind: ACCOUNT_RECORD_KIND.to_string(),
            schema_version: ACCOUNT_RECORD_VERSION,
            login: login.to_string(),
            display_name,
            email,
            token: token.to_string(),
            signed_in_at: Utc::now(),
        }
    }

    /// The identity this record represents. Falls back to the login when
    /// the account has no display name.
    pub fn identity(&self) -> Identity {
        let name = self
            .display_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(self.login.clone()));
        Identity::new(name, self.email.clone(), ProviderKind::Account)
    }

    /// Parse a record from JSON, validating kind and version.
    pub fn parse(json: &str) -> Result<Self, AuthError> {
        let record: Self = serde_json::from_str(json)?;

        if record.kind != ACCOUNT_RECORD_KIND {
            return Err(AuthError::InvalidRecord(format!(
                "unexpected kind '{}', expected '{}'",
                record.kind, ACCOUNT_RECORD_KIND
            )));
        }
        if record.schema_version != ACCOUNT_RECORD_VERSION {
            return Err(AuthError::InvalidRecord(format!(
                "unsupported schema version {}, expected {}",
                record.schema_version, ACCOUNT_RECORD_VERSION
            )));
        }

        Ok(record)
    }

    pub fn to_json(&self) -> Result<String, AuthError> {
        serde_json::to_string_pretty(self).map_err(|e| AuthError::InvalidRecord(e.to_string()))
    }
}

impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("kind", &self.kind)
            .field("schema_version", &self.schema_version)
            .field("login", &self.login)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .field("signed_in_at", &self.signed_in_at)
            .finish()
    }
}

/// Identity feed for the GitHub account provider.
pub struct AccountFeed {
    store: Arc<dyn SecretStore>,
    sender: watch::Sender<Option<Identity>>,
}

impl AccountFeed {
    /// Create a feed over a secret store. Performs no I/O.
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        let (sender, _) = watch::channel(None);
        Self { store, sender }
    }

    /// Load the stored record, if any.
    pub fn load(&self) -> Result<Option<AccountRecord>, AuthError> {
        match self.store.get(ACCOUNT_SECRET_KEY)? {
            Some(json) => Ok(Some(AccountRecord::parse(&json)?)),
            None => Ok(None),
        }
    }

    /// Persist a record and publish its identity.
    pub fn sign_in(&self, record: AccountRecord) -> Result<Identity, AuthError> {
        self.store.set(ACCOUNT_SECRET_KEY, &record.to_json()?)?;
        let identity = record.identity();
        tracing::debug!(login = %record.login, "account signed in");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    /// Delete the stored record and publish the signed-out state.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.store.delete(ACCOUNT_SECRET_KEY)?;
        tracing::debug!("account signed out");
        self.publish(None);
        Ok(())
    }

    /// Token of the signed-in account, if any.
    pub fn bearer_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.load()?.map(|record| record.token))
    }

    fn publish(&self, identity: Option<Identity>) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == identity {
                false
            } else {
                *current = identity;
                true
            }
        })
    }
}

impl IdentityFeed for AccountFeed {
    fn subscribe(&self) -> Result<watch::Receiver<Option<Identity>>, AuthError> {
        let identity = self.load()?.map(|record| record.identity());
        self.publish(identity);
        Ok(self.sender.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MemorySecretStore;

    fn record(login: &str, token: &str) -> AccountRecord {
        AccountRecord::new(login, Some("Mona".into()), Some("mona@example.com".into()), token)
    }

    mod record {
        use super::*;

        #[test]
        fn json_round_trip_preserves_fields() {
            let original = record("octocat", "ghp_abc");
            let parsed = AccountRecord::parse(&original.to_json().unwrap()).unwrap();

            assert_eq!(parsed.login, "octocat");
            assert_eq!(parsed.token, "ghp_abc");
            assert_eq!(parsed.kind, ACCOUNT_RECORD_KIND);
        }

        #[test]
        fn wrong_kind_rejected() {
            let mut r = record("octocat", "ghp_abc");
            r.kind = "something.else".into();
            let json = serde_json::to_string(&r).unwrap();

            assert!(matches!(
                AccountRecord::parse(&json),
                Err(AuthError::InvalidRecord(_))
            ));
        }

        #[test]
        fn future_version_rejected() {
            let mut r = record("octocat", "ghp_abc");
            r.schema_version = 2;
            let json = serde_json::to_string(&r).unwrap();

            assert!(AccountRecord::parse(&json).is_err());
        }

        #[test]
        fn debug_redacts_token() {
            let debug = format!("{:?}", record("octocat", "ghp_supersecret"));
            assert!(debug.contains("[REDACTED]"));
            assert!(!debug.contains("ghp_supersecret"));
        }

        #[test]
        fn identity_falls_back_to_login() {
            let r = AccountRecord::new("octocat", None, None, "ghp_abc");
            assert_eq!(r.identity().label(), "octocat");
            assert_eq!(r.identity().provider, ProviderKind::Account);
        }
    }

    mod feed {
        use super::*;

        #[test]
        fn subscribe_seeds_from_store() {
            let store = MemorySecretStore::new();
            store
                .set(ACCOUNT_SECRET_KEY, &record("octocat", "ghp_abc").to_json().unwrap())
                .unwrap();
            let feed = AccountFeed::new(Arc::new(store));

            let rx = feed.subscribe().unwrap();
            assert_eq!(rx.borrow().as_ref().unwrap().label(), "Mona");
        }

        #[test]
        fn subscribe_fails_when_store_unreadable() {
            let store = MemorySecretStore::new();
            store.fail_reads(true);
            let feed = AccountFeed::new(Arc::new(store));

            assert!(matches!(feed.subscribe(), Err(AuthError::SecretStore(_))));
        }

        #[test]
        fn subscribe_fails_on_corrupt_record() {
            let store = MemorySecretStore::new();
            store.set(ACCOUNT_SECRET_KEY, "not json").unwrap();
            let feed = AccountFeed::new(Arc::new(store));

            assert!(matches!(feed.subscribe(), Err(AuthError::InvalidRecord(_))));
        }

        #[test]
        fn sign_in_and_out_notify_subscribers() {
            let feed = AccountFeed::new(Arc::new(MemorySecretStore::new()));
            let mut rx = feed.subscribe().unwrap();

            feed.sign_in(record("octocat", "ghp_abc")).unwrap();
            assert!(rx.has_changed().unwrap());
            assert!(rx.borrow_and_update().is_some());

            feed.sign_out().unwrap();
            assert!(rx.has_changed().unwrap());
            assert!(rx.borrow_and_update().is_none());
            assert_eq!(feed.bearer_token().unwrap(), None);
        }

        #[test]
        fn same_identity_refresh_does_not_notify() {
            let feed = AccountFeed::new(Arc::new(MemorySecretStore::new()));
            let mut rx = feed.subscribe().unwrap();

            feed.sign_in(record("octocat", "ghp_first")).unwrap();
            rx.borrow_and_update();

            feed.sign_in(record("octocat", "ghp_second")).unwrap();

            assert!(!rx.has_changed().unwrap());
            assert_eq!(feed.bearer_token().unwrap().as_deref(), Some("ghp_second"));
        }
    }
}
