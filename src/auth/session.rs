//! auth::session
//!
//! Read-on-demand identity source backed by an expiring local session.
//!
//! # Design
//!
//! [`SessionStore`] keeps at most one [`SessionRecord`] in the secret store
//! under [`SESSION_SECRET_KEY`]. Readers call
//! [`SessionSource::read_session`]; an absent or expired record reads as
//! `None`. Nothing is pushed: the reconciler re-reads when asked to.
//!
//! The password given to [`SessionStore::start_session`] is only checked
//! for strength. It is never stored or logged.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;
use super::identity::{Identity, ProviderKind};
use crate::secrets::SecretStore;

/// Secret store key for the local session.
pub const SESSION_SECRET_KEY: &str = "session.v1";

/// Kind identifier for session records.
pub const SESSION_RECORD_KIND: &str = "githunts.session";

/// Current schema version for session records.
pub const SESSION_RECORD_VERSION: u32 = 1;

/// Minimum accepted session password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// A source that resolves the current session on request.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Read the current session. `Ok(None)` means no active session.
    async fn read_session(&self) -> Result<Option<Identity>, AuthError>;
}

/// Persisted local session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub kind: String,
    pub schema_version: u32,
    pub display_name: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Create a record valid for `ttl` from `now`.
    pub fn new(display_name: Option<String>, email: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            kind: SESSION_RECORD_KIND.to_string(),
            schema_version: SESSION_RECORD_VERSION,
            display_name,
            email: email.to_string(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn identity(&self) -> Identity {
        Identity::new(
            self.display_name.clone(),
            Some(self.email.clone()),
            ProviderKind::Session,
        )
    }

    /// Parse a record from JSON, validating kind and version.
    pub fn parse(json: &str) -> Result<Self, AuthError> {
        let record: Self = serde_json::from_str(json)?;

        if record.kind != SESSION_RECORD_KIND {
            return Err(AuthError::InvalidRecord(format!(
                "unexpected kind '{}', expected '{}'",
                record.kind, SESSION_RECORD_KIND
            )));
        }
        if record.schema_version != SESSION_RECORD_VERSION {
            return Err(AuthError::InvalidRecord(format!(
                "unsupported schema version {}, expected {}",
                record.schema_version, SESSION_RECORD_VERSION
            )));
        }

        Ok(record)
    }

    pub fn to_json(&self) -> Result<String, AuthError> {
        serde_json::to_string_pretty(self).map_err(|e| AuthError::InvalidRecord(e.to_string()))
    }
}

/// Session provider over a secret store.
pub struct SessionStore {
    store: Arc<dyn SecretStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Open a session for `email`, replacing an expired one or one for the
    /// same email.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a malformed email
    /// - `WeakPassword` for a password shorter than [`MIN_PASSWORD_LEN`]
    /// - `EmailInUse` if an unexpired session for another email exists
    pub fn start_session(
        &self,
        display_name: Option<&str>,
        email: &str,
        password: &str,
        ttl: Duration,
    ) -> Result<Identity, AuthError> {
        let email = email.trim();
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let now = Utc::now();
        if let Some(existing) = self.load()? {
            if !existing.is_expired_at(now) && !existing.email.eq_ignore_ascii_case(email) {
                return Err(AuthError::EmailInUse(existing.email));
            }
        }

        let record = SessionRecord::new(display_name.map(str::to_string), email, now, ttl);
        self.store.set(SESSION_SECRET_KEY, &record.to_json()?)?;
        tracing::debug!(expires_at = %record.expires_at, "session started");
        Ok(record.identity())
    }

    /// End the session. Ending when none is open succeeds.
    pub fn end_session(&self) -> Result<(), AuthError> {
        self.store.delete(SESSION_SECRET_KEY)?;
        tracing::debug!("session ended");
        Ok(())
    }

    /// Load the stored record regardless of expiry.
    pub fn load(&self) -> Result<Option<SessionRecord>, AuthError> {
        match self.store.get(SESSION_SECRET_KEY)? {
            Some(json) => Ok(Some(SessionRecord::parse(&json)?)),
            None => Ok(None),
        }
    }

    /// The active session at `now`, if any.
    pub fn active_at(&self, now: DateTime<Utc>) -> Result<Option<Identity>, AuthError> {
        Ok(self.load()?.and_then(|record| {
            if record.is_expired_at(now) {
                tracing::debug!(expired_at = %record.expires_at, "ignoring expired session");
                None
            } else {
                Some(record.identity())
            }
        }))
    }
}

#[async_trait]
impl SessionSource for SessionStore {
    async fn read_session(&self) -> Result<Option<Identity>, AuthError> {
        self.active_at(Utc::now())
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidInput(format!(
            "'{}' is not a valid email address",
            email
        )))
    }
}
