//! auth - identity sources and their reconciliation
//!
//! githunts accepts either of two credentials and treats them as one
//! signed-in state.
//!
//! # Architecture
//!
//! - The **account** source ([`AccountFeed`]) holds a GitHub account signed
//!   in with a personal access token. It pushes changes to subscribers.
//! - The **session** source ([`SessionStore`]) holds an expiring local
//!   session. It is read on demand.
//! - The [`AuthReconciler`] merges both into an [`AuthViewModel`] that
//!   readers observe through an [`AuthHandle`].
//!
//! Failures from either source are shown to the user through
//! [`translate_error_code`].
//!
//! # Security
//!
//! Tokens and passwords never appear in logs, errors, or `Debug` output.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use githunts::auth::{AccountFeed, AuthReconciler, SessionStore};
//!
//! let store: Arc<dyn SecretStore> = Arc::from(secrets::create_store("file")?);
//! let reconciler = AuthReconciler::start(
//!     Arc::new(AccountFeed::new(store.clone())),
//!     Arc::new(SessionStore::new(store)),
//! );
//!
//! let view = reconciler.handle().wait_until_loaded().await;
//! ```

mod errors;
mod feed;
mod identity;
pub mod login;
mod reconciler;
mod session;

pub use errors::{translate_error_code, AuthError, AuthErrorCode, FALLBACK_MESSAGE};
pub use feed::{
    AccountFeed, AccountRecord, IdentityFeed, ACCOUNT_RECORD_KIND, ACCOUNT_RECORD_VERSION,
    ACCOUNT_SECRET_KEY,
};
pub use identity::{AuthViewModel, Identity, ProviderKind};
pub use reconciler::{AuthHandle, AuthReconciler, ReconcilerState, SourceEvent};
pub use session::{
    SessionRecord, SessionSource, SessionStore, MIN_PASSWORD_LEN, SESSION_RECORD_KIND,
    SESSION_RECORD_VERSION, SESSION_SECRET_KEY,
};
