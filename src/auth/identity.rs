//! auth::identity
//!
//! The signed-in user as seen by the rest of the application.

use serde::{Deserialize, Serialize};

/// Which identity source reported an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// GitHub account signed in with a personal access token.
    Account,
    /// Local expiring session.
    Session,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Account => write!(f, "account"),
            ProviderKind::Session => write!(f, "session"),
        }
    }
}

/// Display attributes of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub provider: ProviderKind,
}

impl Identity {
    pub fn new(
        display_name: Option<String>,
        email: Option<String>,
        provider: ProviderKind,
    ) -> Self {
        Self {
            display_name: non_blank(display_name),
            email: non_blank(email),
            provider,
        }
    }

    /// Name to greet the user with: display name, else email, else a
    /// generic label.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Signed in")
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reconciled authentication state published to readers.
///
/// `is_loading` stays true until both identity sources have reported at
/// least once. `identity` is present iff some source reports an active
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthViewModel {
    pub identity: Option<Identity>,
    pub is_loading: bool,
}

impl AuthViewModel {
    /// The state before any source has reported.
    pub fn loading() -> Self {
        Self {
            identity: None,
            is_loading: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

impl Default for AuthViewModel {
    fn default() -> Self {
        Self::loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_display_name() {
        let identity = Identity::new(
            Some("Mona Lisa".into()),
            Some("mona@example.com".into()),
            ProviderKind::Account,
        );
        assert_eq!(identity.label(), "Mona Lisa");
    }

    #[test]
    fn label_falls_back_to_email_then_generic() {
        let identity = Identity::new(None, Some("mona@example.com".into()), ProviderKind::Session);
        assert_eq!(identity.label(), "mona@example.com");

        let identity = Identity::new(Some("   ".into()), None, ProviderKind::Session);
        assert_eq!(identity.display_name, None);
        assert_eq!(identity.label(), "Signed in");
    }

    #[test]
    fn initial_view_is_loading_and_anonymous() {
        let view = AuthViewModel::default();
        assert!(view.is_loading);
        assert!(!view.is_authenticated());
    }

    #[test]
    fn provider_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ProviderKind::Session).unwrap();
        assert_eq!(json, "\"session\"");
    }
}
