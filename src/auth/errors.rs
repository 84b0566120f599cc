//! auth::errors
//!
//! Authentication error types and the provider error-code translator.
//!
//! # Design
//!
//! Identity providers report failures as short codes such as
//! `auth/wrong-password`. [`translate_error_code`] maps a code to the fixed
//! sentence shown to the user; it is total and falls back to a generic
//! message for anything it does not know.
//!
//! [`AuthError`] is what the providers in this crate return. Each variant
//! that corresponds to a provider code reports it through
//! [`AuthError::code`], so the CLI can show every sign-in failure through the
//! same table.
//!
//! Error messages MUST NOT contain tokens or passwords.
//!
//! # Example
//!
//! ```
//! use githunts::auth::{translate_error_code, AuthError};
//!
//! assert_eq!(translate_error_code("auth/wrong-password"), "Incorrect password.");
//! assert_eq!(
//!     translate_error_code("auth/something-new"),
//!     "An error occurred. Please try again."
//! );
//!
//! assert_eq!(AuthError::WeakPassword.user_message(), "Password is too weak.");
//! ```

use thiserror::Error;

use crate::github::FetchError;

/// Message shown for any code outside the table.
pub const FALLBACK_MESSAGE: &str = "An error occurred. Please try again.";

/// Identity-provider error codes with a fixed user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    InvalidApiKey,
    UnauthorizedDomain,
    UserNotFound,
    WrongPassword,
    EmailAlreadyInUse,
    WeakPassword,
    PopupClosedByUser,
}

impl AuthErrorCode {
    /// Every code in the table.
    pub const ALL: [AuthErrorCode; 7] = [
        AuthErrorCode::InvalidApiKey,
        AuthErrorCode::UnauthorizedDomain,
        AuthErrorCode::UserNotFound,
        AuthErrorCode::WrongPassword,
        AuthErrorCode::EmailAlreadyInUse,
        AuthErrorCode::WeakPassword,
        AuthErrorCode::PopupClosedByUser,
    ];

    /// Parse a provider code string. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// The provider's wire form of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            AuthErrorCode::InvalidApiKey => "auth/invalid-api-key",
            AuthErrorCode::UnauthorizedDomain => "auth/unauthorized-domain",
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::WrongPassword => "auth/wrong-password",
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::PopupClosedByUser => "auth/popup-closed-by-user",
        }
    }

    /// The fixed message for this code.
    pub fn message(self) -> &'static str {
        match self {
            AuthErrorCode::InvalidApiKey => {
                "API key is missing or invalid. Please check your environment variables."
            }
            AuthErrorCode::UnauthorizedDomain => {
                "This domain is not authorized for authentication. Add it to the authorized domains."
            }
            AuthErrorCode::UserNotFound => "No account found with this email.",
            AuthErrorCode::WrongPassword => "Incorrect password.",
            AuthErrorCode::EmailAlreadyInUse => "Email already in use.",
            AuthErrorCode::WeakPassword => "Password is too weak.",
            AuthErrorCode::PopupClosedByUser => {
                "Authentication popup was closed before completing the sign in process."
            }
        }
    }
}

impl std::fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate a provider error code into a human-readable message.
///
/// Never fails: unmapped codes (including the empty string) return
/// [`FALLBACK_MESSAGE`].
pub fn translate_error_code(code: &str) -> &'static str {
    AuthErrorCode::from_code(code)
        .map(AuthErrorCode::message)
        .unwrap_or(FALLBACK_MESSAGE)
}

/// Errors from authentication operations.
///
/// # Security
///
/// Error messages intentionally do not include token or password values.
#[derive(Debug, Error)]
pub enum AuthError {
    /// GitHub rejected the personal access token.
    #[error("GitHub rejected the token")]
    TokenRejected,

    /// The account behind the token no longer exists.
    #[error("no GitHub account found for the token")]
    AccountNotFound,

    /// The token is not shaped like a GitHub token.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The user dismissed an interactive prompt without answering.
    #[error("sign-in cancelled by user")]
    Cancelled,

    /// A session for a different identity is already open.
    #[error("a session is already open for '{0}'")]
    EmailInUse(String),

    /// The API base URL is not an acceptable sign-in host.
    #[error("'{0}' is not an authorized API host")]
    UnauthorizedDomain(String),

    /// Session password shorter than the minimum length.
    #[error("password is too weak")]
    WeakPassword,

    /// Any other invalid sign-in input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A stored identity record is invalid or cannot be parsed.
    #[error("invalid identity record: {0}")]
    InvalidRecord(String),

    /// Error from secret storage.
    #[error("secret store error: {0}")]
    SecretStore(String),

    /// Network error during authentication.
    #[error("network error: {0}")]
    Network(String),

    /// GitHub API error during authentication.
    #[error("GitHub API error: {status} - {message}")]
    GitHubApi {
        /// HTTP status code
        status: u16,
        /// Error message from GitHub
        message: String,
    },
}

impl AuthError {
    /// The provider code this error corresponds to, if any.
    pub fn code(&self) -> Option<AuthErrorCode> {
        match self {
            AuthError::TokenRejected => Some(AuthErrorCode::WrongPassword),
            AuthError::AccountNotFound => Some(AuthErrorCode::UserNotFound),
            AuthError::MalformedToken(_) => Some(AuthErrorCode::InvalidApiKey),
            AuthError::Cancelled => Some(AuthErrorCode::PopupClosedByUser),
            AuthError::EmailInUse(_) => Some(AuthErrorCode::EmailAlreadyInUse),
            AuthError::UnauthorizedDomain(_) => Some(AuthErrorCode::UnauthorizedDomain),
            AuthError::WeakPassword => Some(AuthErrorCode::WeakPassword),
            AuthError::InvalidInput(_)
            | AuthError::InvalidRecord(_)
            | AuthError::SecretStore(_)
            | AuthError::Network(_)
            | AuthError::GitHubApi { .. } => None,
        }
    }

    /// The message to show the user, via the translator table.
    pub fn user_message(&self) -> &'static str {
        translate_error_code(self.code().map(AuthErrorCode::as_str).unwrap_or_default())
    }
}

impl From<crate::secrets::SecretError> for AuthError {
    fn from(err: crate::secrets::SecretError) -> Self {
        AuthError::SecretStore(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::InvalidRecord(err.to_string())
    }
}

impl From<FetchError> for AuthError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::AuthFailed(_) => AuthError::TokenRejected,
            FetchError::NotFound(_) => AuthError::AccountNotFound,
            FetchError::ApiError { status, message } => AuthError::GitHubApi { status, message },
            FetchError::Decode(message) => AuthError::GitHubApi {
                status: 200,
                message,
            },
            FetchError::NetworkError(message) => AuthError::Network(message),
        }
    }
}
