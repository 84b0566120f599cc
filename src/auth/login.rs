//! auth::login
//!
//! Personal access token sign-in for the account provider.
//!
//! The token is checked locally for shape, verified against `GET /user`,
//! and only then persisted through [`AccountFeed::sign_in`].

use super::errors::AuthError;
use super::feed::{AccountFeed, AccountRecord};
use super::identity::Identity;
use crate::core::config::validate_api_base;
use crate::github::GitHubApi;

/// Check that an API base URL may be used for sign-in.
pub fn check_api_base(api_base: &str) -> Result<(), AuthError> {
    validate_api_base(api_base).map_err(|_| AuthError::UnauthorizedDomain(api_base.to_string()))
}

/// Validate the local shape of a token.
///
/// An empty token means the prompt was dismissed.
pub fn check_token(token: &str) -> Result<&str, AuthError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Cancelled);
    }
    if !token.chars().all(|c| c.is_ascii_graphic()) {
        return Err(AuthError::MalformedToken(
            "token contains whitespace or non-ASCII characters".into(),
        ));
    }
    if token.len() < 20 {
        return Err(AuthError::MalformedToken("token is too short".into()));
    }
    Ok(token)
}

/// Verify `token` with GitHub and sign the account in.
pub async fn sign_in_with_token(
    api: &dyn GitHubApi,
    feed: &AccountFeed,
    token: &str,
) -> Result<Identity, AuthError> {
    let token = check_token(token)?;
    let user = api.authenticated_user(token).await?;
    tracing::debug!(login = %user.login, "token verified");

    let record = AccountRecord::new(&user.login, user.name, user.email, token);
    feed.sign_in(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::errors::AuthErrorCode;
    use crate::auth::feed::IdentityFeed;
    use crate::github::mock::MockGitHub;
    use crate::github::AuthenticatedUser;
    use crate::secrets::MemorySecretStore;
    use std::sync::Arc;

    const TOKEN: &str = "ghp_0123456789abcdefghij";

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            login: "octocat".into(),
            name: Some("Mona Lisa Octocat".into()),
            email: Some("mona@example.com".into()),
        }
    }

    #[test]
    fn empty_token_is_cancelled() {
        let err = check_token("   ").unwrap_err();
        assert_eq!(err.code(), Some(AuthErrorCode::PopupClosedByUser));
    }

    #[test]
    fn malformed_tokens() {
        for token in ["ghp_short", "ghp_0123456789 abcdefghij", "ghp_0123456789abcdéfghij"] {
            let err = check_token(token).unwrap_err();
            assert_eq!(err.code(), Some(AuthErrorCode::InvalidApiKey), "{}", token);
        }
    }

    #[test]
    fn api_base_must_be_http() {
        assert!(check_api_base("https://github.example.com/api/v3").is_ok());
        let err = check_api_base("ftp://github.example.com").unwrap_err();
        assert_eq!(err.code(), Some(AuthErrorCode::UnauthorizedDomain));
    }

    #[tokio::test]
    async fn verified_token_signs_in() {
        let api = MockGitHub::new().with_token_user(TOKEN, user());
        let feed = AccountFeed::new(Arc::new(MemorySecretStore::new()));
        let rx = feed.subscribe().unwrap();

        let identity = sign_in_with_token(&api, &feed, &format!("  {}\n", TOKEN))
            .await
            .unwrap();

        assert_eq!(identity.label(), "Mona Lisa Octocat");
        assert_eq!(rx.borrow().as_ref(), Some(&identity));
        assert_eq!(feed.bearer_token().unwrap().as_deref(), Some(TOKEN));
    }

    #[tokio::test]
    async fn rejected_token_maps_to_wrong_password() {
        let api = MockGitHub::new();
        let feed = AccountFeed::new(Arc::new(MemorySecretStore::new()));

        let err = sign_in_with_token(&api, &feed, TOKEN).await.unwrap_err();

        assert_eq!(err.code(), Some(AuthErrorCode::WrongPassword));
        assert_eq!(err.user_message(), "Incorrect password.");
        assert_eq!(feed.bearer_token().unwrap(), None);
    }
}
