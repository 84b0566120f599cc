//! cli::commands::auth
//!
//! Sign-in, sign-out, and status for both identity sources.
//!
//! # Design
//!
//! - Tokens and passwords are never printed
//! - Failures are shown through the translator table, with details in the
//!   debug log
//! - `status` goes through the same reconciler the dashboard uses
//!
//! # Example
//!
//! ```bash
//! # Account: prompts for a personal access token
//! githunts auth login
//!
//! # Session: prompts for a password
//! githunts auth session --name Mona --email mona@example.com
//!
//! githunts auth status
//! githunts auth logout
//! ```

use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};

use super::dashboard::resolve_identity;
use super::open_store;
use crate::auth::{login as sign_in, AccountFeed, AuthError, SessionStore};
use crate::cli::Context;
use crate::github::GitHubClient;
use crate::ui::{output, prompts};

/// Sign in with a personal access token.
pub fn login(ctx: &Context, token: Option<&str>, api_base: Option<&str>) -> Result<()> {
    let api_base = api_base.unwrap_or_else(|| ctx.config.api_base());
    sign_in::check_api_base(api_base).map_err(user_facing)?;

    let token = match token {
        Some(t) => t.to_string(),
        None => read_secret(ctx, "GitHub personal access token: ", "--token")?,
    };

    let feed = AccountFeed::new(open_store(ctx)?);
    let api = GitHubClient::new(api_base);

    let rt = tokio::runtime::Runtime::new()?;
    let identity = rt
        .block_on(sign_in::sign_in_with_token(&api, &feed, &token))
        .map_err(user_facing)?;

    output::success(format!("Signed in as {}.", identity.label()), ctx.verbosity());
    Ok(())
}

/// Open a local session.
pub fn session(
    ctx: &Context,
    name: Option<&str>,
    email: &str,
    ttl_hours: Option<u32>,
    password_env: Option<&str>,
) -> Result<()> {
    let password = match password_env {
        Some(var) => std::env::var(var)
            .with_context(|| format!("environment variable {} is not set", var))?,
        None => read_secret(ctx, "Password: ", "--password-env")?,
    };
    let ttl = match ttl_hours {
        Some(0) => return Err(anyhow!("--ttl-hours must be at least 1")),
        Some(hours) => chrono::Duration::hours(i64::from(hours)),
        None => ctx.config.session_ttl(),
    };

    let sessions = SessionStore::new(open_store(ctx)?);
    let identity = sessions
        .start_session(name, email, &password, ttl)
        .map_err(user_facing)?;

    output::success(
        format!("Session opened for {}.", identity.label()),
        ctx.verbosity(),
    );
    Ok(())
}

/// Print the reconciled identity.
pub fn status(ctx: &Context) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let view = rt.block_on(resolve_identity(ctx))?;

    match view.identity {
        Some(identity) if ctx.quiet => println!("{}", identity.provider),
        Some(identity) => {
            println!("Signed in as {} ({}).", identity.label(), identity.provider);
            if let Some(email) = identity.email.as_deref() {
                if Some(email) != identity.display_name.as_deref() {
                    println!("Email: {}", email);
                }
            }
        }
        None if ctx.quiet => println!("none"),
        None => {
            println!("Not signed in.");
            println!("Run 'githunts auth login' or 'githunts auth session' to sign in.");
        }
    }
    Ok(())
}

/// Sign out of the account and end the session.
pub fn logout(ctx: &Context) -> Result<()> {
    let store = open_store(ctx)?;
    AccountFeed::new(Arc::clone(&store))
        .sign_out()
        .context("Failed to sign out")?;
    SessionStore::new(store)
        .end_session()
        .context("Failed to end session")?;

    output::success("Signed out.", ctx.verbosity());
    Ok(())
}

/// Prompt for a secret. A dismissed prompt is a cancelled sign-in.
fn read_secret(ctx: &Context, message: &str, flag: &str) -> Result<String> {
    if !ctx.interactive {
        return Err(anyhow!(
            "{} is required when not running interactively",
            flag
        ));
    }
    let value = prompts::secret(message, true).context("Failed to read input")?;
    if value.is_empty() {
        return Err(user_facing(AuthError::Cancelled));
    }
    Ok(value)
}

fn user_facing(err: AuthError) -> anyhow::Error {
    tracing::debug!(error = %err, "authentication failed");
    anyhow!("{}", err.user_message())
}
