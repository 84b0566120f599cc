//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls into the library modules
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Commands that touch the network or wait on the auth reconciler (lookup,
//! dashboard, auth) are async. Each builds its own tokio runtime and
//! blocks on the async body.

mod auth;
mod charts;
mod completion;
mod config_cmd;
mod dashboard;
mod lookup;

pub use auth::{login, logout, session, status};
pub use charts::charts;
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use dashboard::dashboard;
pub use lookup::lookup;

use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::args::{AuthAction, Command, ConfigAction};
use super::Context;
use crate::auth::AccountFeed;
use crate::github::GitHubClient;
use crate::secrets::{self, SecretStore};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Lookup(args) => lookup::lookup(ctx, &args.handle, &args.chart),
        Command::Charts => charts::charts(ctx),
        Command::Dashboard { handle, chart } => {
            dashboard::dashboard(ctx, handle.as_deref(), &chart)
        }
        Command::Auth { action } => match action {
            AuthAction::Login { token, api_base } => {
                auth::login(ctx, token.as_deref(), api_base.as_deref())
            }
            AuthAction::Session {
                name,
                email,
                ttl_hours,
                password_env,
            } => auth::session(
                ctx,
                name.as_deref(),
                &email,
                ttl_hours,
                password_env.as_deref(),
            ),
            AuthAction::Status => auth::status(ctx),
            AuthAction::Logout => auth::logout(ctx),
        },
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Open the configured secret store.
pub(crate) fn open_store(ctx: &Context) -> Result<Arc<dyn SecretStore>> {
    let store = secrets::create_store(ctx.config.secrets_provider())
        .context("Failed to initialize secret store")?;
    Ok(Arc::from(store))
}

/// GitHub client for the configured API base, authenticated when an
/// account is signed in.
///
/// Lookups work anonymously, so a store that cannot be read only costs
/// the token.
pub(crate) fn github_client(ctx: &Context) -> GitHubClient {
    let token = open_store(ctx)
        .and_then(|store| Ok(AccountFeed::new(store).bearer_token()?))
        .unwrap_or_else(|e| {
            tracing::warn!("continuing without a token: {:#}", e);
            None
        });
    GitHubClient::new(ctx.config.api_base()).with_token(token)
}
