//! dashboard command - Greet the signed-in user, then optionally look up

use std::sync::Arc;

use anyhow::{bail, Result};

use super::lookup::lookup_async;
use super::open_store;
use crate::auth::{AccountFeed, AuthReconciler, AuthViewModel, SessionStore};
use crate::cli::args::ChartArgs;
use crate::cli::Context;
use crate::ui::output;

/// Show the dashboard. Fails with "Not authenticated" when neither
/// identity source has a signed-in user.
pub fn dashboard(ctx: &Context, handle: Option<&str>, chart: &ChartArgs) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(dashboard_async(ctx, handle, chart))
}

async fn dashboard_async(ctx: &Context, handle: Option<&str>, chart: &ChartArgs) -> Result<()> {
    let view = resolve_identity(ctx).await?;
    let Some(identity) = view.identity else {
        bail!("Not authenticated");
    };

    output::success(format!("Welcome, {}!", identity.label()), ctx.verbosity());

    match handle {
        Some(raw) if !raw.trim().is_empty() => {
            println!();
            lookup_async(ctx, raw, chart).await
        }
        _ => Ok(()),
    }
}

/// Run the reconciler until both identity sources have reported, then
/// stop it and return the settled view.
pub(crate) async fn resolve_identity(ctx: &Context) -> Result<AuthViewModel> {
    let store = open_store(ctx)?;
    let feed = Arc::new(AccountFeed::new(Arc::clone(&store)));
    let sessions = Arc::new(SessionStore::new(store));

    let reconciler = AuthReconciler::start(feed, sessions);
    let mut handle = reconciler.handle();
    let view = handle.wait_until_loaded().await;
    reconciler.shutdown().await;

    match view {
        Some(view) => Ok(view),
        None => bail!("authentication state is unavailable"),
    }
}
