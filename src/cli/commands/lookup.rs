//! lookup command - Fetch a profile and chart its repositories

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use serde_json::json;

use super::github_client;
use crate::cli::args::{ChartArgs, OutputFormat};
use crate::cli::Context;
use crate::dashboard::chart_spec;
use crate::dashboard::charts::{account_age_years, derive};
use crate::dashboard::{DashboardState, LookupController, LookupOutcome};
use crate::github::{GitHubApi, Profile};
use crate::ui::{chart_text, output};

/// Look up `raw` and print the profile summary and one chart.
///
/// Blank input prints nothing.
pub fn lookup(ctx: &Context, raw: &str, chart: &ChartArgs) -> Result<()> {
    if raw.trim().is_empty() {
        return Ok(());
    }
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(lookup_async(ctx, raw, chart))
}

pub(crate) async fn lookup_async(ctx: &Context, raw: &str, chart: &ChartArgs) -> Result<()> {
    let api: Arc<dyn GitHubApi> = Arc::new(github_client(ctx));
    let page_size = chart.page_size.unwrap_or_else(|| ctx.config.page_size());
    let controller = LookupController::new(api, DashboardState::with_page_size(page_size));

    if controller.submit(raw).await == LookupOutcome::Ignored {
        return Ok(());
    }

    let state = controller.state();
    if let Some(err) = state.profile_error {
        bail!("{}", err);
    }
    let Some(profile) = state.profile else {
        return Ok(());
    };
    if let Some(err) = &state.repository_error {
        output::warn(err, ctx.verbosity());
    }

    let kind = chart.chart.unwrap_or_else(|| ctx.config.default_chart());
    let data = derive(kind, &profile, &state.repositories);
    let age = account_age_years(profile.created_at, Utc::now());

    match chart.format {
        OutputFormat::Text => {
            output::print(profile_summary(&profile, age), ctx.verbosity());
            println!();
            print!("{}", chart_text::render(&data));
        }
        OutputFormat::Json => {
            let theme = chart.theme.unwrap_or_else(|| ctx.config.theme());
            let animations = !chart.no_animations && ctx.config.animations();
            let doc = json!({
                "profile": profile,
                "account_age_years": age,
                "repositories": state.repositories.len(),
                "repository_error": state.repository_error.as_ref().map(|e| e.to_string()),
                "chart": data,
                "chart_config": chart_spec::build(&data, theme, animations),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}

fn profile_summary(profile: &Profile, age_years: f64) -> String {
    let mut lines = Vec::new();
    match profile.name.as_deref().filter(|n| !n.trim().is_empty()) {
        Some(name) => lines.push(format!("{} (@{})", name, profile.handle)),
        None => lines.push(format!("@{}", profile.handle)),
    }
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        lines.push(bio.trim().to_string());
    }
    lines.push(format!(
        "Followers: {}  Following: {}  Public repos: {}  Public gists: {}",
        output::format_count(profile.follower_count),
        output::format_count(profile.following_count),
        output::format_count(profile.public_repo_count),
        output::format_count(profile.public_gist_count),
    ));
    lines.push(format!("Account age: {:.1} years", age_years));
    if !profile.html_url.is_empty() {
        lines.push(profile.html_url.clone());
    }
    lines.join("\n")
}
