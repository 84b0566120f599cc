//! config command - Get, set, or list configuration values

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::{Config, KEYS};

/// Print the effective value of a key.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let value = ctx.config.get_key(key)?;
    println!("{}", value);
    Ok(())
}

/// Set a key in the config file the current config was loaded from, or in
/// the canonical location when none was found.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut global = ctx.config.global.clone();
    global.set_key(key, value)?;

    let path = ctx.config.write_path()?;
    Config::write(&path, &global).context("Failed to write config")?;
    tracing::debug!(path = %path.display(), key, "config updated");

    if !ctx.quiet {
        println!("Set {} = {}", key, value);
    }
    Ok(())
}

/// List every key with its effective value.
pub fn list(ctx: &Context) -> Result<()> {
    if !ctx.quiet {
        match ctx.config.loaded_from() {
            Some(path) => println!("# {}", path.display()),
            None => println!("# defaults (no config file)"),
        }
    }
    for key in KEYS {
        println!("{} = {}", key, ctx.config.get_key(key)?);
    }
    Ok(())
}
