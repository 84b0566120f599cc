//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file
//! - `--debug`: Enable debug logging
//! - `--no-interactive`: Never prompt
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::types::PageSize;
use crate::dashboard::{ChartKind, Theme};

/// githunts - look up GitHub users and chart their activity
#[derive(Parser, Debug)]
#[command(name = "githunts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the standard locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Prompts are allowed unless disabled by flag or stdin is not a TTY.
    pub fn interactive(&self) -> bool {
        !(self.no_interactive || self.quiet) && crate::ui::prompts::is_interactive()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up a GitHub user and chart their repositories
    #[command(
        name = "lookup",
        long_about = "Look up a GitHub user and chart their repositories.\n\n\
            Fetches the public profile, then the most recently updated repositories, \
            and renders one chart from them. A blank handle does nothing.",
        after_help = "\
EXAMPLES:
    # Profile summary and the default chart
    githunts lookup octocat

    # Languages across the 20 most recently updated repositories
    githunts lookup octocat --chart languages --repos 20

    # Chart configuration as JSON for a browser renderer
    githunts lookup octocat --chart popularity --format json --theme neon"
    )]
    Lookup(LookupArgs),

    /// List the available charts
    Charts,

    /// Show the signed-in dashboard
    #[command(
        name = "dashboard",
        long_about = "Show the dashboard for the signed-in user.\n\n\
            Requires a signed-in account or an open session. With a handle, \
            also runs a lookup."
    )]
    Dashboard {
        /// GitHub handle to look up after the greeting
        handle: Option<String>,

        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Sign in, sign out, or show authentication status
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        after_help = "\
EXAMPLES:
    # List all configuration values
    githunts config list

    # Get a specific value
    githunts config get dashboard.theme

    # Set a value
    githunts config set dashboard.page_size 10"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    githunts completion bash >> ~/.bashrc

    # Fish
    githunts completion fish > ~/.config/fish/completions/githunts.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `lookup`.
#[derive(clap::Args, Debug, Clone)]
pub struct LookupArgs {
    /// GitHub handle to look up
    pub handle: String,

    #[command(flatten)]
    pub chart: ChartArgs,
}

/// Chart selection and presentation flags.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ChartArgs {
    /// Chart to render (see `githunts charts`)
    #[arg(long, value_name = "KIND")]
    pub chart: Option<ChartKind>,

    /// Number of recently updated repositories to fetch
    #[arg(long = "repos", value_name = "N")]
    pub page_size: Option<PageSize>,

    /// Colour theme for JSON output
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Disable chart animations in JSON output
    #[arg(long)]
    pub no_animations: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Output formats for charts.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Auth subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AuthAction {
    /// Sign in with a GitHub personal access token
    Login {
        /// Token to use instead of prompting
        #[arg(long)]
        token: Option<String>,

        /// GitHub API base URL (GitHub Enterprise)
        #[arg(long, value_name = "URL")]
        api_base: Option<String>,
    },
    /// Open a local session
    Session {
        /// Name to greet you with
        #[arg(long)]
        name: Option<String>,

        /// Email address for the session
        #[arg(long)]
        email: String,

        /// Session lifetime in hours (defaults to session.ttl_hours)
        #[arg(long, value_name = "HOURS")]
        ttl_hours: Option<u32>,

        /// Read the password from this environment variable instead of prompting
        #[arg(long, value_name = "VAR")]
        password_env: Option<String>,
    },
    /// Show who is signed in
    Status,
    /// Sign out of the account and end the session
    Logout,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
