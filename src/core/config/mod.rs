//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! githunts has a single user-level configuration file. Dashboard options
//! on the command line override it.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. An explicit path (`--config`)
//! 2. `$GITHUNTS_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/githunts/config.toml`
//! 4. `~/.githunts/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use githunts::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("API: {}", config.api_base());
//! println!("Repos per lookup: {}", config.page_size());
//! println!("Theme: {}", config.theme());
//! ```

pub mod schema;

pub use schema::{
    validate_api_base, DashboardDefaults, GlobalConfig, SecretsConfig, SessionConfig,
};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::types::PageSize;
use crate::dashboard::{ChartKind, Theme};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default session lifetime in hours.
pub const DEFAULT_SESSION_TTL_HOURS: u32 = 24;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GITHUNTS_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Keys accepted by `config get` / `config set`.
pub const KEYS: &[&str] = &[
    "api_base",
    "dashboard.page_size",
    "dashboard.theme",
    "dashboard.animations",
    "dashboard.default_chart",
    "secrets.provider",
    "session.ttl_hours",
];

/// Loaded configuration with defaults applied by accessor methods.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File contents (all fields optional)
    pub global: GlobalConfig,
    /// Path the config was loaded from
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise the standard locations are
    /// searched and defaults are used when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => candidate_paths(|key| std::env::var(key).ok(), dirs::home_dir())
                .into_iter()
                .find(|p| p.exists()),
        };

        let mut warnings = Vec::new();
        let global = match &path {
            Some(p) => Self::read_config(p)?,
            None => GlobalConfig::default(),
        };

        global.validate()?;

        if let (Some(p), Some(size)) = (
            &path,
            global.dashboard.as_ref().and_then(|d| d.page_size),
        ) {
            if !size.is_standard() {
                warnings.push(ConfigWarning {
                    message: format!(
                        "dashboard.page_size = {} is not one of the standard sizes {:?}",
                        size,
                        PageSize::CHOICES
                    ),
                    path: p.clone(),
                });
            }
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                loaded_from: path,
            },
            warnings,
        })
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for the config file.
    ///
    /// Returns `~/.githunts/config.toml`.
    pub fn canonical_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".githunts/config.toml"))
    }

    /// Path writes should go to: where the config was loaded from, or the
    /// canonical location.
    pub fn write_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.loaded_from {
            Some(p) => Ok(p.clone()),
            None => Self::canonical_path(),
        }
    }

    /// Write config atomically.
    ///
    /// Creates parent directories if needed. Uses atomic write
    /// (write to temp file, then rename) to prevent corruption.
    pub fn write(path: &Path, config: &GlobalConfig) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the API base URL.
    ///
    /// Defaults to `https://api.github.com`.
    pub fn api_base(&self) -> &str {
        self.global
            .api_base
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .unwrap_or(DEFAULT_API_BASE)
    }

    fn dashboard(&self) -> Option<&DashboardDefaults> {
        self.global.dashboard.as_ref()
    }

    /// Get the number of repositories to fetch.
    ///
    /// Defaults to 5.
    pub fn page_size(&self) -> PageSize {
        self.dashboard()
            .and_then(|d| d.page_size)
            .unwrap_or_default()
    }

    /// Get the chart colour theme.
    ///
    /// Defaults to dark.
    pub fn theme(&self) -> Theme {
        self.dashboard().and_then(|d| d.theme).unwrap_or_default()
    }

    /// Check if chart animations are enabled.
    ///
    /// Defaults to `true`.
    pub fn animations(&self) -> bool {
        self.dashboard().and_then(|d| d.animations).unwrap_or(true)
    }

    /// Get the chart shown when none is requested.
    ///
    /// Defaults to the activity overview.
    pub fn default_chart(&self) -> ChartKind {
        self.dashboard()
            .and_then(|d| d.default_chart)
            .unwrap_or_default()
    }

    /// Get the secrets provider.
    ///
    /// Defaults to "file".
    pub fn secrets_provider(&self) -> &str {
        self.global
            .secrets
            .as_ref()
            .and_then(|s| s.provider.as_deref())
            .unwrap_or("file")
    }

    /// Get the lifetime of new sessions.
    ///
    /// Defaults to 24 hours.
    pub fn session_ttl(&self) -> chrono::Duration {
        let hours = self
            .global
            .session
            .as_ref()
            .and_then(|s| s.ttl_hours)
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        chrono::Duration::hours(i64::from(hours))
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    /// Effective value for a config key, with defaults applied.
    pub fn get_key(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "api_base" => self.api_base().to_string(),
            "dashboard.page_size" => self.page_size().to_string(),
            "dashboard.theme" => self.theme().to_string(),
            "dashboard.animations" => self.animations().to_string(),
            "dashboard.default_chart" => self.default_chart().to_string(),
            "secrets.provider" => self.secrets_provider().to_string(),
            "session.ttl_hours" => self.session_ttl().num_hours().to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }
}

impl GlobalConfig {
    /// Set a config key from its string form.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownKey` for keys outside [`KEYS`] and
    /// `ConfigError::InvalidValue` when the value does not parse.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |e: &dyn std::fmt::Display| {
            ConfigError::InvalidValue(format!("{}: {}", key, e))
        };

        match key {
            "api_base" => {
                schema::validate_api_base(value)?;
                self.api_base = Some(value.to_string());
            }
            "dashboard.page_size" => {
                let size: PageSize = value.parse().map_err(|e| invalid(&e))?;
                self.dashboard.get_or_insert_with(Default::default).page_size = Some(size);
            }
            "dashboard.theme" => {
                let theme: Theme = value.parse().map_err(|e| invalid(&e))?;
                self.dashboard.get_or_insert_with(Default::default).theme = Some(theme);
            }
            "dashboard.animations" => {
                let enabled: bool = value.parse().map_err(|e| invalid(&e))?;
                self.dashboard.get_or_insert_with(Default::default).animations = Some(enabled);
            }
            "dashboard.default_chart" => {
                let kind: ChartKind = value.parse().map_err(|e| invalid(&e))?;
                self.dashboard
                    .get_or_insert_with(Default::default)
                    .default_chart = Some(kind);
            }
            "secrets.provider" => {
                let secrets = SecretsConfig {
                    provider: Some(value.to_string()),
                };
                secrets.validate()?;
                self.secrets = Some(secrets);
            }
            "session.ttl_hours" => {
                let hours: u32 = value.parse().map_err(|e| invalid(&e))?;
                let session = SessionConfig {
                    ttl_hours: Some(hours),
                };
                session.validate()?;
                self.session = Some(session);
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Standard config locations in search order.
fn candidate_paths(
    env: impl Fn(&str) -> Option<String>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = env(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(path));
    }
    if let Some(xdg_home) = env("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg_home).join("githunts/config.toml"));
    }
    if let Some(home) = home {
        paths.push(home.join(".githunts/config.toml"));
    }
    paths
}
