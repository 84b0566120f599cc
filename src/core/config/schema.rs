//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order of precedence:
//! 1. `--config <path>` on the command line
//! 2. `$GITHUNTS_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/githunts/config.toml`
//! 4. `~/.githunts/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Typed fields (page size, theme, chart kind) are validated while parsing.
//! The remaining values are checked by [`GlobalConfig::validate`].

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::PageSize;
use crate::dashboard::{ChartKind, Theme};

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// api_base = "https://api.github.com"
///
/// [dashboard]
/// page_size = 10
/// theme = "neon"
/// animations = false
/// default_chart = "languages"
///
/// [secrets]
/// provider = "file"
///
/// [session]
/// ttl_hours = 24
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// GitHub REST API base URL (GitHub Enterprise or test servers)
    pub api_base: Option<String>,

    /// Dashboard presentation defaults
    pub dashboard: Option<DashboardDefaults>,

    /// Secret storage settings
    pub secrets: Option<SecretsConfig>,

    /// Session provider settings
    pub session: Option<SessionConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(api_base) = &self.api_base {
            validate_api_base(api_base)?;
        }

        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }

        if let Some(session) = &self.session {
            session.validate()?;
        }

        Ok(())
    }
}

/// Check that an API base is an absolute http(s) URL.
pub fn validate_api_base(api_base: &str) -> Result<(), ConfigError> {
    let rest = api_base
        .strip_prefix("https://")
        .or_else(|| api_base.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ConfigError::InvalidValue(format!(
            "api_base '{}' must be an http:// or https:// URL",
            api_base
        ))),
    }
}

/// Dashboard presentation defaults.
///
/// None of these affect data derivation, only what is fetched and how it
/// is drawn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardDefaults {
    /// Number of repositories to fetch
    pub page_size: Option<PageSize>,

    /// Colour theme
    pub theme: Option<Theme>,

    /// Whether chart animations are enabled
    pub animations: Option<bool>,

    /// Chart shown when none is requested
    pub default_chart: Option<ChartKind>,
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    /// Provider to use (only "file" is available)
    pub provider: Option<String>,
}

impl SecretsConfig {
    /// Valid secret providers.
    pub const VALID_PROVIDERS: &'static [&'static str] = &["file"];

    /// Validate the secrets configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            if !Self::VALID_PROVIDERS.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid secrets provider '{}', must be one of: {}",
                    provider,
                    Self::VALID_PROVIDERS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Session provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Lifetime of a new session in hours
    pub ttl_hours: Option<u32>,
}

impl SessionConfig {
    /// Validate the session configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_hours == Some(0) {
            return Err(ConfigError::InvalidValue(
                "session.ttl_hours must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
            api_base = "https://github.example.com/api/v3"

            [dashboard]
            page_size = 10
            theme = "neon"
            animations = false
            default_chart = "top-repos"

            [secrets]
            provider = "file"

            [session]
            ttl_hours = 12
        "#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());

        let dashboard = config.dashboard.unwrap();
        assert_eq!(dashboard.page_size.map(PageSize::get), Some(10));
        assert_eq!(dashboard.theme, Some(Theme::Neon));
        assert_eq!(dashboard.animations, Some(false));
        assert_eq!(dashboard.default_chart, Some(ChartKind::TopRepos));
        assert_eq!(config.session.unwrap().ttl_hours, Some(12));
    }

    #[test]
    fn empty_config_is_valid() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_page_size_fails_to_parse() {
        let result: Result<GlobalConfig, _> = toml::from_str("[dashboard]\npage_size = 0");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_theme_fails_to_parse() {
        let result: Result<GlobalConfig, _> = toml::from_str("[dashboard]\ntheme = \"sepia\"");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_api_base_rejected() {
        let config = GlobalConfig {
            api_base: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(validate_api_base("https://").is_err());
        assert!(validate_api_base("http://localhost:8080").is_ok());
    }

    #[test]
    fn invalid_secrets_provider_rejected() {
        let config = SecretsConfig {
            provider: Some("keychain".to_string()),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("keychain"));
    }

    #[test]
    fn zero_ttl_rejected() {
        let config = SessionConfig { ttl_hours: Some(0) };
        assert!(config.validate().is_err());
    }
}
