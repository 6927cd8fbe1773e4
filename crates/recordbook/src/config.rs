//! Configuration management for recordbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validation::{Rules, DEFAULT_MIN_LENGTH};
use crate::view::{SearchScope, ViewParams, DEFAULT_PAGE_SIZE};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "recordbook";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "RECORDBOOK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RECORDBOOK_`, nested keys
///    separated by `__`)
/// 2. TOML config file at `~/.config/recordbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Table view configuration.
    pub view: ViewConfig,
    /// Form validation configuration.
    pub validation: ValidationConfig,
    /// Notification configuration.
    pub notices: NoticeConfig,
}

/// Table view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page.
    pub page_size: usize,
    /// Whether search filters the current page or the whole store.
    pub search_scope: SearchScope,
    /// strftime format for the timestamp column.
    pub timestamp_format: String,
}

/// Form validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum keyword length in characters.
    pub min_keyword_length: usize,
    /// Minimum description length in characters.
    pub min_description_length: usize,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Show success notices after create, update, and delete.
    pub enabled: bool,
    /// How long a notice stays up, in milliseconds.
    pub auto_dismiss_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_scope: SearchScope::Page,
            timestamp_format: "%d %b, %H:%M:%S".to_string(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_keyword_length: DEFAULT_MIN_LENGTH,
            min_description_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_dismiss_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation
    /// fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.view.page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "page_size must be greater than 0".to_string(),
            });
        }

        if StrftimeItems::new(&self.view.timestamp_format).any(|item| matches!(item, Item::Error))
        {
            return Err(Error::ConfigValidation {
                message: format!(
                    "invalid timestamp_format: {}",
                    self.view.timestamp_format
                ),
            });
        }

        if self.validation.min_keyword_length == 0 || self.validation.min_description_length == 0
        {
            return Err(Error::ConfigValidation {
                message: "minimum field lengths must be greater than 0".to_string(),
            });
        }

        if self.notices.enabled && self.notices.auto_dismiss_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "auto_dismiss_ms must be greater than 0 when notices are enabled"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Page size and search scope for the view.
    #[must_use]
    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            page_size: self.view.page_size,
            scope: self.view.search_scope,
        }
    }

    /// Validation rules for the add/edit forms.
    #[must_use]
    pub fn rules(&self) -> Rules {
        Rules {
            min_keyword_length: self.validation.min_keyword_length,
            min_description_length: self.validation.min_description_length,
        }
    }

    /// How long a notice stays up, or `None` if notices are disabled.
    #[must_use]
    pub fn notice_ttl(&self) -> Option<Duration> {
        if !self.notices.enabled {
            return None;
        }
        let ms = i64::try_from(self.notices.auto_dismiss_ms).unwrap_or(i64::MAX);
        Some(Duration::milliseconds(ms))
    }
}

#[cfg(test)]
// `Jail` closures return figment's own unboxed error.
#[allow(clippy::result_large_err)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.view.page_size, 5);
        assert_eq!(config.view.search_scope, SearchScope::Page);
        assert_eq!(config.validation.min_keyword_length, 3);
        assert_eq!(config.validation.min_description_length, 3);
        assert!(config.notices.enabled);
        assert_eq!(config.notices.auto_dismiss_ms, 1000);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_page_size() {
        let mut config = Config::default();
        config.view.page_size = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("page_size"));
    }

    #[test]
    fn test_validate_zero_min_length() {
        let mut config = Config::default();
        config.validation.min_description_length = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("minimum field lengths"));
    }

    #[test]
    fn test_validate_zero_dismiss_only_when_enabled() {
        let mut config = Config::default();
        config.notices.auto_dismiss_ms = 0;
        assert!(config.validate().is_err());

        config.notices.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_timestamp_format() {
        let mut config = Config::default();
        config.view.timestamp_format = "%Q".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timestamp_format"));
    }

    #[test]
    fn test_view_params_and_rules() {
        let mut config = Config::default();
        config.view.page_size = 10;
        config.view.search_scope = SearchScope::Store;
        config.validation.min_keyword_length = 2;

        assert_eq!(
            config.view_params(),
            ViewParams {
                page_size: 10,
                scope: SearchScope::Store
            }
        );
        assert_eq!(config.rules().min_keyword_length, 2);
        assert_eq!(config.rules().min_description_length, 3);
    }

    #[test]
    fn test_notice_ttl() {
        let mut config = Config::default();
        assert_eq!(config.notice_ttl(), Some(Duration::milliseconds(1000)));

        config.notices.enabled = false;
        assert!(config.notice_ttl().is_none());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("recordbook"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .expect("defaults should load");
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "recordbook.toml",
                r#"
                [view]
                page_size = 10
                search_scope = "store"

                [notices]
                auto_dismiss_ms = 2500
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("recordbook.toml")))
                .expect("config should load");
            assert_eq!(config.view.page_size, 10);
            assert_eq!(config.view.search_scope, SearchScope::Store);
            assert_eq!(config.notices.auto_dismiss_ms, 2500);
            assert_eq!(config.validation.min_keyword_length, 3);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("recordbook.toml", "[view]\npage_size = 10\n")?;
            jail.set_env("RECORDBOOK_VIEW__PAGE_SIZE", "7");
            jail.set_env("RECORDBOOK_VALIDATION__MIN_KEYWORD_LENGTH", "4");

            let config = Config::load_from(Some(PathBuf::from("recordbook.toml")))
                .expect("config should load");
            assert_eq!(config.view.page_size, 7);
            assert_eq!(config.validation.min_keyword_length, 4);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.create_file("recordbook.toml", "[view]\npage_size = 0\n")?;

            let result = Config::load_from(Some(PathBuf::from("recordbook.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("page_size"));
        assert!(json.contains("\"search_scope\":\"page\""));
    }
}
