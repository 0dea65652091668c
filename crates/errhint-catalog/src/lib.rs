#![deny(unsafe_code)]

//! Hint catalog loading and application configuration for errhint.
//!
//! The [`catalog`] module loads the YAML hint catalog and validates it against
//! the record schema. The crate root holds [`AppConfig`], the TOML settings
//! file that tells the hosts where the catalog lives and how often to reread it.

/// Hint catalog document loading and lookup.
pub mod catalog;

pub use catalog::{Catalog, CatalogError, HintRecord, ParseFailure};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration (`errhint.toml`).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Hint catalog location and caching.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// When the search engine rereads the catalog document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReloadPolicy {
    /// Load once on first search; refresh only on an explicit reload.
    #[default]
    Cached,
    /// Reread the document on every search.
    EverySearch,
}

/// Where the hint catalog lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the YAML catalog. Relative paths resolve against the directory
    /// holding the config file.
    #[serde(default = "default_catalog_path")]
    pub path: String,

    /// Reload policy: "cached" or "every-search".
    #[serde(default)]
    pub reload: ReloadPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            reload: ReloadPolicy::default(),
        }
    }
}

fn default_catalog_path() -> String {
    "hints.yml".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.path must not be empty".to_string(),
            ));
        }
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }
        Ok(())
    }

    /// Resolve the catalog path against `base_dir` (normally the config
    /// file's directory). Absolute paths are returned unchanged.
    pub fn resolve_catalog_path(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(&self.catalog.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}
