//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use std::path::Path;

use errhint_catalog::{AppConfig, ReloadPolicy};

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .catalog_path(fixture.path())
///     .reload(ReloadPolicy::EverySearch)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn catalog_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.catalog.path = path.as_ref().display().to_string();
        self
    }

    pub fn reload(mut self, policy: ReloadPolicy) -> Self {
        self.config.catalog.reload = policy;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }

    /// Render the config as `errhint.toml` contents.
    pub fn to_toml(&self) -> String {
        toml_text(&self.config)
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn toml_text(config: &AppConfig) -> String {
    toml::to_string_pretty(config).expect("AppConfig always serializes")
}
