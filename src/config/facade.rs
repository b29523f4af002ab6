//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::FilemapConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(config_file: Option<&Path>) -> Result<FilemapConfig, ConfigError> {
        MergeService::load(config_file)
    }

    /// Load configuration from a specific file, ignoring the environment.
    pub fn load_from_file(path: &Path) -> Result<FilemapConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> FilemapConfig {
        FilemapConfig::default()
    }
}
