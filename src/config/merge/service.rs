//! MergeService: orchestrates sources, applies merge policy, deserializes to FilemapConfig.

use crate::config::sources::{environment, file};
use crate::config::FilemapConfig;
use config::ConfigError;
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> config file -> environment (highest).
    pub fn load(config_file: Option<&Path>) -> Result<FilemapConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = match config_file {
            Some(path) => file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Defaults overlaid with a single file.
    pub fn load_from_file(path: &Path) -> Result<FilemapConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = file::add_to_builder(builder, path)?;

        builder.build()?.try_deserialize()
    }
}
