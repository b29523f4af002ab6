//! Configuration
//!
//! Layered configuration built with the `config` crate: built-in defaults, an
//! optional file, then `FILEMAP__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::shell::NotificationConfig;
use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilemapConfig {
    /// Seed snapshot to load; the built-in demo tree when absent
    #[serde(default)]
    pub seed: Option<PathBuf>,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
