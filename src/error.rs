//! Error types shared across the store, the shell and the tooling layer.

use crate::types::FileId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by FileMapStore mutators.
///
/// A mutator that returns one of these leaves the current map untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("File not found: {0}")]
    NotFound(FileId),

    #[error("Parent folder not found: {0}")]
    ParentNotFound(FileId),

    #[error("Not a directory: {0}")]
    NotADirectory(FileId),

    #[error("Cannot move {moved} into its own subtree (destination: {destination})")]
    MoveIntoDescendant { moved: FileId, destination: FileId },

    #[error("Root folder cannot be deleted: {0}")]
    RootImmutable(FileId),

    #[error("Invalid folder name: {0:?}")]
    InvalidName(String),
}

/// Errors raised while loading a seed snapshot.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed seed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Root folder {0} is missing from the file map")]
    MissingRoot(FileId),

    #[error("Root folder {0} is not a directory")]
    RootNotDirectory(FileId),

    #[error("Record keyed {key} carries id {id}")]
    IdMismatch { key: FileId, id: FileId },
}

/// Errors raised while parsing an intent from its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("Intent '{action}' is missing required field '{field}'")]
    MissingField {
        action: String,
        field: &'static str,
    },
}

/// Top-level error for configuration, logging and CLI operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
