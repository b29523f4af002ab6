//! Filemap: In-Memory Virtual File System
//!
//! A flat, id-keyed file map with copy-on-write mutators, read-only folder
//! views, and a session shell that turns file-browser intents into store
//! operations and user notifications.

pub mod config;
pub mod error;
pub mod logging;
pub mod shell;
pub mod store;
pub mod tooling;
pub mod types;
pub mod views;

pub use error::{ApiError, SeedError, StoreError};
pub use shell::{Intent, Session};
pub use store::{FileMap, FileMapStore, FileRecord, Seed};
pub use types::FileId;
