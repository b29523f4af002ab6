//! Integration tests for the filemap virtual file system

mod seed_files;
mod session_flow;
mod store_properties;
mod support;
