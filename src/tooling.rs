//! Tooling & Integration Layer
//!
//! Command-line access to the store and the session.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
