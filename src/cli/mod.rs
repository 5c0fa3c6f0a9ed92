//! CLI module for manifold
//!
//! Provides command-line interface for:
//! - serve: Run the object registry API
//! - validate: Check a spec file offline

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command, serve, serve_with, validate};
pub use config::{Config, KindConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
