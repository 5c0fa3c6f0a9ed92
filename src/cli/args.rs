//! CLI argument definitions using clap
//!
//! Commands:
//! - manifold serve [--config <path>] [--port <port>]
//! - manifold validate [--config <path>] <file>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// manifold - A control-plane object registry
#[derive(Parser, Debug)]
#[command(name = "manifold")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the object registry API server
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Parse a spec file against the configured kinds and exit
    Validate {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// YAML spec to check
        file: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
