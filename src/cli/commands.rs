//! CLI command implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::ObjectApi;
use crate::http_server::HttpServer;
use crate::registry::{ObjectRegistry, RegistryEvent};
use crate::spec::Spec;
use crate::status::StatusView;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Validate { config, file } => validate(config.as_deref(), &file),
    }
}

/// Start the API server and block until it stops
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    init_tracing(&config.log_level)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(serve_with(config))
}

/// Wire the registry, status view and HTTP server together
pub async fn serve_with(config: Config) -> CliResult<()> {
    let registry = Arc::new(ObjectRegistry::with_event_buffer(config.event_buffer));
    let kinds = Arc::new(config.kind_registry());
    let status = Arc::new(StatusView::new());

    info!(kinds = ?kinds.kinds(), "object kinds registered");
    tokio::spawn(log_changes(registry.subscribe()));

    let api = ObjectApi::new(registry, kinds, status);
    HttpServer::with_config(config.server, api)
        .start()
        .await
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
}

/// Parse one spec file and report its identity
pub fn validate(config_path: Option<&Path>, file: &Path) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    let spec = parse_spec_file(&config, file)?;

    println!("{}: {} ({})", file.display(), spec.name(), spec.kind());
    Ok(())
}

fn parse_spec_file(config: &Config, file: &Path) -> CliResult<Spec> {
    let raw = fs::read(file)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", file.display(), e)))?;

    Spec::parse(&raw, &config.kind_registry())
        .map_err(|e| CliError::invalid_spec(format!("{}: {}", file.display(), e)))
}

fn init_tracing(level: &str) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| CliError::config_error(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| CliError::boot_failed(format!("Failed to install logger: {}", e)))
}

/// Stand-in consumer of the change feed until a supervisor subscribes
async fn log_changes(mut events: broadcast::Receiver<RegistryEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => info!(
                version = event.version,
                object = event.change.name(),
                change = ?event.change,
                "configuration changed"
            ),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "change feed lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
