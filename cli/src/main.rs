//! CLI entrypoint for combis
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod scenario;
mod serve;

use anyhow::{Context, Result};
use clap::Parser;
use combis_application::AuditLogger;
use combis_infrastructure::{ConfigLoader, FileConfig, JsonlAuditLogger};
use combis_presentation::{Cli, Command};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = init_logging(cli.verbose, config.logging.log_dir.as_deref())?;

    info!("Starting combis");

    match cli.command {
        Command::Serve { seed, port } => serve::run(config, &seed, port).await,
        Command::Simulate { scenario, output } => scenario::run(config, &scenario, output).await,
        Command::ShowConfig => {
            ConfigLoader::print_config_sources(cli.config.as_ref());
            println!("{}", config.to_display_toml());
            Ok(())
        }
    }
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "combis.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            Ok(None)
        }
    }
}

/// Audit logger from configuration, if one is configured
fn audit_logger(config: &FileConfig) -> Result<Option<Arc<dyn AuditLogger>>> {
    let Some(path) = &config.logging.audit_log else {
        return Ok(None);
    };
    let logger = JsonlAuditLogger::open(path)
        .with_context(|| format!("Failed to open audit log {}", path.display()))?;
    info!("Audit trail written to {}", path.display());
    Ok(Some(Arc::new(logger)))
}
