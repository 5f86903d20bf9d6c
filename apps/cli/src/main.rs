//! Assay CLI binary entry point.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use assay_validator::ValidatorRegistry;

use crate::cli::{Cli, Commands};
use crate::config::{CliConfig, LogFormat};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(commands::EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = CliConfig::load(&cli)?;
    init_tracing(&config)?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Validate { request, pretty } => {
            let registry = ValidatorRegistry::builder()
                .config(config.engine)
                .build();
            commands::validate(&registry, request.as_deref(), pretty)
        }
        Commands::Kinds { category, json } => commands::kinds(category, json),
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(config: &CliConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            anyhow::anyhow!("invalid log level '{}': {e}", config.log_level)
        })?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = match config.log_format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
