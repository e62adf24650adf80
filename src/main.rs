// Faceless - PII detection and anonymization engine
// Copyright (c) 2025 Faceless Contributors
// Licensed under the MIT License

use clap::Parser;
use faceless::cli::{Cli, Commands};
use faceless::config::FacelessConfig;
use faceless::domain::Result;
use faceless::log_error_with_context;
use faceless::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    let loaded = cli.load_config();

    // Fall back to console-only logging when the configuration is unusable
    let logging_config = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| logging_config.level.clone());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        file_logging = guard.writes_file(),
        "Faceless - PII detection and anonymization"
    );

    // Execute command and get exit code
    let exit_code = match execute_command(&cli, loaded).await {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context!(e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, loaded: Result<FacelessConfig>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref(), loaded).await,
        Commands::Anonymize(args) => match require_config(loaded) {
            Some(config) => args.execute(config).await,
            None => Ok(2),
        },
        Commands::Detect(args) => match require_config(loaded) {
            Some(config) => args.execute(config).await,
            None => Ok(2), // Configuration error exit code
        },
    }
}

fn require_config(loaded: Result<FacelessConfig>) -> Option<FacelessConfig> {
    match loaded {
        Ok(config) => Some(config),
        Err(e) => {
            log_error_with_context!(e, "Failed to load configuration");
            eprintln!("Failed to load configuration: {e}");
            None
        }
    }
}
