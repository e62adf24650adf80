//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Faceless using clap.

pub mod commands;

use crate::config::{load_config, load_from_env, FacelessConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

/// Configuration file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "faceless.toml";

/// Faceless - PII detection and anonymization
#[derive(Parser, Debug)]
#[command(name = "faceless")]
#[command(version, about, long_about = None)]
#[command(author = "Faceless Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "FACELESS_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FACELESS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect personal data and print the rewritten text
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Detect personal data and print a report
    Detect(commands::detect::DetectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}

impl Cli {
    /// Load the configuration named by `--config`
    ///
    /// Without `--config`, `faceless.toml` in the working directory is used
    /// when present, otherwise defaults plus `FACELESS_*` overrides.
    pub fn load_config(&self) -> Result<FacelessConfig> {
        match self.config.as_deref() {
            Some(path) => load_config(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
            None => load_from_env(),
        }
    }
}
