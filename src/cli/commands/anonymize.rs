//! Anonymize command implementation
//!
//! This module implements the `anonymize` command, which rewrites one plain
//! text and prints the result to stdout.

use super::{apply_overrides, build_engine, build_report, read_input};
use crate::config::FacelessConfig;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Text to anonymize
    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    /// Plain-text file to anonymize (stdin when neither --text nor --input is given)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override anonymization method (mask, pseudonymize, hash, generalize, redact, encrypt)
    #[arg(short, long)]
    pub method: Option<String>,

    /// Override entity kinds to detect (comma-separated, or `all`)
    #[arg(short, long)]
    pub entities: Option<String>,

    /// Also ask the configured language model
    #[arg(long)]
    pub llm: bool,

    /// Write a JSON detection report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, mut config: FacelessConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting anonymize command");

        if let Some(ref method) = self.method {
            tracing::info!(method = %method, "Overriding anonymization method from CLI");
            match method.parse() {
                Ok(method) => config.anonymization.method = method,
                Err(e) => {
                    tracing::error!(error = %e, "Invalid anonymization method");
                    eprintln!("{e}");
                    return Ok(2);
                }
            }
        }

        if let Err(e) = apply_overrides(&mut config, self.entities.as_deref(), self.llm) {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let engine = match build_engine(&config) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build anonymization engine");
                eprintln!("Failed to build anonymization engine: {e}");
                return Ok(2);
            }
        };

        let text = read_input(self.text.as_deref(), self.input.as_deref()).await?;

        let result = if engine.has_remote() {
            engine.anonymize_with_remote(&text).await?
        } else {
            engine.anonymize(&text)?
        };

        if let Some(ref path) = self.report {
            build_report(&engine, &text, &result.detections).write_to_file(path)?;
            tracing::info!(path = %path.display(), "Detection report written");
        }

        if result.anonymized.ends_with('\n') {
            print!("{}", result.anonymized);
        } else {
            println!("{}", result.anonymized);
        }

        tracing::info!(
            entities = result.total_detections(),
            processing_time_ms = result.processing_time_ms,
            "Anonymize command finished"
        );

        Ok(0)
    }
}
