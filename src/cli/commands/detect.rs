//! Detect command implementation
//!
//! Runs detection without rewriting and prints a report.

use super::{apply_overrides, build_engine, build_report, read_input};
use crate::config::FacelessConfig;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Text to analyze
    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    /// Plain-text file to analyze (stdin when neither --text nor --input is given)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override entity kinds to detect (comma-separated, or `all`)
    #[arg(short, long)]
    pub entities: Option<String>,

    /// Also ask the configured language model
    #[arg(long)]
    pub llm: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self, mut config: FacelessConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting detect command");

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

        let spans = if engine.has_remote() {
            engine.detect_with_remote(&text).await
        } else {
            engine.detect(&text)
        };

        let report = build_report(&engine, &text, &spans);

        match self.format {
            ReportFormat::Console => print!("{}", report.format_console()),
            ReportFormat::Json => println!("{}", report.format_json()?),
        }

        Ok(0)
    }
}
