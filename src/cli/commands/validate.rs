//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Faceless configuration file.

use crate::anonymization::AnonymizationEngine;
use crate::config::FacelessConfig;
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Besides parsing and validation, builds an engine so that pattern
    /// libraries and custom patterns are compiled as well.
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        loaded: Result<FacelessConfig>,
    ) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("defaults and FACELESS_* environment");
        tracing::info!(config_source = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        let config = match loaded {
            Ok(c) => {
                println!("✅ Configuration loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        match AnonymizationEngine::new(config.anonymization.clone()) {
            Ok(_) => {
                let anonymization = &config.anonymization;
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Language: {}", anonymization.language);
                println!("  Method: {}", anonymization.method);
                println!(
                    "  Entities: {}",
                    anonymization
                        .entities
                        .iter()
                        .map(|kind| kind.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                println!("  Minimum Confidence: {:.2}", anonymization.min_confidence);
                println!("  Custom Patterns: {}", anonymization.custom_patterns.len());
                println!("  Exclusions: {}", anonymization.exclusions.len());
                println!("  Log Level: {}", config.logging.level);
                if config.llm.enabled {
                    println!("  LLM Endpoint: {}", config.llm.base_url);
                    println!("  LLM Model: {}", config.llm.model);
                } else {
                    println!("  LLM: disabled");
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}
