// Faceless - PII detection and anonymization engine
// Copyright (c) 2025 Faceless Contributors
// Licensed under the MIT License

//! # Faceless - PII detection and anonymization
//!
//! Faceless finds personal data in Polish and English plain text and rewrites
//! it with position-exact substitutions.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** structured identifiers (PESEL, NIP, REGON, IBAN, cards,
//!   phones, e-mails) with checksum validation
//! - **Recognizing** placeholder tokens such as `[imię]` and contextual
//!   phrases such as `ul. Długa 5`
//! - **Fusing** candidates from several producers into one ordered,
//!   non-overlapping span list
//! - **Rewriting** text with mask, pseudonymize, hash, generalize, redact or
//!   encrypt strategies
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Producers, fusion, strategies and the engine
//! - [`domain`] - Error and result types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use faceless::anonymization::{AnonymizationConfig, AnonymizationEngine, AnonymizationMethod};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnonymizationConfig::builder()
//!         .method(AnonymizationMethod::Pseudonymize)
//!         .build()?;
//!     let engine = AnonymizationEngine::new(config)?;
//!
//!     let result = engine.anonymize("Napisz do jan.kowalski@example.com")?;
//!     println!("{}", result.anonymized);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Faceless uses the [`domain::FacelessError`] type for all library errors.
//! Configuration problems surface when an engine is built, never while
//! processing text:
//!
//! ```rust,no_run
//! use faceless::domain::FacelessError;
//!
//! fn example() -> Result<(), FacelessError> {
//!     let config = faceless::config::load_config("faceless.toml")?;
//!     let _engine = faceless::anonymization::AnonymizationEngine::new(config.anonymization)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Faceless uses structured logging with the `tracing` crate. Detected
//! literals are logged as SHA-256 digests only.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
