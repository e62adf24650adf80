//! Personal data detection and anonymization
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Detection**: Independent span producers (patterns, placeholders,
//!   contextual keywords, optional NER and LLM)
//! - **Fusion**: Greedy overlap resolution plus confidence, kind and
//!   exclusion filters
//! - **Anonymization**: Position-exact rewrite with one of six strategies
//! - **Reporting**: Per-entity detection reports for console or JSON
//!
//! # Usage
//!
//! ```no_run
//! use faceless::anonymization::{AnonymizationEngine, config::AnonymizationConfig};
//!
//! # fn example() -> faceless::domain::Result<()> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! let anonymized = engine.anonymize_text("PESEL: 44051401359")?;
//! assert_eq!(anonymized, "PESEL: ***********");
//! # Ok(())
//! # }
//! ```

pub mod anonymizer;
pub mod config;
pub mod detector;
pub mod engine;
pub mod fusion;
pub mod models;
pub mod report;

// Re-export main types
pub use anonymizer::{rewrite, rewrite_with_state, PseudonymState, StrategyLayer};
pub use config::{AnonymizationConfig, AnonymizationMethod, HashAlgorithm};
pub use detector::{RemoteProducer, SpanProducer};
pub use engine::AnonymizationEngine;
pub use fusion::{detect_and_fuse, fuse};
pub use models::{AnonymizedText, DetectionMethod, EntityKind, Span};
pub use report::DetectionReport;
