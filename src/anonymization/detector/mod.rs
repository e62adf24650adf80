//! Span candidate producers
//!
//! Every producer scans an immutable text and returns candidate spans. Producers
//! hold only compiled, read-only state, so they can be shared across threads
//! and invoked in any order; fusion sorts their combined output.

pub mod contextual;
pub mod llm;
pub mod ner;
pub mod patterns;
pub mod placeholder;
pub mod regex;

use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::models::Span;
use crate::domain::Result;

pub use contextual::ContextualProducer;
pub use llm::{LlmProducer, RemoteProducer};
pub use ner::{EntityRecognizer, NerProducer, RecognizedEntity};
pub use placeholder::PlaceholderProducer;
pub use regex::PatternProducer;

/// Trait for synchronous span producers
pub trait SpanProducer: Send + Sync {
    /// Short producer name used in logs
    fn name(&self) -> &'static str;

    /// Detect candidate spans in `text`
    fn detect(&self, text: &str, config: &AnonymizationConfig) -> Result<Vec<Span>>;
}

/// Build the built-in producer list for a configuration
///
/// The pattern producer is always present. The placeholder and contextual
/// producers follow `detect_placeholders` and `detect_context`.
pub fn default_producers(config: &AnonymizationConfig) -> Result<Vec<Box<dyn SpanProducer>>> {
    let mut producers: Vec<Box<dyn SpanProducer>> = vec![Box::new(PatternProducer::from_config(config)?)];

    if config.detect_placeholders {
        producers.push(Box::new(PlaceholderProducer::new()?));
    }

    if config.detect_context {
        producers.push(Box::new(ContextualProducer::new()?));
    }

    Ok(producers)
}
