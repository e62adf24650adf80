//! Redaction and generalization strategies

use super::Anonymizer;
use crate::anonymization::models::Span;
use crate::domain::Result;

/// Sentinel written in place of every redacted span
pub const REDACTED: &str = "[REDACTED]";

/// Token for kinds without a category of their own
pub const PERSONAL_DATA: &str = "[PERSONAL DATA]";

/// Redaction strategy - replaces every span with the same sentinel
pub struct RedactionStrategy;

impl RedactionStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RedactionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Anonymizer for RedactionStrategy {
    fn anonymize(&mut self, _span: &Span) -> Result<String> {
        Ok(REDACTED.to_string())
    }
}

/// Generalization strategy - replaces a span with its category token
pub struct GeneralizationStrategy;

impl GeneralizationStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GeneralizationStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Anonymizer for GeneralizationStrategy {
    fn anonymize(&mut self, span: &Span) -> Result<String> {
        Ok(span
            .kind()
            .category_token()
            .unwrap_or(PERSONAL_DATA)
            .to_string())
    }
}
