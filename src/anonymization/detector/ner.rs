//! Named entity recognizer adapter
//!
//! No inference happens in this crate. Callers plug in their own recognizer
//! through [`EntityRecognizer`]; the adapter maps its label vocabulary onto
//! [`EntityKind`] and drops everything else.

use super::SpanProducer;
use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::models::{DetectionMethod, EntityKind, Span};
use crate::domain::Result;

const NER_CONFIDENCE: f32 = 0.85;

/// An entity reported by a recognizer, with byte offsets into the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedEntity {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

impl RecognizedEntity {
    pub fn new(label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }
}

/// Trait for external named entity recognizers
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>>;
}

/// Map a recognizer label to a kind
///
/// Only person, organization and location labels are understood.
pub fn map_label(label: &str) -> Option<EntityKind> {
    match label.trim().to_uppercase().as_str() {
        "PER" | "PERSON" | "PERSNAME" => Some(EntityKind::Person),
        "ORG" | "ORGANIZATION" | "ORGNAME" => Some(EntityKind::Organization),
        "LOC" | "GPE" | "LOCATION" | "PLACENAME" | "GEOGNAME" => Some(EntityKind::Location),
        _ => None,
    }
}

/// Producer wrapping an [`EntityRecognizer`]
pub struct NerProducer<R> {
    recognizer: R,
}

impl<R: EntityRecognizer> NerProducer<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }
}

impl<R: EntityRecognizer> SpanProducer for NerProducer<R> {
    fn name(&self) -> &'static str {
        "ner"
    }

    fn detect(&self, text: &str, config: &AnonymizationConfig) -> Result<Vec<Span>> {
        let entities = self.recognizer.recognize(text)?;

        let spans = entities
            .into_iter()
            .filter_map(|entity| {
                let kind = map_label(&entity.label)?;
                if !config.is_requested(kind) {
                    return None;
                }
                let span = Span::located(
                    text,
                    kind,
                    entity.start,
                    entity.end,
                    NER_CONFIDENCE,
                    DetectionMethod::Ner,
                );
                if span.is_none() {
                    tracing::debug!(
                        label = %entity.label,
                        start = entity.start,
                        end = entity.end,
                        "Dropping recognizer entity with invalid range"
                    );
                }
                span.map(|s| s.with_attribute("label", entity.label))
            })
            .collect();

        Ok(spans)
    }
}
