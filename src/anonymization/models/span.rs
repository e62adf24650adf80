//! Detected span and anonymization result models

use super::EntityKind;
use crate::anonymization::config::AnonymizationMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Producer that emitted a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Built-in fixed-format pattern
    Regex,
    /// User-supplied pattern from configuration
    CustomPattern,
    /// Bracketed template placeholder such as `[name]`
    Placeholder,
    /// Keyword-anchored contextual rule
    Contextual,
    /// Named entity recognizer
    Ner,
    /// Remote language model
    Llm,
}

impl DetectionMethod {
    /// Get the serialized name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::CustomPattern => "custom_pattern",
            Self::Placeholder => "placeholder",
            Self::Contextual => "contextual",
            Self::Ner => "ner",
            Self::Llm => "llm",
        }
    }
}

/// A located occurrence of personal data in a source text
///
/// Offsets are byte offsets into the UTF-8 source and always fall on char
/// boundaries; `end` is exclusive. Spans are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    text: String,
    kind: EntityKind,
    start: usize,
    end: usize,
    confidence: f32,
    source: DetectionMethod,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
}

impl Span {
    /// Create a new span from already-sliced text
    ///
    /// Confidence is clamped to `[0, 1]`.
    pub fn new(
        text: impl Into<String>,
        kind: EntityKind,
        start: usize,
        end: usize,
        confidence: f32,
        source: DetectionMethod,
    ) -> Self {
        Self {
            text: text.into(),
            kind,
            start,
            end,
            confidence: clamp_confidence(confidence),
            source,
            attributes: BTreeMap::new(),
        }
    }

    /// Create a span by slicing `source_text`
    ///
    /// Returns `None` when the range is empty, out of bounds or not on char
    /// boundaries.
    pub fn located(
        source_text: &str,
        kind: EntityKind,
        start: usize,
        end: usize,
        confidence: f32,
        source: DetectionMethod,
    ) -> Option<Self> {
        if start >= end {
            return None;
        }
        let text = source_text.get(start..end)?;
        Some(Self::new(text, kind, start, end, confidence, source))
    }

    /// Return the span with an extra attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn source(&self) -> DetectionMethod {
        self.source
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Length of the span in bytes; zero for an inverted range
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check whether two spans share at least one byte
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Anonymized text result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizedText {
    /// Rewritten text
    pub anonymized: String,
    /// Fused spans that were rewritten
    pub detections: Vec<Span>,
    /// Strategy applied
    pub method: AnonymizationMethod,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of anonymization
    pub timestamp: DateTime<Utc>,
    /// Statistics by entity kind
    pub stats_by_kind: BTreeMap<EntityKind, usize>,
}

impl AnonymizedText {
    /// Create a new anonymized text result
    pub fn new(
        anonymized: String,
        detections: Vec<Span>,
        method: AnonymizationMethod,
        processing_time_ms: u64,
    ) -> Self {
        let mut stats_by_kind = BTreeMap::new();
        for detection in &detections {
            *stats_by_kind.entry(detection.kind()).or_insert(0) += 1;
        }

        Self {
            anonymized,
            detections,
            method,
            processing_time_ms,
            timestamp: Utc::now(),
            stats_by_kind,
        }
    }

    /// Get total number of detections
    pub fn total_detections(&self) -> usize {
        self.detections.len()
    }

    /// Check if any personal data was detected
    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }
}
