//! Keyword-anchored producer for Polish text
//!
//! Each rule looks for a keyword that announces personal data (a street
//! type, an identifier label, an honorific) and emits the text it introduces.
//! The keyword is the evidence here, so identifiers found this way skip the
//! checksum and carry a lower confidence than pattern matches.

use super::SpanProducer;
use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::models::{DetectionMethod, EntityKind, Span};
use crate::domain::Result;
use regex::Regex;

const CONTEXT_CONFIDENCE: f32 = 0.8;

/// Language the rules are written for
const LANGUAGE: &str = "pl";

const UPPER: &str = "A-ZĄĆĘŁŃÓŚŹŻ";
const LOWER: &str = "a-ząćęłńóśźż";

struct ContextRule {
    name: &'static str,
    kind: EntityKind,
    regex: Regex,
    /// Capture group holding the emitted text (0 = whole match)
    group: usize,
}

/// Contextual producer
pub struct ContextualProducer {
    rules: Vec<ContextRule>,
}

impl ContextualProducer {
    pub fn new() -> Result<Self> {
        let capitalized = format!("[{UPPER}][{LOWER}]+");

        let rules = vec![
            ContextRule {
                name: "street_address",
                kind: EntityKind::Address,
                regex: Regex::new(&format!(
                    r"(?i)(?:ul\.|ulica|os\.|osiedle|al\.|aleja)\s+{capitalized}(?:\s+[0-9]+(?:/[0-9]+)?)?"
                ))?,
                group: 0,
            },
            ContextRule {
                name: "pesel_keyword",
                kind: EntityKind::NationalId,
                regex: Regex::new(r"(?i)\b(?:nr\s+|numer\s+)?pesel\s*:?\s*([0-9]{11})\b")?,
                group: 1,
            },
            ContextRule {
                name: "nip_keyword",
                kind: EntityKind::TaxId,
                regex: Regex::new(
                    r"(?i)\b(?:nr\s+|numer\s+)?nip\s*:?\s*([0-9]{3}[-\s]?[0-9]{3}[-\s]?[0-9]{2}[-\s]?[0-9]{2})\b",
                )?,
                group: 1,
            },
            ContextRule {
                name: "honorific",
                kind: EntityKind::Person,
                regex: Regex::new(&format!(
                    r"\b(?i:pan|pani|dr|prof|mgr|inż)\.?\s+({capitalized}(?:\s+{capitalized})?)"
                ))?,
                group: 1,
            },
        ];

        Ok(Self { rules })
    }
}

impl SpanProducer for ContextualProducer {
    fn name(&self) -> &'static str {
        "contextual"
    }

    fn detect(&self, text: &str, config: &AnonymizationConfig) -> Result<Vec<Span>> {
        if !config.language.eq_ignore_ascii_case(LANGUAGE) {
            return Ok(Vec::new());
        }

        let mut spans = Vec::new();

        for rule in &self.rules {
            if !config.is_requested(rule.kind) {
                continue;
            }

            for captures in rule.regex.captures_iter(text) {
                let Some(matched) = captures.get(rule.group) else {
                    continue;
                };
                spans.push(
                    Span::new(
                        matched.as_str(),
                        rule.kind,
                        matched.start(),
                        matched.end(),
                        CONTEXT_CONFIDENCE,
                        DetectionMethod::Contextual,
                    )
                    .with_attribute("rule", rule.name),
                );
            }
        }

        Ok(spans)
    }
}
