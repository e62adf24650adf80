//! Pseudonymization strategy

use super::Anonymizer;
use crate::anonymization::models::{EntityKind, Span};
use crate::domain::Result;
use std::collections::HashMap;

/// Literal to pseudonym map plus per-kind counters
///
/// The same literal always receives the same pseudonym within one state.
/// Counters start at 1 and grow in the order literals are first seen.
#[derive(Debug, Clone, Default)]
pub struct PseudonymState {
    pseudonyms: HashMap<String, String>,
    counters: HashMap<EntityKind, usize>,
}

impl PseudonymState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the pseudonym for a literal, assigning the next one if unseen
    pub fn pseudonym_for(&mut self, literal: &str, kind: EntityKind, prefix: Option<&str>) -> String {
        if let Some(existing) = self.pseudonyms.get(literal) {
            return existing.clone();
        }

        let counter = self.counters.entry(kind).or_insert(0);
        *counter += 1;

        let pseudonym = match prefix {
            Some(prefix) => format!("[{}_{}_{}]", prefix, kind.label(), counter),
            None => format!("[{}_{}]", kind.label(), counter),
        };
        self.pseudonyms.insert(literal.to_string(), pseudonym.clone());
        pseudonym
    }

    /// Look up an already assigned pseudonym
    pub fn get(&self, literal: &str) -> Option<&str> {
        self.pseudonyms.get(literal).map(String::as_str)
    }

    /// Number of distinct literals seen
    pub fn len(&self) -> usize {
        self.pseudonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pseudonyms.is_empty()
    }

    /// Forget every assignment and reset the counters
    pub fn clear(&mut self) {
        self.pseudonyms.clear();
        self.counters.clear();
    }
}

/// Pseudonymization strategy - replaces literals with `[KIND_n]` labels
pub struct PseudonymStrategy {
    state: PseudonymState,
    prefix: Option<String>,
}

impl PseudonymStrategy {
    pub fn new(prefix: Option<String>) -> Self {
        Self::with_state(PseudonymState::new(), prefix)
    }

    /// Continue from an existing state
    pub fn with_state(state: PseudonymState, prefix: Option<String>) -> Self {
        Self {
            state,
            prefix: prefix.filter(|p| !p.is_empty()),
        }
    }

    pub fn state(&self) -> &PseudonymState {
        &self.state
    }

    /// Give the state back to the caller
    pub fn into_state(self) -> PseudonymState {
        self.state
    }
}

impl Default for PseudonymStrategy {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Anonymizer for PseudonymStrategy {
    fn anonymize(&mut self, span: &Span) -> Result<String> {
        Ok(self
            .state
            .pseudonym_for(span.text(), span.kind(), self.prefix.as_deref()))
    }
}
