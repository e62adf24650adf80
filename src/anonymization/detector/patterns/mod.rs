//! Pattern library for structured identifiers
//!
//! The built-in library lives in `patterns/pii_patterns.toml`; a user library
//! in the same format is appended after it. Each `[patterns.<name>]` table
//! names an entity label and one or more regexes.

pub mod validators;

use crate::anonymization::models::EntityKind;
use crate::domain::{FacelessError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub use validators::{
    validate_luhn, validate_nip, validate_pesel, validate_regon, validator_for, Validator,
};

const BUILTIN_LIBRARY: &str = include_str!("../../../../patterns/pii_patterns.toml");

#[derive(Debug, Deserialize)]
struct LibraryFile {
    patterns: BTreeMap<String, LibraryEntry>,
}

#[derive(Debug, Deserialize)]
struct LibraryEntry {
    kind: String,
    patterns: Vec<String>,
}

/// One compiled regex of a library entry
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: String,
    pub regex: Regex,
    pub kind: EntityKind,
}

/// Compiled patterns grouped by entity kind, in library order
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    by_kind: HashMap<EntityKind, Vec<CompiledPattern>>,
}

impl PatternRegistry {
    /// The built-in library
    pub fn default_patterns() -> Result<Self> {
        Self::from_toml(BUILTIN_LIBRARY)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FacelessError::Pattern(format!("Cannot read pattern library {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Compile a library; an unknown label or bad regex fails the whole load
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: LibraryFile = toml::from_str(content)
            .map_err(|e| FacelessError::Pattern(format!("Malformed pattern library: {e}")))?;

        let mut registry = Self::default();
        for (name, entry) in library.patterns {
            let kind: EntityKind = entry
                .kind
                .parse()
                .map_err(|e| FacelessError::Pattern(format!("Pattern '{name}': {e}")))?;

            let compiled = entry
                .patterns
                .iter()
                .map(|source| {
                    Regex::new(source).map_err(|e| {
                        FacelessError::Pattern(format!("Pattern '{name}' ({source}): {e}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            registry.by_kind.entry(kind).or_default().extend(
                compiled.into_iter().map(|regex| CompiledPattern {
                    name: name.clone(),
                    regex,
                    kind,
                }),
            );
        }

        Ok(registry)
    }

    /// Append `other` after this registry's patterns
    pub fn merge(&mut self, other: PatternRegistry) {
        for (kind, patterns) in other.by_kind {
            self.by_kind.entry(kind).or_default().extend(patterns);
        }
    }

    pub fn patterns_for_kind(&self, kind: EntityKind) -> &[CompiledPattern] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
