//! Fixed-format pattern producer

use super::patterns::{validator_for, PatternRegistry};
use super::SpanProducer;
use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::models::{DetectionMethod, EntityKind, Span};
use crate::domain::{FacelessError, Result};
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Pattern producer
///
/// For every requested kind, runs the registry patterns plus the user's
/// custom pattern for that kind. Matches of kinds with a checksum validator
/// are dropped when validation fails; custom pattern matches are never
/// validated. Every emitted span has confidence 1.0.
pub struct PatternProducer {
    pattern_registry: Arc<PatternRegistry>,
    custom_patterns: BTreeMap<EntityKind, (String, Regex)>,
}

impl PatternProducer {
    /// Create a new pattern producer with the built-in patterns
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new pattern producer with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            custom_patterns: BTreeMap::new(),
        }
    }

    /// Create a producer for a configuration
    ///
    /// Loads the built-in library, merges `pattern_library` when set and
    /// compiles the custom patterns once.
    pub fn from_config(config: &AnonymizationConfig) -> Result<Self> {
        let mut registry = PatternRegistry::default_patterns()?;
        if let Some(ref path) = config.pattern_library {
            registry.merge(PatternRegistry::from_file(path)?);
        }

        let mut producer = Self::with_registry(registry);
        for (kind, pattern) in &config.custom_patterns {
            producer
                .custom_patterns
                .insert(*kind, (pattern.clone(), compile_custom(*kind, pattern)?));
        }
        Ok(producer)
    }

    fn custom_regex<'a>(
        &'a self,
        kind: EntityKind,
        config: &AnonymizationConfig,
    ) -> Result<Option<Cow<'a, Regex>>> {
        let Some(pattern) = config.custom_patterns.get(&kind) else {
            return Ok(None);
        };
        match self.custom_patterns.get(&kind) {
            Some((source, regex)) if source == pattern => Ok(Some(Cow::Borrowed(regex))),
            _ => Ok(Some(Cow::Owned(compile_custom(kind, pattern)?))),
        }
    }
}

fn compile_custom(kind: EntityKind, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        FacelessError::Configuration(format!("Invalid custom pattern for {kind}: {e}"))
    })
}

impl SpanProducer for PatternProducer {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn detect(&self, text: &str, config: &AnonymizationConfig) -> Result<Vec<Span>> {
        let mut spans = Vec::new();

        for &kind in &config.entities {
            let validator = validator_for(kind);

            for pattern in self.pattern_registry.patterns_for_kind(kind) {
                for matched in pattern.regex.find_iter(text) {
                    if let Some(validate) = validator {
                        if !validate(matched.as_str()) {
                            tracing::debug!(
                                kind = %kind,
                                start = matched.start(),
                                "Dropped candidate failing checksum"
                            );
                            continue;
                        }
                    }

                    spans.push(
                        Span::new(
                            matched.as_str(),
                            kind,
                            matched.start(),
                            matched.end(),
                            1.0,
                            DetectionMethod::Regex,
                        )
                        .with_attribute("pattern", pattern.name.as_str()),
                    );
                }
            }

            if let Some(regex) = self.custom_regex(kind, config)? {
                for matched in regex.find_iter(text).filter(|m| !m.is_empty()) {
                    spans.push(
                        Span::new(
                            matched.as_str(),
                            kind,
                            matched.start(),
                            matched.end(),
                            1.0,
                            DetectionMethod::CustomPattern,
                        )
                        .with_attribute("pattern", format!("custom_{}", kind.label())),
                    );
                }
            }
        }

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(kinds: Vec<EntityKind>) -> AnonymizationConfig {
        AnonymizationConfig::builder().entities(kinds).build().unwrap()
    }

    #[test]
    fn test_detect_valid_pesel() {
        let producer = PatternProducer::new().unwrap();
        let config = config_for(vec![EntityKind::NationalId]);
        let spans = producer.detect("PESEL 44051401359.", &config).unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "44051401359");
        assert_eq!(spans[0].start(), 6);
        assert_eq!(spans[0].confidence(), 1.0);
        assert_eq!(spans[0].attribute("pattern"), Some("pesel"));
    }

    #[test]
    fn test_invalid_checksum_dropped() {
        let producer = PatternProducer::new().unwrap();
        let config = config_for(vec![EntityKind::NationalId, EntityKind::CreditCard]);
        let spans = producer
            .detect("44051401358 4532015112830367", &config)
            .unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_only_requested_kinds_scanned() {
        let producer = PatternProducer::new().unwrap();
        let config = config_for(vec![EntityKind::Email]);
        let spans = producer
            .detect("jan@example.com, PESEL 44051401359", &config)
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind(), EntityKind::Email);
    }

    #[test]
    fn test_custom_pattern_bypasses_validation() {
        let config = AnonymizationConfig::builder()
            .entities(vec![EntityKind::NationalId])
            .custom_pattern(EntityKind::NationalId, r"P-[0-9]{4}")
            .build()
            .unwrap();
        let producer = PatternProducer::from_config(&config).unwrap();
        let spans = producer.detect("ref P-1234", &config).unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].source(), DetectionMethod::CustomPattern);
        assert_eq!(spans[0].attribute("pattern"), Some("custom_PESEL"));
    }

    #[test]
    fn test_custom_pattern_compiled_on_demand() {
        let producer = PatternProducer::new().unwrap();
        let config = AnonymizationConfig::builder()
            .entities(vec![EntityKind::Username])
            .custom_pattern(EntityKind::Username, r"@[a-z_]{3,}")
            .build()
            .unwrap();
        let spans = producer.detect("ping @jan_k now", &config).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "@jan_k");
    }

    #[test]
    fn test_nip_with_separators() {
        let producer = PatternProducer::new().unwrap();
        let config = config_for(vec![EntityKind::TaxId]);
        let spans = producer.detect("NIP: 123-456-32-18", &config).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "123-456-32-18");
    }
}
