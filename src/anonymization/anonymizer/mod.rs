//! Anonymization strategy module
//!
//! Provides the six replacement strategies and the layer that splices their
//! output into the source text.
//!
//! Replacements are computed in ascending span order, so pseudonym counters
//! follow document order, and spliced in descending start order, so earlier
//! offsets stay valid while later spans are rewritten.

pub mod encryption;
pub mod hash;
pub mod mask;
pub mod pseudonym;
pub mod redaction;

use crate::anonymization::config::{AnonymizationConfig, AnonymizationMethod};
use crate::anonymization::models::Span;
use crate::domain::{FacelessError, Result};
use secrecy::ExposeSecret;

pub use encryption::{AesGcmCipher, Cipher, EncryptionStrategy};
pub use hash::HashStrategy;
pub use mask::MaskStrategy;
pub use pseudonym::{PseudonymState, PseudonymStrategy};
pub use redaction::{GeneralizationStrategy, RedactionStrategy};

/// Trait for anonymization strategy implementations
pub trait Anonymizer: Send + Sync {
    /// Replacement text for one span
    fn anonymize(&mut self, span: &Span) -> Result<String>;
}

/// Applies one configured strategy to span lists
///
/// Holds the strategy state for its lifetime, so pseudonyms stay consistent
/// across every text rewritten through the same layer.
pub struct StrategyLayer {
    method: AnonymizationMethod,
    anonymizer: Box<dyn Anonymizer>,
}

impl StrategyLayer {
    /// Build the strategy named by `config.method`
    pub fn new(config: &AnonymizationConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Build the layer with a caller-supplied cipher for the encrypt method
    pub fn with_cipher(config: &AnonymizationConfig, cipher: Box<dyn Cipher>) -> Result<Self> {
        Self::build(config, Some(cipher))
    }

    fn build(config: &AnonymizationConfig, cipher: Option<Box<dyn Cipher>>) -> Result<Self> {
        config.validate()?;

        let anonymizer: Box<dyn Anonymizer> = match config.method {
            AnonymizationMethod::Mask => Box::new(MaskStrategy::new(
                config.mask_char,
                config.preserve_length,
                config.preserve_structure,
            )),
            AnonymizationMethod::Pseudonymize => {
                Box::new(PseudonymStrategy::new(config.pseudonym_prefix.clone()))
            }
            AnonymizationMethod::Hash => Box::new(HashStrategy::new(
                config.hash_algorithm,
                config.hash_salt.clone(),
            )),
            AnonymizationMethod::Generalize => Box::new(GeneralizationStrategy::new()),
            AnonymizationMethod::Redact => Box::new(RedactionStrategy::new()),
            AnonymizationMethod::Encrypt => {
                let cipher = match cipher {
                    Some(cipher) => cipher,
                    None => {
                        let key = config.encryption_key.as_ref().ok_or_else(|| {
                            FacelessError::Configuration(
                                "encryption_key is required when method = encrypt".to_string(),
                            )
                        })?;
                        Box::new(AesGcmCipher::new(key.expose_secret().as_str())?)
                    }
                };
                Box::new(EncryptionStrategy::new(cipher))
            }
        };

        if config.method == AnonymizationMethod::Encrypt && config.seed.is_some() {
            tracing::warn!("seed is ignored by the encrypt method; nonces are always random");
        }

        tracing::debug!(method = %config.method, "Strategy layer ready");

        Ok(Self {
            method: config.method,
            anonymizer,
        })
    }

    pub fn method(&self) -> AnonymizationMethod {
        self.method
    }

    /// Rewrite `text`, replacing every span
    pub fn apply(&mut self, text: &str, spans: &[Span]) -> Result<String> {
        splice(text, spans, self.anonymizer.as_mut())
    }
}

/// Rewrite `text` with a fresh strategy state
pub fn rewrite(text: &str, spans: &[Span], config: &AnonymizationConfig) -> Result<String> {
    StrategyLayer::new(config)?.apply(text, spans)
}

/// Rewrite `text`, continuing from a caller-owned pseudonym state
///
/// The state is only read and updated for the pseudonymize method.
pub fn rewrite_with_state(
    text: &str,
    spans: &[Span],
    config: &AnonymizationConfig,
    state: &mut PseudonymState,
) -> Result<String> {
    if config.method != AnonymizationMethod::Pseudonymize {
        return rewrite(text, spans, config);
    }
    config.validate()?;

    let mut strategy =
        PseudonymStrategy::with_state(std::mem::take(state), config.pseudonym_prefix.clone());
    let result = splice(text, spans, &mut strategy);
    *state = strategy.into_state();
    result
}

/// Position-exact substitution
///
/// Spans that are empty, out of bounds or off char boundaries are skipped.
/// Walking from the last span backwards, a span reaching into one that was
/// already kept is skipped as well.
fn splice(text: &str, spans: &[Span], anonymizer: &mut dyn Anonymizer) -> Result<String> {
    if spans.is_empty() {
        return Ok(text.to_string());
    }

    let mut ordered: Vec<&Span> = spans
        .iter()
        .filter(|span| {
            let valid = span.start() < span.end()
                && span.end() <= text.len()
                && text.is_char_boundary(span.start())
                && text.is_char_boundary(span.end());
            if !valid {
                tracing::warn!(
                    start = span.start(),
                    end = span.end(),
                    text_len = text.len(),
                    "Skipping span with invalid range"
                );
            }
            valid
        })
        .collect();
    ordered.sort_by_key(|span| (span.start(), span.end()));

    let mut kept: Vec<&Span> = Vec::with_capacity(ordered.len());
    let mut floor = usize::MAX;
    for span in ordered.into_iter().rev() {
        if span.end() > floor {
            tracing::warn!(
                start = span.start(),
                end = span.end(),
                "Skipping span overlapping a rewritten span"
            );
            continue;
        }
        floor = span.start();
        kept.push(span);
    }
    kept.reverse();

    let mut replacements = Vec::with_capacity(kept.len());
    for span in kept {
        replacements.push((span.start(), span.end(), anonymizer.anonymize(span)?));
    }

    let mut result = text.to_string();
    for (start, end, replacement) in replacements.into_iter().rev() {
        result.replace_range(start..end, &replacement);
    }

    Ok(result)
}
