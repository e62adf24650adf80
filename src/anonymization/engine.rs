//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that ties producers,
//! fusion and the strategy layer together.
//!
//! # Architecture
//!
//! The engine coordinates three components:
//! - **Producers**: Independent detectors emitting candidate spans
//! - **Fusion**: Overlap resolution and filtering into one span list
//! - **Strategy layer**: Position-exact rewrite with the configured method
//!
//! # Examples
//!
//! ```no_run
//! use faceless::anonymization::{AnonymizationEngine, config::AnonymizationConfig};
//!
//! # fn example() -> faceless::domain::Result<()> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//!
//! let result = engine.anonymize("Kontakt: jan.kowalski@example.com, PESEL 44051401359")?;
//! println!("{}", result.anonymized);
//! println!("Detected {} entities", result.total_detections());
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    anonymizer::{Cipher, StrategyLayer},
    config::{AnonymizationConfig, AnonymizationMethod},
    detector::{default_producers, RemoteProducer, SpanProducer},
    fusion,
    models::{AnonymizedText, Span},
    report::{line_and_column, DetectionReport},
};
use crate::domain::{FacelessError, Result};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Main anonymization engine
///
/// # Thread Safety
///
/// The engine can be shared across threads and tasks behind an `Arc`.
/// Producers are read-only; the strategy layer sits behind a mutex, so
/// pseudonyms stay consistent across every text the engine rewrites.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    producers: Vec<Box<dyn SpanProducer>>,
    remote: Option<Arc<dyn RemoteProducer>>,
    strategy: Mutex<StrategyLayer>,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// Builds the pattern producer plus the placeholder and contextual
    /// producers when enabled, and the strategy named by `config.method`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - Configuration validation fails
    /// - The pattern library cannot be loaded
    /// - The encrypt method has no key
    pub fn new(config: AnonymizationConfig) -> Result<Self> {
        config.validate()?;

        let producers = default_producers(&config)?;
        let strategy = StrategyLayer::new(&config)?;

        tracing::debug!(
            producers = producers.len(),
            method = %config.method,
            "Anonymization engine ready"
        );

        Ok(Self {
            config,
            producers,
            remote: None,
            strategy: Mutex::new(strategy),
        })
    }

    /// Add a producer, such as a [`NerProducer`](crate::anonymization::detector::NerProducer)
    pub fn with_producer(mut self, producer: Box<dyn SpanProducer>) -> Self {
        self.producers.push(producer);
        self
    }

    /// Attach a remote producer used by the `*_with_remote` methods
    pub fn with_remote(mut self, remote: Arc<dyn RemoteProducer>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Replace the default cipher of the encrypt method
    pub fn with_cipher(mut self, cipher: Box<dyn Cipher>) -> Result<Self> {
        self.strategy = Mutex::new(StrategyLayer::with_cipher(&self.config, cipher)?);
        Ok(self)
    }

    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }

    pub fn method(&self) -> AnonymizationMethod {
        self.config.method
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Detect personal data without rewriting
    pub fn detect(&self, text: &str) -> Vec<Span> {
        let spans = fusion::detect_and_fuse(text, &self.config, &self.producers);
        self.log_detections(text, &spans);
        spans
    }

    /// Detect, also consulting the remote producer when attached
    pub async fn detect_with_remote(&self, text: &str) -> Vec<Span> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut candidates = fusion::collect_candidates(text, &self.config, &self.producers);
        if let Some(ref remote) = self.remote {
            candidates.extend(remote.detect(text, &self.config).await);
        }

        let spans = fusion::fuse(candidates, &self.config);
        self.log_detections(text, &spans);
        spans
    }

    /// Detect and rewrite a text
    pub fn anonymize(&self, text: &str) -> Result<AnonymizedText> {
        let start = Instant::now();
        let spans = self.detect(text);
        self.finish(text, spans, start)
    }

    /// Detect (with the remote producer) and rewrite a text
    pub async fn anonymize_with_remote(&self, text: &str) -> Result<AnonymizedText> {
        let start = Instant::now();
        let spans = self.detect_with_remote(text).await;
        self.finish(text, spans, start)
    }

    /// Detect and rewrite, returning only the rewritten text
    pub fn anonymize_text(&self, text: &str) -> Result<String> {
        Ok(self.anonymize(text)?.anonymized)
    }

    /// Anonymize several texts with one shared strategy state
    ///
    /// The same literal receives the same pseudonym in every text. The first
    /// failing text aborts the batch, so results always line up with inputs.
    pub fn anonymize_batch<I, S>(&self, texts: I) -> Result<Vec<AnonymizedText>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let results = texts
            .into_iter()
            .map(|text| self.anonymize(text.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(texts = results.len(), "Batch anonymized");
        Ok(results)
    }

    /// Build a detection report over several texts
    pub fn generate_report<I, S>(&self, texts: I) -> DetectionReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = DetectionReport::new(&self.config);
        for text in texts {
            let text = text.as_ref();
            report.add_text(text, &self.detect(text));
        }
        report
    }

    fn finish(&self, text: &str, spans: Vec<Span>, start: Instant) -> Result<AnonymizedText> {
        let anonymized = {
            let mut strategy = self
                .strategy
                .lock()
                .map_err(|_| FacelessError::Strategy("strategy state poisoned".to_string()))?;
            strategy.apply(text, &spans)?
        };

        let processing_time = start.elapsed().as_millis() as u64;
        tracing::info!(
            entities = spans.len(),
            method = %self.config.method,
            processing_time_ms = processing_time,
            "Text anonymized"
        );

        Ok(AnonymizedText::new(
            anonymized,
            spans,
            self.config.method,
            processing_time,
        ))
    }

    fn log_detections(&self, text: &str, spans: &[Span]) {
        if !self.config.verbose {
            return;
        }
        for span in spans {
            let (line, column) = line_and_column(text, span.start());
            crate::log_entity_detected!(span, line, column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{DetectionMethod, EntityKind};
    use async_trait::async_trait;

    #[test]
    fn test_engine_creation() {
        let engine = AnonymizationEngine::new(AnonymizationConfig::default());
        assert!(engine.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnonymizationConfig {
            min_confidence: 2.0,
            ..AnonymizationConfig::default()
        };
        assert!(matches!(
            AnonymizationEngine::new(config),
            Err(FacelessError::Configuration(_))
        ));
    }

    #[test]
    fn test_anonymize_mask() {
        let engine = AnonymizationEngine::new(AnonymizationConfig::default()).unwrap();
        let result = engine.anonymize("Email: jan@example.com").unwrap();

        assert_eq!(result.anonymized, "Email: ***@*******.***");
        assert_eq!(result.total_detections(), 1);
        assert_eq!(result.stats_by_kind.get(&EntityKind::Email), Some(&1));
    }

    #[test]
    fn test_empty_text() {
        let engine = AnonymizationEngine::new(AnonymizationConfig::default()).unwrap();
        let result = engine.anonymize("").unwrap();
        assert_eq!(result.anonymized, "");
        assert!(!result.has_detections());
    }

    #[test]
    fn test_batch_shares_pseudonyms() {
        let config = AnonymizationConfig::builder()
            .method(AnonymizationMethod::Pseudonymize)
            .build()
            .unwrap();
        let engine = AnonymizationEngine::new(config).unwrap();

        let results = engine
            .anonymize_batch(["Pisz na jan@example.com", "Kopia: anna@example.com, jan@example.com"])
            .unwrap();

        assert_eq!(results[0].anonymized, "Pisz na [EMAIL_1]");
        assert_eq!(results[1].anonymized, "Kopia: [EMAIL_2], [EMAIL_1]");
    }

    struct StaticRemote;

    #[async_trait]
    impl RemoteProducer for StaticRemote {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn detect(&self, text: &str, _config: &AnonymizationConfig) -> Vec<Span> {
            text.find("Kowalski")
                .and_then(|start| {
                    Span::located(text, EntityKind::Person, start, start + 8, 0.9, DetectionMethod::Llm)
                })
                .into_iter()
                .collect()
        }
    }

    #[tokio::test]
    async fn test_anonymize_with_remote() {
        let config = AnonymizationConfig::builder()
            .method(AnonymizationMethod::Redact)
            .build()
            .unwrap();
        let engine = AnonymizationEngine::new(config)
            .unwrap()
            .with_remote(Arc::new(StaticRemote));

        let result = engine.anonymize_with_remote("Kowalski, jan@example.com").await.unwrap();
        assert_eq!(result.anonymized, "[REDACTED], [REDACTED]");

        // without the remote call only the email is found
        let result = engine.anonymize("Kowalski, jan@example.com").unwrap();
        assert_eq!(result.anonymized, "Kowalski, [REDACTED]");
    }

    #[test]
    fn test_generate_report() {
        let engine = AnonymizationEngine::new(AnonymizationConfig::default()).unwrap();
        let report = engine.generate_report(["jan@example.com", "brak danych"]);
        assert_eq!(report.total_texts, 2);
        assert_eq!(report.total_entities, 1);
    }
}
