//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod anonymize;
pub mod detect;
pub mod validate;

use crate::anonymization::config::parse_entities;
use crate::anonymization::detector::LlmProducer;
use crate::anonymization::report::DetectionReport;
use crate::anonymization::{AnonymizationEngine, DetectionMethod, Span};
use crate::config::FacelessConfig;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Read the text to process from `--text`, `--input` or stdin
pub(crate) async fn read_input(text: Option<&str>, input: Option<&Path>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }

    if let Some(path) = input {
        tracing::debug!(path = %path.display(), "Reading input file");
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input file {}", path.display()));
    }

    let mut buffer = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buffer)
        .await
        .context("Failed to read stdin")?;
    Ok(buffer)
}

/// Apply the shared `--entities` and `--llm` overrides
pub(crate) fn apply_overrides(
    config: &mut FacelessConfig,
    entities: Option<&str>,
    llm: bool,
) -> crate::domain::Result<()> {
    if let Some(list) = entities {
        tracing::info!(entities = %list, "Overriding entities from CLI");
        config.anonymization.entities = parse_entities(list)?;
    }

    if llm {
        tracing::info!("Enabling LLM producer from CLI");
        config.llm.enabled = true;
    }

    config.llm.validate().map_err(crate::domain::FacelessError::Configuration)?;
    config.anonymization.validate()
}

/// Build the engine, attaching the LLM producer when enabled
pub(crate) fn build_engine(config: &FacelessConfig) -> crate::domain::Result<AnonymizationEngine> {
    let engine = AnonymizationEngine::new(config.anonymization.clone())?;

    if config.llm.enabled {
        let producer = LlmProducer::new(config.llm.clone())?;
        return Ok(engine.with_remote(Arc::new(producer)));
    }

    Ok(engine)
}

/// Report for one processed text
///
/// Remote failures are swallowed by the engine, so a run that keeps no
/// language-model entity is flagged in the report.
pub(crate) fn build_report(engine: &AnonymizationEngine, text: &str, spans: &[Span]) -> DetectionReport {
    let mut report = DetectionReport::new(engine.config());
    report.add_text(text, spans);

    if engine.has_remote() && !spans.iter().any(|span| span.source() == DetectionMethod::Llm) {
        report.add_warning(
            "No language model entity was kept; check the llm endpoint if this is unexpected",
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::EntityKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_read_input_prefers_text() {
        let result = read_input(Some("Jan"), Some(Path::new("missing.txt"))).await.unwrap();
        assert_eq!(result, "Jan");
    }

    #[tokio::test]
    async fn test_read_input_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("PESEL 44051401359".as_bytes()).unwrap();
        file.flush().unwrap();

        let result = read_input(None, Some(file.path())).await.unwrap();
        assert_eq!(result, "PESEL 44051401359");
    }

    #[tokio::test]
    async fn test_read_input_missing_file() {
        assert!(read_input(None, Some(Path::new("/nonexistent/notes.txt"))).await.is_err());
    }

    #[test]
    fn test_apply_overrides_entities() {
        let mut config = FacelessConfig::default();
        apply_overrides(&mut config, Some("PESEL, email"), false).unwrap();
        assert_eq!(
            config.anonymization.entities,
            vec![EntityKind::NationalId, EntityKind::Email]
        );
        assert!(!config.llm.enabled);
    }

    #[test]
    fn test_apply_overrides_rejects_unknown_entity() {
        let mut config = FacelessConfig::default();
        assert!(apply_overrides(&mut config, Some("SHOE_SIZE"), false).is_err());
    }

    #[test]
    fn test_report_without_remote_has_no_warning() {
        let engine = build_engine(&FacelessConfig::default()).unwrap();
        let text = "PESEL 44051401359";
        let report = build_report(&engine, text, &engine.detect(text));
        assert_eq!(report.total_entities, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_report_flags_silent_remote() {
        let mut config = FacelessConfig::default();
        config.llm.base_url = "http://127.0.0.1:9".to_string();
        apply_overrides(&mut config, None, true).unwrap();
        let engine = build_engine(&config).unwrap();

        let text = "PESEL 44051401359";
        let report = build_report(&engine, text, &engine.detect(text));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_build_engine_with_llm() {
        let mut config = FacelessConfig::default();
        apply_overrides(&mut config, None, true).unwrap();
        let engine = build_engine(&config).unwrap();
        assert!(engine.has_remote());
    }
}
