//! Detection reporting
//!
//! Collects the fused spans of one or more texts into a report that can be
//! printed to the console or serialized to JSON for an external renderer.

use crate::anonymization::config::{AnonymizationConfig, AnonymizationMethod};
use crate::anonymization::models::{EntityKind, Span};
use crate::domain::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum characters of a literal shown in console output
const CONSOLE_TEXT_LIMIT: usize = 40;

/// Maximum entries listed in console output
const CONSOLE_ENTRY_LIMIT: usize = 50;

/// Detection report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Texts analyzed
    pub total_texts: usize,

    /// Fused entities across all texts
    pub total_entities: usize,

    /// Entity counts by kind
    pub entities_by_kind: BTreeMap<EntityKind, usize>,

    /// Entity counts by producer
    pub entities_by_source: BTreeMap<String, usize>,

    /// Every fused entity
    pub entities: Vec<ReportEntry>,

    /// Warnings raised while building the report
    pub warnings: Vec<String>,

    /// Settings the report was produced with
    pub summary: ReportSummary,

    pub generated_at: DateTime<Utc>,
}

/// One detected entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Index of the text within the report
    pub text_index: usize,
    pub text: String,
    pub kind: EntityKind,
    pub start: usize,
    pub end: usize,
    /// 1-based line of `start`
    pub line: usize,
    /// 1-based column of `start`, in characters
    pub column: usize,
    pub confidence: f32,
    pub source: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// Configuration summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub method: AnonymizationMethod,
    pub language: String,
    pub min_confidence: f32,
    pub requested_entities: Vec<EntityKind>,
}

/// 1-based line and character column of a byte offset
pub fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

impl DetectionReport {
    /// Create an empty report for a configuration
    pub fn new(config: &AnonymizationConfig) -> Self {
        Self {
            total_texts: 0,
            total_entities: 0,
            entities_by_kind: BTreeMap::new(),
            entities_by_source: BTreeMap::new(),
            entities: Vec::new(),
            warnings: Vec::new(),
            summary: ReportSummary {
                method: config.method,
                language: config.language.clone(),
                min_confidence: config.min_confidence,
                requested_entities: config.entities.clone(),
            },
            generated_at: Utc::now(),
        }
    }

    /// Add the fused spans of one text
    pub fn add_text(&mut self, text: &str, spans: &[Span]) {
        let text_index = self.total_texts;
        self.total_texts += 1;
        self.total_entities += spans.len();

        for span in spans {
            *self.entities_by_kind.entry(span.kind()).or_insert(0) += 1;
            *self
                .entities_by_source
                .entry(span.source().as_str().to_string())
                .or_insert(0) += 1;

            let (line, column) = line_and_column(text, span.start());
            self.entities.push(ReportEntry {
                text_index,
                text: span.text().to_string(),
                kind: span.kind(),
                start: span.start(),
                end: span.end(),
                line,
                column,
                confidence: span.confidence(),
                source: span.source().as_str().to_string(),
                attributes: span.attributes().clone(),
            });
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    PERSONAL DATA REPORT                       \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Texts Analyzed:          {}\n", self.total_texts));
        output.push_str(&format!("  Entities Detected:       {}\n", self.total_entities));
        output.push_str(&format!("  Method:                  {}\n", self.summary.method));
        output.push_str(&format!("  Language:                {}\n", self.summary.language));
        output.push_str(&format!(
            "  Minimum Confidence:      {:.2}\n",
            self.summary.min_confidence
        ));
        output.push('\n');

        if !self.entities_by_kind.is_empty() {
            output.push_str("ENTITIES BY KIND\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut kinds: Vec<_> = self.entities_by_kind.iter().collect();
            kinds.sort_by(|a, b| b.1.cmp(a.1));

            for (kind, count) in kinds {
                output.push_str(&format!("  {:30} {:>5}\n", kind.label(), count));
            }
            output.push('\n');
        }

        if !self.entities.is_empty() {
            output.push_str("ENTITIES\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            for entry in self.entities.iter().take(CONSOLE_ENTRY_LIMIT) {
                output.push_str(&format!(
                    "  [{}:{}:{}] {:<15} {:>5.2} {:<14} \"{}\"\n",
                    entry.text_index + 1,
                    entry.line,
                    entry.column,
                    entry.kind.label(),
                    entry.confidence,
                    entry.source,
                    truncate(&entry.text, CONSOLE_TEXT_LIMIT)
                ));
            }
            if self.entities.len() > CONSOLE_ENTRY_LIMIT {
                output.push_str(&format!(
                    "  ... and {} more\n",
                    self.entities.len() - CONSOLE_ENTRY_LIMIT
                ));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to a file
    pub fn write_to_file(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, self.format_json()?)?;
        Ok(())
    }
}

fn truncate(value: &str, limit: usize) -> String {
    if value.chars().count() > limit {
        let kept: String = value.chars().take(limit - 3).collect();
        format!("{kept}...")
    } else {
        value.to_string()
    }
}
