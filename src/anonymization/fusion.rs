//! Span fusion
//!
//! Merges the candidates of every producer into one ascending, non-overlapping
//! span list. Overlaps are resolved by a single greedy sweep over candidates
//! sorted by start, then by descending confidence. A later candidate replaces
//! the last accepted span only when its confidence is strictly greater, so
//! ties keep the span that was accepted first. Filters for confidence,
//! requested kinds and exclusions run after the sweep.

use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::detector::SpanProducer;
use crate::anonymization::models::Span;

/// Run every producer over `text` and concatenate their candidates
///
/// A producer that fails is logged and contributes nothing.
pub fn collect_candidates(
    text: &str,
    config: &AnonymizationConfig,
    producers: &[Box<dyn SpanProducer>],
) -> Vec<Span> {
    let mut candidates = Vec::new();

    for producer in producers {
        match producer.detect(text, config) {
            Ok(spans) => {
                tracing::debug!(
                    producer = producer.name(),
                    candidates = spans.len(),
                    "Producer finished"
                );
                candidates.extend(spans);
            }
            Err(e) => {
                crate::log_producer_failure!(producer.name(), e);
            }
        }
    }

    candidates
}

/// Detect and fuse in one call
pub fn detect_and_fuse(
    text: &str,
    config: &AnonymizationConfig,
    producers: &[Box<dyn SpanProducer>],
) -> Vec<Span> {
    if text.is_empty() {
        return Vec::new();
    }
    fuse(collect_candidates(text, config, producers), config)
}

/// Resolve overlaps, then apply the configured filters
pub fn fuse(candidates: Vec<Span>, config: &AnonymizationConfig) -> Vec<Span> {
    let candidate_count = candidates.len();
    let resolved = resolve_overlaps(candidates);
    let exclusions = Exclusions::new(&config.exclusions, config.case_sensitive);

    let fused: Vec<Span> = resolved
        .into_iter()
        .filter(|span| span.confidence() >= config.min_confidence)
        .filter(|span| config.is_requested(span.kind()))
        .filter(|span| !exclusions.matches(span.text()))
        .collect();

    tracing::debug!(
        candidates = candidate_count,
        fused = fused.len(),
        "Fusion finished"
    );

    fused
}

/// Greedy overlap resolution
///
/// Output is ascending by start and pairwise non-overlapping.
pub fn resolve_overlaps(mut candidates: Vec<Span>) -> Vec<Span> {
    candidates.sort_by(|a, b| {
        a.start()
            .cmp(&b.start())
            .then_with(|| b.confidence().total_cmp(&a.confidence()))
    });

    let mut accepted: Vec<Span> = Vec::with_capacity(candidates.len());
    let mut last_end: Option<usize> = None;

    for candidate in candidates {
        match (last_end, accepted.last_mut()) {
            (Some(end), Some(last)) if candidate.start() < end => {
                if candidate.confidence() > last.confidence() {
                    last_end = Some(candidate.end());
                    *last = candidate;
                }
            }
            _ => {
                last_end = Some(candidate.end());
                accepted.push(candidate);
            }
        }
    }

    accepted
}

/// Literals the caller never wants anonymized
struct Exclusions {
    entries: Vec<String>,
    case_sensitive: bool,
}

impl Exclusions {
    fn new(entries: &[String], case_sensitive: bool) -> Self {
        let entries = entries
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| normalize(entry, case_sensitive))
            .collect();

        Self {
            entries,
            case_sensitive,
        }
    }

    /// Containment in either direction counts as a match
    fn matches(&self, text: &str) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let text = normalize(text, self.case_sensitive);
        self.entries
            .iter()
            .any(|entry| text.contains(entry.as_str()) || entry.contains(text.as_str()))
    }
}

fn normalize(value: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        value.to_string()
    } else {
        value.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{DetectionMethod, EntityKind};
    use crate::domain::{FacelessError, Result};

    fn span(start: usize, end: usize, confidence: f32) -> Span {
        Span::new(
            "x".repeat(end - start),
            EntityKind::Person,
            start,
            end,
            confidence,
            DetectionMethod::Regex,
        )
    }

    fn literal(text: &str, kind: EntityKind, confidence: f32) -> Span {
        Span::new(text, kind, 0, text.len(), confidence, DetectionMethod::Regex)
    }

    fn at(text: &str, kind: EntityKind, start: usize) -> Span {
        Span::new(text, kind, start, start + text.len(), 1.0, DetectionMethod::Regex)
    }

    #[test]
    fn test_higher_confidence_overlap_wins() {
        let fused = resolve_overlaps(vec![span(0, 5, 0.9), span(2, 8, 0.95)]);
        assert_eq!(fused.len(), 1);
        assert_eq!((fused[0].start(), fused[0].end()), (2, 8));
        assert_eq!(fused[0].confidence(), 0.95);
    }

    #[test]
    fn test_tie_keeps_first_accepted() {
        let fused = resolve_overlaps(vec![span(0, 5, 0.9), span(3, 10, 0.9)]);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].end(), 5);
    }

    #[test]
    fn test_same_start_prefers_confidence() {
        let fused = resolve_overlaps(vec![span(4, 6, 0.8), span(4, 9, 1.0)]);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].end(), 9);
    }

    #[test]
    fn test_adjacent_spans_kept() {
        let fused = resolve_overlaps(vec![span(5, 9, 0.9), span(0, 5, 0.9)]);
        assert_eq!(fused.len(), 2);
        assert_eq!(fused[0].start(), 0);
        assert_eq!(fused[1].start(), 5);
    }

    #[test]
    fn test_replacement_shrinks_last_end() {
        // 0..10 is replaced by 1..3, after which 4..6 no longer overlaps
        let fused = resolve_overlaps(vec![span(0, 10, 0.5), span(1, 3, 0.9), span(4, 6, 0.6)]);
        let ranges: Vec<_> = fused.iter().map(|s| (s.start(), s.end())).collect();
        assert_eq!(ranges, vec![(1, 3), (4, 6)]);
    }

    #[test]
    fn test_min_confidence_filter() {
        let config = AnonymizationConfig::builder().min_confidence(0.9).build().unwrap();
        let fused = fuse(vec![span(0, 5, 0.85), span(10, 12, 0.95)], &config);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].start(), 10);
    }

    #[test]
    fn test_unrequested_kind_filtered() {
        let config = AnonymizationConfig::builder()
            .entities(vec![EntityKind::Email])
            .build()
            .unwrap();
        let fused = fuse(
            vec![literal("Jan Kowalski", EntityKind::Person, 1.0)],
            &config,
        );
        assert!(fused.is_empty());
    }

    #[test]
    fn test_exclusions_both_directions() {
        let config = AnonymizationConfig::builder()
            .exclusion("Warszawa")
            .exclusion("  ")
            .build()
            .unwrap();

        let fused = fuse(
            vec![
                at("ul. Warszawska", EntityKind::Address, 0),
                at("warszawa centrum", EntityKind::Location, 100),
                at("Warsz", EntityKind::Location, 200),
                at("Kraków", EntityKind::Location, 300),
            ],
            &config,
        );

        let texts: Vec<_> = fused.iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["ul. Warszawska", "Kraków"]);
    }

    #[test]
    fn test_case_sensitive_exclusions() {
        let config = AnonymizationConfig::builder()
            .exclusion("Jan")
            .case_sensitive(true)
            .build()
            .unwrap();
        let fused = fuse(vec![literal("JAN", EntityKind::Person, 1.0)], &config);
        assert_eq!(fused.len(), 1);
    }

    struct FailingProducer;

    impl SpanProducer for FailingProducer {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn detect(&self, _text: &str, _config: &AnonymizationConfig) -> Result<Vec<Span>> {
            Err(FacelessError::Validation("boom".to_string()))
        }
    }

    struct FixedProducer(Vec<Span>);

    impl SpanProducer for FixedProducer {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn detect(&self, _text: &str, _config: &AnonymizationConfig) -> Result<Vec<Span>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_failing_producer_skipped() {
        let producers: Vec<Box<dyn SpanProducer>> = vec![
            Box::new(FailingProducer),
            Box::new(FixedProducer(vec![span(0, 3, 1.0)])),
        ];
        let fused = detect_and_fuse("abcdef", &AnonymizationConfig::default(), &producers);
        assert_eq!(fused.len(), 1);
    }

    #[test]
    fn test_empty_text() {
        let producers: Vec<Box<dyn SpanProducer>> =
            vec![Box::new(FixedProducer(vec![span(0, 3, 1.0)]))];
        assert!(detect_and_fuse("", &AnonymizationConfig::default(), &producers).is_empty());
    }
}
