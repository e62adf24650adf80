//! Integration tests for the detection and rewrite pipeline

use faceless::anonymization::anonymizer::HashStrategy;
use faceless::anonymization::detector::{EntityRecognizer, NerProducer, RecognizedEntity};
use faceless::anonymization::{
    AnonymizationConfig, AnonymizationEngine, AnonymizationMethod, EntityKind, HashAlgorithm,
};
use faceless::domain::Result;

const SAMPLE: &str = "PESEL 44051401359, e-mail jan.kowalski@example.com, tel. +48 601 234 567.";

fn engine(method: AnonymizationMethod) -> AnonymizationEngine {
    let mut builder = AnonymizationConfig::builder().method(method);
    if method == AnonymizationMethod::Encrypt {
        builder = builder.encryption_key("integration-key");
    }
    AnonymizationEngine::new(builder.build().unwrap()).unwrap()
}

#[test]
fn test_pesel_after_keyword_is_masked() {
    let config = AnonymizationConfig::builder()
        .method(AnonymizationMethod::Mask)
        .entities(vec![EntityKind::NationalId])
        .build()
        .unwrap();
    let engine = AnonymizationEngine::new(config).unwrap();
    assert_eq!(
        engine.anonymize_text("PESEL: 90010112345").unwrap(),
        "PESEL: ***********"
    );
}

#[test]
fn test_mask_preserves_separators() {
    let result = engine(AnonymizationMethod::Mask).anonymize(SAMPLE).unwrap();
    assert_eq!(
        result.anonymized,
        "PESEL ***********, e-mail ***.********@*******.***, tel. +** *** *** ***."
    );
    assert_eq!(result.total_detections(), 3);
}

#[test]
fn test_detections_are_ordered_and_disjoint() {
    let spans = engine(AnonymizationMethod::Mask).detect(SAMPLE);
    let kinds: Vec<_> = spans.iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![EntityKind::NationalId, EntityKind::Email, EntityKind::Phone]
    );
    for pair in spans.windows(2) {
        assert!(pair[0].end() <= pair[1].start());
    }
    for span in &spans {
        assert_eq!(&SAMPLE[span.start()..span.end()], span.text());
    }
}

#[test]
fn test_redact() {
    let result = engine(AnonymizationMethod::Redact).anonymize_text(SAMPLE).unwrap();
    assert_eq!(
        result,
        "PESEL [REDACTED], e-mail [REDACTED], tel. [REDACTED]."
    );
}

#[test]
fn test_generalize() {
    let result = engine(AnonymizationMethod::Generalize).anonymize_text(SAMPLE).unwrap();
    assert_eq!(result, "PESEL [PESEL], e-mail [EMAIL], tel. [PHONE].");
}

#[test]
fn test_pseudonymize() {
    let result = engine(AnonymizationMethod::Pseudonymize).anonymize_text(SAMPLE).unwrap();
    assert_eq!(result, "PESEL [PESEL_1], e-mail [EMAIL_1], tel. [PHONE_1].");
}

#[test]
fn test_pseudonyms_consistent_across_texts() {
    let engine = engine(AnonymizationMethod::Pseudonymize);
    let first = engine.anonymize_text("Od: jan@example.com").unwrap();
    let second = engine
        .anonymize_text("Do: ewa@example.com, DW: jan@example.com")
        .unwrap();

    assert_eq!(first, "Od: [EMAIL_1]");
    assert_eq!(second, "Do: [EMAIL_2], DW: [EMAIL_1]");
}

#[test]
fn test_hash() {
    let result = engine(AnonymizationMethod::Hash).anonymize_text("PESEL 44051401359").unwrap();
    let expected = HashStrategy::new(HashAlgorithm::Sha256, None).hash("44051401359");

    assert_eq!(expected.len(), 16);
    assert_eq!(result, format!("PESEL {expected}"));
}

#[test]
fn test_encrypt() {
    let result = engine(AnonymizationMethod::Encrypt)
        .anonymize_text("PESEL 44051401359")
        .unwrap();
    assert!(result.starts_with("PESEL [ENC:"));
    assert!(result.ends_with("...]"));
    assert!(!result.contains("44051401359"));
}

#[test]
fn test_encrypt_with_seed_never_repeats_sentinel() {
    let build = || {
        let config = AnonymizationConfig::builder()
            .method(AnonymizationMethod::Encrypt)
            .encryption_key("integration-key")
            .seed(42)
            .build()
            .unwrap();
        AnonymizationEngine::new(config).unwrap()
    };

    let first = build().anonymize_text("PESEL 44051401359").unwrap();
    let second = build().anonymize_text("PESEL 44051401359").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_text_without_personal_data_unchanged() {
    for method in [
        AnonymizationMethod::Mask,
        AnonymizationMethod::Pseudonymize,
        AnonymizationMethod::Hash,
        AnonymizationMethod::Generalize,
        AnonymizationMethod::Redact,
        AnonymizationMethod::Encrypt,
    ] {
        let text = "Spotkanie odbędzie się w czwartek po południu.";
        assert_eq!(engine(method).anonymize_text(text).unwrap(), text);
    }
}

#[test]
fn test_placeholder_tokens() {
    let result = engine(AnonymizationMethod::Redact)
        .anonymize_text("Dear [first name] [Surname], thank you.")
        .unwrap();
    assert_eq!(result, "Dear [REDACTED] [REDACTED], thank you.");
}

#[test]
fn test_requested_entities_only() {
    let config = AnonymizationConfig::builder()
        .method(AnonymizationMethod::Redact)
        .entities(vec![EntityKind::Email])
        .build()
        .unwrap();
    let engine = AnonymizationEngine::new(config).unwrap();

    let result = engine.anonymize_text(SAMPLE).unwrap();
    assert_eq!(
        result,
        "PESEL 44051401359, e-mail [REDACTED], tel. +48 601 234 567."
    );
}

#[test]
fn test_exclusions() {
    let config = AnonymizationConfig::builder()
        .method(AnonymizationMethod::Redact)
        .exclusion("biuro@example.com")
        .build()
        .unwrap();
    let engine = AnonymizationEngine::new(config).unwrap();

    let result = engine
        .anonymize_text("Pisz na BIURO@example.com lub jan@example.com")
        .unwrap();
    assert_eq!(result, "Pisz na BIURO@example.com lub [REDACTED]");
}

struct NameRecognizer;

impl EntityRecognizer for NameRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>> {
        Ok(text
            .find("Anna Nowak")
            .map(|start| RecognizedEntity::new("persName", start, start + 10))
            .into_iter()
            .collect())
    }
}

#[test]
fn test_engine_with_ner_producer() {
    let engine = engine(AnonymizationMethod::Pseudonymize)
        .with_producer(Box::new(NerProducer::new(NameRecognizer)));

    let result = engine
        .anonymize_text("Anna Nowak, anna.nowak@example.com")
        .unwrap();
    assert_eq!(result, "[PERSON_1], [EMAIL_1]");
}

#[test]
fn test_batch() {
    let engine = engine(AnonymizationMethod::Mask);
    let results = engine
        .anonymize_batch(vec!["jan@example.com".to_string(), String::new()])
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].anonymized, "***@*******.***");
    assert_eq!(results[1].anonymized, "");
}

#[test]
fn test_report_over_texts() {
    let engine = engine(AnonymizationMethod::Mask);
    let report = engine.generate_report([SAMPLE, "nic tu nie ma"]);

    assert_eq!(report.total_texts, 2);
    assert_eq!(report.total_entities, 3);
    assert_eq!(report.entities_by_kind.get(&EntityKind::Phone), Some(&1));
    assert!(report.format_console().contains("PERSONAL DATA REPORT"));
}
