//! Integration tests for configuration loading and validation
//!
//! Tests that set `FACELESS_*` variables share one lock, since the loader
//! reads the whole process environment.

use faceless::anonymization::{AnonymizationEngine, AnonymizationMethod, EntityKind, HashAlgorithm};
use faceless::config::load_config;
use faceless::domain::FacelessError;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let file = write_config(
        r#"
[anonymization]
language = "pl"
method = "hash"
entities = ["PERSON", "PESEL", "EMAIL", "IBAN"]
hash_algorithm = "sha512"
min_confidence = 0.85
exclusions = ["Warszawa"]
case_sensitive = true
detect_context = false

[anonymization.custom_patterns]
ID_CARD = '\b[A-Z]{3}[0-9]{6}\b'

[logging]
level = "debug"

[llm]
enabled = true
base_url = "https://llm.example.com/v1"
model = "test-model"
timeout_seconds = 5
"#,
    );

    let config = load_config(file.path()).unwrap();
    let anonymization = &config.anonymization;

    assert_eq!(anonymization.method, AnonymizationMethod::Hash);
    assert_eq!(anonymization.hash_algorithm, HashAlgorithm::Sha512);
    assert_eq!(
        anonymization.entities,
        vec![
            EntityKind::Person,
            EntityKind::NationalId,
            EntityKind::Email,
            EntityKind::BankAccount
        ]
    );
    assert_eq!(anonymization.min_confidence, 0.85);
    assert_eq!(anonymization.exclusions, vec!["Warszawa".to_string()]);
    assert!(anonymization.case_sensitive);
    assert!(!anonymization.detect_context);
    assert!(anonymization.custom_patterns.contains_key(&EntityKind::IdCard));
    assert_eq!(config.logging.level, "debug");
    assert!(config.llm.enabled);
    assert_eq!(config.llm.timeout_seconds, 5);

    assert!(AnonymizationEngine::new(config.anonymization).is_ok());
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("FACELESS_IT_ENCRYPTION_KEY", "s3cret-key");

    let file = write_config(
        r#"
[anonymization]
method = "encrypt"
encryption_key = "${FACELESS_IT_ENCRYPTION_KEY}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    std::env::remove_var("FACELESS_IT_ENCRYPTION_KEY");

    let key = config.anonymization.encryption_key.as_ref().unwrap();
    assert_eq!(key.expose_secret().as_str(), "s3cret-key");
}

#[test]
fn test_missing_env_var_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let file = write_config(
        r#"
[anonymization]
hash_salt = "${FACELESS_IT_UNSET_SALT}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("FACELESS_IT_UNSET_SALT"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("FACELESS_ANONYMIZATION_METHOD", "redact");
    std::env::set_var("FACELESS_ANONYMIZATION_ENTITIES", "EMAIL,PHONE");
    std::env::set_var("FACELESS_LOGGING_LEVEL", "warn");

    let file = write_config(
        r#"
[anonymization]
method = "mask"
"#,
    );
    let result = load_config(file.path());

    std::env::remove_var("FACELESS_ANONYMIZATION_METHOD");
    std::env::remove_var("FACELESS_ANONYMIZATION_ENTITIES");
    std::env::remove_var("FACELESS_LOGGING_LEVEL");

    let config = result.unwrap();
    assert_eq!(config.anonymization.method, AnonymizationMethod::Redact);
    assert_eq!(
        config.anonymization.entities,
        vec![EntityKind::Email, EntityKind::Phone]
    );
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_invalid_values_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    for content in [
        "[anonymization]\nmethod = \"shred\"\n",
        "[anonymization]\nmin_confidence = -0.1\n",
        "[anonymization]\nentities = [\"SHOE_SIZE\"]\n",
        "[logging]\nlevel = \"loud\"\n",
        "[llm]\nenabled = true\nbase_url = \"ftp://llm.example.com\"\n",
    ] {
        let file = write_config(content);
        let result = load_config(file.path());
        assert!(
            matches!(result, Err(FacelessError::Configuration(_))),
            "expected configuration error for {content:?}"
        );
    }
}

#[test]
fn test_invalid_custom_pattern_fails_at_construction() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let file = write_config(
        r#"
[anonymization.custom_patterns]
PERSON = "(unclosed"
"#,
    );

    match load_config(file.path()) {
        Err(FacelessError::Configuration(_)) => {}
        Ok(config) => assert!(AnonymizationEngine::new(config.anonymization).is_err()),
        Err(other) => panic!("unexpected error: {other}"),
    }
}
