//! Logging and observability
//!
//! Structured logging built on `tracing`, with:
//! - Configurable log levels
//! - Local JSON file logging with rotation
//! - Helper macros for detection events
//!
//! Detected literals are never logged in plaintext; macros log a SHA-256 digest.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

use sha2::{Digest, Sha256};

/// Hash a detected literal for logging
pub fn hash_for_log(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Log a surviving entity with its position
///
/// # Example
///
/// ```no_run
/// use faceless::anonymization::{DetectionMethod, EntityKind, Span};
/// use faceless::log_entity_detected;
///
/// let span = Span::new("44051401359", EntityKind::NationalId, 7, 18, 1.0, DetectionMethod::Regex);
/// log_entity_detected!(&span, 1, 8);
/// ```
#[macro_export]
macro_rules! log_entity_detected {
    ($span:expr, $line:expr, $column:expr) => {
        tracing::info!(
            kind = %$span.kind(),
            value_hash = %$crate::logging::hash_for_log($span.text()),
            line = $line,
            column = $column,
            start = $span.start(),
            end = $span.end(),
            confidence = $span.confidence(),
            source = $span.source().as_str(),
            "Entity detected"
        );
    };
}

/// Log a producer that failed and was skipped
///
/// # Example
///
/// ```no_run
/// use faceless::log_producer_failure;
/// use faceless::domain::FacelessError;
///
/// let error = FacelessError::Pattern("bad regex".to_string());
/// log_producer_failure!("pattern", &error);
/// ```
#[macro_export]
macro_rules! log_producer_failure {
    ($producer:expr, $error:expr) => {
        tracing::warn!(
            producer = $producer,
            error = %$error,
            "Producer failed, continuing without its candidates"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use faceless::log_error_with_context;
/// use faceless::domain::FacelessError;
///
/// let error = FacelessError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
