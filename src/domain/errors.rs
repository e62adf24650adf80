//! Error types for detection, rewriting and configuration
//!
//! Third-party errors are flattened into strings at the boundary.

use thiserror::Error;

/// Library error
#[derive(Debug, Error)]
pub enum FacelessError {
    /// Configuration-related errors, raised at construction time
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Pattern library errors (bad TOML, bad regex, unknown kind)
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Strategy errors raised while building a replacement
    #[error("Strategy error: {0}")]
    Strategy(String),

    /// Span producer errors
    #[error("Producer error: {0}")]
    Producer(#[from] ProducerError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Span producer errors
///
/// Producers never surface these to callers of the fusion engine: a failing
/// producer is logged and contributes no candidates. The remote producer
/// uses them internally to report why a response was discarded.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// Failed to reach the remote service
    #[error("Request failed: {0}")]
    Request(String),

    /// Remote service did not answer in time
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Remote service answered with a non-success status
    #[error("Server error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response contained no JSON array of entities
    #[error("No JSON array found in response")]
    NoJsonArray,
}

impl From<std::io::Error> for FacelessError {
    fn from(err: std::io::Error) -> Self {
        FacelessError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FacelessError {
    fn from(err: serde_json::Error) -> Self {
        FacelessError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for FacelessError {
    fn from(err: toml::de::Error) -> Self {
        FacelessError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<regex::Error> for FacelessError {
    fn from(err: regex::Error) -> Self {
        FacelessError::Pattern(err.to_string())
    }
}
