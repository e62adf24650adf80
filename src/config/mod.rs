//! Configuration management for Faceless.
//!
//! Faceless uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FACELESS_*` environment overrides
//! - Default values for every setting
//! - Validation before any text is processed
//!
//! # Example Configuration
//!
//! ```toml
//! [anonymization]
//! language = "pl"
//! method = "pseudonymize"
//! entities = ["PERSON", "PESEL", "NIP", "EMAIL", "PHONE"]
//! min_confidence = 0.8
//! exclusions = ["Warszawa"]
//! hash_salt = "${FACELESS_HASH_SALT}"
//!
//! [logging]
//! level = "info"
//!
//! [llm]
//! enabled = false
//! base_url = "https://llm.example.com/v1"
//! api_key = "${FACELESS_LLM_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_from_env};
pub use schema::{FacelessConfig, LlmConfig, LoggingConfig};
pub use secret::{secret_string, SecretString, SecretValue};
