//! Shape of `faceless.toml`: `[anonymization]`, `[logging]` and `[llm]`

use super::SecretString;
use crate::anonymization::AnonymizationConfig;
use serde::{Deserialize, Serialize};

/// Whole configuration file; every section is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacelessConfig {
    pub anonymization: AnonymizationConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
}

impl FacelessConfig {
    /// Check every section, stopping at the first problem
    pub fn validate(&self) -> Result<(), String> {
        self.anonymization.validate().map_err(|e| e.to_string())?;
        self.logging.validate()?;
        self.llm.validate()?;
        Ok(())
    }
}

/// Logging settings
///
/// Missing keys fall back to [`LoggingConfig::default`]: `info` on stderr,
/// no log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,

    /// Also write JSON events to a rolling file
    pub local_enabled: bool,

    /// Directory for the rolling file
    pub local_path: String,

    /// daily, hourly or never
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            local_enabled: false,
            local_path: "./logs".to_string(),
            local_rotation: "daily".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];
const LOG_ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let level = self.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!("Unknown logging.level '{}'", self.level));
        }
        if !LOG_ROTATIONS.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Unknown logging.local_rotation '{}' (expected {})",
                self.local_rotation,
                LOG_ROTATIONS.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled is set".to_string());
        }
        Ok(())
    }
}

/// Remote language model configuration
///
/// The endpoint must speak the OpenAI-compatible chat-completion protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Enable the remote producer
    #[serde(default)]
    pub enabled: bool,

    /// API base URL; `/chat/completions` is appended
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model name sent with each request
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Header carrying the API key; bearer authorization when unset
    #[serde(default)]
    pub api_key_header: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,

    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    /// Completion token limit
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
}

fn default_llm_base_url() -> String {
    "http://localhost:8000/v1".to_string()
}

fn default_llm_model() -> String {
    "CYFRAGOVPL/pllum-12b-nc-chat-250715".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_llm_temperature() -> f32 {
    0.1
}

fn default_llm_max_tokens() -> u32 {
    2000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            api_key_header: None,
            timeout_seconds: default_llm_timeout(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
        }
    }
}

impl LlmConfig {
    /// Validates the endpoint settings; a disabled producer is always valid
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid llm.base_url '{}': {}", self.base_url, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "llm.base_url must use http or https, got '{}'",
                url.scheme()
            ));
        }

        if self.model.trim().is_empty() {
            return Err("llm.model cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("llm.timeout_seconds must be > 0".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "llm.temperature must be between 0 and 2, got {}",
                self.temperature
            ));
        }

        if self.max_tokens == 0 {
            return Err("llm.max_tokens must be > 0".to_string());
        }

        Ok(())
    }
}
