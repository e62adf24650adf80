//! Anonymization configuration

use crate::anonymization::models::EntityKind;
use crate::config::SecretString;
use crate::domain::{FacelessError, Result};
use regex::Regex;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Anonymization method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnonymizationMethod {
    /// Replace alphanumerics with the mask character
    Mask,
    /// Replace with consistent `[KIND_n]` pseudonyms
    Pseudonymize,
    /// Replace with a truncated salted digest
    Hash,
    /// Replace with a per-kind category token
    Generalize,
    /// Replace with a fixed sentinel
    Redact,
    /// Replace with a truncated ciphertext sentinel
    Encrypt,
}

impl Default for AnonymizationMethod {
    fn default() -> Self {
        Self::Mask
    }
}

impl AnonymizationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mask => "mask",
            Self::Pseudonymize => "pseudonymize",
            Self::Hash => "hash",
            Self::Generalize => "generalize",
            Self::Redact => "redact",
            Self::Encrypt => "encrypt",
        }
    }
}

impl fmt::Display for AnonymizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnonymizationMethod {
    type Err = FacelessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mask" => Ok(Self::Mask),
            "pseudonymize" | "pseudonymise" => Ok(Self::Pseudonymize),
            "hash" => Ok(Self::Hash),
            "generalize" | "generalise" => Ok(Self::Generalize),
            "redact" => Ok(Self::Redact),
            "encrypt" => Ok(Self::Encrypt),
            _ => Err(FacelessError::Configuration(format!(
                "Invalid anonymization method: {s}. Must be one of: mask, pseudonymize, hash, generalize, redact, encrypt"
            ))),
        }
    }
}

/// Digest algorithm for the hash method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
    Md5,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        Self::Sha256
    }
}

impl FromStr for HashAlgorithm {
    type Err = FacelessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "md5" => Ok(Self::Md5),
            _ => Err(FacelessError::Configuration(format!(
                "Invalid hash algorithm: {s}. Must be one of: sha256, sha512, md5"
            ))),
        }
    }
}

/// Anonymization configuration
///
/// Read-only once validated. Invalid values are rejected by [`validate`](Self::validate),
/// which every constructor in the crate calls before any text is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Target language of the processed text
    #[serde(default = "default_language")]
    pub language: String,

    /// Anonymization method
    #[serde(default)]
    pub method: AnonymizationMethod,

    /// Requested entity kinds
    #[serde(default = "default_entities")]
    pub entities: Vec<EntityKind>,

    /// Character used by the mask method
    #[serde(default = "default_mask_char")]
    pub mask_char: char,

    /// Keep the original length when masking
    #[serde(default = "default_true")]
    pub preserve_length: bool,

    /// Keep separators when masking
    #[serde(default = "default_true")]
    pub preserve_structure: bool,

    /// Accepted for reproducible runs; pseudonym numbering is already
    /// deterministic and the encrypt method ignores it
    #[serde(default)]
    pub seed: Option<u64>,

    /// Optional label prefix for pseudonyms (`[prefix_KIND_n]`)
    #[serde(default)]
    pub pseudonym_prefix: Option<String>,

    /// Digest used by the hash method
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Salt prepended to literals before hashing
    #[serde(default)]
    pub hash_salt: Option<SecretString>,

    /// Key material for the encrypt method
    #[serde(default)]
    pub encryption_key: Option<SecretString>,

    /// User patterns, one regex per kind
    #[serde(default)]
    pub custom_patterns: BTreeMap<EntityKind, String>,

    /// Literals never anonymized
    #[serde(default)]
    pub exclusions: Vec<String>,

    /// Match exclusions case-sensitively
    #[serde(default)]
    pub case_sensitive: bool,

    /// Minimum confidence for a span to survive fusion
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Enable keyword-anchored contextual detection
    #[serde(default = "default_true")]
    pub detect_context: bool,

    /// Enable template placeholder detection
    #[serde(default = "default_true")]
    pub detect_placeholders: bool,

    /// Path to an extra pattern library TOML file
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Log each surviving entity
    #[serde(default)]
    pub verbose: bool,
}

fn default_language() -> String {
    "pl".to_string()
}

fn default_entities() -> Vec<EntityKind> {
    EntityKind::ALL.to_vec()
}

fn default_mask_char() -> char {
    '*'
}

fn default_true() -> bool {
    true
}

fn default_min_confidence() -> f32 {
    0.7
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            method: AnonymizationMethod::default(),
            entities: default_entities(),
            mask_char: default_mask_char(),
            preserve_length: true,
            preserve_structure: true,
            seed: None,
            pseudonym_prefix: None,
            hash_algorithm: HashAlgorithm::default(),
            hash_salt: None,
            encryption_key: None,
            custom_patterns: BTreeMap::new(),
            exclusions: Vec::new(),
            case_sensitive: false,
            min_confidence: default_min_confidence(),
            detect_context: true,
            detect_placeholders: true,
            pattern_library: None,
            verbose: false,
        }
    }
}

impl AnonymizationConfig {
    /// Start building a configuration from defaults
    pub fn builder() -> AnonymizationConfigBuilder {
        AnonymizationConfigBuilder::default()
    }

    /// Check whether a kind was requested
    pub fn is_requested(&self, kind: EntityKind) -> bool {
        self.entities.contains(&kind)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.min_confidence.is_finite() || !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(FacelessError::Configuration(format!(
                "min_confidence must be between 0 and 1, got {}",
                self.min_confidence
            )));
        }

        if self.method == AnonymizationMethod::Encrypt {
            let has_key = self
                .encryption_key
                .as_ref()
                .is_some_and(|key| !key.expose_secret().is_empty());
            if !has_key {
                return Err(FacelessError::Configuration(
                    "encryption_key is required when method = encrypt".to_string(),
                ));
            }
        }

        if self.entities.is_empty() {
            return Err(FacelessError::Configuration(
                "entities must name at least one entity kind".to_string(),
            ));
        }

        for (kind, pattern) in &self.custom_patterns {
            Regex::new(pattern).map_err(|e| {
                FacelessError::Configuration(format!("Invalid custom pattern for {kind}: {e}"))
            })?;
        }

        // Validate pattern library path if specified
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(FacelessError::Configuration(format!(
                    "Pattern library file not found: {}",
                    path.display()
                )));
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(FacelessError::Configuration(format!(
                    "Pattern library must be a TOML file: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_LANGUAGE") {
            self.language = val;
        }

        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_METHOD") {
            self.method = val.parse()?;
        }

        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_ENTITIES") {
            self.entities = parse_entities(&val)?;
        }

        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_MIN_CONFIDENCE") {
            self.min_confidence = val.parse().map_err(|_| {
                FacelessError::Configuration(format!(
                    "Invalid FACELESS_ANONYMIZATION_MIN_CONFIDENCE value: {val}"
                ))
            })?;
        }

        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_HASH_ALGORITHM") {
            self.hash_algorithm = val.parse()?;
        }

        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_HASH_SALT") {
            self.hash_salt = Some(crate::config::secret_string(val));
        }

        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_ENCRYPTION_KEY") {
            self.encryption_key = Some(crate::config::secret_string(val));
        }

        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_SEED") {
            self.seed = Some(val.parse().map_err(|_| {
                FacelessError::Configuration(format!("Invalid FACELESS_ANONYMIZATION_SEED value: {val}"))
            })?);
        }

        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("FACELESS_ANONYMIZATION_VERBOSE") {
            self.verbose = val.parse().map_err(|_| {
                FacelessError::Configuration(format!(
                    "Invalid FACELESS_ANONYMIZATION_VERBOSE value: {val}"
                ))
            })?;
        }

        Ok(())
    }
}

/// Parse a comma-separated list of entity kinds
///
/// The word `all` selects every kind.
pub fn parse_entities(list: &str) -> Result<Vec<EntityKind>> {
    if list.trim().eq_ignore_ascii_case("all") {
        return Ok(default_entities());
    }

    let mut kinds = Vec::new();
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind: EntityKind = item.parse().map_err(FacelessError::Configuration)?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

/// Builder for [`AnonymizationConfig`]
///
/// ```
/// use faceless::anonymization::config::{AnonymizationConfig, AnonymizationMethod};
/// use faceless::anonymization::EntityKind;
///
/// let config = AnonymizationConfig::builder()
///     .method(AnonymizationMethod::Pseudonymize)
///     .entities(vec![EntityKind::Person, EntityKind::Email])
///     .min_confidence(0.8)
///     .build()
///     .unwrap();
/// assert!(config.is_requested(EntityKind::Email));
/// ```
#[derive(Debug, Default)]
pub struct AnonymizationConfigBuilder {
    config: AnonymizationConfig,
}

impl AnonymizationConfigBuilder {
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    pub fn method(mut self, method: AnonymizationMethod) -> Self {
        self.config.method = method;
        self
    }

    pub fn entities(mut self, entities: Vec<EntityKind>) -> Self {
        self.config.entities = entities;
        self
    }

    pub fn mask_char(mut self, mask_char: char) -> Self {
        self.config.mask_char = mask_char;
        self
    }

    pub fn preserve_length(mut self, preserve: bool) -> Self {
        self.config.preserve_length = preserve;
        self
    }

    pub fn preserve_structure(mut self, preserve: bool) -> Self {
        self.config.preserve_structure = preserve;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn pseudonym_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.pseudonym_prefix = Some(prefix.into());
        self
    }

    pub fn hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.hash_algorithm = algorithm;
        self
    }

    pub fn hash_salt(mut self, salt: impl Into<String>) -> Self {
        self.config.hash_salt = Some(crate::config::secret_string(salt.into()));
        self
    }

    pub fn encryption_key(mut self, key: impl Into<String>) -> Self {
        self.config.encryption_key = Some(crate::config::secret_string(key.into()));
        self
    }

    pub fn custom_pattern(mut self, kind: EntityKind, pattern: impl Into<String>) -> Self {
        self.config.custom_patterns.insert(kind, pattern.into());
        self
    }

    pub fn exclusion(mut self, literal: impl Into<String>) -> Self {
        self.config.exclusions.push(literal.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.config.case_sensitive = case_sensitive;
        self
    }

    pub fn min_confidence(mut self, min_confidence: f32) -> Self {
        self.config.min_confidence = min_confidence;
        self
    }

    pub fn detect_context(mut self, enabled: bool) -> Self {
        self.config.detect_context = enabled;
        self
    }

    pub fn detect_placeholders(mut self, enabled: bool) -> Self {
        self.config.detect_placeholders = enabled;
        self
    }

    pub fn pattern_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pattern_library = Some(path.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<AnonymizationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
