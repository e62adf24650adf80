//! Configuration loading
//!
//! Order of precedence, lowest first: built-in defaults, the TOML file with
//! `${VAR}` references resolved, then `FACELESS_<SECTION>_<KEY>` variables.
//! Validation runs last.

use super::schema::FacelessConfig;
use super::secret_string;
use crate::domain::errors::FacelessError;
use crate::domain::result::Result;
use regex::{Captures, Regex};
use std::path::Path;
use std::str::FromStr;

/// Load, resolve, override and validate a TOML configuration file
///
/// Every failure is reported as [`FacelessError::Configuration`].
///
/// ```no_run
/// use faceless::config::load_config;
///
/// let config = load_config("faceless.toml").unwrap();
/// println!("{}", config.anonymization.method);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FacelessConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        FacelessError::Configuration(format!("Cannot read {}: {e}", path.display()))
    })?;

    let resolved = substitute_env_vars(&raw)?;
    let config: FacelessConfig = toml::from_str(&resolved).map_err(|e| {
        FacelessError::Configuration(format!("Invalid TOML in {}: {e}", path.display()))
    })?;

    finish(config)
}

/// Defaults plus `FACELESS_*` overrides, for runs without a file
pub fn load_from_env() -> Result<FacelessConfig> {
    finish(FacelessConfig::default())
}

fn finish(mut config: FacelessConfig) -> Result<FacelessConfig> {
    apply_env_overrides(&mut config)?;
    config
        .validate()
        .map_err(|e| FacelessError::Configuration(format!("Invalid configuration: {e}")))?;
    Ok(config)
}

/// Replace `${VAR}` references outside comment lines
///
/// All unset variables are collected and reported together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let reference = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;
    let mut missing: Vec<String> = Vec::new();
    let mut output = String::with_capacity(input.len());

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            let resolved = reference.replace_all(line, |caps: &Captures| {
                std::env::var(&caps[1]).unwrap_or_else(|_| {
                    if !missing.iter().any(|name| name == &caps[1]) {
                        missing.push(caps[1].to_string());
                    }
                    caps[0].to_string()
                })
            });
            output.push_str(&resolved);
        }
        output.push('\n');
    }

    if missing.is_empty() {
        Ok(output)
    } else {
        Err(FacelessError::Configuration(format!(
            "Unset environment variables referenced in configuration: {}",
            missing.join(", ")
        )))
    }
}

/// Parse an override, naming the variable when the value is malformed
fn parsed_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| FacelessError::Configuration(format!("Invalid value for {name}: {raw}"))),
        Err(_) => Ok(None),
    }
}

fn apply_env_overrides(config: &mut FacelessConfig) -> Result<()> {
    let logging = &mut config.logging;
    if let Ok(level) = std::env::var("FACELESS_LOGGING_LEVEL") {
        logging.level = level;
    }
    if let Some(enabled) = parsed_var("FACELESS_LOGGING_LOCAL_ENABLED")? {
        logging.local_enabled = enabled;
    }
    if let Ok(dir) = std::env::var("FACELESS_LOGGING_LOCAL_PATH") {
        logging.local_path = dir;
    }
    if let Ok(rotation) = std::env::var("FACELESS_LOGGING_LOCAL_ROTATION") {
        logging.local_rotation = rotation;
    }

    let llm = &mut config.llm;
    if let Some(enabled) = parsed_var("FACELESS_LLM_ENABLED")? {
        llm.enabled = enabled;
    }
    if let Ok(url) = std::env::var("FACELESS_LLM_BASE_URL") {
        llm.base_url = url;
    }
    if let Ok(model) = std::env::var("FACELESS_LLM_MODEL") {
        llm.model = model;
    }
    if let Ok(key) = std::env::var("FACELESS_LLM_API_KEY") {
        llm.api_key = Some(secret_string(key));
    }
    if let Ok(header) = std::env::var("FACELESS_LLM_API_KEY_HEADER") {
        llm.api_key_header = Some(header);
    }
    if let Some(timeout) = parsed_var("FACELESS_LLM_TIMEOUT_SECONDS")? {
        llm.timeout_seconds = timeout;
    }

    config.anonymization.apply_env_overrides()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("FACELESS_LOADER_TEST_SALT", "pepper");
        let result = substitute_env_vars("hash_salt = \"${FACELESS_LOADER_TEST_SALT}\"").unwrap();
        std::env::remove_var("FACELESS_LOADER_TEST_SALT");
        assert_eq!(result, "hash_salt = \"pepper\"\n");
    }

    #[test]
    fn test_substitute_reports_every_missing_var_once() {
        let input = "a = \"${FACELESS_LOADER_TEST_MISSING_A}\"\n\
                     b = \"${FACELESS_LOADER_TEST_MISSING_B}${FACELESS_LOADER_TEST_MISSING_A}\"";
        let message = substitute_env_vars(input).unwrap_err().to_string();
        assert_eq!(message.matches("FACELESS_LOADER_TEST_MISSING_A").count(), 1);
        assert!(message.contains("FACELESS_LOADER_TEST_MISSING_B"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# key = \"${FACELESS_LOADER_TEST_COMMENTED}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${FACELESS_LOADER_TEST_COMMENTED}"));
    }

    #[test]
    fn test_parsed_var_rejects_garbage() {
        std::env::set_var("FACELESS_LOADER_TEST_TIMEOUT", "soon");
        let result = parsed_var::<u64>("FACELESS_LOADER_TEST_TIMEOUT");
        std::env::remove_var("FACELESS_LOADER_TEST_TIMEOUT");
        assert!(result.is_err());
        assert_eq!(parsed_var::<u64>("FACELESS_LOADER_TEST_UNSET").unwrap(), None);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(FacelessError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let file = toml_file(
            r#"
[anonymization]
method = "pseudonymize"
entities = ["PERSON", "PESEL"]
min_confidence = 0.8

[logging]
level = "debug"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.anonymization.entities.len(), 2);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_config_rejects_invalid_threshold() {
        let file = toml_file("[anonymization]\nmin_confidence = 1.5\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(FacelessError::Configuration(_))));
    }

    #[test]
    fn test_load_config_rejects_malformed_toml() {
        let file = toml_file("[anonymization\nmethod = ");
        let result = load_config(file.path());
        assert!(matches!(result, Err(FacelessError::Configuration(_))));
    }
}
