//! Secret configuration values
//!
//! Hash salts, encryption keys and API keys are held in [`SecretString`]:
//! zeroed on drop, redacted in `Debug`, exposed only through
//! [`ExposeSecret`](secrecy::ExposeSecret).
//!
//! ```rust
//! use faceless::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("my-key".to_string());
//! assert_eq!(key.expose_secret().as_str(), "my-key");
//! assert!(!format!("{key:?}").contains("my-key"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Zeroizing string payload of a [`SecretString`]
///
/// Serializes as a bare string so salts and keys can be written inline in
/// TOML or substituted from `${VAR}` references.
#[derive(Clone, Debug, Default, Zeroize, Serialize, Deserialize)]
#[zeroize(drop)]
#[serde(transparent)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes, for key derivation and salting
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Secret string used for salts, keys and tokens
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string read from the environment or a CLI flag
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
