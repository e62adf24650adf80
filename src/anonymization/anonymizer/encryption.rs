//! Encryption strategy
//!
//! Replaces literals with a truncated ciphertext sentinel. Only a prefix of
//! the ciphertext is kept, so the output cannot be decrypted; the strategy is
//! one-way.

use super::Anonymizer;
use crate::anonymization::models::Span;
use crate::domain::{FacelessError, Result};
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

/// Number of hex characters of ciphertext kept in the sentinel
const CIPHERTEXT_PREFIX_LEN: usize = 32;

const PBKDF2_ITERATIONS: u32 = 100_000;
const PBKDF2_SALT: &[u8] = b"faceless-encrypt-strategy";

/// Trait for pluggable ciphers
pub trait Cipher: Send + Sync {
    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>>;
}

/// AES-256-GCM with a PBKDF2-HMAC-SHA256 derived key
///
/// Every call draws a fresh nonce from OS entropy, so sentinels differ
/// between calls even for the same literal.
pub struct AesGcmCipher {
    key: Secret<[u8; 32]>,
}

impl AesGcmCipher {
    /// Derive a cipher key from key material
    pub fn new(key_material: &str) -> Result<Self> {
        if key_material.is_empty() {
            return Err(FacelessError::Configuration(
                "encryption key must not be empty".to_string(),
            ));
        }

        let mut key = [0u8; 32];
        pbkdf2_hmac::<Sha256>(key_material.as_bytes(), PBKDF2_SALT, PBKDF2_ITERATIONS, &mut key);

        Ok(Self {
            key: Secret::new(key),
        })
    }
}

impl Cipher for AesGcmCipher {
    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(self.key.expose_secret())
            .map_err(|e| FacelessError::Strategy(format!("Crypto error: {e}")))?;

        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| FacelessError::Strategy(format!("Encryption failed: {e}")))
    }
}

/// Encryption strategy - `[ENC:<hex prefix>...]`
pub struct EncryptionStrategy {
    cipher: Box<dyn Cipher>,
}

impl EncryptionStrategy {
    pub fn new(cipher: Box<dyn Cipher>) -> Self {
        Self { cipher }
    }
}

impl Anonymizer for EncryptionStrategy {
    fn anonymize(&mut self, span: &Span) -> Result<String> {
        let ciphertext = hex::encode(self.cipher.encrypt(span.text().as_bytes())?);
        let prefix = ciphertext.get(..CIPHERTEXT_PREFIX_LEN).unwrap_or(&ciphertext);
        Ok(format!("[ENC:{prefix}...]"))
    }
}
