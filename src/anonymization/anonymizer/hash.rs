//! Hash strategy

use super::Anonymizer;
use crate::anonymization::config::HashAlgorithm;
use crate::anonymization::models::Span;
use crate::config::SecretString;
use crate::domain::Result;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256, Sha512};

/// Number of hex characters kept from the digest
const HASH_PREFIX_LEN: usize = 16;

/// Hash strategy - replaces literals with a truncated salted digest
///
/// The salt is prepended to the literal before hashing. Without a salt the
/// digest of a short identifier is trivially reversible by enumeration.
pub struct HashStrategy {
    algorithm: HashAlgorithm,
    salt: Option<SecretString>,
}

impl HashStrategy {
    pub fn new(algorithm: HashAlgorithm, salt: Option<SecretString>) -> Self {
        Self { algorithm, salt }
    }

    /// Hash a literal
    pub fn hash(&self, value: &str) -> String {
        let mut input = Vec::with_capacity(value.len());
        if let Some(ref salt) = self.salt {
            input.extend_from_slice(salt.expose_secret().as_bytes());
        }
        input.extend_from_slice(value.as_bytes());

        let digest = match self.algorithm {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(&input)),
            HashAlgorithm::Sha512 => hex::encode(Sha512::digest(&input)),
            HashAlgorithm::Md5 => format!("{:x}", md5::compute(&input)),
        };

        digest[..HASH_PREFIX_LEN].to_string()
    }
}

impl Anonymizer for HashStrategy {
    fn anonymize(&mut self, span: &Span) -> Result<String> {
        Ok(self.hash(span.text()))
    }
}
