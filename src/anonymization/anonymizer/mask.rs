//! Mask strategy

use super::Anonymizer;
use crate::anonymization::models::Span;
use crate::domain::Result;

/// Number of mask characters used when the original length is hidden
const FIXED_MASK_LEN: usize = 3;

/// Mask strategy - replaces characters with a mask character
///
/// With `preserve_structure`, only alphanumerics are masked and separators
/// such as `-`, `@` or spaces stay in place. Masking masked text is a no-op.
pub struct MaskStrategy {
    mask_char: char,
    preserve_length: bool,
    preserve_structure: bool,
}

impl MaskStrategy {
    pub fn new(mask_char: char, preserve_length: bool, preserve_structure: bool) -> Self {
        Self {
            mask_char,
            preserve_length,
            preserve_structure,
        }
    }

    /// Mask a literal
    pub fn mask(&self, value: &str) -> String {
        if !self.preserve_length {
            return std::iter::repeat(self.mask_char)
                .take(FIXED_MASK_LEN)
                .collect();
        }

        if self.preserve_structure {
            value
                .chars()
                .map(|c| if c.is_alphanumeric() { self.mask_char } else { c })
                .collect()
        } else {
            std::iter::repeat(self.mask_char)
                .take(value.chars().count())
                .collect()
        }
    }
}

impl Default for MaskStrategy {
    fn default() -> Self {
        Self::new('*', true, true)
    }
}

impl Anonymizer for MaskStrategy {
    fn anonymize(&mut self, span: &Span) -> Result<String> {
        Ok(self.mask(span.text()))
    }
}
