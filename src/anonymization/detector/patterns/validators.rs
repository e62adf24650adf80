//! Checksum validators for structured identifiers
//!
//! Each validator takes the matched literal and returns whether it is a
//! well-formed identifier. Validation failure drops the candidate.

use crate::anonymization::models::EntityKind;

/// Validator signature
pub type Validator = fn(&str) -> bool;

const PESEL_WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];
const NIP_WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];
const REGON_WEIGHTS: [u32; 8] = [8, 9, 2, 3, 4, 5, 6, 7];

/// Get the validator for a kind, if it has one
pub fn validator_for(kind: EntityKind) -> Option<Validator> {
    match kind {
        EntityKind::NationalId => Some(validate_pesel),
        EntityKind::TaxId => Some(validate_nip),
        EntityKind::BusinessId => Some(validate_regon),
        EntityKind::CreditCard => Some(validate_luhn),
        _ => None,
    }
}

/// Validate a PESEL number (11 digits, weighted checksum mod 10)
pub fn validate_pesel(value: &str) -> bool {
    let Some(digits) = ascii_digits(value) else {
        return false;
    };
    if digits.len() != 11 {
        return false;
    }

    let sum: u32 = weighted_sum(&digits, &PESEL_WEIGHTS);
    (10 - sum % 10) % 10 == digits[10]
}

/// Validate a NIP number (10 digits, `-` and whitespace ignored)
///
/// A checksum of 10 never matches a digit, so such numbers are invalid.
pub fn validate_nip(value: &str) -> bool {
    let Some(digits) = ascii_digits(&strip_separators(value)) else {
        return false;
    };
    if digits.len() != 10 {
        return false;
    }

    weighted_sum(&digits, &NIP_WEIGHTS) % 11 == digits[9]
}

/// Validate a REGON number
///
/// The 9-digit form is checked (checksum 10 folds to 0). The 14-digit form
/// is accepted on length alone.
pub fn validate_regon(value: &str) -> bool {
    let Some(digits) = ascii_digits(value) else {
        return false;
    };

    match digits.len() {
        9 => {
            let checksum = weighted_sum(&digits, &REGON_WEIGHTS) % 11;
            checksum % 10 == digits[8]
        }
        14 => true,
        _ => false,
    }
}

/// Validate a payment card number with the Luhn algorithm
///
/// Accepts 13 to 19 digits after removing `-` and whitespace.
pub fn validate_luhn(value: &str) -> bool {
    let Some(digits) = ascii_digits(&strip_separators(value)) else {
        return false;
    };
    if !(13..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn strip_separators(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

fn ascii_digits(value: &str) -> Option<Vec<u32>> {
    if value.is_empty() {
        return None;
    }
    value
        .chars()
        .map(|c| if c.is_ascii_digit() { c.to_digit(10) } else { None })
        .collect()
}

fn weighted_sum(digits: &[u32], weights: &[u32]) -> u32 {
    digits.iter().zip(weights).map(|(d, w)| d * w).sum()
}
