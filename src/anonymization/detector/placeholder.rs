//! Template placeholder producer
//!
//! Recognizes bracketed tokens such as `[name]`, `[imię]` or `[Date of Birth]`
//! left in document templates and test fixtures.

use super::SpanProducer;
use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::models::{DetectionMethod, EntityKind, Span};
use crate::domain::Result;
use regex::Regex;

/// Word separator allowed inside multi-word tokens
const SEP: &str = r"[\s_-]?";

/// Token bodies (between the brackets) and the kind they stand for
fn placeholder_table() -> Vec<(String, EntityKind)> {
    let multi = |words: &[&str]| words.join(SEP);

    vec![
        ("name".to_string(), EntityKind::Person),
        ("surname".to_string(), EntityKind::Person),
        (multi(&["first", "name"]), EntityKind::Person),
        (multi(&["last", "name"]), EntityKind::Person),
        (multi(&["full", "name"]), EntityKind::Person),
        (multi(&["e", "mail"]), EntityKind::Email),
        ("(?:tele)?phone".to_string(), EntityKind::Phone),
        ("tel".to_string(), EntityKind::Phone),
        ("mobile".to_string(), EntityKind::Phone),
        ("address".to_string(), EntityKind::Address),
        ("street".to_string(), EntityKind::Address),
        ("city".to_string(), EntityKind::Location),
        ("pesel".to_string(), EntityKind::NationalId),
        ("nip".to_string(), EntityKind::TaxId),
        ("regon".to_string(), EntityKind::BusinessId),
        (multi(&["document", "number"]), EntityKind::IdCard),
        (multi(&["id", "card"]), EntityKind::IdCard),
        ("passport".to_string(), EntityKind::Passport),
        (multi(&["bank", "account"]), EntityKind::BankAccount),
        ("iban".to_string(), EntityKind::BankAccount),
        (
            format!("{}(?:{SEP}number)?", multi(&["credit", "card"])),
            EntityKind::CreditCard,
        ),
        ("date".to_string(), EntityKind::Date),
        (multi(&["birth", "date"]), EntityKind::DateOfBirth),
        (multi(&["date", "of", "birth"]), EntityKind::DateOfBirth),
        ("dob".to_string(), EntityKind::DateOfBirth),
        ("age".to_string(), EntityKind::Age),
        ("sex".to_string(), EntityKind::Sex),
        ("gender".to_string(), EntityKind::Sex),
        ("username".to_string(), EntityKind::Username),
        ("login".to_string(), EntityKind::Username),
        ("password".to_string(), EntityKind::Secret),
        ("secret".to_string(), EntityKind::Secret),
        ("company".to_string(), EntityKind::Organization),
        ("organization".to_string(), EntityKind::Organization),
        (multi(&["job", "title"]), EntityKind::JobTitle),
        (multi(&["license", "plate"]), EntityKind::LicensePlate),
        (multi(&["vehicle", "registration"]), EntityKind::LicensePlate),
        // Polish templates
        ("imi[eę]".to_string(), EntityKind::Person),
        ("nazwisko".to_string(), EntityKind::Person),
        (multi(&["imi[eę]", "i", "nazwisko"]), EntityKind::Person),
        ("telefon".to_string(), EntityKind::Phone),
        ("adres".to_string(), EntityKind::Address),
        ("ulica".to_string(), EntityKind::Address),
        ("miasto".to_string(), EntityKind::Location),
        (multi(&["data", "urodzenia"]), EntityKind::DateOfBirth),
        ("firma".to_string(), EntityKind::Organization),
    ]
}

/// Placeholder producer
///
/// Every match has confidence 1.0 and keeps the original token text in the
/// `placeholder_name` attribute.
pub struct PlaceholderProducer {
    placeholders: Vec<(Regex, EntityKind)>,
}

impl PlaceholderProducer {
    pub fn new() -> Result<Self> {
        let placeholders = placeholder_table()
            .into_iter()
            .map(|(body, kind)| -> Result<(Regex, EntityKind)> {
                Ok((Regex::new(&format!(r"(?i)\[{body}\]"))?, kind))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { placeholders })
    }
}

impl SpanProducer for PlaceholderProducer {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn detect(&self, text: &str, config: &AnonymizationConfig) -> Result<Vec<Span>> {
        let mut spans = Vec::new();

        for (regex, kind) in &self.placeholders {
            if !config.is_requested(*kind) {
                continue;
            }

            for matched in regex.find_iter(text) {
                tracing::debug!(kind = %kind, token = matched.as_str(), "Found placeholder");
                spans.push(
                    Span::new(
                        matched.as_str(),
                        *kind,
                        matched.start(),
                        matched.end(),
                        1.0,
                        DetectionMethod::Placeholder,
                    )
                    .with_attribute("placeholder_name", matched.as_str()),
                );
            }
        }

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn detect(text: &str) -> Vec<Span> {
        let producer = PlaceholderProducer::new().unwrap();
        producer.detect(text, &AnonymizationConfig::default()).unwrap()
    }

    #[test_case("[name]", EntityKind::Person)]
    #[test_case("[First Name]", EntityKind::Person)]
    #[test_case("[e-mail]", EntityKind::Email)]
    #[test_case("[TEL]", EntityKind::Phone)]
    #[test_case("[city]", EntityKind::Location)]
    #[test_case("[pesel]", EntityKind::NationalId)]
    #[test_case("[iban]", EntityKind::BankAccount)]
    #[test_case("[credit_card_number]", EntityKind::CreditCard)]
    #[test_case("[date]", EntityKind::Date)]
    #[test_case("[date of birth]", EntityKind::DateOfBirth)]
    #[test_case("[dob]", EntityKind::DateOfBirth)]
    #[test_case("[job title]", EntityKind::JobTitle)]
    #[test_case("[vehicle-registration]", EntityKind::LicensePlate)]
    #[test_case("[imię]", EntityKind::Person)]
    #[test_case("[IMIĘ I NAZWISKO]", EntityKind::Person)]
    #[test_case("[data urodzenia]", EntityKind::DateOfBirth)]
    #[test_case("[Miasto]", EntityKind::Location)]
    fn test_placeholder_kind(token: &str, expected: EntityKind) {
        let spans = detect(&format!("Dear {token},"));
        assert_eq!(spans.len(), 1, "{token}");
        assert_eq!(spans[0].kind(), expected);
        assert_eq!(spans[0].start(), 5);
        assert_eq!(spans[0].confidence(), 1.0);
        assert_eq!(spans[0].attribute("placeholder_name"), Some(token));
    }

    #[test]
    fn test_unknown_token_ignored() {
        assert!(detect("[favourite colour] and [names]").is_empty());
    }

    #[test]
    fn test_unrequested_kind_skipped() {
        let producer = PlaceholderProducer::new().unwrap();
        let config = AnonymizationConfig::builder()
            .entities(vec![EntityKind::Email])
            .build()
            .unwrap();
        let spans = producer.detect("[name] <[email]>", &config).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind(), EntityKind::Email);
    }
}
