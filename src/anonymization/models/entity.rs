//! Entity kind enumeration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical kinds of personal data recognized by every producer
///
/// Serialized labels follow the upper-case vocabulary used in configuration
/// files and reports (`PESEL`, `NIP`, `REGON` for the Polish identifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// First names, surnames, full names
    #[serde(rename = "PERSON")]
    Person,
    /// Email addresses
    #[serde(rename = "EMAIL")]
    Email,
    /// Telephone numbers
    #[serde(rename = "PHONE")]
    Phone,
    /// Polish national identification number (PESEL)
    #[serde(rename = "PESEL")]
    NationalId,
    /// Polish tax identification number (NIP)
    #[serde(rename = "NIP")]
    TaxId,
    /// Polish business registry number (REGON)
    #[serde(rename = "REGON")]
    BusinessId,
    /// Bank account numbers, including IBAN
    #[serde(rename = "BANK_ACCOUNT", alias = "IBAN")]
    BankAccount,
    /// Payment card numbers
    #[serde(rename = "CREDIT_CARD")]
    CreditCard,
    /// Street addresses and postal codes
    #[serde(rename = "ADDRESS")]
    Address,
    /// Birth dates
    #[serde(rename = "DATE_OF_BIRTH")]
    DateOfBirth,
    /// National identity card numbers
    #[serde(rename = "ID_CARD")]
    IdCard,
    /// Passport numbers
    #[serde(rename = "PASSPORT")]
    Passport,
    /// Driver license numbers
    #[serde(rename = "DRIVER_LICENSE")]
    DriverLicense,
    /// Vehicle registration plates
    #[serde(rename = "LICENSE_PLATE")]
    LicensePlate,
    /// IP addresses
    #[serde(rename = "IP_ADDRESS")]
    IpAddress,
    /// Web URLs
    #[serde(rename = "URL")]
    Url,
    /// Companies and institutions
    #[serde(rename = "ORGANIZATION")]
    Organization,
    /// Cities, regions, countries
    #[serde(rename = "LOCATION")]
    Location,
    /// Dates other than birth dates
    #[serde(rename = "DATE")]
    Date,
    /// Age in years
    #[serde(rename = "AGE")]
    Age,
    /// Sex or gender
    #[serde(rename = "SEX")]
    Sex,
    /// Account logins
    #[serde(rename = "USERNAME")]
    Username,
    /// Passwords and other secrets
    #[serde(rename = "SECRET")]
    Secret,
    /// Occupation or position
    #[serde(rename = "JOB_TITLE")]
    JobTitle,
}

impl EntityKind {
    /// Every kind, used as the default requested set
    ///
    /// Checksum-validated kinds come first: producers emit candidates in
    /// requested-kind order and fusion keeps the earlier candidate on a tie.
    pub const ALL: [EntityKind; 24] = [
        Self::NationalId,
        Self::TaxId,
        Self::BusinessId,
        Self::CreditCard,
        Self::BankAccount,
        Self::IdCard,
        Self::Passport,
        Self::Person,
        Self::Email,
        Self::Url,
        Self::IpAddress,
        Self::Phone,
        Self::Address,
        Self::DateOfBirth,
        Self::DriverLicense,
        Self::LicensePlate,
        Self::Organization,
        Self::Location,
        Self::Date,
        Self::Age,
        Self::Sex,
        Self::Username,
        Self::Secret,
        Self::JobTitle,
    ];

    /// Get the serialized label for the kind
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::NationalId => "PESEL",
            Self::TaxId => "NIP",
            Self::BusinessId => "REGON",
            Self::BankAccount => "BANK_ACCOUNT",
            Self::CreditCard => "CREDIT_CARD",
            Self::Address => "ADDRESS",
            Self::DateOfBirth => "DATE_OF_BIRTH",
            Self::IdCard => "ID_CARD",
            Self::Passport => "PASSPORT",
            Self::DriverLicense => "DRIVER_LICENSE",
            Self::LicensePlate => "LICENSE_PLATE",
            Self::IpAddress => "IP_ADDRESS",
            Self::Url => "URL",
            Self::Organization => "ORGANIZATION",
            Self::Location => "LOCATION",
            Self::Date => "DATE",
            Self::Age => "AGE",
            Self::Sex => "SEX",
            Self::Username => "USERNAME",
            Self::Secret => "SECRET",
            Self::JobTitle => "JOB_TITLE",
        }
    }

    /// Human-readable description, used in prompts for the remote producer
    pub fn description(&self) -> &'static str {
        match self {
            Self::Person => "person names",
            Self::Email => "email addresses",
            Self::Phone => "phone numbers",
            Self::NationalId => "PESEL numbers",
            Self::TaxId => "NIP tax numbers",
            Self::BusinessId => "REGON numbers",
            Self::BankAccount => "bank account numbers",
            Self::CreditCard => "credit card numbers",
            Self::Address => "street addresses",
            Self::DateOfBirth => "dates of birth",
            Self::IdCard => "identity card numbers",
            Self::Passport => "passport numbers",
            Self::DriverLicense => "driver license numbers",
            Self::LicensePlate => "vehicle license plates",
            Self::IpAddress => "IP addresses",
            Self::Url => "URLs",
            Self::Organization => "organization names",
            Self::Location => "locations",
            Self::Date => "dates",
            Self::Age => "ages",
            Self::Sex => "sex or gender",
            Self::Username => "usernames",
            Self::Secret => "passwords and secrets",
            Self::JobTitle => "job titles",
        }
    }

    /// Category token used by the generalize strategy, if the kind has one
    pub fn category_token(&self) -> Option<&'static str> {
        match self {
            Self::Person => Some("[PERSON]"),
            Self::Email => Some("[EMAIL]"),
            Self::Phone => Some("[PHONE]"),
            Self::NationalId => Some("[PESEL]"),
            Self::Address => Some("[ADDRESS]"),
            Self::BankAccount => Some("[BANK ACCOUNT]"),
            Self::CreditCard => Some("[CARD]"),
            Self::DateOfBirth => Some("[DATE]"),
            _ => None,
        }
    }

    /// Resolve a label from a foreign vocabulary
    ///
    /// Accepts canonical labels plus the aliases produced by language models
    /// and NER tools (`IBAN`, `NAME`, `NAZWISKO`, `TELEFON`, `FIRMA`, ...).
    /// Anything else resolves to `None` and must be dropped by the caller.
    pub fn from_alias(label: &str) -> Option<Self> {
        let normalized = label.trim().to_uppercase().replace([' ', '-'], "_");
        if let Ok(kind) = normalized.parse() {
            return Some(kind);
        }

        const ALIASES: [(&str, EntityKind); 15] = [
            ("NAZWISKO", EntityKind::Person),
            ("IMIE", EntityKind::Person),
            ("NAME", EntityKind::Person),
            ("PER", EntityKind::Person),
            ("TELEFON", EntityKind::Phone),
            ("MAIL", EntityKind::Email),
            ("ADRES", EntityKind::Address),
            ("KARTA", EntityKind::CreditCard),
            ("DOWOD", EntityKind::IdCard),
            ("PASZPORT", EntityKind::Passport),
            ("FIRMA", EntityKind::Organization),
            ("ORG", EntityKind::Organization),
            ("GPE", EntityKind::Location),
            ("LOC", EntityKind::Location),
            ("DATA", EntityKind::Date),
        ];

        if let Some((_, kind)) = ALIASES.iter().find(|(alias, _)| normalized == *alias) {
            return Some(*kind);
        }
        ALIASES
            .iter()
            .filter(|(alias, _)| alias.len() > 3)
            .find(|(alias, _)| normalized.contains(alias))
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IBAN" => Ok(Self::BankAccount),
            "PHONE_NUMBER" => Ok(Self::Phone),
            "CREDIT_CARD_NUMBER" | "CARD" => Ok(Self::CreditCard),
            "BIRTH_DATE" | "DOB" => Ok(Self::DateOfBirth),
            "IP" => Ok(Self::IpAddress),
            "VEHICLE_REGISTRATION" => Ok(Self::LicensePlate),
            other => Self::ALL
                .iter()
                .find(|kind| kind.label() == other)
                .copied()
                .ok_or_else(|| format!("Unknown entity kind: {s}")),
        }
    }
}
