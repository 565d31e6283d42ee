//! CUIT (Clave Única de Identificación Tributaria) validation.
//!
//! A CUIT is 11 decimal digits where the last one is a check digit computed
//! from the first ten with a weighted modulo-11 sum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digits in a cleaned CUIT.
pub const CUIT_LENGTH: usize = 11;

const MULTIPLIERS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

/// Reason a candidate string is not a valid CUIT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CuitError {
    /// Cleaned value does not have exactly 11 characters.
    WrongLength(usize),
    /// Cleaned value contains something other than ASCII digits.
    NonDigit,
    /// Check digit does not match the first ten digits.
    Checksum { expected: u32, found: u32 },
}

impl fmt::Display for CuitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CuitError::WrongLength(len) => {
                write!(f, "expected {} digits, got {}", CUIT_LENGTH, len)
            }
            CuitError::NonDigit => write!(f, "contains non-digit characters"),
            CuitError::Checksum { expected, found } => write!(
                f,
                "check digit mismatch (expected {}, found {})",
                expected, found
            ),
        }
    }
}

impl std::error::Error for CuitError {}

/// Strips hyphens and whitespace, the separators users paste CUITs with
/// (`20-34023207-1`, `20 34023207 1`).
pub fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Computes the expected check digit for the first ten digits.
fn check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip(MULTIPLIERS.iter())
        .map(|(d, m)| d * m)
        .sum();

    let remainder = sum % 11;
    if remainder < 2 {
        remainder
    } else {
        11 - remainder
    }
}

fn validate(cleaned: &str) -> Result<(), CuitError> {
    let len = cleaned.chars().count();
    if len != CUIT_LENGTH {
        return Err(CuitError::WrongLength(len));
    }

    let digits: Vec<u32> = cleaned
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                c.to_digit(10)
            } else {
                None
            }
        })
        .collect::<Option<Vec<_>>>()
        .ok_or(CuitError::NonDigit)?;

    let expected = check_digit(&digits[..10]);
    let found = digits[10];
    if expected != found {
        return Err(CuitError::Checksum { expected, found });
    }

    Ok(())
}

/// Returns true if `raw`, once separators are stripped, is a valid CUIT.
pub fn is_valid(raw: &str) -> bool {
    validate(&clean(raw)).is_ok()
}

/// A validated, separator-free CUIT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cuit(String);

impl Cuit {
    /// Cleans and validates `raw`.
    pub fn parse(raw: &str) -> Result<Self, CuitError> {
        let cleaned = clean(raw);
        validate(&cleaned)?;
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats as `XX-XXXXXXXX-X`.
    pub fn formatted(&self) -> String {
        format!("{}-{}-{}", &self.0[..2], &self.0[2..10], &self.0[10..])
    }
}

impl FromStr for Cuit {
    type Err = CuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cuit {
    type Error = CuitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cuit> for String {
    fn from(cuit: Cuit) -> Self {
        cuit.0
    }
}

impl AsRef<str> for Cuit {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cuits() {
        assert!(is_valid("20340232071"));
        assert!(is_valid("20123456786"));
        assert!(is_valid("30500010912"));
        assert!(is_valid("27987654320"));
    }

    #[test]
    fn test_remainder_below_two_uses_remainder() {
        // 2*5 + 1*2 = 12, 12 % 11 = 1
        assert!(is_valid("20000000011"));
        assert!(!is_valid("20000000010"));
    }

    #[test]
    fn test_separators_are_stripped() {
        assert!(is_valid("20-34023207-1"));
        assert!(is_valid(" 20 34023207 1 "));
        assert!(is_valid("20-34023207-1\t"));
    }

    #[test]
    fn test_wrong_check_digit() {
        assert!(!is_valid("20340232070"));
        assert!(!is_valid("20123456789"));
    }

    #[test]
    fn test_wrong_length_or_content() {
        assert!(!is_valid(""));
        assert!(!is_valid("2034023207"));
        assert!(!is_valid("203402320711"));
        assert!(!is_valid("2034O232071"));
        assert!(!is_valid("20.34023207.1"));
        // Non-ASCII digits are not accepted
        assert!(!is_valid("٢٠٣٤٠٢٣٢٠٧١"));
    }

    #[test]
    fn test_parse_reports_reason() {
        assert_eq!(Cuit::parse("123"), Err(CuitError::WrongLength(3)));
        assert_eq!(Cuit::parse("2034023207a"), Err(CuitError::NonDigit));
        assert_eq!(
            Cuit::parse("20340232070"),
            Err(CuitError::Checksum {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn test_parse_cleans_value() {
        let cuit = Cuit::parse("20-34023207-1").unwrap();
        assert_eq!(cuit.as_str(), "20340232071");
        assert_eq!(cuit.formatted(), "20-34023207-1");
        assert_eq!(cuit.to_string(), "20340232071");
    }

    #[test]
    fn test_serde_roundtrip_rejects_invalid() {
        let cuit: Cuit = serde_json::from_str("\"20-34023207-1\"").unwrap();
        assert_eq!(serde_json::to_string(&cuit).unwrap(), "\"20340232071\"");
        assert!(serde_json::from_str::<Cuit>("\"20340232070\"").is_err());
    }

    #[test]
    fn test_validation_is_idempotent() {
        for candidate in ["20340232071", "20340232070", "abc", ""] {
            assert_eq!(is_valid(candidate), is_valid(candidate));
        }
    }
}
