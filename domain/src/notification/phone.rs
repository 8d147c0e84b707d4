//! Phone number normalization
//!
//! SMS providers are addressed with a fixed-length local number. Anything
//! that does not reduce to exactly [`LOCAL_DIGITS`] digits is rejected before
//! a provider is ever called.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default country calling code (Cameroon)
pub const DEFAULT_COUNTRY_CODE: &str = "237";

/// Length of a local number
pub const LOCAL_DIGITS: usize = 9;

/// A normalized local phone number (Value Object)
///
/// # Example
///
/// ```
/// use combis_domain::notification::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+237 6 99 12 34 56").unwrap();
/// assert_eq!(phone.as_str(), "699123456");
/// assert!(PhoneNumber::parse("69912345").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize using the default country code
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        Self::parse_with_country(raw, DEFAULT_COUNTRY_CODE)
    }

    /// Normalize `raw` to a local number, stripping `country_code` when present
    ///
    /// All non-digit characters are removed first. The country code is only
    /// stripped when the remaining digits are longer than a local number, so a
    /// local number that happens to begin with the same digits is kept intact.
    pub fn parse_with_country(raw: &str, country_code: &str) -> Result<Self, DomainError> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        let local = match digits.strip_prefix(country_code) {
            Some(rest) if digits.len() > LOCAL_DIGITS && !country_code.is_empty() => rest,
            _ => digits.as_str(),
        };

        if local.len() != LOCAL_DIGITS {
            return Err(DomainError::InvalidPhone(raw.to_string()));
        }

        Ok(Self(local.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number prefixed with the country code, without `+`
    pub fn international(&self, country_code: &str) -> String {
        format!("{}{}", country_code, self.0)
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_forms_normalize_to_local() {
        for raw in ["+237699123456", "237699123456", "699123456"] {
            assert_eq!(PhoneNumber::parse(raw).unwrap().as_str(), "699123456", "{raw}");
        }
    }

    #[test]
    fn test_separators_are_ignored() {
        assert_eq!(
            PhoneNumber::parse("+237 699-12-34-56").unwrap().as_str(),
            "699123456"
        );
        assert_eq!(PhoneNumber::parse("(699) 12 34 56").unwrap().as_str(), "699123456");
    }

    #[test]
    fn test_wrong_length_after_country_code_fails() {
        // 8 digits
        assert!(PhoneNumber::parse("+23769912345").is_err());
        assert!(PhoneNumber::parse("23769912345").is_err());
        assert!(PhoneNumber::parse("69912345").is_err());
        // 10 digits
        assert!(PhoneNumber::parse("+2376991234567").is_err());
        assert!(PhoneNumber::parse("6991234567").is_err());
    }

    #[test]
    fn test_local_number_starting_with_country_digits() {
        assert_eq!(PhoneNumber::parse("237123456").unwrap().as_str(), "237123456");
    }

    #[test]
    fn test_error_keeps_raw_input() {
        let err = PhoneNumber::parse("abc").unwrap_err();
        assert_eq!(err, DomainError::InvalidPhone("abc".to_string()));
    }

    #[test]
    fn test_international() {
        let phone = PhoneNumber::parse("699123456").unwrap();
        assert_eq!(phone.international("237"), "237699123456");
    }
}
