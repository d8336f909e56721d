//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is not a digit or separator.
    #[error("phone number may only contain digits")]
    InvalidCharacter,
    /// The digit count is not exactly ten.
    #[error("phone number must be exactly {expected} digits")]
    WrongLength {
        /// Required digit count.
        expected: usize,
    },
}

/// A ten-digit phone number.
///
/// Common separators (spaces, dashes, dots, parentheses) are stripped on
/// parse; only the digits are stored.
///
/// ## Examples
///
/// ```
/// use copper_paws_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("(021) 555-0186").unwrap();
/// assert_eq!(phone.as_str(), "0215550186");
///
/// assert!(PhoneNumber::parse("12345").is_err());
/// assert!(PhoneNumber::parse("not a phone").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Required number of digits.
    pub const DIGITS: usize = 10;

    /// Parse a `PhoneNumber` from a string, stripping separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits and separators, or does not contain exactly ten digits.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        let mut digits = String::with_capacity(Self::DIGITS);
        for c in s.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if !matches!(c, ' ' | '-' | '.' | '(' | ')') {
                return Err(PhoneNumberError::InvalidCharacter);
            }
        }

        if digits.len() != Self::DIGITS {
            return Err(PhoneNumberError::WrongLength {
                expected: Self::DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_digits() {
        let phone = PhoneNumber::parse("0215550186").unwrap();
        assert_eq!(phone.as_str(), "0215550186");
    }

    #[test]
    fn test_parse_strips_separators() {
        let phone = PhoneNumber::parse("(021) 555-0186").unwrap();
        assert_eq!(phone.as_str(), "0215550186");

        let phone = PhoneNumber::parse("021.555.0186").unwrap();
        assert_eq!(phone.as_str(), "0215550186");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(PhoneNumber::parse(""), Err(PhoneNumberError::Empty)));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            PhoneNumber::parse("12345"),
            Err(PhoneNumberError::WrongLength { .. })
        ));
        assert!(matches!(
            PhoneNumber::parse("02155501861"),
            Err(PhoneNumberError::WrongLength { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            PhoneNumber::parse("not a phone"),
            Err(PhoneNumberError::InvalidCharacter)
        ));
        assert!(matches!(
            PhoneNumber::parse("+64215550186"),
            Err(PhoneNumberError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = PhoneNumber::parse("0215550186").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"0215550186\"");

        let parsed: PhoneNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
