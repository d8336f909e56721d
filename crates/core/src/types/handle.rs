//! Login handle type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Handle`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum HandleError {
    /// The input string is empty.
    #[error("handle cannot be empty")]
    Empty,
    /// The input string is too short.
    #[error("handle must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("handle must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9_-]`.
    #[error("handle may only contain letters, digits, '-' and '_'")]
    InvalidCharacter,
}

/// A login handle: the URL-safe identifier that addresses an account in
/// the member directory (`/network/{handle}`).
///
/// Distinct from the email, which is the login identity. Handles are
/// lowercased on parse so directory URLs are case-insensitive.
///
/// ## Constraints
///
/// - Length: 3-30 characters
/// - ASCII letters, digits, `-` and `_` only
///
/// ## Examples
///
/// ```
/// use copper_paws_core::Handle;
///
/// let handle = Handle::parse("Pat-Smith_99").unwrap();
/// assert_eq!(handle.as_str(), "pat-smith_99");
///
/// assert!(Handle::parse("").is_err());
/// assert!(Handle::parse("ab").is_err());
/// assert!(Handle::parse("has space").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Minimum length of a handle.
    pub const MIN_LENGTH: usize = 3;

    /// Maximum length of a handle.
    pub const MAX_LENGTH: usize = 30;

    /// Parse and normalize a `Handle` from a string.
    ///
    /// Surrounding whitespace is trimmed and the handle is lowercased.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, outside the length
    /// bounds, or contains a character outside `[a-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, HandleError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(HandleError::Empty);
        }

        if s.len() < Self::MIN_LENGTH {
            return Err(HandleError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(HandleError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let normalized = s.to_lowercase();

        if !normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(HandleError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Handle` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_handles() {
        assert!(Handle::parse("pat").is_ok());
        assert!(Handle::parse("pat-smith").is_ok());
        assert!(Handle::parse("pat_smith_99").is_ok());
        assert!(Handle::parse("a".repeat(30).as_str()).is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Handle::parse(""), Err(HandleError::Empty)));
        assert!(matches!(Handle::parse("  "), Err(HandleError::Empty)));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Handle::parse("ab"),
            Err(HandleError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Handle::parse("a".repeat(31).as_str()),
            Err(HandleError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            Handle::parse("has space"),
            Err(HandleError::InvalidCharacter)
        ));
        assert!(matches!(
            Handle::parse("pat@smith"),
            Err(HandleError::InvalidCharacter)
        ));
        assert!(matches!(
            Handle::parse("pät"),
            Err(HandleError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_lowercases() {
        let handle = Handle::parse("PatSmith").unwrap();
        assert_eq!(handle.as_str(), "patsmith");
    }

    #[test]
    fn test_serde_roundtrip() {
        let handle = Handle::parse("pat-smith").unwrap();
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(json, "\"pat-smith\"");

        let parsed: Handle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, handle);
    }
}
