//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::validator::{is_valid_email, max_chars};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not match the accepted address shape.
    #[error("email address is malformed")]
    Malformed,
}

/// An email address accepted by the signup and venue forms.
///
/// Shares its shape check with [`crate::validator::is_valid_email`], so any
/// address that passed form validation parses here and values read back from
/// the database can be re-checked cheaply.
///
/// ```
/// use venue_verge_core::Email;
///
/// assert!(Email::parse("a@b.com").is_ok());
/// assert!(Email::parse("not-an-address").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length accepted by the forms and the `users.email` column.
    pub const MAX_LENGTH: usize = 100;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than
    /// [`Email::MAX_LENGTH`] characters, or not shaped like an address.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if !max_chars(s, Self::MAX_LENGTH) {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !is_valid_email(s) {
            return Err(EmailError::Malformed);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("a@b.com").is_ok());
        assert!(Email::parse("owner.name+venues@hall-a.example.org").is_ok());
        assert!(Email::parse("localhost@intranet").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(95));
        assert_eq!(
            Email::parse(&long),
            Err(EmailError::TooLong {
                max: Email::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@domain.com"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("user@"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("user@-bad.com"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_display_and_as_ref() {
        let email = Email::parse("a@b.com").unwrap();
        assert_eq!(email.to_string(), "a@b.com");
        let s: &str = email.as_ref();
        assert_eq!(s, "a@b.com");
    }
}
