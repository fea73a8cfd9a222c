//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structural `local@domain` pattern.
///
/// The local part is either a dot-separated run of non-special characters or
/// a quoted string. The domain is either a bracketed IPv4 literal or a dotted
/// host name ending in an alphabetic label of at least two characters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("Invalid regex")
});

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The input does not have a valid `local@domain` structure.
    #[error("email is not a valid address: {0}")]
    Malformed(String),
}

/// An email address.
///
/// Matching is case-insensitive: the input is lower-cased before it is
/// checked, but the original spelling is what gets stored.
///
/// ## Examples
///
/// ```
/// use vitrine_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("\"john doe\"@example.com").is_ok());
/// assert!(Email::parse("ops@[192.168.0.1]").is_ok());
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());                  // empty
/// assert!(Email::parse("user@@example.com").is_err()); // doubled @
/// assert!(Email::parse("a@b").is_err());               // no TLD
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, has no @ symbol, or does not
    /// match the structural `local@domain` pattern.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if !s.contains('@') {
            return Err(EmailError::MissingAtSymbol);
        }

        if !EMAIL_RE.is_match(&s.to_lowercase()) {
            return Err(EmailError::Malformed(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// The address as typed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_dotted_and_tagged_addresses() {
        for input in [
            "user@example.com",
            "first.last@example.com",
            "maria+vitrine@mail.example.com.br",
            "x_y-z@host-1.io",
        ] {
            assert!(Email::parse(input).is_ok(), "{input} should be accepted");
        }
    }

    #[test]
    fn test_parse_quoted_local_part() {
        assert!(Email::parse("\"john..doe\"@example.com").is_ok());
    }

    #[test]
    fn test_parse_bracketed_ipv4_domain() {
        assert!(Email::parse("admin@[10.0.0.1]").is_ok());
        assert!(Email::parse("admin@[10.0.0]").is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_missing_at() {
        assert_eq!(
            Email::parse("no-at-symbol"),
            Err(EmailError::MissingAtSymbol)
        );
    }

    #[test]
    fn test_parse_double_at() {
        assert!(matches!(
            Email::parse("user@@example.com"),
            Err(EmailError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_missing_tld() {
        assert!(matches!(Email::parse("a@b"), Err(EmailError::Malformed(_))));
        assert!(Email::parse("a@b.c").is_err());
    }

    #[test]
    fn test_parse_rejects_special_characters_and_dots() {
        assert!(Email::parse("us er@example.com").is_err());
        assert!(Email::parse(".user@example.com").is_err());
        assert!(Email::parse("user.@example.com").is_err());
        assert!(Email::parse("user@example.com ").is_err());
        assert!(Email::parse("@example.com").is_err());
        assert!(Email::parse("user@").is_err());
    }

    #[test]
    fn test_case_insensitive_match_keeps_spelling() {
        let email: Email = "Ada@Example.COM".parse().unwrap();
        assert_eq!(email.to_string(), "Ada@Example.COM");
        assert_eq!(email.as_str(), "Ada@Example.COM");
    }
}
