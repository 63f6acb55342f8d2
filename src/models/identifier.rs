//! Vehicle identifiers (registration numbers).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when a raw registration number cannot be used as an
/// identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    /// The registration number was empty or consisted only of whitespace.
    #[error("Registration number must not be empty")]
    Empty,
}

/// A normalized vehicle registration number.
///
/// Normalization trims surrounding whitespace and upper-cases the value, so
/// `" ab123 "` and `"AB123"` name the same vehicle. Every ingestion point
/// (snapshot parsing, commands, lookups) goes through [`Identifier::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Normalizes a raw registration number.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(IdentifierError::Empty);
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized registration number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let id = Identifier::parse("  ab123c ").unwrap();
        assert_eq!(id.as_str(), "AB123C");
        assert_eq!(id, Identifier::parse("AB123C").unwrap());
    }

    #[test]
    fn test_parse_rejects_blank_input() {
        assert_eq!(Identifier::parse(""), Err(IdentifierError::Empty));
        assert_eq!(Identifier::parse("   "), Err(IdentifierError::Empty));
    }

    #[test]
    fn test_deserialize_applies_normalization() {
        let id: Identifier = serde_json::from_str(r#""xy 77""#).unwrap();
        assert_eq!(id.as_str(), "XY 77");

        let blank: Result<Identifier, _> = serde_json::from_str(r#""  ""#);
        assert!(blank.is_err());
    }
}
