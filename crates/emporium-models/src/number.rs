//! The validated order-number key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix every order number carries, assigned by the storefront.
const PREFIX: &str = "EM-";

/// A human-readable order code of the form `EM-` followed by one or more
/// alphanumeric characters, e.g. `EM-AB12CD`.
///
/// Stored uppercase; [`OrderNumber::parse`] accepts any letter case and
/// normalizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Parses user input into an order number.
    ///
    /// Returns `None` when the input does not match the `EM-` grammar;
    /// otherwise the code is normalized to uppercase.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let prefix = input.get(..PREFIX.len())?;
        if !prefix.eq_ignore_ascii_case(PREFIX) {
            return None;
        }
        let suffix = &input[PREFIX.len()..];
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(input.to_ascii_uppercase()))
    }

    /// Creates an order number from an existing string (for deserialization/testing).
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        let number = OrderNumber::parse("em-ab12cd").unwrap();
        assert_eq!(number.as_str(), "EM-AB12CD");
    }

    #[test]
    fn test_parse_accepts_canonical_form() {
        let number = OrderNumber::parse("EM-123456").unwrap();
        assert_eq!(number.as_str(), "EM-123456");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let number = OrderNumber::parse("  EM-42  ").unwrap();
        assert_eq!(number.as_str(), "EM-42");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(OrderNumber::parse("EM-").is_none());
        assert!(OrderNumber::parse("XX-AB12").is_none());
        assert!(OrderNumber::parse("EM-AB 12").is_none());
        assert!(OrderNumber::parse("EM-AB_12").is_none());
        assert!(OrderNumber::parse("").is_none());
    }

    #[test]
    fn test_serialization() {
        let number = OrderNumber::from_string("EM-TEST1");
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"EM-TEST1\"");

        let parsed: OrderNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, number);
    }

    #[test]
    fn test_display() {
        let number = OrderNumber::from_string("EM-123");
        assert_eq!(format!("{}", number), "EM-123");
    }
}
