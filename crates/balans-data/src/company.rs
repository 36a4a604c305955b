//! Belgian company (enterprise) numbers.
//!
//! The registry identifies a legal entity by its enterprise number, which users
//! type in many shapes: `0428.003.392`, `BE 0428.003.392`, `BE0428003392`.
//! Everything that is not a digit is dropped before the length is checked.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated enterprise number made of 10 or 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyNumber(String);

impl CompanyNumber {
    /// Clean and validate a company number.
    ///
    /// Non-digit characters are stripped first; the remaining digits must be
    /// 10 or 11 long.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidCompanyNumber`] on a length mismatch.
    ///
    /// # Example
    /// ```
    /// use balans_data::CompanyNumber;
    ///
    /// let number = CompanyNumber::parse("BE 0428.003.392").unwrap();
    /// assert_eq!(number.as_str(), "0428003392");
    /// assert!(CompanyNumber::parse("123").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let digits: String = input.trim().chars().filter(char::is_ascii_digit).collect();

        if matches!(digits.len(), 10 | 11) {
            Ok(Self(digits))
        } else {
            Err(DataError::InvalidCompanyNumber {
                input: input.to_string(),
                digits: digits.len(),
            })
        }
    }

    /// Canonical digits-only form used in registry URLs.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form `BE dddd.ddd.ddd`.
    ///
    /// An 11-digit number keeps the extra digit in the last group.
    pub fn display_prefixed(&self) -> String {
        let (head, rest) = self.0.split_at(4);
        let (middle, tail) = rest.split_at(3);
        format!("BE {head}.{middle}.{tail}")
    }
}

impl fmt::Display for CompanyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CompanyNumber {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CompanyNumber {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CompanyNumber> for String {
    fn from(value: CompanyNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for CompanyNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Return a company number in digits-only or `BE dddd.ddd.ddd` form.
///
/// # Errors
/// Returns [`DataError::InvalidCompanyNumber`] when the input does not clean
/// up to 10 or 11 digits.
pub fn format_id(input: &str, prefix: bool) -> Result<String> {
    let number = CompanyNumber::parse(input)?;
    Ok(if prefix {
        number.display_prefixed()
    } else {
        number.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BE 0428.003.392", "0428003392")]
    #[case("0428.003.392", "0428003392")]
    #[case("  BE0473416418 ", "0473416418")]
    #[case("0428.003.392X", "0428003392")]
    #[case("12345678901", "12345678901")]
    fn test_parse_valid(#[case] input: &str, #[case] expected: &str) {
        let number = CompanyNumber::parse(input).unwrap();
        assert_eq!(number.as_str(), expected);
    }

    #[rstest]
    #[case("123")]
    #[case("")]
    #[case("BE 0428.003.392.999")]
    #[case("no digits here")]
    fn test_parse_invalid(#[case] input: &str) {
        let result = CompanyNumber::parse(input);
        assert!(matches!(
            result,
            Err(DataError::InvalidCompanyNumber { .. })
        ));
    }

    #[test]
    fn test_invalid_reports_digit_count() {
        match CompanyNumber::parse("BE 123") {
            Err(DataError::InvalidCompanyNumber { input, digits }) => {
                assert_eq!(input, "BE 123");
                assert_eq!(digits, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_display_prefixed() {
        let number = CompanyNumber::parse("0428003392").unwrap();
        assert_eq!(number.display_prefixed(), "BE 0428.003.392");

        let long = CompanyNumber::parse("12345678901").unwrap();
        assert_eq!(long.display_prefixed(), "BE 1234.567.8901");
    }

    #[test]
    fn test_format_id() {
        assert_eq!(format_id("0473.416.418", false).unwrap(), "0473416418");
        assert_eq!(
            format_id("0473416418", true).unwrap(),
            "BE 0473.416.418"
        );
        assert!(format_id("42", true).is_err());
    }

    #[test]
    fn test_from_str_and_serde() {
        let number: CompanyNumber = "BE 0448.746.645".parse().unwrap();
        assert_eq!(number.to_string(), "0448746645");

        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"0448746645\"");
        let back: CompanyNumber = serde_json::from_str("\"BE 0448.746.645\"").unwrap();
        assert_eq!(back, number);
    }
}
