//! Postal code (CEP) in canonical eight-digit form.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::formatter::{POSTAL_CODE_DIGITS, format_postal_code, to_digits_only};

/// Validation errors returned by [`PostalCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostalCodeError {
    #[error("postal code must contain {expected} digits")]
    WrongLength { expected: usize, actual: usize },
}

/// Postal code holding exactly [`POSTAL_CODE_DIGITS`] ASCII digits.
///
/// This is the key for directory lookups and the trigger value tagged onto
/// every resolution chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Normalize `raw` to digits and require exactly eight of them.
    ///
    /// # Examples
    /// ```
    /// use intake::domain::PostalCode;
    ///
    /// assert_eq!(PostalCode::parse("01310-000").expect("valid").as_ref(), "01310000");
    /// assert!(PostalCode::parse("0131000").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, PostalCodeError> {
        let digits = to_digits_only(raw);
        if digits.len() != POSTAL_CODE_DIGITS {
            return Err(PostalCodeError::WrongLength {
                expected: POSTAL_CODE_DIGITS,
                actual: digits.len(),
            });
        }
        Ok(Self(digits))
    }

    /// Masked form for display, e.g. `01310-000`.
    pub fn masked(&self) -> String {
        format_postal_code(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostalCode {
    type Error = PostalCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("01310000")]
    #[case("01310-000")]
    #[case(" 01310 000 ")]
    fn accepts_eight_digits(#[case] raw: &str) {
        let code = PostalCode::parse(raw).expect("valid postal code");
        assert_eq!(code.as_ref(), "01310000");
        assert_eq!(code.masked(), "01310-000");
    }

    #[rstest]
    #[case("0131000", 7)]
    #[case("013100001", 9)]
    #[case("", 0)]
    fn rejects_other_lengths(#[case] raw: &str, #[case] actual: usize) {
        let error = PostalCode::parse(raw).expect_err("wrong length");
        assert_eq!(
            error,
            PostalCodeError::WrongLength {
                expected: POSTAL_CODE_DIGITS,
                actual,
            }
        );
        assert_eq!(error.to_string(), "postal code must contain 8 digits");
    }

    #[test]
    fn error_boxes_as_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(PostalCode::parse("0131").expect_err("too short"));
        assert_eq!(error.to_string(), "postal code must contain 8 digits");
    }
}
