//! National document number (CPF) with check-digit verification.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::formatter::{DOCUMENT_NUMBER_DIGITS, format_document_number, to_digits_only};

/// Validation errors returned by [`DocumentNumber::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentNumberError {
    #[error("document number must contain {expected} digits")]
    WrongLength { expected: usize, actual: usize },
    #[error("invalid document number")]
    RepeatedDigits,
    #[error("invalid document number")]
    ChecksumMismatch,
}

/// Eleven-digit document number whose two trailing check digits verify.
///
/// ## Invariants
/// - Holds exactly [`DOCUMENT_NUMBER_DIGITS`] ASCII digits.
/// - The digits are not all identical.
/// - Both check digits match [`check_digit`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentNumber(String);

impl DocumentNumber {
    /// Normalize `raw` to digits and validate it.
    ///
    /// Punctuation is ignored, so masked and canonical input parse alike.
    ///
    /// # Examples
    /// ```
    /// use intake::domain::DocumentNumber;
    ///
    /// let number = DocumentNumber::parse("111.444.777-35").expect("valid");
    /// assert_eq!(number.as_ref(), "11144477735");
    /// assert!(DocumentNumber::parse("111.444.777-36").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, DocumentNumberError> {
        let digits = to_digits_only(raw);
        if digits.len() != DOCUMENT_NUMBER_DIGITS {
            return Err(DocumentNumberError::WrongLength {
                expected: DOCUMENT_NUMBER_DIGITS,
                actual: digits.len(),
            });
        }

        let values: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
        if values.windows(2).all(|pair| pair.first() == pair.last()) {
            return Err(DocumentNumberError::RepeatedDigits);
        }

        let (body, check) = values.split_at(DOCUMENT_NUMBER_DIGITS - 2);
        let first = check_digit(body);
        let second = check_digit(values.get(..DOCUMENT_NUMBER_DIGITS - 1).unwrap_or_default());
        if check != [first, second] {
            return Err(DocumentNumberError::ChecksumMismatch);
        }

        Ok(Self(digits))
    }

    /// Masked form for display, e.g. `111.444.777-35`.
    pub fn masked(&self) -> String {
        format_document_number(&self.0)
    }
}

/// Compute one check digit over `digits`.
///
/// Weights run from `digits.len() + 1` down to 2. The weighted sum is
/// multiplied by ten and reduced modulo eleven, with a remainder of ten
/// folded to zero.
pub fn check_digit(digits: &[u32]) -> u32 {
    let heaviest = u32::try_from(digits.len()).unwrap_or(u32::MAX).saturating_add(1);
    let sum: u32 = digits
        .iter()
        .zip((2..=heaviest).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();
    (sum * 10 % 11) % 10
}

impl AsRef<str> for DocumentNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl From<DocumentNumber> for String {
    fn from(value: DocumentNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for DocumentNumber {
    type Error = DocumentNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
