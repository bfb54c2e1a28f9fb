//! Whole-record validation run at submit time.
//!
//! [`validate`] checks every field of a [`FormFields`] value and either
//! returns the normalized [`ValidatedUser`] or a [`FieldErrors`] map with one
//! message per failing field. It never stops at the first failure, so the
//! form can show all problems at once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::json;

use super::document_number::DocumentNumber;
use super::error::Error;
use super::postal_code::PostalCode;
use super::user_record::{AddressFields, FormField, FormFields};

/// Minimum number of characters in a given or family name.
pub const NAME_MIN: usize = 2;

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        // ASCII letters, the Latin-1 accented ranges, and whitespace.
        let pattern = r"^[A-Za-zÀ-ÖØ-öø-ÿ\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validation errors for name fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
    #[error("must contain only letters")]
    InvalidCharacters,
}

/// Given or family name: two or more letters, accents and spaces allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        if name.chars().count() < NAME_MIN {
            return Err(NameError::TooShort { min: NAME_MIN });
        }
        if !name_regex().is_match(&name) {
            return Err(NameError::InvalidCharacters);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Syntactically valid e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

/// Returned when an e-mail address does not have the `local@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid email")]
pub struct EmailError;

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, EmailError> {
        let email = email.into();
        if email.starts_with('.') || email.contains("..") || !email_regex().is_match(&email) {
            return Err(EmailError);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Normalized output of a successful [`validate`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedUser {
    pub given_name: PersonName,
    pub family_name: PersonName,
    pub document_number: DocumentNumber,
    pub email: EmailAddress,
    pub postal_code: PostalCode,
    #[serde(flatten)]
    pub address: AddressFields,
}

/// Field-level messages produced by a failed [`validate`] call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    fn insert(&mut self, field: FormField, message: impl fmt::Display) {
        self.0.insert(field, message.to_string());
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl From<FieldErrors> for Error {
    fn from(value: FieldErrors) -> Self {
        Error::invalid_request("form validation failed")
            .with_details(json!({ "fieldErrors": value }))
    }
}

fn name_message(label: &str, error: &NameError) -> String {
    format!("{label} {error}")
}

/// Validate a whole record.
///
/// Masked fields are normalized to digits before they are checked, so both
/// `111.444.777-35` and `11144477735` are accepted. Address fields are
/// optional and pass through untouched.
///
/// # Examples
/// ```
/// use intake::domain::{FormField, FormFields, validate};
///
/// let fields = FormFields {
///     given_name: "Ada".into(),
///     family_name: "Lovelace".into(),
///     document_number: "111.444.777-35".into(),
///     email: "ada@example.com".into(),
///     postal_code: "01310-000".into(),
///     ..FormFields::default()
/// };
/// let user = validate(&fields).expect("valid record");
/// assert_eq!(user.document_number.as_ref(), "11144477735");
///
/// let errors = validate(&FormFields::default()).expect_err("empty record");
/// assert!(errors.get(FormField::Email).is_some());
/// ```
pub fn validate(fields: &FormFields) -> Result<ValidatedUser, FieldErrors> {
    let mut errors = FieldErrors::default();

    let given_name = PersonName::new(fields.given_name.as_str())
        .map_err(|error| errors.insert(FormField::GivenName, name_message("given name", &error)))
        .ok();
    let family_name = PersonName::new(fields.family_name.as_str())
        .map_err(|error| {
            errors.insert(FormField::FamilyName, name_message("family name", &error));
        })
        .ok();
    let document_number = DocumentNumber::parse(&fields.document_number)
        .map_err(|error| errors.insert(FormField::DocumentNumber, error))
        .ok();
    let email = EmailAddress::new(fields.email.as_str())
        .map_err(|error| errors.insert(FormField::Email, error))
        .ok();
    let postal_code = PostalCode::parse(&fields.postal_code)
        .map_err(|error| errors.insert(FormField::PostalCode, error))
        .ok();

    match (given_name, family_name, document_number, email, postal_code) {
        (
            Some(given_name),
            Some(family_name),
            Some(document_number),
            Some(email),
            Some(postal_code),
        ) if errors.is_empty() => Ok(ValidatedUser {
            given_name,
            family_name,
            document_number,
            email,
            postal_code,
            address: fields.address.clone(),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests;
