//! Tests for whole-record validation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn valid_fields() -> FormFields {
    FormFields {
        given_name: "João".to_owned(),
        family_name: "da Silva".to_owned(),
        document_number: "11144477735".to_owned(),
        email: "joao.silva@example.com.br".to_owned(),
        postal_code: "01310000".to_owned(),
        address: AddressFields::default(),
    }
}

#[rstest]
fn accepts_complete_record_without_address(valid_fields: FormFields) {
    let user = validate(&valid_fields).expect("valid record");
    assert_eq!(user.given_name.as_ref(), "João");
    assert_eq!(user.document_number.as_ref(), "11144477735");
    assert_eq!(user.postal_code.as_ref(), "01310000");
    assert_eq!(user.address, AddressFields::default());
}

#[rstest]
fn normalizes_masked_fields(mut valid_fields: FormFields) {
    valid_fields.document_number = "111.444.777-35".to_owned();
    valid_fields.postal_code = "01310-000".to_owned();
    let user = validate(&valid_fields).expect("masked input is accepted");
    assert_eq!(user.document_number.as_ref(), "11144477735");
    assert_eq!(user.postal_code.as_ref(), "01310000");
}

#[rstest]
#[case("A", "given name must be at least 2 characters")]
#[case("", "given name must be at least 2 characters")]
#[case("R2D2", "given name must contain only letters")]
#[case("Ana-Maria", "given name must contain only letters")]
fn rejects_invalid_given_names(
    mut valid_fields: FormFields,
    #[case] name: &str,
    #[case] message: &str,
) {
    valid_fields.given_name = name.to_owned();
    let errors = validate(&valid_fields).expect_err("invalid name");
    assert_eq!(errors.get(FormField::GivenName), Some(message));
    assert_eq!(errors.len(), 1);
}

#[rstest]
#[case("Zoë")]
#[case("Müller")]
#[case("Ôrlando Júnior")]
fn accepts_accented_names(mut valid_fields: FormFields, #[case] name: &str) {
    valid_fields.family_name = name.to_owned();
    assert!(validate(&valid_fields).is_ok(), "{name} should be accepted");
}

#[rstest]
#[case("plainaddress")]
#[case("@example.com")]
#[case("ada@example")]
#[case("ada..lovelace@example.com")]
#[case(".ada@example.com")]
#[case("ada@example.c")]
fn rejects_malformed_emails(mut valid_fields: FormFields, #[case] email: &str) {
    valid_fields.email = email.to_owned();
    let errors = validate(&valid_fields).expect_err("invalid email");
    assert_eq!(errors.get(FormField::Email), Some("invalid email"));
}

#[rstest]
#[case("11144477735", None)]
#[case("11111111111", Some("invalid document number"))]
#[case("11144477736", Some("invalid document number"))]
#[case("1114447773", Some("document number must contain 11 digits"))]
fn checks_document_number(
    mut valid_fields: FormFields,
    #[case] document_number: &str,
    #[case] expected: Option<&str>,
) {
    valid_fields.document_number = document_number.to_owned();
    let message = validate(&valid_fields)
        .err()
        .and_then(|errors| errors.get(FormField::DocumentNumber).map(str::to_owned));
    assert_eq!(message.as_deref(), expected);
}

#[rstest]
#[case("01310000", None)]
#[case("0131000", Some("postal code must contain 8 digits"))]
fn checks_postal_code(
    mut valid_fields: FormFields,
    #[case] postal_code: &str,
    #[case] expected: Option<&str>,
) {
    valid_fields.postal_code = postal_code.to_owned();
    let message = validate(&valid_fields)
        .err()
        .and_then(|errors| errors.get(FormField::PostalCode).map(str::to_owned));
    assert_eq!(message.as_deref(), expected);
}

#[test]
fn reports_every_failing_field() {
    let errors = validate(&FormFields::default()).expect_err("empty record");
    let failing: Vec<FormField> = errors.iter().map(|(field, _)| field).collect();
    assert_eq!(
        failing,
        vec![
            FormField::GivenName,
            FormField::FamilyName,
            FormField::DocumentNumber,
            FormField::Email,
            FormField::PostalCode,
        ]
    );
}

#[rstest]
fn validation_is_repeatable(valid_fields: FormFields) {
    let first = validate(&valid_fields).expect("first pass");
    let second = validate(&valid_fields).expect("second pass");
    assert_eq!(first, second);
}

#[test]
fn field_errors_convert_to_invalid_request() {
    let errors = validate(&FormFields::default()).expect_err("empty record");
    let error = Error::from(errors);
    assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    let details = error.details().expect("details attached");
    assert_eq!(
        details["fieldErrors"]["postalCode"],
        Value::from("postal code must contain 8 digits")
    );
}

#[rstest]
#[case("J", "must be at least 2 characters")]
#[case("J0ão", "must contain only letters")]
fn name_errors_read_as_field_messages(#[case] name: &str, #[case] message: &str) {
    let error: Box<dyn std::error::Error> =
        Box::new(PersonName::new(name).expect_err("invalid name"));
    assert_eq!(error.to_string(), message);
}
