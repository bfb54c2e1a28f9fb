//! User record collected by the intake form.
//!
//! The record keeps masked fields in canonical digit form; display masks are
//! always derived on the way out and never stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::formatter::{
    DOCUMENT_NUMBER_DIGITS, POSTAL_CODE_DIGITS, canonical_digits, format_document_number,
    format_postal_code,
};

/// Field identifiers accepted by the form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    GivenName,
    FamilyName,
    DocumentNumber,
    Email,
    PostalCode,
    StreetAddress,
    Neighborhood,
    City,
    Region,
}

impl FormField {
    /// Every field in form order.
    pub const ALL: [Self; 9] = [
        Self::GivenName,
        Self::FamilyName,
        Self::DocumentNumber,
        Self::Email,
        Self::PostalCode,
        Self::StreetAddress,
        Self::Neighborhood,
        Self::City,
        Self::Region,
    ];

    /// Wire name used in JSON payloads and route paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GivenName => "givenName",
            Self::FamilyName => "familyName",
            Self::DocumentNumber => "documentNumber",
            Self::Email => "email",
            Self::PostalCode => "postalCode",
            Self::StreetAddress => "streetAddress",
            Self::Neighborhood => "neighborhood",
            Self::City => "city",
            Self::Region => "region",
        }
    }

    /// Whether the field is filled from the postal code directory rather than
    /// typed by the user.
    pub fn is_autofilled(self) -> bool {
        matches!(
            self,
            Self::StreetAddress | Self::Neighborhood | Self::City | Self::Region
        )
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a path segment names no known field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field: {0}")]
pub struct UnknownFormField(pub String);

impl FromStr for FormField {
    type Err = UnknownFormField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownFormField(s.to_owned()))
    }
}

/// Address cluster populated by the postal code directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    #[schema(example = "Avenida Paulista")]
    pub street_address: String,
    #[schema(example = "Bela Vista")]
    pub neighborhood: String,
    #[schema(example = "São Paulo")]
    pub city: String,
    #[schema(example = "SP")]
    pub region: String,
}

impl AddressFields {
    /// Free-text address handed to the geocoder:
    /// `"{street}, {neighborhood}, {city} - {region}"`.
    ///
    /// # Examples
    /// ```
    /// use intake::domain::AddressFields;
    ///
    /// let address = AddressFields {
    ///     street_address: "Av. X".into(),
    ///     neighborhood: "Centro".into(),
    ///     city: "São Paulo".into(),
    ///     region: "SP".into(),
    /// };
    /// assert_eq!(address.composite(), "Av. X, Centro, São Paulo - SP");
    /// ```
    pub fn composite(&self) -> String {
        format!(
            "{}, {}, {} - {}",
            self.street_address, self.neighborhood, self.city, self.region
        )
    }
}

/// Field values as held by the form, masked fields in canonical digits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    #[schema(example = "Ada")]
    pub given_name: String,
    #[schema(example = "Lovelace")]
    pub family_name: String,
    #[schema(example = "11144477735")]
    pub document_number: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "01310000")]
    pub postal_code: String,
    #[serde(flatten)]
    pub address: AddressFields,
}

impl FormFields {
    /// Stored value of `field`.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::GivenName => &self.given_name,
            FormField::FamilyName => &self.family_name,
            FormField::DocumentNumber => &self.document_number,
            FormField::Email => &self.email,
            FormField::PostalCode => &self.postal_code,
            FormField::StreetAddress => &self.address.street_address,
            FormField::Neighborhood => &self.address.neighborhood,
            FormField::City => &self.address.city,
            FormField::Region => &self.address.region,
        }
    }

    /// Value of `field` as shown to the user, masks applied.
    pub fn display_value(&self, field: FormField) -> String {
        match field {
            FormField::DocumentNumber => format_document_number(&self.document_number),
            FormField::PostalCode => format_postal_code(&self.postal_code),
            other => self.value(other).to_owned(),
        }
    }

    pub(crate) fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::GivenName => &mut self.given_name,
            FormField::FamilyName => &mut self.family_name,
            FormField::DocumentNumber => &mut self.document_number,
            FormField::Email => &mut self.email,
            FormField::PostalCode => &mut self.postal_code,
            FormField::StreetAddress => &mut self.address.street_address,
            FormField::Neighborhood => &mut self.address.neighborhood,
            FormField::City => &mut self.address.city,
            FormField::Region => &mut self.address.region,
        }
    }

    /// Copy with the masked fields reduced to canonical digits.
    pub fn canonicalized(&self) -> Self {
        Self {
            document_number: canonical_digits(&self.document_number, DOCUMENT_NUMBER_DIGITS),
            postal_code: canonical_digits(&self.postal_code, POSTAL_CODE_DIGITS),
            ..self.clone()
        }
    }
}

/// Errors raised by [`Coordinates::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatesError {
    #[error("latitude must be a finite value within [-90, 90]")]
    Latitude,
    #[error("longitude must be a finite value within [-180, 180]")]
    Longitude,
}

/// Resolved map position plus the address text it was resolved from.
///
/// A record either carries a complete `Coordinates` or none at all; there is
/// no partially populated state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "CoordinatesDto", into = "CoordinatesDto")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
    #[schema(example = "Avenida Paulista, Bela Vista, São Paulo - SP")]
    display_address: String,
}

impl Coordinates {
    /// Build coordinates, rejecting non-finite or out-of-range values.
    pub fn try_new(
        latitude: f64,
        longitude: f64,
        display_address: impl Into<String>,
    ) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::Latitude);
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::Longitude);
        }
        Ok(Self {
            latitude,
            longitude,
            display_address: display_address.into(),
        })
    }

    /// Latitude in WGS84 degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in WGS84 degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Address text the coordinates were resolved from.
    pub fn display_address(&self) -> &str {
        &self.display_address
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoordinatesDto {
    latitude: f64,
    longitude: f64,
    display_address: String,
}

impl From<Coordinates> for CoordinatesDto {
    fn from(value: Coordinates) -> Self {
        let Coordinates {
            latitude,
            longitude,
            display_address,
        } = value;
        Self {
            latitude,
            longitude,
            display_address,
        }
    }
}

impl TryFrom<CoordinatesDto> for Coordinates {
    type Error = CoordinatesError;

    fn try_from(value: CoordinatesDto) -> Result<Self, Self::Error> {
        Self::try_new(value.latitude, value.longitude, value.display_address)
    }
}

/// Complete user record as held by the parent screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(flatten)]
    pub fields: FormFields,
    pub coordinates: Option<Coordinates>,
}

#[cfg(test)]
mod tests {
    //! Tests for field naming, masking, and coordinate invariants.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn field_names_round_trip_through_from_str() {
        for field in FormField::ALL {
            assert_eq!(field.as_str().parse::<FormField>(), Ok(field));
        }
    }

    #[test]
    fn unknown_field_names_are_rejected() {
        let error = "cpf".parse::<FormField>().expect_err("unknown field");
        assert_eq!(error.to_string(), "unknown form field: cpf");
    }

    #[test]
    fn serde_names_match_wire_names() {
        for field in FormField::ALL {
            let encoded = serde_json::to_value(field).expect("serialise field");
            assert_eq!(encoded, json!(field.as_str()));
        }
    }

    #[test]
    fn display_values_apply_masks() {
        let fields = FormFields {
            document_number: "11144477735".into(),
            postal_code: "01310000".into(),
            given_name: "Ada".into(),
            ..FormFields::default()
        };
        assert_eq!(
            fields.display_value(FormField::DocumentNumber),
            "111.444.777-35"
        );
        assert_eq!(fields.display_value(FormField::PostalCode), "01310-000");
        assert_eq!(fields.display_value(FormField::GivenName), "Ada");
    }

    #[test]
    fn canonicalized_strips_masks() {
        let fields = FormFields {
            document_number: "111.444.777-35".into(),
            postal_code: "01310-000".into(),
            ..FormFields::default()
        };
        let canonical = fields.canonicalized();
        assert_eq!(canonical.document_number, "11144477735");
        assert_eq!(canonical.postal_code, "01310000");
    }

    #[rstest]
    #[case(f64::NAN, 0.0, CoordinatesError::Latitude)]
    #[case(91.0, 0.0, CoordinatesError::Latitude)]
    #[case(0.0, f64::INFINITY, CoordinatesError::Longitude)]
    #[case(0.0, -180.5, CoordinatesError::Longitude)]
    fn coordinates_reject_invalid_values(
        #[case] latitude: f64,
        #[case] longitude: f64,
        #[case] expected: CoordinatesError,
    ) {
        assert_eq!(
            Coordinates::try_new(latitude, longitude, "somewhere"),
            Err(expected)
        );
    }

    #[test]
    fn record_serialises_flat_with_optional_coordinates() {
        let record = UserRecord {
            fields: FormFields {
                given_name: "Ada".into(),
                address: AddressFields {
                    city: "São Paulo".into(),
                    ..AddressFields::default()
                },
                ..FormFields::default()
            },
            coordinates: None,
        };
        let value = serde_json::to_value(&record).expect("serialise record");
        assert_eq!(value["givenName"], json!("Ada"));
        assert_eq!(value["city"], json!("São Paulo"));
        assert_eq!(value["coordinates"], json!(null));
    }

    #[test]
    fn deserialising_partial_coordinates_fails() {
        let payload = json!({ "latitude": -23.5, "displayAddress": "x" });
        assert!(serde_json::from_value::<Coordinates>(payload).is_err());
    }
}
