//! Lock-free core of the form controller.
//!
//! Everything here runs under the controller's mutex and never awaits.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::formatter::{DOCUMENT_NUMBER_DIGITS, POSTAL_CODE_DIGITS, canonical_digits};
use crate::domain::ports::MapView;
use crate::domain::{AddressFields, Coordinates, FormField, FormFields, PostalCode, UserRecord};

/// Identifies one resolution chain.
///
/// A chain may only write to the form while its tag is the one recorded in
/// [`CoordinateState::Resolving`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalenessTag {
    generation: u64,
    postal_code: PostalCode,
}

impl StalenessTag {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn postal_code(&self) -> &PostalCode {
        &self.postal_code
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum CoordinateState {
    Empty,
    Resolving(StalenessTag),
    Resolved(Coordinates),
}

/// Public view of the coordinate state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum CoordinateStatus {
    Empty,
    Resolving,
    Resolved,
}

/// How a chain ended, as applied to the form.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Settlement {
    Located(Coordinates),
    Unlocated,
    UnknownPostalCode,
}

/// What a single edit did to the coordinate state.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum EditEffect {
    Unchanged,
    Started(StalenessTag),
    Cleared,
}

#[derive(Debug)]
pub(super) struct FormState {
    fields: FormFields,
    coordinates: CoordinateState,
    generation: u64,
}

impl FormState {
    pub(super) fn seeded(record: Option<UserRecord>, generation: u64) -> Self {
        let (fields, coordinates) = match record {
            Some(UserRecord {
                fields,
                coordinates,
            }) => (
                fields.canonicalized(),
                coordinates.map_or(CoordinateState::Empty, CoordinateState::Resolved),
            ),
            None => (FormFields::default(), CoordinateState::Empty),
        };
        Self {
            fields,
            coordinates,
            generation,
        }
    }

    pub(super) fn generation(&self) -> u64 {
        self.generation
    }

    pub(super) fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub(super) fn status(&self) -> CoordinateStatus {
        match self.coordinates {
            CoordinateState::Empty => CoordinateStatus::Empty,
            CoordinateState::Resolving(_) => CoordinateStatus::Resolving,
            CoordinateState::Resolved(_) => CoordinateStatus::Resolved,
        }
    }

    pub(super) fn resolved_coordinates(&self) -> Option<Coordinates> {
        match &self.coordinates {
            CoordinateState::Resolved(coordinates) => Some(coordinates.clone()),
            _ => None,
        }
    }

    pub(super) fn map_view(&self) -> Option<MapView> {
        match &self.coordinates {
            CoordinateState::Resolved(coordinates) => Some(MapView::from(coordinates)),
            _ => None,
        }
    }

    /// Store one edit. Masked fields keep only their canonical digits.
    ///
    /// A postal code that reaches eight digits with a new value starts a
    /// chain; one that drops below eight clears the coordinates at once and
    /// orphans any chain in flight.
    pub(super) fn apply_edit(&mut self, field: FormField, raw: &str) -> EditEffect {
        match field {
            FormField::DocumentNumber => {
                self.fields.document_number = canonical_digits(raw, DOCUMENT_NUMBER_DIGITS);
                EditEffect::Unchanged
            }
            FormField::PostalCode => {
                let next = canonical_digits(raw, POSTAL_CODE_DIGITS);
                let previous = std::mem::replace(&mut self.fields.postal_code, next);
                self.postal_code_changed(&previous)
            }
            other => {
                *self.fields.value_mut(other) = raw.to_owned();
                EditEffect::Unchanged
            }
        }
    }

    fn postal_code_changed(&mut self, previous: &str) -> EditEffect {
        match PostalCode::parse(&self.fields.postal_code) {
            Ok(postal_code) if postal_code.as_ref() != previous => {
                self.generation += 1;
                let tag = StalenessTag {
                    generation: self.generation,
                    postal_code,
                };
                self.coordinates = CoordinateState::Resolving(tag.clone());
                EditEffect::Started(tag)
            }
            Ok(_) => EditEffect::Unchanged,
            Err(_) if self.coordinates != CoordinateState::Empty => {
                self.generation += 1;
                self.coordinates = CoordinateState::Empty;
                EditEffect::Cleared
            }
            Err(_) => EditEffect::Unchanged,
        }
    }

    pub(super) fn is_current(&self, tag: &StalenessTag) -> bool {
        matches!(&self.coordinates, CoordinateState::Resolving(current) if current == tag)
    }

    /// Autofill the address cluster if `tag` is still current.
    pub(super) fn autofill(&mut self, tag: &StalenessTag, address: AddressFields) -> bool {
        if !self.is_current(tag) {
            return false;
        }
        self.fields.address = address;
        true
    }

    /// Leave `Resolving` if `tag` is still current.
    pub(super) fn settle(&mut self, tag: &StalenessTag, settlement: Settlement) -> bool {
        if !self.is_current(tag) {
            return false;
        }
        self.coordinates = match settlement {
            Settlement::Located(coordinates) => CoordinateState::Resolved(coordinates),
            Settlement::Unlocated => CoordinateState::Empty,
            Settlement::UnknownPostalCode => {
                self.fields.address = AddressFields::default();
                CoordinateState::Empty
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn state() -> FormState {
        FormState::seeded(None, 0)
    }

    fn start(state: &mut FormState, raw: &str) -> StalenessTag {
        match state.apply_edit(FormField::PostalCode, raw) {
            EditEffect::Started(tag) => tag,
            other => panic!("expected a chain to start, got {other:?}"),
        }
    }

    fn located() -> Coordinates {
        Coordinates::try_new(-23.56, -46.65, "Av. X, Centro, São Paulo - SP").expect("valid")
    }

    #[rstest]
    fn document_number_is_stored_as_capped_digits(mut state: FormState) {
        state.apply_edit(FormField::DocumentNumber, "111.444.777-35999");
        assert_eq!(state.fields().document_number, "11144477735");
    }

    #[rstest]
    #[case("0131")]
    #[case("0131000")]
    fn partial_postal_code_does_not_start_a_chain(mut state: FormState, #[case] raw: &str) {
        assert_eq!(state.apply_edit(FormField::PostalCode, raw), EditEffect::Unchanged);
        assert_eq!(state.status(), CoordinateStatus::Empty);
    }

    #[rstest]
    fn eighth_digit_starts_a_chain(mut state: FormState) {
        let tag = start(&mut state, "01310-000");
        assert_eq!(tag.postal_code().as_ref(), "01310000");
        assert_eq!(tag.generation(), 1);
        assert_eq!(state.status(), CoordinateStatus::Resolving);
    }

    #[rstest]
    fn repeating_the_same_code_does_not_restart(mut state: FormState) {
        start(&mut state, "01310000");
        assert_eq!(
            state.apply_edit(FormField::PostalCode, "01310-000"),
            EditEffect::Unchanged
        );
        assert_eq!(state.generation(), 1);
    }

    #[rstest]
    fn shortening_clears_and_orphans_the_chain(mut state: FormState) {
        let tag = start(&mut state, "01310000");
        assert_eq!(
            state.apply_edit(FormField::PostalCode, "0131000"),
            EditEffect::Cleared
        );
        assert_eq!(state.status(), CoordinateStatus::Empty);
        assert!(!state.settle(&tag, Settlement::Located(located())));
    }

    #[rstest]
    fn unknown_postal_code_clears_address(mut state: FormState) {
        let tag = start(&mut state, "01310000");
        assert!(state.autofill(
            &tag,
            AddressFields {
                city: "São Paulo".into(),
                ..AddressFields::default()
            }
        ));
        assert!(state.settle(&tag, Settlement::UnknownPostalCode));
        assert_eq!(state.fields().address, AddressFields::default());
        assert_eq!(state.status(), CoordinateStatus::Empty);
    }

    #[rstest]
    fn superseded_tag_cannot_autofill(mut state: FormState) {
        let first = start(&mut state, "01310000");
        let second = start(&mut state, "20040002");
        assert!(!state.autofill(&first, AddressFields::default()));
        assert!(state.is_current(&second));
    }

    #[test]
    fn seeding_restores_saved_coordinates() {
        let record = UserRecord {
            fields: FormFields {
                postal_code: "01310-000".into(),
                ..FormFields::default()
            },
            coordinates: Some(located()),
        };
        let state = FormState::seeded(Some(record), 3);
        assert_eq!(state.fields().postal_code, "01310000");
        assert_eq!(state.status(), CoordinateStatus::Resolved);
        assert!(state.map_view().is_some());
        assert_eq!(state.generation(), 3);
    }
}
