//! Form orchestration: field edits, the coordinate state machine, and submit.
//!
//! The controller owns the in-progress form. Edits are applied synchronously
//! under a mutex; a postal code edit that completes eight digits hands back a
//! [`PendingResolution`] for the caller to drive on its own task. Chains are
//! never cancelled. A chain that has been superseded simply finds its tag is
//! no longer current and drops its results.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};
use utoipa::ToSchema;

use super::ports::{Geocoder, MapSurface, MapView, PostalCodeDirectory, SavedRecordRepository};
use super::{
    AddressResolution, AddressResolver, Error, FormField, GeocodeResolver, UserRecord, validate,
};

mod state;

pub use state::{CoordinateStatus, StalenessTag};
use state::{EditEffect, FormState, Settlement};

/// Port bundle required by the form controller.
pub struct FormControllerPorts {
    /// Postal code directory queried by the first stage.
    pub directory: Arc<dyn PostalCodeDirectory>,
    /// Geocoder queried by the second stage.
    pub geocoder: Arc<dyn Geocoder>,
    /// Map notified on every coordinate state change.
    pub map_surface: Arc<dyn MapSurface>,
    /// Parent-held saved record.
    pub saved_records: Arc<dyn SavedRecordRepository>,
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControllerConfig {
    /// Upper bound on each lookup in a resolution chain.
    pub lookup_timeout: Duration,
}

impl Default for FormControllerConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of one field edit.
#[derive(Debug)]
pub struct FieldUpdate {
    pub field: FormField,
    /// Value as the user should now see it, masks applied.
    pub display_value: String,
    pub status: CoordinateStatus,
    /// Chain to drive when the edit completed a new postal code.
    pub resolution: Option<PendingResolution>,
}

/// Point-in-time view of the form.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    /// Display values keyed by field name.
    pub values: BTreeMap<FormField, String>,
    pub status: CoordinateStatus,
    pub map: Option<MapView>,
    /// True only while coordinates are resolved.
    pub map_visible: bool,
}

/// How a resolution chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Coordinates were applied and the map is visible.
    Resolved,
    /// The chain ended without coordinates.
    Cleared,
    /// A newer edit took over; nothing was applied.
    Superseded,
}

struct Inner {
    state: Mutex<FormState>,
    address_resolver: AddressResolver,
    geocode_resolver: GeocodeResolver,
    map_surface: Arc<dyn MapSurface>,
    saved_records: Arc<dyn SavedRecordRepository>,
}

/// Shared handle to one form session.
#[derive(Clone)]
pub struct FormController {
    inner: Arc<Inner>,
}

impl FormController {
    /// Mount a form pre-seeded from the saved record, if any.
    pub async fn mount(
        ports: FormControllerPorts,
        config: FormControllerConfig,
    ) -> Result<Self, Error> {
        let FormControllerPorts {
            directory,
            geocoder,
            map_surface,
            saved_records,
        } = ports;
        let saved = load_saved(saved_records.as_ref()).await?;
        let state = FormState::seeded(saved, 0);
        map_surface.render(state.map_view().as_ref());
        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                address_resolver: AddressResolver::new(directory, config.lookup_timeout),
                geocode_resolver: GeocodeResolver::new(geocoder, config.lookup_timeout),
                map_surface,
                saved_records,
            }),
        })
    }

    /// Drop the in-progress form and mount a fresh one from the saved record.
    ///
    /// Chains still in flight are orphaned.
    pub async fn remount(&self) -> Result<FormSnapshot, Error> {
        let saved = load_saved(self.inner.saved_records.as_ref()).await?;
        let mut state = self.lock_state()?;
        let generation = state.generation() + 1;
        *state = FormState::seeded(saved, generation);
        self.inner.map_surface.render(state.map_view().as_ref());
        debug!(generation = state.generation(), "form remounted");
        Ok(snapshot_of(&state))
    }

    /// Apply one keystroke-level edit.
    ///
    /// Address fields are read-only and filled by the directory; editing
    /// them is rejected.
    pub fn set_field(&self, field: FormField, raw: &str) -> Result<FieldUpdate, Error> {
        if field.is_autofilled() {
            return Err(Error::invalid_request(format!(
                "{field} is filled from the postal code and cannot be edited"
            )));
        }
        let mut state = self.lock_state()?;
        let effect = state.apply_edit(field, raw);
        let resolution = match effect {
            EditEffect::Unchanged => None,
            EditEffect::Started(tag) => {
                debug!(
                    generation = tag.generation(),
                    postal_code = %tag.postal_code(),
                    "resolution started"
                );
                // Notify under the lock so the map sees changes in state order.
                self.inner.map_surface.render(None);
                Some(PendingResolution {
                    controller: self.clone(),
                    tag,
                })
            }
            EditEffect::Cleared => {
                debug!(
                    generation = state.generation(),
                    "postal code incomplete, coordinates cleared"
                );
                self.inner.map_surface.render(None);
                None
            }
        };
        Ok(FieldUpdate {
            field,
            display_value: state.fields().display_value(field),
            status: state.status(),
            resolution,
        })
    }

    /// Current display values and coordinate state.
    pub fn snapshot(&self) -> Result<FormSnapshot, Error> {
        let state = self.lock_state()?;
        Ok(snapshot_of(&state))
    }

    /// Validate the whole form and replace the saved record with it.
    ///
    /// Coordinates are frozen as they stand; a form that is still resolving
    /// saves none. Invalid forms are rejected with per-field messages under
    /// `details.fieldErrors` and leave the saved record untouched.
    pub async fn submit(&self) -> Result<UserRecord, Error> {
        let (fields, coordinates) = {
            let state = self.lock_state()?;
            (state.fields().canonicalized(), state.resolved_coordinates())
        };
        validate(&fields)?;
        let record = UserRecord {
            fields,
            coordinates,
        };
        self.inner
            .saved_records
            .save(&record)
            .await
            .map_err(|error| Error::service_unavailable(error.to_string()))?;
        info!(
            has_coordinates = record.coordinates.is_some(),
            "form submitted"
        );
        Ok(record)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, FormState>, Error> {
        self.inner
            .state
            .lock()
            .map_err(|_| Error::internal("form state poisoned"))
    }

    /// Apply a chain's ending if it is still current, notifying the map.
    fn settle(
        &self,
        tag: &StalenessTag,
        settlement: Settlement,
    ) -> Result<ResolutionOutcome, Error> {
        let resolved = matches!(settlement, Settlement::Located(_));
        let mut state = self.lock_state()?;
        if !state.settle(tag, settlement) {
            return Ok(superseded(tag));
        }
        self.inner.map_surface.render(state.map_view().as_ref());
        if resolved {
            debug!(generation = tag.generation(), "coordinates resolved");
            Ok(ResolutionOutcome::Resolved)
        } else {
            debug!(generation = tag.generation(), "coordinates cleared");
            Ok(ResolutionOutcome::Cleared)
        }
    }
}

/// One resolution chain waiting to be driven.
#[derive(Debug)]
pub struct PendingResolution {
    controller: FormController,
    tag: StalenessTag,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController").finish_non_exhaustive()
    }
}

impl PendingResolution {
    pub fn tag(&self) -> &StalenessTag {
        &self.tag
    }

    /// Drive the chain: directory lookup, autofill, geocoding.
    ///
    /// Each stage re-checks the tag before writing. Lookup failures end the
    /// chain with empty coordinates and are not retried.
    pub async fn run(self) -> Result<ResolutionOutcome, Error> {
        let Self { controller, tag } = self;
        let inner = &controller.inner;

        let composite = match inner
            .address_resolver
            .resolve_address(tag.postal_code())
            .await
        {
            Ok(AddressResolution::Found { address, composite }) => {
                if !controller.lock_state()?.autofill(&tag, address) {
                    return Ok(superseded(&tag));
                }
                composite
            }
            Ok(AddressResolution::NotFound) => {
                return controller.settle(&tag, Settlement::UnknownPostalCode);
            }
            Err(_) => return controller.settle(&tag, Settlement::Unlocated),
        };

        if !controller.lock_state()?.is_current(&tag) {
            return Ok(superseded(&tag));
        }

        let settlement = match inner.geocode_resolver.resolve_coordinates(&composite).await {
            Ok(Some(coordinates)) => Settlement::Located(coordinates),
            Ok(None) | Err(_) => Settlement::Unlocated,
        };
        controller.settle(&tag, settlement)
    }
}

fn superseded(tag: &StalenessTag) -> ResolutionOutcome {
    debug!(
        generation = tag.generation(),
        postal_code = %tag.postal_code(),
        "stale resolution discarded"
    );
    ResolutionOutcome::Superseded
}

fn snapshot_of(state: &FormState) -> FormSnapshot {
    let values = FormField::ALL
        .into_iter()
        .map(|field| (field, state.fields().display_value(field)))
        .collect();
    let map = state.map_view();
    FormSnapshot {
        values,
        status: state.status(),
        map_visible: map.is_some(),
        map,
    }
}

async fn load_saved(repository: &dyn SavedRecordRepository) -> Result<Option<UserRecord>, Error> {
    repository
        .load()
        .await
        .map_err(|error| Error::service_unavailable(error.to_string()))
}
