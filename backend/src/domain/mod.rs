//! Domain primitives, services, and ports.
//!
//! Purpose: hold the intake form's rules independent of transport. Masking
//! and validation are pure functions; resolution and form orchestration talk
//! to the outside world only through [`ports`].
//!
//! Public surface:
//! - [`formatter`] masks and canonical digits.
//! - [`validate`] whole-record validation.
//! - [`AddressResolver`] / [`GeocodeResolver`] lookup services.
//! - [`FormController`] coordinate state machine and submit.
//! - [`analytics`] mock dashboard series.

pub mod address_resolver;
pub mod analytics;
pub mod document_number;
pub mod error;
pub mod form_controller;
pub mod formatter;
pub mod geocode_resolver;
pub mod ports;
pub mod postal_code;
pub mod trace_id;
pub mod user_record;
pub mod validation;

pub use self::address_resolver::{AddressResolution, AddressResolver};
pub use self::document_number::{DocumentNumber, DocumentNumberError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::form_controller::{
    CoordinateStatus, FieldUpdate, FormController, FormControllerConfig, FormControllerPorts,
    FormSnapshot, PendingResolution, ResolutionOutcome,
};
pub use self::geocode_resolver::GeocodeResolver;
pub use self::postal_code::{PostalCode, PostalCodeError};
pub use self::trace_id::TraceId;
pub use self::user_record::{
    AddressFields, Coordinates, CoordinatesError, FormField, FormFields, UnknownFormField,
    UserRecord,
};
pub use self::validation::{FieldErrors, ValidatedUser, validate};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use intake::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nothing saved yet"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
