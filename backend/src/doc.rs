//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the schemas they exchange. The generated document is served by
//! Swagger UI in debug builds and exported via `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::analytics::{
    Dashboard, DashboardTotals, FilterOptions, SignupMonth, StatusFilter,
};
use crate::domain::ports::{ChartKind, MapView, SeriesPoint};
use crate::domain::{
    AddressFields, CoordinateStatus, Coordinates, Error, ErrorCode, FormField, FormFields,
    FormSnapshot, UserRecord,
};
use crate::inbound::http::form::{FieldEditRequest, FieldEditResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Intake API",
        description = "User registration form with postal code autofill, geocoding, and a mock analytics dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::form::get_form,
        crate::inbound::http::form::edit_field,
        crate::inbound::http::form::submit_form,
        crate::inbound::http::form::reset_form,
        crate::inbound::http::form::get_saved,
        crate::inbound::http::analytics::get_dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        FormField,
        FormFields,
        AddressFields,
        Coordinates,
        CoordinateStatus,
        UserRecord,
        MapView,
        FormSnapshot,
        FieldEditRequest,
        FieldEditResponse,
        Dashboard,
        DashboardTotals,
        FilterOptions,
        SeriesPoint,
        ChartKind,
        StatusFilter,
        SignupMonth,
    )),
    tags(
        (name = "form", description = "Form editing, submission, and the saved record"),
        (name = "analytics", description = "Dashboard series over mock data"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
