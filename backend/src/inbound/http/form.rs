//! Form API handlers.
//!
//! ```text
//! GET  /api/v1/form
//! PUT  /api/v1/form/fields/{field} {"value":"01310100"}
//! POST /api/v1/form/submit
//! POST /api/v1/form/reset
//! GET  /api/v1/saved
//! ```
//!
//! A postal code edit that completes eight digits starts a resolution chain
//! on its own task. The edit responds immediately with `status: resolving`;
//! clients poll `GET /form` to observe the autofilled address and map.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{
    CoordinateStatus, Error, FormField, FormSnapshot, PendingResolution, TraceId, UnknownFormField,
    UserRecord,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Body for `PUT /api/v1/form/fields/{field}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldEditRequest {
    /// Raw keystroke-level input; masks are applied server side.
    #[schema(example = "111444777")]
    pub value: String,
}

/// Outcome of one field edit.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldEditResponse {
    pub field: FormField,
    /// Display value with masks applied.
    #[schema(example = "111.444.777")]
    pub value: String,
    pub status: CoordinateStatus,
}

/// Current display values, coordinate state, and map view.
#[utoipa::path(
    get,
    path = "/api/v1/form",
    responses(
        (status = 200, description = "Form snapshot", body = FormSnapshot),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["form"],
    operation_id = "getForm"
)]
#[get("/form")]
pub async fn get_form(state: web::Data<HttpState>) -> ApiResult<web::Json<FormSnapshot>> {
    Ok(web::Json(state.form.snapshot()?))
}

/// Apply one field edit.
///
/// Address fields are read-only and rejected with `400`.
#[utoipa::path(
    put,
    path = "/api/v1/form/fields/{field}",
    params(("field" = String, Path, description = "Field wire name, for example `postalCode`")),
    request_body = FieldEditRequest,
    responses(
        (status = 200, description = "Edit applied", body = FieldEditResponse),
        (status = 400, description = "Unknown or read-only field", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["form"],
    operation_id = "editField"
)]
#[put("/form/fields/{field}")]
pub async fn edit_field(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<FieldEditRequest>,
) -> ApiResult<web::Json<FieldEditResponse>> {
    let field: FormField = path
        .into_inner()
        .parse()
        .map_err(|error: UnknownFormField| Error::invalid_request(error.to_string()))?;
    let update = state.form.set_field(field, &payload.value)?;
    if let Some(resolution) = update.resolution {
        spawn_resolution(resolution);
    }
    Ok(web::Json(FieldEditResponse {
        field: update.field,
        value: update.display_value,
        status: update.status,
    }))
}

fn spawn_resolution(resolution: PendingResolution) {
    let trace_id = TraceId::current().unwrap_or_else(TraceId::generate);
    actix_web::rt::spawn(TraceId::scope(trace_id, async move {
        if let Err(error) = resolution.run().await {
            warn!(%error, "resolution chain failed");
        }
    }));
}

/// Validate the form and replace the saved record.
#[utoipa::path(
    post,
    path = "/api/v1/form/submit",
    responses(
        (status = 200, description = "Record saved", body = UserRecord),
        (status = 400, description = "Validation failed; see details.fieldErrors", body = Error),
        (status = 503, description = "Saved record storage unavailable", body = Error)
    ),
    tags = ["form"],
    operation_id = "submitForm"
)]
#[post("/form/submit")]
pub async fn submit_form(state: web::Data<HttpState>) -> ApiResult<web::Json<UserRecord>> {
    Ok(web::Json(state.form.submit().await?))
}

/// Discard in-progress edits and remount from the saved record.
#[utoipa::path(
    post,
    path = "/api/v1/form/reset",
    responses(
        (status = 200, description = "Fresh form snapshot", body = FormSnapshot),
        (status = 503, description = "Saved record storage unavailable", body = Error)
    ),
    tags = ["form"],
    operation_id = "resetForm"
)]
#[post("/form/reset")]
pub async fn reset_form(state: web::Data<HttpState>) -> ApiResult<web::Json<FormSnapshot>> {
    Ok(web::Json(state.form.remount().await?))
}

/// The record last submitted, as held by the parent screen.
#[utoipa::path(
    get,
    path = "/api/v1/saved",
    responses(
        (status = 200, description = "Saved record", body = UserRecord),
        (status = 404, description = "Nothing saved yet", body = Error),
        (status = 503, description = "Saved record storage unavailable", body = Error)
    ),
    tags = ["form"],
    operation_id = "getSavedRecord"
)]
#[get("/saved")]
pub async fn get_saved(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let record = state
        .saved_records
        .load()
        .await
        .map_err(|error| Error::service_unavailable(error.to_string()))?
        .ok_or_else(|| Error::not_found("no record has been saved"))?;
    Ok(HttpResponse::Ok().json(record))
}
