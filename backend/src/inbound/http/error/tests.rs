//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn read_error(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[actix_web::test]
async fn validation_errors_keep_field_details() {
    let error = Error::invalid_request("form validation failed")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "fieldErrors": { "email": "invalid email" } }));

    let response = ResponseError::error_response(&error);

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace header present")
        .to_str()
        .expect("ascii header");
    assert_eq!(header, TRACE_ID);
    let body = read_error(response).await;
    assert_eq!(body, error);
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("form state poisoned")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }));

    let body = read_error(ResponseError::error_response(&error)).await;

    assert_eq!(body.message(), "Internal server error");
    assert!(body.details().is_none());
    assert_eq!(body.trace_id(), Some(TRACE_ID));
}

#[actix_web::test]
async fn omits_trace_header_without_trace_id() {
    let response = ResponseError::error_response(&Error::not_found("missing"));
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
}
