//! Dashboard API handler.
//!
//! ```text
//! GET /api/v1/analytics?city=São%20Paulo&status=active&month=Jan
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::Error;
use crate::domain::analytics::{AnalyticsFilter, Dashboard};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Optional dashboard filters. Omitted values and `all` disable a filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// City name exactly as listed in `filterOptions.cities`.
    pub city: Option<String>,
    /// One of `all`, `active`, `inactive`.
    pub status: Option<String>,
    /// Signup month abbreviation, `Jan` through `Jul`.
    pub month: Option<String>,
}

/// Aggregate the mock user dataset and publish each series to the chart
/// surface.
#[utoipa::path(
    get,
    path = "/api/v1/analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Dashboard series", body = Dashboard),
        (status = 400, description = "Unknown filter value", body = Error)
    ),
    tags = ["analytics"],
    operation_id = "getDashboard"
)]
#[get("/analytics")]
pub async fn get_dashboard(
    state: web::Data<HttpState>,
    query: web::Query<AnalyticsQuery>,
) -> ApiResult<web::Json<Dashboard>> {
    let AnalyticsQuery {
        city,
        status,
        month,
    } = query.into_inner();
    let filter = AnalyticsFilter::parse(city.as_deref(), status.as_deref(), month.as_deref())
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    let dashboard = Dashboard::build(&filter);
    dashboard.publish(state.charts.as_ref());
    Ok(web::Json(dashboard))
}

#[cfg(test)]
mod tests {
    //! Handler tests for the dashboard endpoint.

    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{
        FixtureGeocoder, FixtureMapSurface, FixturePostalCodeDirectory, MockChartSurface,
        SavedRecordRepository,
    };
    use crate::domain::{FormController, FormControllerConfig, FormControllerPorts};
    use crate::outbound::memory::InMemorySavedRecordRepository;

    async fn http_state(charts: MockChartSurface) -> HttpState {
        let saved_records: Arc<dyn SavedRecordRepository> =
            Arc::new(InMemorySavedRecordRepository::default());
        let form = FormController::mount(
            FormControllerPorts {
                directory: Arc::new(FixturePostalCodeDirectory),
                geocoder: Arc::new(FixtureGeocoder),
                map_surface: Arc::new(FixtureMapSurface),
                saved_records: saved_records.clone(),
            },
            FormControllerConfig::default(),
        )
        .await
        .expect("form mounts");
        HttpState::new(form, saved_records, Arc::new(charts))
    }

    fn quiet_charts() -> MockChartSurface {
        let mut charts = MockChartSurface::new();
        charts.expect_render().return_const(());
        charts
    }

    #[actix_web::test]
    async fn unfiltered_dashboard_covers_every_user() {
        let mut charts = MockChartSurface::new();
        charts.expect_render().times(4).return_const(());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(http_state(charts).await))
                .service(get_dashboard),
        )
        .await;

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/analytics").to_request(),
        )
        .await;

        assert_eq!(
            body["totals"],
            json!({ "users": 10, "active": 7, "inactive": 3, "cities": 8 })
        );
        assert_eq!(body["signupsByMonth"].as_array().map(Vec::len), Some(7));
    }

    #[actix_web::test]
    async fn filters_narrow_the_series() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(http_state(quiet_charts()).await))
                .service(get_dashboard),
        )
        .await;

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/analytics?city=S%C3%A3o%20Paulo&status=active")
                .to_request(),
        )
        .await;

        assert_eq!(body["totals"]["users"], json!(2));
        assert_eq!(
            body["usersByCity"],
            json!([{ "label": "São Paulo", "value": 2 }])
        );
    }

    #[rstest]
    #[case("/analytics?status=dormant")]
    #[case("/analytics?month=Dec")]
    #[actix_web::test]
    async fn unknown_filter_values_are_rejected(#[case] uri: &str) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(http_state(MockChartSurface::new()).await))
                .service(get_dashboard),
        )
        .await;

        let response = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
