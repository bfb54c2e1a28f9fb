//! Reqwest-backed geocoder adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::SearchResultDto;
use crate::domain::ports::{GeocodeCandidate, Geocoder, GeocoderError};
use crate::outbound::body_preview::status_message;

/// Geocoder adapter issuing `GET {base}/search?format=json&q={query}`.
///
/// Nominatim's usage policy requires an identifying `User-Agent` on every
/// request.
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
    user_agent: String,
}

impl NominatimGeocoder {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot carry a path or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, GeocoderError> {
        let search_url = search_url(&base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| GeocoderError::invalid_request(error.to_string()))?;
        Ok(Self {
            client,
            search_url,
            user_agent: user_agent.into(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocoderError> {
        if query.trim().is_empty() {
            return Err(GeocoderError::invalid_request("query must not be blank"));
        }
        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[("format", "json"), ("q", query)])
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_candidates(body.as_ref())
    }
}

fn search_url(base_url: &Url) -> Result<Url, GeocoderError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| {
            GeocoderError::invalid_request(format!("base URL {base_url} cannot carry a path"))
        })?
        .pop_if_empty()
        .push("search");
    Ok(url)
}

fn parse_candidates(body: &[u8]) -> Result<Vec<GeocodeCandidate>, GeocoderError> {
    let decoded: Vec<SearchResultDto> = serde_json::from_slice(body).map_err(|error| {
        GeocoderError::decode(format!("invalid geocoder JSON payload: {error}"))
    })?;
    Ok(decoded.into_iter().map(GeocodeCandidate::from).collect())
}

fn map_transport_error(error: reqwest::Error) -> GeocoderError {
    if error.is_timeout() {
        GeocoderError::timeout(error.to_string())
    } else if error.is_decode() {
        GeocoderError::decode(error.to_string())
    } else {
        GeocoderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeocoderError {
    let message = status_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GeocoderError::timeout(message)
        }
        _ if status.is_client_error() => GeocoderError::invalid_request(message),
        _ => GeocoderError::transport(message),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network geocoder helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://nominatim.openstreetmap.org", "https://nominatim.openstreetmap.org/search")]
    #[case("http://localhost:8088/osm/", "http://localhost:8088/osm/search")]
    fn builds_search_url(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base URL");
        assert_eq!(search_url(&base).expect("URL builds").as_str(), expected);
    }

    #[test]
    fn query_is_url_escaped() {
        let client = Client::new();
        let base = Url::parse("https://nominatim.openstreetmap.org").expect("valid base URL");
        let request = client
            .get(search_url(&base).expect("URL builds"))
            .query(&[("format", "json"), ("q", "Av. X, Centro, São Paulo - SP")])
            .build()
            .expect("request builds");
        assert_eq!(
            request.url().query(),
            Some("format=json&q=Av.+X%2C+Centro%2C+S%C3%A3o+Paulo+-+SP")
        );
    }

    #[test]
    fn parses_candidates_in_order() {
        let body = r#"[
            { "place_id": 1, "lat": "-23.5613", "lon": "-46.6565", "display_name": "Avenida Paulista" },
            { "place_id": 2, "lat": "-23.5", "lon": "-46.6" }
        ]"#;
        let candidates = parse_candidates(body.as_bytes()).expect("JSON should decode");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].latitude, "-23.5613");
        assert_eq!(candidates[0].label.as_deref(), Some("Avenida Paulista"));
        assert_eq!(candidates[1].label, None);
    }

    #[test]
    fn empty_array_means_no_match() {
        assert_eq!(parse_candidates(b"[]"), Ok(Vec::new()));
    }

    #[test]
    fn rejects_candidates_without_coordinates() {
        let error = parse_candidates(br#"[{ "display_name": "nowhere" }]"#)
            .expect_err("decode should fail");
        assert!(matches!(error, GeocoderError::Decode { .. }));
    }

    #[rstest]
    #[case::too_many_requests(StatusCode::TOO_MANY_REQUESTS, "InvalidRequest")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, "Transport")]
    fn maps_http_statuses_to_expected_domain_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let variant = match map_status_error(status, b"") {
            GeocoderError::Timeout { .. } => "Timeout",
            GeocoderError::InvalidRequest { .. } => "InvalidRequest",
            GeocoderError::Transport { .. } => "Transport",
            GeocoderError::Decode { .. } => "Decode",
        };
        assert_eq!(variant, expected);
    }
}
