//! Driven port for turning free-text addresses into map positions.

use async_trait::async_trait;

use super::define_port_error;

/// One candidate returned by the geocoder, coordinates still as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeCandidate {
    /// Latitude as returned by the service, e.g. `"-23.5613"`.
    pub latitude: String,
    /// Longitude as returned by the service, e.g. `"-46.6565"`.
    pub longitude: String,
    /// Service-provided label for the match, when present.
    pub label: Option<String>,
}

define_port_error! {
    /// Errors surfaced while calling the geocoder.
    pub enum GeocoderError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "geocoder transport failed: {message}",
        /// The lookup exceeded its time budget.
        Timeout { message: String } =>
            "geocoder timeout: {message}",
        /// The response, or a candidate inside it, could not be decoded.
        Decode { message: String } =>
            "geocoder response decode failed: {message}",
        /// The adapter rejected the request before execution.
        InvalidRequest { message: String } =>
            "geocoder request invalid: {message}",
    }
}

/// Port for geocoding free-text addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Return candidates for `query` in the service's ranking order.
    ///
    /// An empty vector means the service found no match.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocoderError>;
}

/// Fixture implementation that never finds a match.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureGeocoder;

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn search(&self, _query: &str) -> Result<Vec<GeocodeCandidate>, GeocoderError> {
        Ok(Vec::new())
    }
}
