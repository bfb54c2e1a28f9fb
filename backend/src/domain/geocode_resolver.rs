//! Second stage of the resolution chain: free-text address to coordinates.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::Coordinates;
use super::ports::{GeocodeCandidate, Geocoder, GeocoderError};

/// Queries the geocoder and keeps the first candidate.
#[derive(Clone)]
pub struct GeocodeResolver {
    geocoder: Arc<dyn Geocoder>,
    timeout: Duration,
}

impl GeocodeResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, timeout: Duration) -> Self {
        Self { geocoder, timeout }
    }

    /// Geocode `address_text` once.
    ///
    /// Returns `Ok(None)` when the service has no match. Later candidates are
    /// ignored even when the first one cannot be decoded.
    pub async fn resolve_coordinates(
        &self,
        address_text: &str,
    ) -> Result<Option<Coordinates>, GeocoderError> {
        let result = match tokio::time::timeout(self.timeout, self.geocoder.search(address_text))
            .await
        {
            Ok(result) => result.and_then(|candidates| first_coordinates(address_text, candidates)),
            Err(_) => Err(GeocoderError::timeout(format!(
                "no answer within {}ms",
                self.timeout.as_millis()
            ))),
        };

        match &result {
            Ok(Some(coordinates)) => debug!(
                latitude = coordinates.latitude(),
                longitude = coordinates.longitude(),
                "address geocoded"
            ),
            Ok(None) => debug!(address = address_text, "geocoder found no match"),
            Err(error) => warn!(address = address_text, %error, "geocoding failed"),
        }
        result
    }
}

fn first_coordinates(
    address_text: &str,
    candidates: Vec<GeocodeCandidate>,
) -> Result<Option<Coordinates>, GeocoderError> {
    let Some(candidate) = candidates.into_iter().next() else {
        return Ok(None);
    };
    let latitude = parse_degrees("lat", &candidate.latitude)?;
    let longitude = parse_degrees("lon", &candidate.longitude)?;
    Coordinates::try_new(latitude, longitude, address_text)
        .map(Some)
        .map_err(|error| GeocoderError::decode(error.to_string()))
}

fn parse_degrees(name: &str, raw: &str) -> Result<f64, GeocoderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|error| GeocoderError::decode(format!("{name} `{raw}` is not a number: {error}")))
}
