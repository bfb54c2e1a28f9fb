//! DTOs for decoding search responses.
//!
//! Coordinates arrive as strings and are passed through untouched; the domain
//! decides whether they parse.

use serde::Deserialize;

use crate::domain::ports::GeocodeCandidate;

#[derive(Debug, Deserialize)]
pub(super) struct SearchResultDto {
    pub(super) lat: String,
    pub(super) lon: String,
    pub(super) display_name: Option<String>,
}

impl From<SearchResultDto> for GeocodeCandidate {
    fn from(value: SearchResultDto) -> Self {
        Self {
            latitude: value.lat,
            longitude: value.lon,
            label: value.display_name,
        }
    }
}
