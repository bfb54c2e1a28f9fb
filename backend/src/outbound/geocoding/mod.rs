//! Geocoding outbound adapters.
//!
//! This module provides an HTTP implementation of the `Geocoder` port against
//! a Nominatim-shaped search endpoint.

mod dto;
mod http_source;

pub use http_source::NominatimGeocoder;
