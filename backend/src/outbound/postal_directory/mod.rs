//! Postal code directory outbound adapters.
//!
//! This module provides an HTTP implementation of the `PostalCodeDirectory`
//! port against a ViaCEP-shaped service.

mod dto;
mod http_source;

pub use http_source::ViaCepDirectory;
