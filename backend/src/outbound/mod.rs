//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **postal_directory**: ViaCEP-shaped postal code lookups over HTTP
//! - **geocoding**: Nominatim-shaped address search over HTTP
//! - **memory**: process-memory saved record
//! - **surfaces**: log-backed map and chart surfaces
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

mod body_preview;
pub mod geocoding;
pub mod memory;
pub mod postal_directory;
pub mod surfaces;
