//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod chart_surface;
mod geocoder;
mod map_surface;
mod postal_code_directory;
mod saved_record_repository;

#[cfg(test)]
pub use chart_surface::MockChartSurface;
pub use chart_surface::{ChartKind, ChartSurface, FixtureChartSurface, SeriesPoint};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{FixtureGeocoder, GeocodeCandidate, Geocoder, GeocoderError};
#[cfg(test)]
pub use map_surface::MockMapSurface;
pub use map_surface::{FixtureMapSurface, MapSurface, MapView};
#[cfg(test)]
pub use postal_code_directory::MockPostalCodeDirectory;
pub use postal_code_directory::{
    DirectoryLookup, FixturePostalCodeDirectory, PostalCodeDirectory, PostalCodeDirectoryError,
};
#[cfg(test)]
pub use saved_record_repository::MockSavedRecordRepository;
pub use saved_record_repository::{
    FixtureSavedRecordRepository, SavedRecordRepository, SavedRecordRepositoryError,
};
