//! Driven port for the map rendering surface.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Coordinates;

/// Marker shown by the map: a position plus its popup label.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    #[schema(example = "Avenida Paulista, Bela Vista, São Paulo - SP")]
    pub label: String,
}

impl From<&Coordinates> for MapView {
    fn from(value: &Coordinates) -> Self {
        Self {
            latitude: value.latitude(),
            longitude: value.longitude(),
            label: value.display_address().to_owned(),
        }
    }
}

/// Port notified on every coordinate state change.
///
/// `Some` shows the marker, `None` hides the map.
#[cfg_attr(test, mockall::automock)]
pub trait MapSurface: Send + Sync {
    fn render<'a>(&self, view: Option<&'a MapView>);
}

/// Surface that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureMapSurface;

impl MapSurface for FixtureMapSurface {
    fn render<'a>(&self, _view: Option<&'a MapView>) {}
}
