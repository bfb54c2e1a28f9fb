//! Rendering surfaces for a headless deployment.
//!
//! The service has no screen; surfaces emit structured log events that a
//! front end or operator can follow.

use tracing::info;

use crate::domain::ports::{ChartKind, ChartSurface, MapSurface, MapView, SeriesPoint};

/// Map surface that logs marker changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMapSurface;

impl MapSurface for TracingMapSurface {
    fn render<'a>(&self, view: Option<&'a MapView>) {
        match view {
            Some(view) => info!(
                latitude = view.latitude,
                longitude = view.longitude,
                label = %view.label,
                "map marker shown"
            ),
            None => info!("map hidden"),
        }
    }
}

/// Chart surface that logs each series.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChartSurface;

impl ChartSurface for TracingChartSurface {
    fn render(&self, chart: ChartKind, series: &[SeriesPoint]) {
        let total: u32 = series.iter().map(|point| point.value).sum();
        info!(?chart, points = series.len(), total, "chart rendered");
    }
}
