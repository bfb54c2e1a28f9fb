//! Driven port for the chart rendering surface.
//!
//! Charts receive pre-aggregated series; nothing here computes over real
//! user data.

use serde::Serialize;
use utoipa::ToSchema;

/// One labelled bar, slice, or point of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeriesPoint {
    #[schema(example = "São Paulo")]
    pub label: String,
    #[schema(example = 2)]
    pub value: u32,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: u32) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Chart slots on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    UsersByCity,
    UsersByRegion,
    SignupsByMonth,
    ActiveVersusInactive,
}

/// Port receiving one series per chart.
#[cfg_attr(test, mockall::automock)]
pub trait ChartSurface: Send + Sync {
    fn render(&self, chart: ChartKind, series: &[SeriesPoint]);
}

/// Surface that discards every series.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureChartSurface;

impl ChartSurface for FixtureChartSurface {
    fn render(&self, _chart: ChartKind, _series: &[SeriesPoint]) {}
}
