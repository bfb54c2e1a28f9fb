//! Mock analytics dashboard.
//!
//! Series are computed over a fixed in-memory dataset of ten users. Nothing
//! here reads submitted form data.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

use super::ports::{ChartKind, ChartSurface, SeriesPoint};

/// Month a mock user signed up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum SignupMonth {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
}

impl SignupMonth {
    /// Months shown on the signups chart, in calendar order.
    pub const ALL: [Self; 7] = [
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
        }
    }
}

impl fmt::Display for SignupMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity filter applied to the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Inactive];

    fn admits(self, active: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => active,
            Self::Inactive => !active,
        }
    }
}

/// Errors raised while parsing dashboard filters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyticsFilterError {
    #[error("unknown status filter: {0}")]
    Status(String),
    #[error("unknown signup month: {0}")]
    Month(String),
}

impl FromStr for StatusFilter {
    type Err = AnalyticsFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AnalyticsFilterError::Status(s.to_owned())),
        }
    }
}

impl FromStr for SignupMonth {
    type Err = AnalyticsFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|month| month.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AnalyticsFilterError::Month(s.to_owned()))
    }
}

/// Dashboard filter. `None` means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsFilter {
    pub city: Option<String>,
    pub status: StatusFilter,
    pub month: Option<SignupMonth>,
}

impl AnalyticsFilter {
    /// Parse raw query values; a missing value or `all` disables that filter.
    ///
    /// # Examples
    /// ```
    /// use intake::domain::analytics::{AnalyticsFilter, SignupMonth, StatusFilter};
    ///
    /// let filter = AnalyticsFilter::parse(Some("all"), Some("active"), Some("jun"))
    ///     .expect("valid filter");
    /// assert_eq!(filter.city, None);
    /// assert_eq!(filter.status, StatusFilter::Active);
    /// assert_eq!(filter.month, Some(SignupMonth::Jun));
    /// ```
    pub fn parse(
        city: Option<&str>,
        status: Option<&str>,
        month: Option<&str>,
    ) -> Result<Self, AnalyticsFilterError> {
        let city = unless_all(city).map(str::to_owned);
        let status = unless_all(status)
            .map(str::parse::<StatusFilter>)
            .transpose()?
            .unwrap_or_default();
        let month = unless_all(month)
            .map(str::parse::<SignupMonth>)
            .transpose()?;
        Ok(Self {
            city,
            status,
            month,
        })
    }

    fn admits(&self, user: &MockUser) -> bool {
        self.city.as_deref().is_none_or(|city| city == user.city)
            && self.status.admits(user.active)
            && self.month.is_none_or(|month| month == user.signup_month)
    }
}

fn unless_all(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
}

/// One row of the mock dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockUser {
    pub name: &'static str,
    pub city: &'static str,
    pub region: &'static str,
    pub active: bool,
    pub signup_month: SignupMonth,
}

const fn user(
    name: &'static str,
    city: &'static str,
    region: &'static str,
    active: bool,
    signup_month: SignupMonth,
) -> MockUser {
    MockUser {
        name,
        city,
        region,
        active,
        signup_month,
    }
}

/// Fixed dataset behind every chart.
pub const MOCK_USERS: [MockUser; 10] = [
    user("Alice", "São Paulo", "SP", true, SignupMonth::Jan),
    user("Bob", "Rio de Janeiro", "RJ", false, SignupMonth::Jan),
    user("Carol", "Belo Horizonte", "MG", true, SignupMonth::Feb),
    user("David", "São Paulo", "SP", true, SignupMonth::Mar),
    user("Eve", "Curitiba", "PR", false, SignupMonth::Apr),
    user("Frank", "Porto Alegre", "RS", true, SignupMonth::May),
    user("Grace", "Rio de Janeiro", "RJ", true, SignupMonth::Jun),
    user("Hugo", "Salvador", "BA", false, SignupMonth::Jun),
    user("Ivy", "Fortaleza", "CE", true, SignupMonth::Jul),
    user("Jack", "Recife", "PE", true, SignupMonth::Jul),
];

/// Headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub users: u32,
    pub active: u32,
    pub inactive: u32,
    /// Distinct cities among the filtered users.
    pub cities: u32,
}

/// Values accepted by each filter, for building selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Every city in the dataset, in first-appearance order.
    pub cities: Vec<String>,
    pub statuses: Vec<StatusFilter>,
    pub months: Vec<SignupMonth>,
}

/// Pre-aggregated series for the chart surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub totals: DashboardTotals,
    pub users_by_city: Vec<SeriesPoint>,
    pub users_by_region: Vec<SeriesPoint>,
    /// January through July, months without signups included as zero.
    pub signups_by_month: Vec<SeriesPoint>,
    pub active_versus_inactive: Vec<SeriesPoint>,
    pub filter_options: FilterOptions,
}

impl Dashboard {
    /// Aggregate the mock dataset under `filter`.
    pub fn build(filter: &AnalyticsFilter) -> Self {
        let users: Vec<&MockUser> = MOCK_USERS.iter().filter(|user| filter.admits(user)).collect();

        let users_by_city = count_by(&users, |user| user.city);
        let users_by_region = count_by(&users, |user| user.region);
        let signups_by_month = SignupMonth::ALL
            .into_iter()
            .map(|month| {
                let count = users.iter().filter(|user| user.signup_month == month).count();
                SeriesPoint::new(month.as_str(), saturating_u32(count))
            })
            .collect();

        let total = saturating_u32(users.len());
        let active = saturating_u32(users.iter().filter(|user| user.active).count());
        let totals = DashboardTotals {
            users: total,
            active,
            inactive: total - active,
            cities: saturating_u32(users_by_city.len()),
        };

        Self {
            totals,
            users_by_city,
            users_by_region,
            signups_by_month,
            active_versus_inactive: vec![
                SeriesPoint::new("Active", totals.active),
                SeriesPoint::new("Inactive", totals.inactive),
            ],
            filter_options: FilterOptions {
                cities: distinct_cities(),
                statuses: StatusFilter::ALL.to_vec(),
                months: SignupMonth::ALL.to_vec(),
            },
        }
    }

    /// Hand every series to `surface`.
    pub fn publish(&self, surface: &dyn ChartSurface) {
        surface.render(ChartKind::UsersByCity, &self.users_by_city);
        surface.render(ChartKind::UsersByRegion, &self.users_by_region);
        surface.render(ChartKind::SignupsByMonth, &self.signups_by_month);
        surface.render(ChartKind::ActiveVersusInactive, &self.active_versus_inactive);
    }
}

/// Group counts in first-appearance order.
fn count_by(users: &[&MockUser], key: impl Fn(&MockUser) -> &'static str) -> Vec<SeriesPoint> {
    let mut series: Vec<SeriesPoint> = Vec::new();
    for user in users {
        let label = key(*user);
        match series.iter_mut().find(|point| point.label == label) {
            Some(point) => point.value += 1,
            None => series.push(SeriesPoint::new(label, 1)),
        }
    }
    series
}

fn distinct_cities() -> Vec<String> {
    let mut cities: Vec<String> = Vec::new();
    for user in &MOCK_USERS {
        if !cities.iter().any(|city| city == user.city) {
            cities.push(user.city.to_owned());
        }
    }
    cities
}

fn saturating_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockChartSurface;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn labels(series: &[SeriesPoint]) -> Vec<&str> {
        series.iter().map(|point| point.label.as_str()).collect()
    }

    fn values(series: &[SeriesPoint]) -> Vec<u32> {
        series.iter().map(|point| point.value).collect()
    }

    #[test]
    fn unfiltered_dashboard_covers_every_user() {
        let dashboard = Dashboard::build(&AnalyticsFilter::default());
        assert_eq!(
            dashboard.totals,
            DashboardTotals {
                users: 10,
                active: 7,
                inactive: 3,
                cities: 8,
            }
        );
        assert_eq!(
            labels(&dashboard.users_by_city),
            vec![
                "São Paulo",
                "Rio de Janeiro",
                "Belo Horizonte",
                "Curitiba",
                "Porto Alegre",
                "Salvador",
                "Fortaleza",
                "Recife",
            ]
        );
        assert_eq!(values(&dashboard.users_by_city), vec![2, 2, 1, 1, 1, 1, 1, 1]);
        assert_eq!(values(&dashboard.signups_by_month), vec![2, 1, 1, 1, 1, 2, 2]);
    }

    #[test]
    fn months_without_signups_are_zero_filled() {
        let filter = AnalyticsFilter::parse(Some("São Paulo"), None, None).expect("filter");
        let dashboard = Dashboard::build(&filter);
        assert_eq!(labels(&dashboard.signups_by_month).len(), 7);
        assert_eq!(values(&dashboard.signups_by_month), vec![1, 0, 1, 0, 0, 0, 0]);
        assert_eq!(dashboard.totals.cities, 1);
    }

    #[rstest]
    #[case(Some("inactive"), None, 3, vec!["RJ", "PR", "BA"])]
    #[case(Some("active"), Some("Jun"), 1, vec!["RJ"])]
    #[case(None, Some("jul"), 2, vec!["CE", "PE"])]
    fn filters_combine(
        #[case] status: Option<&str>,
        #[case] month: Option<&str>,
        #[case] users: u32,
        #[case] regions: Vec<&str>,
    ) {
        let filter = AnalyticsFilter::parse(None, status, month).expect("filter");
        let dashboard = Dashboard::build(&filter);
        assert_eq!(dashboard.totals.users, users);
        assert_eq!(labels(&dashboard.users_by_region), regions);
    }

    #[test]
    fn unknown_city_yields_empty_series() {
        let filter = AnalyticsFilter::parse(Some("Manaus"), None, None).expect("filter");
        let dashboard = Dashboard::build(&filter);
        assert_eq!(dashboard.totals.users, 0);
        assert!(dashboard.users_by_city.is_empty());
        assert_eq!(values(&dashboard.active_versus_inactive), vec![0, 0]);
        assert_eq!(dashboard.filter_options.cities.len(), 8);
    }

    #[rstest]
    #[case(Some("sleeping"), None, AnalyticsFilterError::Status("sleeping".into()))]
    #[case(None, Some("Dec"), AnalyticsFilterError::Month("Dec".into()))]
    fn rejects_unknown_filter_values(
        #[case] status: Option<&str>,
        #[case] month: Option<&str>,
        #[case] expected: AnalyticsFilterError,
    ) {
        assert_eq!(AnalyticsFilter::parse(None, status, month), Err(expected));
    }

    #[test]
    fn publish_sends_each_series_once() {
        let dashboard = Dashboard::build(&AnalyticsFilter::default());
        let mut surface = MockChartSurface::new();
        for chart in [
            ChartKind::UsersByCity,
            ChartKind::UsersByRegion,
            ChartKind::SignupsByMonth,
            ChartKind::ActiveVersusInactive,
        ] {
            surface
                .expect_render()
                .with(eq(chart), mockall::predicate::always())
                .times(1)
                .return_const(());
        }
        dashboard.publish(&surface);
    }
}
