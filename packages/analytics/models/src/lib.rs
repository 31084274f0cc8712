#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types returned by the disease aggregation engine.
//!
//! The serde field names are the wire contract consumed by the dashboard
//! map and charts (`months`, `latestMonth`, `state_ut`, `Disease`, `mon`,
//! ...). Rust-side names follow normal conventions; the `rename`
//! attributes pin the JSON shape.

use disease_map_disease_models::RiskTier;
use serde::{Deserialize, Serialize};

/// Distinct months present in the data plus the default selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCatalog {
    /// Ascending, duplicate-free calendar months that have records.
    #[serde(rename = "months")]
    pub available_months: Vec<u8>,
    /// Largest entry of `available_months`, if any.
    #[serde(rename = "latestMonth")]
    pub latest_month: Option<u8>,
}

/// Case total for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// Calendar month (1-12).
    #[serde(rename = "mon")]
    pub month: u8,
    /// Sum of cases in this month.
    pub total: u64,
}

/// Twelve-slot monthly case series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSeries {
    /// Year filter that was applied, if any.
    pub year: Option<i32>,
    /// Always 12 entries, January to December.
    pub monthly: Vec<MonthlyTotal>,
}

/// A geolocated record ready for the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotPoint {
    /// State or union territory.
    #[serde(rename = "state_ut")]
    pub state: String,
    /// District.
    pub district: String,
    /// Disease name.
    #[serde(rename = "Disease")]
    pub disease: String,
    /// Case count, absent reported as zero.
    #[serde(rename = "Cases")]
    pub cases: u64,
    /// Latitude (WGS84).
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude (WGS84).
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Severity band derived from `cases`.
    #[serde(rename = "riskTier")]
    pub risk_tier: RiskTier,
}

/// Hotspots for one month (or all months when no month data exists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotResult {
    /// Month the points were selected for, after default resolution.
    #[serde(rename = "month")]
    pub resolved_month: Option<i32>,
    /// Year filter that was applied, if any.
    pub year: Option<i32>,
    /// Map points.
    #[serde(rename = "hotspots")]
    pub points: Vec<HotspotPoint>,
}

/// Smallest and largest year present in the data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// Earliest year, if any record carries one.
    pub min: Option<i32>,
    /// Latest year, if any record carries one.
    pub max: Option<i32>,
}

/// Cross-cutting dashboard summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of cases over all records.
    #[serde(rename = "totalCases")]
    pub total_cases: u64,
    /// Sum of deaths over all records.
    #[serde(rename = "totalDeaths")]
    pub total_deaths: u64,
    /// Year bounds.
    #[serde(rename = "yearRange")]
    pub year_range: YearRange,
    /// Same as [`MonthCatalog::available_months`].
    #[serde(rename = "months")]
    pub available_months: Vec<u8>,
}
