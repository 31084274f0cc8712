#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Disease incident record types and risk classification.
//!
//! A [`DiseaseRecord`] is one observation from the `disease_data` table:
//! where an outbreak was reported, which disease, how many cases and
//! deaths, and when. Every field other than the identifying strings may be
//! missing in source data, so the accessors here define the canonical
//! "absent" semantics the aggregation engine relies on.

pub mod risk;

use serde::{Deserialize, Serialize};

pub use risk::{RiskThresholds, RiskTier, ThresholdError};

/// Number of calendar months in a monthly series.
pub const MONTHS_PER_YEAR: u8 = 12;

/// A single disease incident observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseRecord {
    /// State or union territory name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Disease name (e.g. "Cholera").
    pub disease_name: String,
    /// Reported case count.
    pub cases: Option<u64>,
    /// Reported death count.
    pub deaths: Option<u64>,
    /// Day of month, if the source reported one.
    pub day: Option<i32>,
    /// Calendar month as stored. May be out of range in dirty data.
    pub month: Option<i32>,
    /// Calendar year.
    pub year: Option<i32>,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Free-form outbreak week label from the source.
    pub week_of_outbreak: Option<String>,
}

impl DiseaseRecord {
    /// Case count with absent treated as zero.
    #[must_use]
    pub fn cases_or_zero(&self) -> u64 {
        self.cases.unwrap_or(0)
    }

    /// Death count with absent treated as zero.
    #[must_use]
    pub fn deaths_or_zero(&self) -> u64 {
        self.deaths.unwrap_or(0)
    }

    /// Returns the month if it is present and within 1-12.
    #[must_use]
    pub fn valid_month(&self) -> Option<u8> {
        self.month.and_then(|m| valid_month(i64::from(m)))
    }

    /// Returns `(latitude, longitude)` when both are present and finite.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// Whether both coordinates are present and finite.
    #[must_use]
    pub fn is_geolocated(&self) -> bool {
        self.coordinates().is_some()
    }
}

/// Converts a raw month value into a calendar month.
///
/// Returns `None` for anything outside 1-12; values are never wrapped.
#[must_use]
pub fn valid_month(raw: i64) -> Option<u8> {
    u8::try_from(raw)
        .ok()
        .filter(|m| (1..=MONTHS_PER_YEAR).contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_month_rejects_out_of_range() {
        assert_eq!(valid_month(0), None);
        assert_eq!(valid_month(13), None);
        assert_eq!(valid_month(-1), None);
        assert_eq!(valid_month(i64::MAX), None);
        for m in 1..=12 {
            assert_eq!(valid_month(m), u8::try_from(m).ok());
        }
    }

    #[test]
    fn absent_counts_default_to_zero() {
        let record = DiseaseRecord::default();
        assert_eq!(record.cases_or_zero(), 0);
        assert_eq!(record.deaths_or_zero(), 0);
    }

    #[test]
    fn coordinates_require_both_finite() {
        let mut record = DiseaseRecord {
            latitude: Some(26.1),
            longitude: Some(91.7),
            ..DiseaseRecord::default()
        };
        assert_eq!(record.coordinates(), Some((26.1, 91.7)));

        record.longitude = None;
        assert!(!record.is_geolocated());

        record.longitude = Some(f64::NAN);
        assert!(!record.is_geolocated());

        record.longitude = Some(91.7);
        record.latitude = Some(f64::INFINITY);
        assert!(!record.is_geolocated());
    }

    #[test]
    fn out_of_range_stored_month_is_no_month() {
        let record = DiseaseRecord {
            month: Some(14),
            ..DiseaseRecord::default()
        };
        assert_eq!(record.valid_month(), None);
    }
}
