#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Outbreak risk-zone report types.
//!
//! These mirror the JSON document the prediction program writes to stdout:
//! `{ "redzones": [...], "mapPath": "/maps/..." | null }`. Unknown keys
//! (the program also emits an `areas` copy of the table) are ignored.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Colour band of a risk zone, from the outbreak percentage.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskBand {
    /// Below the alert level.
    #[default]
    Green,
    /// Elevated.
    Yellow,
    /// Outbreak.
    Red,
}

/// One row of the risk-zone table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskZone {
    /// District label as displayed.
    #[serde(default)]
    pub district: String,
    /// Disease name.
    #[serde(default)]
    pub disease: String,
    /// Outbreak percentage, 0-100.
    #[serde(default)]
    pub percentage: f64,
    /// Report date as formatted by the program.
    #[serde(default)]
    pub date: String,
    /// Colour band.
    #[serde(default)]
    pub band: RiskBand,
}

/// Risk-zone table plus the path of the rendered map, if one was written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskZoneReport {
    /// Zones ordered by descending outbreak percentage.
    #[serde(rename = "redzones", default)]
    pub zones: Vec<RiskZone>,
    /// URL path of the generated map page.
    #[serde(rename = "mapPath", default)]
    pub map_path: Option<String>,
}
