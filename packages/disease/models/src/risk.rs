//! Risk tier classification for hotspot points.
//!
//! A tier is a pure function of the case count. The band boundaries live
//! in a [`RiskThresholds`] table so deployments can tune them without a
//! rebuild; the defaults reproduce the five-band scheme the map renderer
//! keys its marker colours on.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Discrete severity label for a hotspot, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RiskTier {
    /// At or below the low-medium threshold.
    Low,
    /// Small cluster of cases.
    LowMedium,
    /// Moderate outbreak.
    Medium,
    /// Large outbreak.
    High,
    /// Above the critical threshold.
    Critical,
}

impl RiskTier {
    /// Classifies a case count using the default thresholds.
    #[must_use]
    pub const fn from_cases(cases: u64) -> Self {
        RiskThresholds::DEFAULT.classify(cases)
    }
}

/// Errors from loading or validating a [`RiskThresholds`] table.
#[derive(Debug, thiserror::Error)]
pub enum ThresholdError {
    /// Thresholds must be strictly ascending and start above zero.
    #[error(
        "Invalid risk thresholds: expected 0 < low_medium < medium < high < critical, got {low_medium}/{medium}/{high}/{critical}"
    )]
    NotAscending {
        /// Lower bound of the low-medium band.
        low_medium: u64,
        /// Lower bound of the medium band.
        medium: u64,
        /// Lower bound of the high band.
        high: u64,
        /// Lower bound of the critical band.
        critical: u64,
    },

    /// The thresholds file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The thresholds file is not valid TOML for this table.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Inclusive lower bounds for each tier above [`RiskTier::Low`].
///
/// ```toml
/// low_medium = 11
/// medium = 51
/// high = 201
/// critical = 501
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskThresholds {
    /// Smallest case count classified as [`RiskTier::LowMedium`].
    pub low_medium: u64,
    /// Smallest case count classified as [`RiskTier::Medium`].
    pub medium: u64,
    /// Smallest case count classified as [`RiskTier::High`].
    pub high: u64,
    /// Smallest case count classified as [`RiskTier::Critical`].
    pub critical: u64,
}

impl RiskThresholds {
    /// `> 500` critical, `201-500` high, `51-200` medium, `11-50`
    /// low-medium, `<= 10` low.
    pub const DEFAULT: Self = Self {
        low_medium: 11,
        medium: 51,
        high: 201,
        critical: 501,
    };

    /// Maps a case count onto its tier.
    #[must_use]
    pub const fn classify(&self, cases: u64) -> RiskTier {
        if cases >= self.critical {
            RiskTier::Critical
        } else if cases >= self.high {
            RiskTier::High
        } else if cases >= self.medium {
            RiskTier::Medium
        } else if cases >= self.low_medium {
            RiskTier::LowMedium
        } else {
            RiskTier::Low
        }
    }

    /// Checks that the bands are non-empty and ordered.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::NotAscending`] if any bound is not
    /// strictly greater than the previous one, or `low_medium` is zero.
    pub fn validate(self) -> Result<Self, ThresholdError> {
        if self.low_medium > 0
            && self.low_medium < self.medium
            && self.medium < self.high
            && self.high < self.critical
        {
            Ok(self)
        } else {
            Err(ThresholdError::NotAscending {
                low_medium: self.low_medium,
                medium: self.medium,
                high: self.high,
                critical: self.critical,
            })
        }
    }

    /// Parses and validates a thresholds table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError`] if the text is not a valid table or the
    /// bounds are not ascending.
    pub fn from_toml_str(s: &str) -> Result<Self, ThresholdError> {
        let parsed: Self = toml::from_str(s)?;
        parsed.validate()
    }

    /// Loads a thresholds table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ThresholdError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}
