//! Parsing of caller-supplied month and year filters.
//!
//! Month and year arrive as optional strings (query parameters, CLI
//! arguments). A month that is absent, blank, zero, or not an integer means
//! "use the latest month". A year that is absent, blank, or zero means "all
//! years"; a year that is present but not an integer is rejected.

use crate::AnalyticsError;

/// Parses the month filter. `None` requests latest-month resolution.
///
/// Non-zero integers are returned as-is, including values outside 1-12,
/// which then match nothing.
#[must_use]
pub fn parse_month_filter(raw: Option<&str>) -> Option<i32> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i32>().ok())
        .filter(|&m| m != 0)
}

/// Parses the year filter. `Ok(None)` means no year restriction.
///
/// # Errors
///
/// * [`AnalyticsError::InvalidFilter`] if a non-blank value is not an integer
pub fn parse_year_filter(raw: Option<&str>) -> Result<Option<i32>, AnalyticsError> {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let year = s
        .parse::<i32>()
        .map_err(|e| AnalyticsError::InvalidFilter {
            message: format!("year '{s}' is not an integer: {e}"),
        })?;

    Ok((year != 0).then_some(year))
}
