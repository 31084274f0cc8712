//! Dashboard summary.

use disease_map_analytics_models::{Summary, YearRange};
use disease_map_database::RecordStore;

use crate::{AnalyticsError, QueryContext, months::list_months};

/// Computes total cases, total deaths, the year range, and the available
/// months. The totals and the month list are fetched concurrently.
///
/// # Errors
///
/// * [`AnalyticsError::StoreUnavailable`] if either store query fails or times out
/// * [`AnalyticsError::Cancelled`] if the context is cancelled
pub async fn summary(
    store: &dyn RecordStore,
    ctx: &QueryContext,
) -> Result<Summary, AnalyticsError> {
    let (totals, catalog) = tokio::try_join!(
        ctx.run("summary", store.totals()),
        list_months(store, ctx),
    )?;

    Ok(Summary {
        total_cases: totals.total_cases,
        total_deaths: totals.total_deaths,
        year_range: YearRange {
            min: totals.year_min,
            max: totals.year_max,
        },
        available_months: catalog.available_months,
    })
}
