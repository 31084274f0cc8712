//! Monthly case trend series.

use disease_map_analytics_models::{MonthlyTotal, TrendSeries};
use disease_map_database::{MonthGroup, RecordStore};
use disease_map_disease_models::{MONTHS_PER_YEAR, valid_month};

use crate::{AnalyticsError, QueryContext};

/// Sums cases per calendar month, optionally for one year only.
///
/// The series always has twelve entries, January first, with zero for
/// months without data. Records with an absent or out-of-range month do
/// not contribute.
///
/// # Errors
///
/// * [`AnalyticsError::StoreUnavailable`] if the store query fails or times out
/// * [`AnalyticsError::Cancelled`] if the context is cancelled
pub async fn monthly_totals(
    store: &dyn RecordStore,
    ctx: &QueryContext,
    year: Option<i32>,
) -> Result<TrendSeries, AnalyticsError> {
    let groups = ctx
        .run("monthly_totals", store.sum_cases_by_month(year))
        .await?;

    Ok(TrendSeries {
        year,
        monthly: zero_filled(&groups),
    })
}

fn zero_filled(groups: &[MonthGroup]) -> Vec<MonthlyTotal> {
    let mut totals = [0u64; MONTHS_PER_YEAR as usize];

    for group in groups {
        let Some(month) = group.month.and_then(|m| valid_month(i64::from(m))) else {
            continue;
        };
        let slot = &mut totals[usize::from(month - 1)];
        *slot = slot.saturating_add(group.cases);
    }

    (1..=MONTHS_PER_YEAR)
        .zip(totals)
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}
