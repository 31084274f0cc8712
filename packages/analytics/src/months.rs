//! Month catalog: which calendar months have data.

use std::collections::BTreeSet;

use disease_map_analytics_models::MonthCatalog;
use disease_map_database::RecordStore;
use disease_map_disease_models::valid_month;

use crate::{AnalyticsError, QueryContext};

/// Lists the distinct calendar months present in the store.
///
/// Absent and out-of-range months are excluded. `latest_month` is the
/// largest listed month, or `None` when the store has no month data.
///
/// # Errors
///
/// * [`AnalyticsError::StoreUnavailable`] if the store query fails or times out
/// * [`AnalyticsError::Cancelled`] if the context is cancelled
pub async fn list_months(
    store: &dyn RecordStore,
    ctx: &QueryContext,
) -> Result<MonthCatalog, AnalyticsError> {
    let raw = ctx.run("list_months", store.distinct_months()).await?;
    Ok(catalog_from_raw(&raw))
}

fn catalog_from_raw(raw: &[i32]) -> MonthCatalog {
    let months: BTreeSet<u8> = raw
        .iter()
        .filter_map(|&m| valid_month(i64::from(m)))
        .collect();
    let available_months: Vec<u8> = months.into_iter().collect();

    MonthCatalog {
        latest_month: available_months.last().copied(),
        available_months,
    }
}
