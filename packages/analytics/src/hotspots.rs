//! Geolocated hotspot points for the map.

use disease_map_analytics_models::{HotspotPoint, HotspotResult};
use disease_map_database::{RecordFilter, RecordStore};
use disease_map_disease_models::{DiseaseRecord, RiskThresholds};

use crate::{AnalyticsError, QueryContext, months::list_months};

/// Returns the geolocated records for one month, each tagged with a risk
/// tier.
///
/// When `month` is `None` (or zero) the latest month from
/// [`list_months`] is used; if the store has no month data at all, no month
/// restriction is applied. A requested month outside 1-12 yields no points.
/// Records without finite coordinates are dropped. Point order follows the
/// store's `find` order.
///
/// # Errors
///
/// * [`AnalyticsError::StoreUnavailable`] if a store query fails or times out
/// * [`AnalyticsError::Cancelled`] if the context is cancelled
pub async fn hotspots(
    store: &dyn RecordStore,
    ctx: &QueryContext,
    thresholds: &RiskThresholds,
    month: Option<i32>,
    year: Option<i32>,
) -> Result<HotspotResult, AnalyticsError> {
    let resolved_month = match month.filter(|&m| m != 0) {
        Some(m) => Some(m),
        None => list_months(store, ctx).await?.latest_month.map(i32::from),
    };

    let filter = RecordFilter {
        month: resolved_month,
        year,
    };
    let records = ctx.run("hotspots", store.find(&filter)).await?;
    let matched = records.len();

    let points: Vec<HotspotPoint> = records
        .iter()
        .filter(|r| resolved_month.is_none_or(|m| r.valid_month().map(i32::from) == Some(m)))
        .filter_map(|r| to_point(r, thresholds))
        .collect();

    log::debug!(
        "hotspots: month={resolved_month:?} year={year:?} matched={matched} geolocated={}",
        points.len()
    );

    Ok(HotspotResult {
        resolved_month,
        year,
        points,
    })
}

fn to_point(record: &DiseaseRecord, thresholds: &RiskThresholds) -> Option<HotspotPoint> {
    let (latitude, longitude) = record.coordinates()?;
    let cases = record.cases_or_zero();

    Some(HotspotPoint {
        state: record.state.clone(),
        district: record.district.clone(),
        disease: record.disease_name.clone(),
        cases,
        latitude,
        longitude,
        risk_tier: thresholds.classify(cases),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::CancelHandle;
    use crate::test_support::{FailingStore, StalledStore, record};
    use disease_map_database::MemoryRecordStore;
    use disease_map_disease_models::RiskTier;

    const GUWAHATI: (f64, f64) = (26.14, 91.73);
    const SILCHAR: (f64, f64) = (24.82, 92.79);

    fn defaults() -> RiskThresholds {
        RiskThresholds::default()
    }

    #[tokio::test]
    async fn defaults_to_latest_month() {
        let store = MemoryRecordStore::new(vec![
            record("Kamrup", Some(3), Some(2023), Some(5), Some(GUWAHATI)),
            record("Cachar", Some(3), Some(2023), Some(120), Some(SILCHAR)),
            record("Dibrugarh", Some(3), Some(2023), Some(9), None),
            record("Jorhat", Some(7), Some(2023), Some(600), Some(GUWAHATI)),
            record("Tezpur", Some(7), Some(2023), Some(1), Some((f64::NAN, 92.8))),
        ]);

        let result = hotspots(&store, &QueryContext::new(), &defaults(), None, None)
            .await
            .unwrap();

        assert_eq!(result.resolved_month, Some(7));
        assert_eq!(result.points.len(), 1);
        assert_eq!(result.points[0].district, "Jorhat");
        assert_eq!(result.points[0].risk_tier, RiskTier::Critical);
    }

    #[tokio::test]
    async fn record_missing_longitude_is_excluded() {
        let store = MemoryRecordStore::new(vec![
            record("Kamrup", Some(2), None, Some(3), Some(GUWAHATI)),
            record("Cachar", Some(9), None, Some(600), Some(SILCHAR)),
            DiseaseRecord {
                longitude: None,
                ..record("Dibrugarh", Some(9), None, Some(700), Some(GUWAHATI))
            },
        ]);

        let result = hotspots(&store, &QueryContext::new(), &defaults(), None, None)
            .await
            .unwrap();
        assert_eq!(result.resolved_month, Some(9));
        assert_eq!(result.points.len(), 1);
        assert_eq!(result.points[0].district, "Cachar");
        assert_eq!(result.points[0].risk_tier, RiskTier::Critical);
    }

    #[tokio::test]
    async fn explicit_month_filters_and_classifies() {
        let store = MemoryRecordStore::new(vec![
            record("Kamrup", Some(3), Some(2023), Some(5), Some(GUWAHATI)),
            record("Cachar", Some(3), Some(2023), Some(120), Some(SILCHAR)),
            record("Dibrugarh", Some(3), Some(2023), Some(9), None),
            record("Jorhat", Some(7), Some(2023), Some(600), Some(GUWAHATI)),
        ]);

        let result = hotspots(&store, &QueryContext::new(), &defaults(), Some(3), None)
            .await
            .unwrap();

        assert_eq!(result.resolved_month, Some(3));
        let tiers: Vec<(&str, RiskTier)> = result
            .points
            .iter()
            .map(|p| (p.district.as_str(), p.risk_tier))
            .collect();
        assert_eq!(
            tiers,
            vec![("Kamrup", RiskTier::Low), ("Cachar", RiskTier::Medium)]
        );
        assert!(result.points.iter().all(|p| p.latitude.is_finite()));
    }

    #[tokio::test]
    async fn zero_month_means_latest() {
        let store = MemoryRecordStore::new(vec![
            record("Kamrup", Some(2), None, Some(1), Some(GUWAHATI)),
            record("Cachar", Some(9), None, Some(1), Some(SILCHAR)),
        ]);

        let result = hotspots(&store, &QueryContext::new(), &defaults(), Some(0), None)
            .await
            .unwrap();
        assert_eq!(result.resolved_month, Some(9));
        assert_eq!(result.points[0].district, "Cachar");
    }

    #[tokio::test]
    async fn out_of_range_month_is_empty() {
        let store = MemoryRecordStore::new(vec![
            record("Kamrup", Some(13), None, Some(40), Some(GUWAHATI)),
            record("Cachar", Some(12), None, Some(40), Some(SILCHAR)),
        ]);

        let result = hotspots(&store, &QueryContext::new(), &defaults(), Some(13), None)
            .await
            .unwrap();
        assert_eq!(result.resolved_month, Some(13));
        assert!(result.points.is_empty());
    }

    #[tokio::test]
    async fn year_filter_applies_with_month() {
        let store = MemoryRecordStore::new(vec![
            record("Kamrup", Some(4), Some(2022), Some(70), Some(GUWAHATI)),
            record("Cachar", Some(4), Some(2023), Some(300), Some(SILCHAR)),
        ]);

        let result = hotspots(
            &store,
            &QueryContext::new(),
            &defaults(),
            Some(4),
            Some(2023),
        )
        .await
        .unwrap();
        assert_eq!(result.year, Some(2023));
        assert_eq!(result.points.len(), 1);
        assert_eq!(result.points[0].district, "Cachar");
        assert_eq!(result.points[0].risk_tier, RiskTier::High);
    }

    #[tokio::test]
    async fn no_month_data_returns_all_geolocated() {
        let store = MemoryRecordStore::new(vec![
            record("Kamrup", None, None, None, Some(GUWAHATI)),
            record("Cachar", None, None, Some(12), Some(SILCHAR)),
            record("Dibrugarh", None, None, Some(12), None),
        ]);

        let result = hotspots(&store, &QueryContext::new(), &defaults(), None, None)
            .await
            .unwrap();
        assert_eq!(result.resolved_month, None);
        assert_eq!(result.points.len(), 2);
        assert_eq!(result.points[0].cases, 0);
        assert_eq!(result.points[0].risk_tier, RiskTier::Low);
        assert_eq!(result.points[1].risk_tier, RiskTier::LowMedium);
    }

    #[tokio::test]
    async fn custom_thresholds_change_tiers() {
        let store = MemoryRecordStore::new(vec![record(
            "Kamrup",
            Some(5),
            None,
            Some(30),
            Some(GUWAHATI),
        )]);
        let strict = RiskThresholds {
            low_medium: 2,
            medium: 5,
            high: 10,
            critical: 25,
        };

        let result = hotspots(&store, &QueryContext::new(), &strict, Some(5), None)
            .await
            .unwrap();
        assert_eq!(result.points[0].risk_tier, RiskTier::Critical);
    }

    #[tokio::test]
    async fn repeated_queries_are_identical() {
        let store = MemoryRecordStore::new(vec![
            record("Kamrup", Some(6), Some(2023), Some(15), Some(GUWAHATI)),
            record("Cachar", Some(6), Some(2023), Some(250), Some(SILCHAR)),
        ]);
        let ctx = QueryContext::new();

        let first = hotspots(&store, &ctx, &defaults(), None, None).await.unwrap();
        let second = hotspots(&store, &ctx, &defaults(), None, None).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let err = hotspots(&FailingStore, &QueryContext::new(), &defaults(), Some(3), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::StoreUnavailable { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_bounds_a_stalled_store() {
        let ctx = QueryContext::new().with_timeout(Duration::from_secs(2));
        let err = hotspots(&StalledStore, &ctx, &defaults(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn cancelled_context_returns_cancelled() {
        let handle = CancelHandle::new();
        handle.cancel();
        let ctx = QueryContext::new().with_cancel(&handle);

        let err = hotspots(&StalledStore, &ctx, &defaults(), Some(3), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::Cancelled));
    }
}
