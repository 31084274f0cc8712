//! HTTP handler functions for the disease map API.

use actix_web::{HttpResponse, web};
use disease_map_analytics::{AnalyticsError, filters, hotspots, months, summary, trends};
use disease_map_server_models::{ApiError, ApiHealth, HotspotQueryParams, TrendQueryParams};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/disease/months`
pub async fn months(state: web::Data<AppState>) -> HttpResponse {
    let ctx = state.query_context();
    match months::list_months(state.store.as_ref(), &ctx).await {
        Ok(catalog) => HttpResponse::Ok().json(catalog),
        Err(e) => error_response("months", &e),
    }
}

/// `GET /api/disease/hotspots`
///
/// Geolocated records for `mon` (latest month when omitted) with risk
/// tiers, optionally restricted to `year`.
pub async fn hotspots(
    state: web::Data<AppState>,
    params: web::Query<HotspotQueryParams>,
) -> HttpResponse {
    let month = filters::parse_month_filter(params.mon.as_deref());
    let year = match filters::parse_year_filter(params.year.as_deref()) {
        Ok(year) => year,
        Err(e) => return error_response("hotspots", &e),
    };

    let ctx = state.query_context();
    match hotspots::hotspots(state.store.as_ref(), &ctx, &state.thresholds, month, year).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response("hotspots", &e),
    }
}

/// `GET /api/disease/trends`
pub async fn trends(
    state: web::Data<AppState>,
    params: web::Query<TrendQueryParams>,
) -> HttpResponse {
    let year = match filters::parse_year_filter(params.year.as_deref()) {
        Ok(year) => year,
        Err(e) => return error_response("trends", &e),
    };

    let ctx = state.query_context();
    match trends::monthly_totals(state.store.as_ref(), &ctx, year).await {
        Ok(series) => HttpResponse::Ok().json(series),
        Err(e) => error_response("trends", &e),
    }
}

/// `GET /api/disease/summary`
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    let ctx = state.query_context();
    match summary::summary(state.store.as_ref(), &ctx).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response("summary", &e),
    }
}

/// `GET /api/disease/redzones`
///
/// Runs the prediction program and returns its risk-zone table.
pub async fn redzones(state: web::Data<AppState>) -> HttpResponse {
    let report = state.risk_zones.risk_zones();
    let result = match state.query_timeout {
        Some(timeout) => match tokio::time::timeout(timeout, report).await {
            Ok(result) => result,
            Err(_) => {
                log::error!("Risk-zone program exceeded {timeout:?}");
                return HttpResponse::ServiceUnavailable().json(ApiError::new("store_unavailable"));
            }
        },
        None => report.await,
    };

    match result {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            log::error!("Failed to compute risk zones: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("internal_error"))
        }
    }
}

fn error_response(operation: &str, e: &AnalyticsError) -> HttpResponse {
    match e {
        AnalyticsError::InvalidFilter { message } => {
            HttpResponse::BadRequest().json(ApiError::new("invalid_filter").with_message(message))
        }
        AnalyticsError::StoreUnavailable { .. } | AnalyticsError::Cancelled => {
            log::error!("Failed to query {operation}: {e}");
            HttpResponse::ServiceUnavailable().json(ApiError::new("store_unavailable"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use disease_map_database::{
        MemoryRecordStore, MonthGroup, RecordFilter, RecordStore, RecordTotals, StoreError,
    };
    use disease_map_disease_models::{DiseaseRecord, RiskThresholds};
    use disease_map_prediction::{
        PredictionError, RiskBand, RiskZone, RiskZoneProvider, RiskZoneReport,
    };
    use serde_json::{Value, json};

    use crate::{AppState, configure_api};

    struct FixedZones;

    #[async_trait]
    impl RiskZoneProvider for FixedZones {
        async fn risk_zones(&self) -> Result<RiskZoneReport, PredictionError> {
            Ok(RiskZoneReport {
                zones: vec![RiskZone {
                    district: "Kamrup".to_string(),
                    disease: "Cholera".to_string(),
                    percentage: 100.0,
                    date: "2023-09-01".to_string(),
                    band: RiskBand::Red,
                }],
                map_path: Some("/maps/india_hotspot_map.html".to_string()),
            })
        }
    }

    struct SlowZones;

    #[async_trait]
    impl RiskZoneProvider for SlowZones {
        async fn risk_zones(&self) -> Result<RiskZoneReport, PredictionError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(RiskZoneReport::default())
        }
    }

    struct OfflineStore;

    fn refused() -> StoreError {
        StoreError::Connection {
            message: "connection refused".to_string(),
        }
    }

    #[async_trait]
    impl RecordStore for OfflineStore {
        async fn distinct_months(&self) -> Result<Vec<i32>, StoreError> {
            Err(refused())
        }

        async fn find(&self, _filter: &RecordFilter) -> Result<Vec<DiseaseRecord>, StoreError> {
            Err(refused())
        }

        async fn sum_cases_by_month(
            &self,
            _year: Option<i32>,
        ) -> Result<Vec<MonthGroup>, StoreError> {
            Err(refused())
        }

        async fn totals(&self) -> Result<RecordTotals, StoreError> {
            Err(refused())
        }
    }

    fn record(
        district: &str,
        month: i32,
        year: i32,
        cases: u64,
        coords: Option<(f64, f64)>,
    ) -> DiseaseRecord {
        DiseaseRecord {
            state: "Assam".to_string(),
            district: district.to_string(),
            disease_name: "Cholera".to_string(),
            cases: Some(cases),
            deaths: Some(1),
            month: Some(month),
            year: Some(year),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            ..DiseaseRecord::default()
        }
    }

    fn state_with(store: Arc<dyn RecordStore>) -> AppState {
        AppState {
            store,
            thresholds: RiskThresholds::default(),
            query_timeout: Some(Duration::from_secs(5)),
            risk_zones: Arc::new(FixedZones),
        }
    }

    fn sample_state() -> AppState {
        state_with(Arc::new(MemoryRecordStore::new(vec![
            record("Kamrup", 9, 2023, 600, Some((26.14, 91.73))),
            record("Cachar", 9, 2023, 40, None),
            record("Dibrugarh", 2, 2022, 8, Some((27.47, 94.91))),
            record("Jorhat", 5, 2023, 75, Some((26.75, 94.2))),
        ])))
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(configure_api),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let (status, body) = get_json(sample_state(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], json!(true));
        assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    }

    #[actix_web::test]
    async fn months_endpoint() {
        let (status, body) = get_json(sample_state(), "/api/disease/months").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "months": [2, 5, 9], "latestMonth": 9 }));
    }

    #[actix_web::test]
    async fn hotspots_default_to_latest_month() {
        let (status, body) = get_json(sample_state(), "/api/disease/hotspots").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["month"], json!(9));
        assert_eq!(
            body["hotspots"],
            json!([{
                "state_ut": "Assam",
                "district": "Kamrup",
                "Disease": "Cholera",
                "Cases": 600,
                "lat": 26.14,
                "lon": 91.73,
                "riskTier": "critical"
            }])
        );
    }

    #[actix_web::test]
    async fn hotspots_blank_and_bad_month_mean_latest() {
        for uri in [
            "/api/disease/hotspots?mon=",
            "/api/disease/hotspots?mon=0",
            "/api/disease/hotspots?mon=abc",
        ] {
            let (status, body) = get_json(sample_state(), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["month"], json!(9), "{uri}");
        }
    }

    #[actix_web::test]
    async fn hotspots_with_month_and_year() {
        let (status, body) =
            get_json(sample_state(), "/api/disease/hotspots?mon=5&year=2023").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["year"], json!(2023));
        assert_eq!(body["hotspots"][0]["district"], json!("Jorhat"));
        assert_eq!(body["hotspots"][0]["riskTier"], json!("medium"));

        let (_, body) = get_json(sample_state(), "/api/disease/hotspots?mon=5&year=2022").await;
        assert_eq!(body["hotspots"], json!([]));
    }

    #[actix_web::test]
    async fn invalid_year_is_bad_request() {
        let (status, body) = get_json(sample_state(), "/api/disease/hotspots?year=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("invalid_filter"));
        assert!(body["message"].is_string());

        let (status, _) = get_json(sample_state(), "/api/disease/trends?year=20x3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn trends_endpoint() {
        let (status, body) = get_json(sample_state(), "/api/disease/trends?year=2023").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["year"], json!(2023));

        let monthly = body["monthly"].as_array().unwrap();
        assert_eq!(monthly.len(), 12);
        assert_eq!(monthly[4], json!({ "mon": 5, "total": 75 }));
        assert_eq!(monthly[8], json!({ "mon": 9, "total": 640 }));
        assert_eq!(monthly[1], json!({ "mon": 2, "total": 0 }));
    }

    #[actix_web::test]
    async fn summary_endpoint() {
        let (status, body) = get_json(sample_state(), "/api/disease/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "totalCases": 723,
                "totalDeaths": 4,
                "yearRange": { "min": 2022, "max": 2023 },
                "months": [2, 5, 9]
            })
        );
    }

    #[actix_web::test]
    async fn store_outage_is_service_unavailable() {
        for uri in [
            "/api/disease/months",
            "/api/disease/hotspots?mon=3",
            "/api/disease/trends",
            "/api/disease/summary",
        ] {
            let (status, body) = get_json(state_with(Arc::new(OfflineStore)), uri).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
            assert_eq!(body, json!({ "error": "store_unavailable" }), "{uri}");
        }
    }

    #[actix_web::test]
    async fn redzones_endpoint() {
        let (status, body) = get_json(sample_state(), "/api/disease/redzones").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mapPath"], json!("/maps/india_hotspot_map.html"));
        assert_eq!(body["redzones"][0]["band"], json!("red"));
    }

    #[actix_web::test]
    async fn slow_redzone_program_is_service_unavailable() {
        let state = AppState {
            query_timeout: Some(Duration::from_millis(50)),
            risk_zones: Arc::new(SlowZones),
            ..sample_state()
        };

        let (status, body) = get_json(state, "/api/disease/redzones").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "error": "store_unavailable" }));
    }
}
