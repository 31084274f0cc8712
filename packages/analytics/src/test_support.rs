use std::time::Duration;

use async_trait::async_trait;
use disease_map_database::{MonthGroup, RecordFilter, RecordStore, RecordTotals, StoreError};
use disease_map_disease_models::DiseaseRecord;

pub fn record(
    district: &str,
    month: Option<i32>,
    year: Option<i32>,
    cases: Option<u64>,
    coords: Option<(f64, f64)>,
) -> DiseaseRecord {
    DiseaseRecord {
        state: "Assam".to_string(),
        district: district.to_string(),
        disease_name: "Cholera".to_string(),
        cases,
        month,
        year,
        latitude: coords.map(|(lat, _)| lat),
        longitude: coords.map(|(_, lon)| lon),
        ..DiseaseRecord::default()
    }
}

/// Store whose every call fails the way a dropped connection would.
pub struct FailingStore;

fn offline() -> StoreError {
    StoreError::Connection {
        message: "connection refused".to_string(),
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn distinct_months(&self) -> Result<Vec<i32>, StoreError> {
        Err(offline())
    }

    async fn find(&self, _filter: &RecordFilter) -> Result<Vec<DiseaseRecord>, StoreError> {
        Err(offline())
    }

    async fn sum_cases_by_month(&self, _year: Option<i32>) -> Result<Vec<MonthGroup>, StoreError> {
        Err(offline())
    }

    async fn totals(&self) -> Result<RecordTotals, StoreError> {
        Err(offline())
    }
}

/// Store that never answers within any reasonable deadline.
pub struct StalledStore;

async fn stall<T>() -> Result<T, StoreError> {
    tokio::time::sleep(Duration::from_secs(3600)).await;
    Err(offline())
}

#[async_trait]
impl RecordStore for StalledStore {
    async fn distinct_months(&self) -> Result<Vec<i32>, StoreError> {
        stall().await
    }

    async fn find(&self, _filter: &RecordFilter) -> Result<Vec<DiseaseRecord>, StoreError> {
        stall().await
    }

    async fn sum_cases_by_month(&self, _year: Option<i32>) -> Result<Vec<MonthGroup>, StoreError> {
        stall().await
    }

    async fn totals(&self) -> Result<RecordTotals, StoreError> {
        stall().await
    }
}
