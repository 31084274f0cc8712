//! The read interface the aggregation engine consumes.

use std::sync::Arc;

use async_trait::async_trait;
use disease_map_disease_models::DiseaseRecord;
use switchy_database::Database;

use crate::{StoreError, queries};

/// Equality filters on the raw `mon` and `year` columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Only records whose stored month equals this value.
    pub month: Option<i32>,
    /// Only records whose stored year equals this value.
    pub year: Option<i32>,
}

impl RecordFilter {
    /// Returns `true` if the record passes both filters.
    #[must_use]
    pub fn matches(&self, record: &DiseaseRecord) -> bool {
        self.month.is_none_or(|m| record.month == Some(m))
            && self.year.is_none_or(|y| record.year == Some(y))
    }
}

/// Sum of cases for one stored month value (which may be absent or
/// out of range; consumers decide what to keep).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGroup {
    /// Stored month value.
    pub month: Option<i32>,
    /// Sum of cases, absent counted as zero.
    pub cases: u64,
}

/// Whole-table aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordTotals {
    /// Sum of cases, absent counted as zero.
    pub total_cases: u64,
    /// Sum of deaths, absent counted as zero.
    pub total_deaths: u64,
    /// Smallest year carried by any record.
    pub year_min: Option<i32>,
    /// Largest year carried by any record.
    pub year_max: Option<i32>,
}

/// Read-only access to the disease record collection.
///
/// Implementations must be safe to call concurrently and must never
/// mutate the underlying records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Distinct non-null stored month values, in no particular order.
    async fn distinct_months(&self) -> Result<Vec<i32>, StoreError>;

    /// Records matching the filter, in a stable order.
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<DiseaseRecord>, StoreError>;

    /// Cases grouped by stored month, optionally restricted to one year.
    async fn sum_cases_by_month(&self, year: Option<i32>) -> Result<Vec<MonthGroup>, StoreError>;

    /// Sum of cases and deaths plus the year range over every record.
    async fn totals(&self) -> Result<RecordTotals, StoreError>;
}

/// [`RecordStore`] backed by a `switchy_database` connection.
#[derive(Clone)]
pub struct SqlRecordStore {
    db: Arc<dyn Database>,
}

impl SqlRecordStore {
    /// Wraps an open database connection.
    #[must_use]
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

impl std::fmt::Debug for SqlRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlRecordStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl RecordStore for SqlRecordStore {
    async fn distinct_months(&self) -> Result<Vec<i32>, StoreError> {
        queries::distinct_months(self.db.as_ref()).await
    }

    async fn find(&self, filter: &RecordFilter) -> Result<Vec<DiseaseRecord>, StoreError> {
        queries::find_records(self.db.as_ref(), filter).await
    }

    async fn sum_cases_by_month(&self, year: Option<i32>) -> Result<Vec<MonthGroup>, StoreError> {
        queries::sum_cases_by_month(self.db.as_ref(), year).await
    }

    async fn totals(&self) -> Result<RecordTotals, StoreError> {
        queries::totals(self.db.as_ref()).await
    }
}
