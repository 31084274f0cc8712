//! In-memory [`RecordStore`] over an immutable record list.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use disease_map_disease_models::DiseaseRecord;

use crate::StoreError;
use crate::store::{MonthGroup, RecordFilter, RecordStore, RecordTotals};

/// Holds records in insertion order; `find` returns them in that order.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<[DiseaseRecord]>,
}

impl MemoryRecordStore {
    /// Creates a store over the given records.
    #[must_use]
    pub fn new(records: Vec<DiseaseRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Loads records from CSV text in the import format.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the CSV is malformed.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, StoreError> {
        Ok(Self::new(crate::import::read_csv_records(reader)?))
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn distinct_months(&self) -> Result<Vec<i32>, StoreError> {
        let months: BTreeSet<i32> = self.records.iter().filter_map(|r| r.month).collect();
        Ok(months.into_iter().collect())
    }

    async fn find(&self, filter: &RecordFilter) -> Result<Vec<DiseaseRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn sum_cases_by_month(&self, year: Option<i32>) -> Result<Vec<MonthGroup>, StoreError> {
        let mut groups: BTreeMap<Option<i32>, u64> = BTreeMap::new();
        for record in self
            .records
            .iter()
            .filter(|r| year.is_none_or(|y| r.year == Some(y)))
        {
            let total = groups.entry(record.month).or_insert(0);
            *total = total.saturating_add(record.cases_or_zero());
        }

        Ok(groups
            .into_iter()
            .map(|(month, cases)| MonthGroup { month, cases })
            .collect())
    }

    async fn totals(&self) -> Result<RecordTotals, StoreError> {
        Ok(self
            .records
            .iter()
            .fold(RecordTotals::default(), |acc, r| RecordTotals {
                total_cases: acc.total_cases.saturating_add(r.cases_or_zero()),
                total_deaths: acc.total_deaths.saturating_add(r.deaths_or_zero()),
                year_min: match (acc.year_min, r.year) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                },
                year_max: match (acc.year_max, r.year) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                },
            }))
    }
}
