//! CSV import for `Disease_Data` exports.
//!
//! Expected headers (case-sensitive, any order, extras ignored):
//! `state_ut, district, Disease, Cases, Deaths, day, mon, year,
//! Latitude, Longitude, week_of_outbreak`. Missing columns and cells that
//! fail to parse are treated as absent. Numeric cells exported by
//! spreadsheet tools as `12.0` are accepted when they are whole numbers.

use std::collections::BTreeMap;
use std::io::Read;

use disease_map_disease_models::{DiseaseRecord, valid_month};
use switchy_database::Database;

use crate::{StoreError, queries};

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Data rows read from the CSV.
    pub rows_read: u64,
    /// Rows written to the database.
    pub rows_inserted: u64,
    /// Rows whose `mon` cell was present but outside 1-12.
    pub invalid_months: u64,
}

/// Reads and parses every row of a CSV export.
///
/// # Errors
///
/// Returns [`StoreError::Csv`] if the CSV itself is malformed.
pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<DiseaseRecord>, StoreError> {
    Ok(parse_csv(reader)?.0)
}

/// Parses a CSV export and inserts every row into `disease_data`.
///
/// # Errors
///
/// Returns [`StoreError`] if the CSV is malformed or an INSERT fails.
pub async fn import_csv<R: Read>(db: &dyn Database, reader: R) -> Result<ImportStats, StoreError> {
    let (records, invalid_months) = parse_csv(reader)?;
    let rows_read = records.len() as u64;

    crate::ensure_schema(db).await?;
    let rows_inserted = queries::insert_records(db, &records).await?;

    Ok(ImportStats {
        rows_read,
        rows_inserted,
        invalid_months,
    })
}

fn parse_csv<R: Read>(reader: R) -> Result<(Vec<DiseaseRecord>, u64), StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: BTreeMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_owned(), i))
        .collect();

    let mut records = Vec::new();
    let mut invalid_months = 0u64;

    for result in reader.records() {
        let row = result?;
        let cell = |name: &str| {
            columns
                .get(name)
                .and_then(|&i| row.get(i))
                .filter(|v| !v.is_empty())
        };

        let raw_month = cell("mon").and_then(parse_whole);
        let month = raw_month
            .and_then(valid_month)
            .map(i32::from);
        if raw_month.is_some() && month.is_none() {
            invalid_months += 1;
        }

        records.push(DiseaseRecord {
            state: cell("state_ut").unwrap_or_default().to_owned(),
            district: cell("district").unwrap_or_default().to_owned(),
            disease_name: cell("Disease").unwrap_or_default().to_owned(),
            cases: cell("Cases").and_then(parse_count),
            deaths: cell("Deaths").and_then(parse_count),
            day: cell("day").and_then(parse_whole).and_then(|d| i32::try_from(d).ok()),
            month,
            year: cell("year").and_then(parse_whole).and_then(|y| i32::try_from(y).ok()),
            latitude: cell("Latitude").and_then(parse_finite),
            longitude: cell("Longitude").and_then(parse_finite),
            week_of_outbreak: cell("week_of_outbreak").map(str::to_owned),
        });
    }

    if invalid_months > 0 {
        log::warn!("{invalid_months} rows had a month outside 1-12; stored without a month");
    }
    log::info!("Parsed {} disease records from CSV", records.len());

    Ok((records, invalid_months))
}

/// Parses an integer, accepting whole-valued decimals such as `"12.0"`.
#[allow(clippy::cast_possible_truncation)]
fn parse_whole(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}

fn parse_count(s: &str) -> Option<u64> {
    parse_whole(s).and_then(|v| u64::try_from(v).ok())
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
