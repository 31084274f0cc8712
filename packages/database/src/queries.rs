//! Raw SQL against the `disease_data` table.
//!
//! Every integer column is cast to `BIGINT` on the way out so the row
//! decoding is the same on Postgres (where `SUM(bigint)` is `NUMERIC`) and
//! `SQLite`. Filter parameters use `Int32` to match the `INTEGER` columns,
//! since Postgres decodes bound parameters in binary.

use std::fmt::Write as _;

use disease_map_disease_models::DiseaseRecord;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue, Row};

use crate::StoreError;
use crate::store::{MonthGroup, RecordFilter, RecordTotals};

/// Rows per multi-row INSERT.
const CHUNK_SIZE: usize = 500;

/// Columns written by [`insert_records`], in bind order.
const INSERT_COLUMNS: usize = 11;

const SELECT_RECORD_COLUMNS: &str = "state_ut, district, disease,
    CAST(cases AS BIGINT) AS cases,
    CAST(deaths AS BIGINT) AS deaths,
    CAST(day AS BIGINT) AS day,
    CAST(mon AS BIGINT) AS mon,
    CAST(year AS BIGINT) AS year,
    latitude, longitude, week_of_outbreak";

fn conversion(column: &str, e: impl std::fmt::Display) -> StoreError {
    StoreError::Conversion {
        message: format!("Failed to read column '{column}': {e}"),
    }
}

/// Negative counts in dirty data are clamped to zero.
fn count_from_db(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn where_clause(frags: &[String]) -> String {
    if frags.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", frags.join(" AND "))
    }
}

fn optional_i32(value: Option<i32>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, DatabaseValue::Int32)
}

fn optional_count(value: Option<u64>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |c| {
        DatabaseValue::Int64(i64::try_from(c).unwrap_or(i64::MAX))
    })
}

fn optional_f64(value: Option<f64>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, DatabaseValue::Real64)
}

/// Returns the distinct non-null `mon` values.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails or a value cannot be decoded.
pub async fn distinct_months(db: &dyn Database) -> Result<Vec<i32>, StoreError> {
    let rows = db
        .query_raw_params(
            "SELECT DISTINCT CAST(mon AS BIGINT) AS mon
             FROM disease_data
             WHERE mon IS NOT NULL",
            &[],
        )
        .await?;

    let mut months = Vec::with_capacity(rows.len());
    for row in &rows {
        let mon: i64 = row.to_value("mon").map_err(|e| conversion("mon", e))?;
        if let Ok(mon) = i32::try_from(mon) {
            months.push(mon);
        } else {
            log::warn!("Ignoring month value {mon} outside the i32 range");
        }
    }

    Ok(months)
}

/// Returns all records matching the month/year filter.
///
/// Rows are ordered by every projected column so repeated calls return
/// the same sequence.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails or a row cannot be decoded.
pub async fn find_records(
    db: &dyn Database,
    filter: &RecordFilter,
) -> Result<Vec<DiseaseRecord>, StoreError> {
    let mut frags = Vec::new();
    let mut params: Vec<DatabaseValue> = Vec::new();

    if let Some(month) = filter.month {
        frags.push(format!("mon = ${}", params.len() + 1));
        params.push(DatabaseValue::Int32(month));
    }

    if let Some(year) = filter.year {
        frags.push(format!("year = ${}", params.len() + 1));
        params.push(DatabaseValue::Int32(year));
    }

    let sql = format!(
        "SELECT {SELECT_RECORD_COLUMNS}
         FROM disease_data{}
         ORDER BY year, mon, day, state_ut, district, disease, cases, deaths,
                  latitude, longitude, week_of_outbreak",
        where_clause(&frags)
    );

    let rows = db.query_raw_params(&sql, &params).await?;
    log::debug!("find_records({filter:?}) returned {} rows", rows.len());

    rows.iter().map(record_from_row).collect()
}

fn record_from_row(row: &Row) -> Result<DiseaseRecord, StoreError> {
    let state: Option<String> = row.to_value("state_ut").map_err(|e| conversion("state_ut", e))?;
    let district: Option<String> =
        row.to_value("district").map_err(|e| conversion("district", e))?;
    let disease: Option<String> = row.to_value("disease").map_err(|e| conversion("disease", e))?;
    let cases: Option<i64> = row.to_value("cases").map_err(|e| conversion("cases", e))?;
    let deaths: Option<i64> = row.to_value("deaths").map_err(|e| conversion("deaths", e))?;
    let day: Option<i64> = row.to_value("day").map_err(|e| conversion("day", e))?;
    let mon: Option<i64> = row.to_value("mon").map_err(|e| conversion("mon", e))?;
    let year: Option<i64> = row.to_value("year").map_err(|e| conversion("year", e))?;
    let latitude: Option<f64> = row.to_value("latitude").map_err(|e| conversion("latitude", e))?;
    let longitude: Option<f64> =
        row.to_value("longitude").map_err(|e| conversion("longitude", e))?;
    let week_of_outbreak: Option<String> = row
        .to_value("week_of_outbreak")
        .map_err(|e| conversion("week_of_outbreak", e))?;

    Ok(DiseaseRecord {
        state: state.unwrap_or_default(),
        district: district.unwrap_or_default(),
        disease_name: disease.unwrap_or_default(),
        cases: cases.map(count_from_db),
        deaths: deaths.map(count_from_db),
        day: day.and_then(|d| i32::try_from(d).ok()),
        month: mon.and_then(|m| i32::try_from(m).ok()),
        year: year.and_then(|y| i32::try_from(y).ok()),
        latitude,
        longitude,
        week_of_outbreak,
    })
}

/// Sums cases per stored `mon` value, optionally restricted to one year.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails or a row cannot be decoded.
pub async fn sum_cases_by_month(
    db: &dyn Database,
    year: Option<i32>,
) -> Result<Vec<MonthGroup>, StoreError> {
    let (wc, params) = year.map_or_else(
        || (String::new(), Vec::new()),
        |y| (" WHERE year = $1".to_string(), vec![DatabaseValue::Int32(y)]),
    );

    let sql = format!(
        "SELECT CAST(mon AS BIGINT) AS mon,
                CAST(COALESCE(SUM(cases), 0) AS BIGINT) AS total
         FROM disease_data{wc}
         GROUP BY mon"
    );

    let rows = db.query_raw_params(&sql, &params).await?;

    rows.iter()
        .map(|row| {
            let mon: Option<i64> = row.to_value("mon").map_err(|e| conversion("mon", e))?;
            let total: i64 = row.to_value("total").map_err(|e| conversion("total", e))?;
            Ok(MonthGroup {
                month: mon.and_then(|m| i32::try_from(m).ok()),
                cases: count_from_db(total),
            })
        })
        .collect()
}

/// Computes case/death sums and the year range over the whole table.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails or the row cannot be decoded.
pub async fn totals(db: &dyn Database) -> Result<RecordTotals, StoreError> {
    let rows = db
        .query_raw_params(
            "SELECT CAST(COALESCE(SUM(cases), 0) AS BIGINT) AS total_cases,
                    CAST(COALESCE(SUM(deaths), 0) AS BIGINT) AS total_deaths,
                    CAST(MIN(year) AS BIGINT) AS year_min,
                    CAST(MAX(year) AS BIGINT) AS year_max
             FROM disease_data",
            &[],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(RecordTotals::default());
    };

    let total_cases: i64 = row
        .to_value("total_cases")
        .map_err(|e| conversion("total_cases", e))?;
    let total_deaths: i64 = row
        .to_value("total_deaths")
        .map_err(|e| conversion("total_deaths", e))?;
    let year_min: Option<i64> = row
        .to_value("year_min")
        .map_err(|e| conversion("year_min", e))?;
    let year_max: Option<i64> = row
        .to_value("year_max")
        .map_err(|e| conversion("year_max", e))?;

    Ok(RecordTotals {
        total_cases: count_from_db(total_cases),
        total_deaths: count_from_db(total_deaths),
        year_min: year_min.and_then(|y| i32::try_from(y).ok()),
        year_max: year_max.and_then(|y| i32::try_from(y).ok()),
    })
}

/// Inserts records in multi-row chunks.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`StoreError`] if any INSERT fails.
pub async fn insert_records(db: &dyn Database, records: &[DiseaseRecord]) -> Result<u64, StoreError> {
    let mut inserted = 0u64;

    for chunk in records.chunks(CHUNK_SIZE) {
        let mut sql = String::from(
            "INSERT INTO disease_data (
                state_ut, district, disease, cases, deaths, day, mon, year,
                latitude, longitude, week_of_outbreak
            ) VALUES ",
        );
        let mut params: Vec<DatabaseValue> = Vec::with_capacity(chunk.len() * INSERT_COLUMNS);

        for (i, record) in chunk.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let base = i * INSERT_COLUMNS;
            sql.push('(');
            for col in 1..=INSERT_COLUMNS {
                if col > 1 {
                    sql.push_str(", ");
                }
                let _ = write!(sql, "${}", base + col);
            }
            sql.push(')');

            params.push(DatabaseValue::String(record.state.clone()));
            params.push(DatabaseValue::String(record.district.clone()));
            params.push(DatabaseValue::String(record.disease_name.clone()));
            params.push(optional_count(record.cases));
            params.push(optional_count(record.deaths));
            params.push(optional_i32(record.day));
            params.push(optional_i32(record.month));
            params.push(optional_i32(record.year));
            params.push(optional_f64(record.latitude));
            params.push(optional_f64(record.longitude));
            params.push(
                record
                    .week_of_outbreak
                    .as_ref()
                    .map_or(DatabaseValue::Null, |w| DatabaseValue::String(w.clone())),
            );
        }

        inserted += db.exec_raw_params(&sql, &params).await?;
    }

    log::info!("Inserted {inserted} disease records");
    Ok(inserted)
}
