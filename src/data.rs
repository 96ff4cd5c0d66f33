//! Dataset loading and record normalization
//!
//! Rows come from a CSV file whose header names at least `year`,
//! `average_rating`, `users_rated` and `name`. Column order does not matter and
//! extra columns are ignored.
//!
//! Normalization turns each [`RawRecord`] into a [`NormalizedRecord`]:
//!
//! | Field | Raw | Normalized |
//! |-------|-----|------------|
//! | year | `"2016"` | `2016` |
//! | average_rating | `"7.83"` | bucket `7` (floor) |
//! | users_rated | `"15234"` | popularity `15234.0` |
//!
//! A row whose numbers cannot be parsed is dropped and recorded as a
//! [`RowDiagnostic`]. Only failures that make the whole file unusable (missing
//! file, I/O error, missing column) abort the load.

use crate::error::{ScopeError, ScopeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const REQUIRED_COLUMNS: [&str; 4] = ["year", "average_rating", "users_rated", "name"];

/// One untyped CSV row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    pub year: String,
    pub average_rating: String,
    pub users_rated: String,
    pub name: String,
}

impl RawRecord {
    pub fn new(year: &str, average_rating: &str, users_rated: &str, name: &str) -> Self {
        Self {
            year: year.to_string(),
            average_rating: average_rating.to_string(),
            users_rated: users_rated.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// Position of the source row among all data rows. Stable identity used for
    /// tie-breaking and for keying rendered bars.
    pub id: usize,
    pub year: i32,
    pub rating_bucket: i32,
    pub popularity: f64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowField {
    Year,
    AverageRating,
    UsersRated,
    /// The row itself could not be decoded (wrong field count, bad UTF-8).
    Row,
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RowField::Year => "year",
            RowField::AverageRating => "average_rating",
            RowField::UsersRated => "users_rated",
            RowField::Row => "row",
        };
        write!(f, "{}", s)
    }
}

/// Why a row was excluded from the normalized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDiagnostic {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub field: RowField,
    pub value: String,
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: invalid {} '{}'", self.row, self.field, self.value)
    }
}

/// Output of [`normalize`]: kept records in input order plus dropped-row notes.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<NormalizedRecord>,
    pub rejected: Vec<RowDiagnostic>,
}

/// A fully loaded dataset. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<NormalizedRecord>,
    pub rejected: Vec<RowDiagnostic>,
    pub rows_read: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub kept: usize,
    pub dropped: usize,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(path: P) -> ScopeResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        info!("Loading dataset from {}", path.display());
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> ScopeResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(ScopeError::MissingColumn(column));
            }
        }

        let mut raw = Vec::new();
        let mut undecodable = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let row = idx + 1;
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    undecodable.push(RowDiagnostic {
                        row,
                        field: RowField::Row,
                        value: e.to_string(),
                    });
                    raw.push(None);
                    continue;
                }
            };
            match record.deserialize::<RawRecord>(Some(&headers)) {
                Ok(r) => raw.push(Some(r)),
                Err(e) => {
                    undecodable.push(RowDiagnostic {
                        row,
                        field: RowField::Row,
                        value: e.to_string(),
                    });
                    raw.push(None);
                }
            }
        }

        let rows_read = raw.len();
        let mut dataset = Self::from_rows(raw);
        dataset.rejected.extend(undecodable);
        dataset.rejected.sort_by_key(|d| d.row);
        dataset.rows_read = rows_read;

        for diag in &dataset.rejected {
            warn!("Dropping {}", diag);
        }
        info!(
            rows = dataset.rows_read,
            kept = dataset.records.len(),
            dropped = dataset.rejected.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Build from already-decoded rows. Record ids are positions in `raw`.
    pub fn from_raw(raw: Vec<RawRecord>) -> Self {
        Self::from_rows(raw.into_iter().map(Some).collect())
    }

    fn from_rows(rows: Vec<Option<RawRecord>>) -> Self {
        let rows_read = rows.len();
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = Vec::new();
        for (id, row) in rows.iter().enumerate() {
            if let Some(raw) = row {
                match normalize_one(id, raw) {
                    Ok(rec) => records.push(rec),
                    Err(diag) => rejected.push(diag),
                }
            }
        }
        Self { records, rejected, rows_read }
    }

    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            rows_read: self.rows_read,
            kept: self.records.len(),
            dropped: self.rejected.len(),
        }
    }
}

/// Normalize a sequence of raw rows, preserving order. Ids are input positions.
pub fn normalize(raw: &[RawRecord]) -> Normalized {
    let mut out = Normalized::default();
    for (id, r) in raw.iter().enumerate() {
        match normalize_one(id, r) {
            Ok(rec) => out.records.push(rec),
            Err(diag) => out.rejected.push(diag),
        }
    }
    out
}

fn normalize_one(id: usize, raw: &RawRecord) -> Result<NormalizedRecord, RowDiagnostic> {
    let reject = |field: RowField, value: &str| RowDiagnostic {
        row: id + 1,
        field,
        value: value.to_string(),
    };

    let year = parse_year(&raw.year).ok_or_else(|| reject(RowField::Year, &raw.year))?;
    let rating = parse_number(&raw.average_rating)
        .ok_or_else(|| reject(RowField::AverageRating, &raw.average_rating))?;
    let rating_bucket = bucket_of(rating)
        .ok_or_else(|| reject(RowField::AverageRating, &raw.average_rating))?;
    let popularity = parse_number(&raw.users_rated)
        .ok_or_else(|| reject(RowField::UsersRated, &raw.users_rated))?;

    Ok(NormalizedRecord {
        id,
        year,
        rating_bucket,
        popularity,
        name: raw.name.clone(),
    })
}

/// Finite decimal number. `NaN` and infinities count as malformed.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer year; `"2016.0"` is accepted, `"2016.5"` is not.
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let v = parse_number(s)?;
    if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}

/// Integer rating bucket: `floor(rating)`.
pub fn bucket_of(rating: f64) -> Option<i32> {
    let b = rating.floor();
    if b >= i32::MIN as f64 && b <= i32::MAX as f64 {
        Some(b as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // FIELD PARSING TESTS
    // ==========================================================================

    #[test]
    fn test_bucket_is_floor() {
        assert_eq!(bucket_of(7.2), Some(7));
        assert_eq!(bucket_of(7.99), Some(7));
        assert_eq!(bucket_of(7.0), Some(7));
        assert_eq!(bucket_of(0.5), Some(0));
        // floor, not truncation
        assert_eq!(bucket_of(-0.5), Some(-1));
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(parse_number(" 500 "), Some(500.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("many"), None);
    }

    #[test]
    fn test_parse_year_accepts_integral_decimals() {
        assert_eq!(parse_year("2016"), Some(2016));
        assert_eq!(parse_year("2016.0"), Some(2016));
        assert_eq!(parse_year("2016.5"), None);
        assert_eq!(parse_year("soon"), None);
    }

    // ==========================================================================
    // NORMALIZATION TESTS
    // ==========================================================================

    #[test]
    fn test_normalize_preserves_order_and_ids() {
        let raw = vec![
            RawRecord::new("2016", "7.2", "500", "A"),
            RawRecord::new("2017", "6.9", "20", "B"),
        ];
        let out = normalize(&raw);

        assert!(out.rejected.is_empty());
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].id, 0);
        assert_eq!(out.records[0].rating_bucket, 7);
        assert_eq!(out.records[1].id, 1);
        assert_eq!(out.records[1].year, 2017);
        assert_eq!(out.records[1].rating_bucket, 6);
        assert_eq!(out.records[1].popularity, 20.0);
    }

    #[test]
    fn test_normalize_drops_malformed_rows_with_diagnostics() {
        let raw = vec![
            RawRecord::new("2016", "7.2", "500", "A"),
            RawRecord::new("2016", "n/a", "500", "B"),
            RawRecord::new("2016", "7.1", "lots", "C"),
            RawRecord::new("", "7.1", "3", "D"),
        ];
        let out = normalize(&raw);

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].name, "A");
        assert_eq!(out.rejected.len(), 3);
        assert_eq!(out.rejected[0].row, 2);
        assert_eq!(out.rejected[0].field, RowField::AverageRating);
        assert_eq!(out.rejected[1].field, RowField::UsersRated);
        assert_eq!(out.rejected[2].field, RowField::Year);
    }

    // ==========================================================================
    // CSV LOADING TESTS
    // ==========================================================================

    #[test]
    fn test_from_reader_ignores_extra_columns_and_order() {
        let csv = "name,id,users_rated,year,average_rating\n\
                   Catan,1,9000,2016,7.5\n\
                   Azul,2,8000,2017,7.9\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(ds.rows_read, 2);
        assert_eq!(ds.records.len(), 2);
        assert_eq!(ds.records[0].name, "Catan");
        assert_eq!(ds.records[1].rating_bucket, 7);
    }

    #[test]
    fn test_from_reader_missing_column_is_fatal() {
        let csv = "name,year,average_rating\nCatan,2016,7.5\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ScopeError::MissingColumn("users_rated")));
    }

    #[test]
    fn test_from_reader_short_row_is_dropped_not_fatal() {
        let csv = "year,average_rating,users_rated,name\n\
                   2016,7.5,100,A\n\
                   2016,7.5\n\
                   2017,6.1,50,B\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(ds.rows_read, 3);
        assert_eq!(ds.records.len(), 2);
        assert_eq!(ds.rejected.len(), 1);
        assert_eq!(ds.rejected[0].row, 2);
        assert_eq!(ds.rejected[0].field, RowField::Row);
        // ids remain source positions
        assert_eq!(ds.records[1].id, 2);
    }

    #[test]
    fn test_summary_counts() {
        let ds = Dataset::from_raw(vec![
            RawRecord::new("2016", "7.2", "500", "A"),
            RawRecord::new("2016", "x", "500", "B"),
        ]);
        let s = ds.summary();
        assert_eq!(s, LoadSummary { rows_read: 2, kept: 1, dropped: 1 });
    }
}
