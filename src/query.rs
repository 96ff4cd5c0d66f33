//! Top-N detail query
//!
//! Pure function over the normalized records: filter to one (year, bucket),
//! rank by popularity descending, keep the first N. Equal popularity keeps
//! input order (record id), so identical inputs always give identical output.

use crate::data::NormalizedRecord;
use serde::Serialize;
use std::cmp::Ordering;

/// Number of items shown in the detail chart.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BucketKey {
    pub year: i32,
    pub bucket: i32,
}

/// Ranked result of [`top_n`]; may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopNResult {
    pub items: Vec<NormalizedRecord>,
}

impl TopNResult {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRecord> {
        self.items.iter()
    }

    pub fn max_popularity(&self) -> f64 {
        self.items.iter().map(|r| r.popularity).fold(0.0, f64::max)
    }
}

pub fn top_n(records: &[NormalizedRecord], year: i32, bucket: i32, n: usize) -> TopNResult {
    let mut matching: Vec<&NormalizedRecord> = records
        .iter()
        .filter(|r| r.year == year && r.rating_bucket == bucket)
        .collect();

    matching.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    matching.truncate(n);

    TopNResult { items: matching.into_iter().cloned().collect() }
}

/// [`top_n`] with the default N of 5.
pub fn query(records: &[NormalizedRecord], year: i32, bucket: i32) -> TopNResult {
    top_n(records, year, bucket, DEFAULT_TOP_N)
}
