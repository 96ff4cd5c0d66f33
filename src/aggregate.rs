//! Year x rating-bucket count aggregation
//!
//! The count table is a dense grid: one row per year of the [`YearSet`], one
//! column per bucket of the [`RatingBucketSet`]. Every cell exists and starts
//! at zero, so every year's series covers exactly the same bucket domain.
//!
//! Buckets are collected from *all* records, not only the ones whose year is
//! inside the configured range. Narrowing the range therefore never changes
//! the horizontal axis.

use crate::data::NormalizedRecord;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::ops::RangeInclusive;

/// Ascending distinct years restricted to a fixed inclusive range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearSet {
    years: Vec<i32>,
}

impl YearSet {
    /// Years that actually occur in `records` and fall inside `range`.
    pub fn observed(records: &[NormalizedRecord], range: RangeInclusive<i32>) -> Self {
        let years: BTreeSet<i32> = records
            .iter()
            .map(|r| r.year)
            .filter(|y| range.contains(y))
            .collect();
        Self { years: years.into_iter().collect() }
    }

    /// Every year of `range`, observed or not.
    pub fn span(range: RangeInclusive<i32>) -> Self {
        Self { years: range.collect() }
    }

    pub fn from_years<I: IntoIterator<Item = i32>>(years: I) -> Self {
        let set: BTreeSet<i32> = years.into_iter().collect();
        Self { years: set.into_iter().collect() }
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.binary_search(&year).is_ok()
    }

    /// Position of `year` in the set; also its color index.
    pub fn index_of(&self, year: i32) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.iter().copied()
    }
}

/// Ascending distinct rating buckets observed across the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RatingBucketSet {
    buckets: Vec<i32>,
}

impl RatingBucketSet {
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let set: BTreeSet<i32> = records.iter().map(|r| r.rating_bucket).collect();
        Self { buckets: set.into_iter().collect() }
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn min(&self) -> Option<i32> {
        self.buckets.first().copied()
    }

    pub fn max(&self) -> Option<i32> {
        self.buckets.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.buckets.iter().copied()
    }
}

/// Dense (year, bucket) -> count grid. Read-only after [`CountTable::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    years: YearSet,
    buckets: RatingBucketSet,
    year_index: HashMap<i32, usize>,
    bucket_index: HashMap<i32, usize>,
    /// Row-major: `cells[year_idx * buckets.len() + bucket_idx]`
    cells: Vec<u32>,
}

impl CountTable {
    pub fn build(records: &[NormalizedRecord], years: &YearSet, buckets: &RatingBucketSet) -> Self {
        let year_index: HashMap<i32, usize> =
            years.iter().enumerate().map(|(i, y)| (y, i)).collect();
        let bucket_index: HashMap<i32, usize> =
            buckets.iter().enumerate().map(|(i, b)| (b, i)).collect();
        let width = buckets.len();
        let mut cells = vec![0u32; years.len() * width];

        for r in records {
            let Some(&yi) = year_index.get(&r.year) else {
                continue;
            };
            // Buckets outside the set only happen when the caller passes a
            // narrower set than the records; skip like unknown years.
            let Some(&bi) = bucket_index.get(&r.rating_bucket) else {
                continue;
            };
            cells[yi * width + bi] += 1;
        }

        Self {
            years: years.clone(),
            buckets: buckets.clone(),
            year_index,
            bucket_index,
            cells,
        }
    }

    pub fn years(&self) -> &YearSet {
        &self.years
    }

    pub fn buckets(&self) -> &RatingBucketSet {
        &self.buckets
    }

    /// Count at (year, bucket); `None` only when either key is outside the table.
    pub fn get(&self, year: i32, bucket: i32) -> Option<u32> {
        let yi = *self.year_index.get(&year)?;
        let bi = *self.bucket_index.get(&bucket)?;
        Some(self.cells[yi * self.buckets.len() + bi])
    }

    /// Counts of one year over every bucket, in ascending bucket order.
    pub fn row(&self, year: i32) -> Option<&[u32]> {
        let yi = *self.year_index.get(&year)?;
        let width = self.buckets.len();
        Some(&self.cells[yi * width..(yi + 1) * width])
    }

    /// `(bucket, count)` points of one year's series.
    pub fn series(&self, year: i32) -> Vec<(i32, u32)> {
        match self.row(year) {
            Some(row) => self.buckets.iter().zip(row.iter().copied()).collect(),
            None => Vec::new(),
        }
    }

    pub fn year_total(&self, year: i32) -> u32 {
        self.row(year).map(|r| r.iter().sum()).unwrap_or(0)
    }

    /// Largest per-year total; the upper bound of the count axis before rounding.
    pub fn max_year_total(&self) -> u32 {
        self.years.iter().map(|y| self.year_total(y)).max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&c| c as u64).sum()
    }
}
