//! Chart configuration
//!
//! Every knob has a default matching the reference deployment (years 2015-2019,
//! top 5, 10-character labels, 800x400 primary chart, 400x200 detail chart).
//! A JSON file can override any subset of fields; CLI flags are applied last.

use crate::error::{ScopeError, ScopeResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// d3's `schemeCategory10`
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self { top: 20.0, right: 30.0, bottom: 50.0, left: 60.0 }
    }
}

/// Outer size of a chart plus the margins reserved for axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margins: Margins,
}

impl ChartSize {
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub from_year: i32,
    pub to_year: i32,
    /// Keep every year of the range in the legend even when no record has it.
    pub include_empty_years: bool,
    pub top_n: usize,
    pub label_chars: usize,
    pub primary: ChartSize,
    pub detail: ChartSize,
    pub marker_radius: f64,
    pub marker_radius_active: f64,
    pub palette: Vec<String>,
    pub credit: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            from_year: 2015,
            to_year: 2019,
            include_empty_years: false,
            top_n: 5,
            label_chars: 10,
            primary: ChartSize { width: 800.0, height: 400.0, margins: Margins::default() },
            detail: ChartSize { width: 400.0, height: 200.0, margins: Margins::default() },
            marker_radius: 4.0,
            marker_radius_active: 6.0,
            palette: CATEGORY10.iter().map(|c| c.to_string()).collect(),
            credit: "ratingscope".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ScopeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScopeError::Config(format!("could not read '{}': {}", path.display(), e))
        })?;
        let config: ChartConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScopeResult<()> {
        if self.from_year > self.to_year {
            return Err(ScopeError::Config(format!(
                "year range is empty: {} > {}",
                self.from_year, self.to_year
            )));
        }
        if self.top_n == 0 {
            return Err(ScopeError::Config("top_n must be at least 1".to_string()));
        }
        if self.label_chars == 0 {
            return Err(ScopeError::Config("label_chars must be at least 1".to_string()));
        }
        if self.palette.is_empty() {
            return Err(ScopeError::Config("palette must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.from_year..=self.to_year
    }

    /// Deterministic series color for the `index`-th year of the year set.
    pub fn color(&self, index: usize) -> &str {
        &self.palette[index % self.palette.len()]
    }

    pub fn primary_title(&self) -> String {
        format!("Board games by Rating {}-{}", self.from_year, self.to_year)
    }
}
