//! Report generation for a loaded dashboard
//!
//! - **HTML**: standalone page with both charts; hovering a marker swaps in
//!   the precomputed detail chart for that cell
//! - **SVG**: the primary chart alone
//! - **JSON**: count table, totals and load summary
//! - **CSV**: `year,bucket,count` rows
//!
//! # Usage
//!
//! ```ignore
//! use ratingscope::report;
//!
//! // Picks the format from the extension
//! report::generate("report.html", &dashboard)?;
//! report::generate("counts.csv", &dashboard)?;
//! ```

pub mod csv;
pub mod html;
pub mod json;

use crate::dashboard::Dashboard;
use crate::error::ScopeResult;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Generate a report in the format implied by the file extension
pub fn generate<P: AsRef<Path>>(path: P, dashboard: &Dashboard) -> ScopeResult<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "html" | "htm" => html::write(&mut file, dashboard)?,
        "svg" => file.write_all(dashboard.primary_svg().as_bytes())?,
        "json" => json::write(&mut file, dashboard)?,
        _ => csv::write(&mut file, dashboard)?,
    }
    Ok(())
}

/// Headline numbers shown at the top of every report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub rows_read: usize,
    pub kept: usize,
    pub dropped: usize,
    /// Records that landed in a displayed year
    pub counted: u64,
    pub years: usize,
    pub buckets: usize,
}

impl Summary {
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        let load = dashboard.summary();
        Self {
            rows_read: load.rows_read,
            kept: load.kept,
            dropped: load.dropped,
            counted: dashboard.table().total(),
            years: dashboard.years().len(),
            buckets: dashboard.buckets().len(),
        }
    }
}
