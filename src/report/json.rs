//! JSON report and the count payload served at `/api/counts`

use super::Summary;
use crate::dashboard::Dashboard;
use crate::data::RowDiagnostic;
use crate::error::ScopeResult;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct CountReport<'a> {
    pub generated: String,
    pub title: String,
    pub summary: Summary,
    pub years: &'a [i32],
    pub buckets: &'a [i32],
    /// `counts[i][j]` is the count for `years[i]`, `buckets[j]`
    pub counts: Vec<&'a [u32]>,
    pub year_totals: Vec<u32>,
    pub rejected: &'a [RowDiagnostic],
}

impl<'a> CountReport<'a> {
    pub fn new(dashboard: &'a Dashboard) -> Self {
        let table = dashboard.table();
        let years = table.years();
        Self {
            generated: chrono::Local::now().to_rfc3339(),
            title: dashboard.config().primary_title(),
            summary: Summary::from_dashboard(dashboard),
            years: years.as_slice(),
            buckets: table.buckets().as_slice(),
            counts: years.iter().filter_map(|y| table.row(y)).collect(),
            year_totals: years.iter().map(|y| table.year_total(y)).collect(),
            rejected: &dashboard.dataset().rejected,
        }
    }
}

pub fn write<W: Write>(writer: &mut W, dashboard: &Dashboard) -> ScopeResult<()> {
    serde_json::to_writer_pretty(&mut *writer, &CountReport::new(dashboard))?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::{Dataset, RawRecord};
    use serde_json::Value;

    #[test]
    fn test_json_shape() {
        let d = Dashboard::new(
            Dataset::from_raw(vec![
                RawRecord::new("2016", "7.2", "5", "A"),
                RawRecord::new("2017", "8.4", "5", "B"),
                RawRecord::new("2017", "8.0", "5", "C"),
                RawRecord::new("", "8.0", "5", "D"),
            ]),
            ChartConfig::default(),
        )
        .unwrap();

        let mut out = Vec::new();
        write(&mut out, &d).unwrap();
        let v: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(v["title"], "Board games by Rating 2015-2019");
        assert_eq!(v["years"], serde_json::json!([2016, 2017]));
        assert_eq!(v["buckets"], serde_json::json!([7, 8]));
        assert_eq!(v["counts"], serde_json::json!([[1, 0], [0, 2]]));
        assert_eq!(v["year_totals"], serde_json::json!([1, 2]));
        assert_eq!(v["summary"]["dropped"], 1);
        assert_eq!(v["rejected"][0]["row"], 4);
        assert!(v["generated"].is_string());
    }
}
