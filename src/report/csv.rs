//! CSV report: one row per (year, bucket) cell, zeros included

use crate::dashboard::Dashboard;
use crate::error::ScopeResult;
use std::io::Write;

pub fn write<W: Write>(writer: &mut W, dashboard: &Dashboard) -> ScopeResult<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(["year", "bucket", "count"])?;

    let table = dashboard.table();
    for year in table.years().iter() {
        for (bucket, count) in table.series(year) {
            wtr.write_record(&[year.to_string(), bucket.to_string(), count.to_string()])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::{Dataset, RawRecord};

    #[test]
    fn test_rows_cover_every_cell() {
        let d = Dashboard::new(
            Dataset::from_raw(vec![
                RawRecord::new("2016", "7.2", "5", "A"),
                RawRecord::new("2016", "7.9", "5", "B"),
                RawRecord::new("2017", "5.5", "5", "C"),
            ]),
            ChartConfig::default(),
        )
        .unwrap();

        let mut out = Vec::new();
        write(&mut out, &d).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "year,bucket,count\n2016,5,0\n2016,7,2\n2017,5,1\n2017,7,0\n"
        );
    }

    #[test]
    fn test_empty_table_is_header_only() {
        let d = Dashboard::new(Dataset::default(), ChartConfig::default()).unwrap();
        let mut out = Vec::new();
        write(&mut out, &d).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "year,bucket,count\n");
    }
}
