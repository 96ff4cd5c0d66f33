//! HTML page with the line chart and the hover-driven bar chart
//!
//! The same page backs the static report and `ratingscope serve`. In static
//! mode every cell's detail chart is embedded up front; in live
//! mode the page asks the server for it on hover.

use super::Summary;
use crate::dashboard::Dashboard;
use crate::error::ScopeResult;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Self-contained file, details precomputed
    Static,
    /// Served page, details fetched from `/api/enter` and `/api/leave`
    Live,
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>
    <style>
        :root {
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --accent: #58a6ff;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }
        .container { max-width: 1400px; margin: 0 auto; padding: 2rem; }
        .header {
            display: flex;
            align-items: baseline;
            gap: 1rem;
            margin-bottom: 1.5rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }
        .logo { font-size: 2rem; font-weight: 800; color: var(--accent); }
        .subtitle { color: var(--dim); }
        .stats { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
        .stat {
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1rem 1.5rem;
        }
        .stat-value { font-size: 1.75rem; font-weight: 700; }
        .stat-label { color: var(--dim); font-size: 0.75rem; text-transform: uppercase; letter-spacing: 0.05em; }
        .charts { display: flex; flex-wrap: wrap; gap: 1.5rem; }
        .chart-card {
            background: #fff;
            color: #000;
            border-radius: 12px;
            padding: 1rem;
        }
        svg { overflow: visible; }
        circle.marker { cursor: pointer; }
    </style>
</head>
<body>
<div class="container">
    <div class="header">
        <div class="logo">ratingscope</div>
        <div class="subtitle">{{SOURCE}}</div>
    </div>
    <div class="stats">
        <div class="stat"><div class="stat-value">{{ROWS}}</div><div class="stat-label">Rows read</div></div>
        <div class="stat"><div class="stat-value">{{KEPT}}</div><div class="stat-label">Kept</div></div>
        <div class="stat"><div class="stat-value">{{DROPPED}}</div><div class="stat-label">Dropped</div></div>
        <div class="stat"><div class="stat-value">{{COUNTED}}</div><div class="stat-label">In range</div></div>
    </div>
    <div class="charts">
        <div class="chart-card" id="line_chart_card">
{{PRIMARY}}
        </div>
        <div class="chart-card" id="bar_chart_card">
{{DETAIL}}
        </div>
    </div>
</div>
<script>
const MODE = "{{MODE}}";
const DETAILS = {{DETAILS}};
const RADIUS = {{RADIUS}};
const RADIUS_ACTIVE = {{RADIUS_ACTIVE}};

const card = document.getElementById('bar_chart_card');
const blank = card.innerHTML;
let seq = 0;

// Only the newest hover may paint the detail card.
function paint(url, fallback) {
    const id = ++seq;
    if (MODE === 'static') {
        card.innerHTML = fallback;
        return;
    }
    fetch(url)
        .then(r => r.json())
        .then(res => { if (id === seq && res.ok) card.innerHTML = res.data.svg; })
        .catch(err => console.error(err));
}

document.querySelectorAll('#line_chart_card circle.marker').forEach(c => {
    const year = c.dataset.year;
    const rating = c.dataset.rating;
    c.addEventListener('mouseenter', () => {
        c.setAttribute('r', RADIUS_ACTIVE);
        paint(`/api/enter?year=${year}&rating=${rating}`, DETAILS[`${year}-${rating}`] || blank);
    });
    c.addEventListener('mouseleave', () => {
        c.setAttribute('r', RADIUS);
        paint(`/api/leave?year=${year}&rating=${rating}`, blank);
    });
});
</script>
</body>
</html>
"#;

pub fn write<W: Write>(writer: &mut W, dashboard: &Dashboard) -> ScopeResult<()> {
    writer.write_all(page(dashboard, Mode::Static, "report")?.as_bytes())?;
    Ok(())
}

/// Render the full page. `source` is shown under the logo.
pub fn page(dashboard: &Dashboard, mode: Mode, source: &str) -> ScopeResult<String> {
    let summary = Summary::from_dashboard(dashboard);
    let config = dashboard.config();

    let (mode_name, details) = match mode {
        Mode::Static => ("static", precomputed_details(dashboard)),
        Mode::Live => ("live", BTreeMap::new()),
    };
    let details = script_safe(&serde_json::to_string(&details)?);

    Ok(TEMPLATE
        .replace("{{TITLE}}", &html_escape(&config.primary_title()))
        .replace("{{SOURCE}}", &html_escape(source))
        .replace("{{ROWS}}", &summary.rows_read.to_string())
        .replace("{{KEPT}}", &summary.kept.to_string())
        .replace("{{DROPPED}}", &summary.dropped.to_string())
        .replace("{{COUNTED}}", &summary.counted.to_string())
        .replace("{{MODE}}", mode_name)
        .replace("{{RADIUS}}", &config.marker_radius.to_string())
        .replace("{{RADIUS_ACTIVE}}", &config.marker_radius_active.to_string())
        .replace("{{PRIMARY}}", &dashboard.primary_svg())
        .replace("{{DETAIL}}", &dashboard.detail_svg())
        // last: embedded markup may itself contain braces
        .replace("{{DETAILS}}", &details))
}

/// Detail chart per cell, keyed `"{year}-{bucket}"`. Zero-count cells get
/// an empty chart that still carries their title.
fn precomputed_details(dashboard: &Dashboard) -> BTreeMap<String, String> {
    let table = dashboard.table();
    let mut details = BTreeMap::new();
    for year in table.years().iter() {
        for bucket in table.buckets().iter() {
            details.insert(format!("{}-{}", year, bucket), dashboard.detail_preview(year, bucket));
        }
    }
    details
}

/// Keep embedded JSON from closing the surrounding `<script>`.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn html_escape(s: &str) -> String {
    crate::scene::svg::escape(s)
}
