//! Detail chart: horizontal bars for the top-N items of one (year, bucket)
//!
//! Bars are keyed by record id, so a redraw is a reconciliation: bars for
//! items that left the result are removed, new items get new bars, and items
//! present in both results are updated in place.

use super::truncate_label;
use crate::config::ChartConfig;
use crate::query::TopNResult;
use crate::scene::{Anchor, Axis, BandScale, Element, Join, LinearScale, Orient, Shape, Surface};
use tracing::debug;

pub const X_AXIS: &str = "x-axis-bars";
pub const Y_AXIS: &str = "y-axis-bars";
pub const BARS: &str = "bars";
pub const TITLE: &str = "bar_chart_title";

const BAND_PADDING: f64 = 0.1;
const X_TICKS: usize = 10;
const BAR_FILL: &str = "steelblue";

pub fn bar_key(record_id: usize) -> String {
    format!("bar-{}", record_id)
}

#[derive(Debug)]
pub struct DetailView {
    config: ChartConfig,
}

impl DetailView {
    pub fn new(config: &ChartConfig) -> Self {
        Self { config: config.clone() }
    }

    /// Lay out the sub-regions and an empty title. Called once per surface.
    pub fn mount<S: Surface>(&self, surface: &mut S) {
        let size = self.config.detail;
        let (ml, mt) = (size.margins.left, size.margins.top);
        let h = size.inner_height();

        surface.place(X_AXIS, (ml, mt + h));
        surface.place(Y_AXIS, (ml, mt));
        surface.place(BARS, (ml, mt));
        surface.place(TITLE, (0.0, 0.0));
        surface.upsert(
            TITLE,
            Element::new(
                TITLE,
                Shape::Text {
                    x: size.width / 2.0,
                    y: mt / 2.0,
                    text: String::new(),
                    anchor: Anchor::Middle,
                    font_size: 14.0,
                    bold: true,
                },
            ),
        );
    }

    pub fn title(&self, year: i32, bucket: i32) -> String {
        format!("Top {} Most Rated Games of {} with Rating {}", self.config.top_n, year, bucket)
    }

    /// Redraw for a new result. Items are drawn in the order given; they are
    /// never re-sorted here.
    pub fn show<S: Surface>(&self, surface: &mut S, result: &TopNResult, year: i32, bucket: i32) -> Join {
        let size = self.config.detail;
        let w = size.inner_width();
        let h = size.inner_height();

        let max = result.max_popularity();
        let x = LinearScale::new((0.0, max), (0.0, w));
        let y = BandScale::new(result.len(), (0.0, h), BAND_PADDING);

        let labels: Vec<String> = result
            .iter()
            .map(|r| truncate_label(&r.name, self.config.label_chars))
            .collect();
        // An all-zero domain has no meaningful ticks.
        let x_axis = if max > 0.0 {
            Axis::linear(Orient::Bottom, &x, X_TICKS)
        } else {
            Axis { orient: Orient::Bottom, extent: x.range(), ticks: Vec::new() }
        };
        surface.draw_axis(X_AXIS, x_axis);
        surface.draw_axis(Y_AXIS, Axis::band(Orient::Left, &y, labels.as_slice(), (0.0, h)));

        let keys: Vec<String> = result.iter().map(|r| bar_key(r.id)).collect();
        let join = surface.bind_data(BARS, &keys);
        for key in &join.exit {
            surface.remove(BARS, key);
        }
        for (i, (record, key)) in result.iter().zip(keys).enumerate() {
            let width = if max > 0.0 { x.scale(record.popularity).max(0.0) } else { 0.0 };
            let top = y.position(i).unwrap_or(0.0);
            surface.upsert(
                BARS,
                Element::new(
                    key,
                    Shape::Rect { x: 0.0, y: top, width, height: y.bandwidth(), fill: BAR_FILL.to_string() },
                )
                .attr("data-name", &record.name)
                .attr("data-popularity", record.popularity),
            );
        }

        surface.set_text(TITLE, &self.title(year, bucket));
        debug!(
            year,
            bucket,
            items = result.len(),
            entered = join.enter.len(),
            updated = join.update.len(),
            exited = join.exit.len(),
            "Detail chart redrawn"
        );
        join
    }

    /// Remove bars and axes and blank the title. Safe to repeat.
    pub fn hide<S: Surface>(&self, surface: &mut S) {
        surface.clear(BARS);
        surface.clear(X_AXIS);
        surface.clear(Y_AXIS);
        surface.set_text(TITLE, "");
    }
}
