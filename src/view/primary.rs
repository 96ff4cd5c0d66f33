//! Primary chart: one count-per-bucket line per year
//!
//! Layout follows the classic margin convention: every region sits inside a
//! `translate(margin.left, margin.top)` frame, the x axis is pushed down by the
//! inner height, and the legend hangs 20px right of the plot area.

use super::{Mailbox, SelectionEvent};
use crate::aggregate::{CountTable, RatingBucketSet, YearSet};
use crate::config::ChartConfig;
use crate::query::BucketKey;
use crate::scene::{Anchor, Axis, Element, LinearScale, Orient, Shape, Surface};
use tracing::debug;

pub const X_AXIS: &str = "x-axis-lines";
pub const Y_AXIS: &str = "y-axis-lines";
pub const SERIES: &str = "series";
pub const MARKERS: &str = "markers";
pub const LEGEND: &str = "legend";
pub const TITLE: &str = "line_chart_title";
pub const CREDIT: &str = "credit";

const X_TICKS: usize = 10;
const Y_TICKS: usize = 10;
const LEGEND_SPACING: f64 = 20.0;
const LEGEND_DOT: f64 = 6.0;

pub fn marker_key(year: i32, bucket: i32) -> String {
    format!("circle-{}-{}", year, bucket)
}

#[derive(Debug)]
pub struct PrimaryView {
    config: ChartConfig,
    x: LinearScale,
    y: LinearScale,
}

impl PrimaryView {
    pub fn new(config: &ChartConfig) -> Self {
        let w = config.primary.inner_width();
        let h = config.primary.inner_height();
        Self {
            config: config.clone(),
            x: LinearScale::new((0.0, 0.0), (0.0, w)),
            y: LinearScale::new((0.0, 0.0), (h, 0.0)),
        }
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn render<S: Surface>(
        &mut self,
        surface: &mut S,
        table: &CountTable,
        years: &YearSet,
        buckets: &RatingBucketSet,
    ) {
        let size = self.config.primary;
        let (ml, mt) = (size.margins.left, size.margins.top);
        let w = size.inner_width();
        let h = size.inner_height();

        for region in [Y_AXIS, SERIES, MARKERS, TITLE, CREDIT] {
            surface.place(region, (ml, mt));
            surface.clear(region);
        }
        surface.place(X_AXIS, (ml, mt + h));
        surface.clear(X_AXIS);
        surface.place(LEGEND, (ml + w + 20.0, mt + 20.0));
        surface.clear(LEGEND);

        let x_domain = match (buckets.min(), buckets.max()) {
            (Some(lo), Some(hi)) => (lo as f64, hi as f64),
            _ => (0.0, 0.0),
        };
        let y_max = years.iter().map(|y| table.year_total(y)).max().unwrap_or(0);
        self.x = LinearScale::new(x_domain, (0.0, w));
        self.y = LinearScale::new((0.0, y_max as f64), (h, 0.0)).nice(Y_TICKS);

        surface.draw_axis(X_AXIS, Axis::linear(Orient::Bottom, &self.x, X_TICKS));
        surface.draw_axis(Y_AXIS, Axis::linear(Orient::Left, &self.y, Y_TICKS));

        if !buckets.is_empty() {
            for (i, year) in years.iter().enumerate() {
                let color = self.config.color(i).to_string();
                let points: Vec<(f64, f64)> = table
                    .series(year)
                    .into_iter()
                    .map(|(b, c)| (self.x.scale(b as f64), self.y.scale(c as f64)))
                    .collect();

                surface.upsert(
                    SERIES,
                    Element::new(
                        format!("line-{}", year),
                        Shape::Polyline { points: points.clone(), stroke: color.clone(), stroke_width: 2.0 },
                    )
                    .attr("class", "series"),
                );

                for (bucket, (cx, cy)) in buckets.iter().zip(points) {
                    surface.upsert(
                        MARKERS,
                        Element::new(
                            marker_key(year, bucket),
                            Shape::Circle { cx, cy, r: self.config.marker_radius, fill: color.clone() },
                        )
                        .attr("class", format!("marker circle-{}", year))
                        .attr("data-year", year)
                        .attr("data-rating", bucket),
                    );
                }
            }
        }

        for (i, year) in years.iter().enumerate() {
            let cy = i as f64 * LEGEND_SPACING;
            surface.upsert(
                LEGEND,
                Element::new(
                    format!("legend-dot-{}", year),
                    Shape::Circle { cx: 0.0, cy, r: LEGEND_DOT, fill: self.config.color(i).to_string() },
                ),
            );
            surface.upsert(
                LEGEND,
                Element::new(
                    format!("legend-label-{}", year),
                    Shape::Text {
                        x: 12.0,
                        y: cy,
                        text: year.to_string(),
                        anchor: Anchor::Start,
                        font_size: 12.0,
                        bold: false,
                    },
                ),
            );
        }

        surface.upsert(
            TITLE,
            Element::new(
                TITLE,
                Shape::Text {
                    x: w / 2.0,
                    y: -mt / 2.0,
                    text: self.config.primary_title(),
                    anchor: Anchor::Middle,
                    font_size: 18.0,
                    bold: true,
                },
            ),
        );
        surface.upsert(
            CREDIT,
            Element::new(
                CREDIT,
                Shape::Text {
                    x: w,
                    y: h + mt + size.margins.bottom - 10.0,
                    text: self.config.credit.clone(),
                    anchor: Anchor::End,
                    font_size: 12.0,
                    bold: false,
                },
            ),
        );

        debug!(years = years.len(), buckets = buckets.len(), y_max, "Primary chart rendered");
    }

    /// Enlarge the hovered marker and post its selection. Returns `false`
    /// (and posts nothing) when no marker exists for the pair.
    pub fn pointer_enter<S: Surface>(
        &self,
        surface: &mut S,
        mailbox: &mut Mailbox,
        year: i32,
        bucket: i32,
    ) -> bool {
        if !self.resize_marker(surface, year, bucket, self.config.marker_radius_active) {
            return false;
        }
        mailbox.post(SelectionEvent::Enter(BucketKey { year, bucket }));
        true
    }

    /// Shrink the marker back and post a clear.
    pub fn pointer_leave<S: Surface>(&self, surface: &mut S, mailbox: &mut Mailbox, year: i32, bucket: i32) {
        self.release_marker(surface, year, bucket);
        mailbox.post(SelectionEvent::Leave);
    }

    /// Shrink the marker back without touching the selection.
    pub fn release_marker<S: Surface>(&self, surface: &mut S, year: i32, bucket: i32) -> bool {
        self.resize_marker(surface, year, bucket, self.config.marker_radius)
    }

    pub fn marker_radius<S: Surface>(&self, surface: &S, year: i32, bucket: i32) -> Option<f64> {
        match &surface.element(MARKERS, &marker_key(year, bucket))?.shape {
            Shape::Circle { r, .. } => Some(*r),
            _ => None,
        }
    }

    fn resize_marker<S: Surface>(&self, surface: &mut S, year: i32, bucket: i32, radius: f64) -> bool {
        let key = marker_key(year, bucket);
        let Some(mut marker) = surface.element(MARKERS, &key).cloned() else {
            return false;
        };
        if let Shape::Circle { r, .. } = &mut marker.shape {
            *r = radius;
        }
        surface.upsert(MARKERS, marker);
        true
    }
}
