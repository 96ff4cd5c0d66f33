//! Drawing collaborator interface
//!
//! Views never emit markup themselves. They compute scales and element
//! geometry, then talk to a [`Surface`] through a handful of operations:
//!
//! - [`Surface::place`]: position a region
//! - [`Surface::draw_axis`]: render (or replace) an axis in a region
//! - [`Surface::bind_data`]: diff a region's keyed elements against new keys,
//!   returning the enter / update / exit sets
//! - [`Surface::upsert`] / [`Surface::remove`]: apply that diff
//! - [`Surface::set_text`]: retitle a text region
//!
//! Regions are addressed by stable string ids (`"bars"`, `"bar_chart_title"`,
//! ...). Anything offering equivalent primitives can implement the trait;
//! [`svg::SvgScene`] is the in-process implementation that serializes to SVG.

pub mod scale;
pub mod svg;

pub use scale::{BandScale, LinearScale};
pub use svg::SvgScene;

use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orient {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    /// Pixel offset along the axis
    pub offset: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub orient: Orient,
    /// Pixel extent of the axis line
    pub extent: (f64, f64),
    pub ticks: Vec<Tick>,
}

impl Axis {
    pub fn linear(orient: Orient, scale: &LinearScale, count: usize) -> Self {
        let step = scale.tick_step(count);
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|v| Tick { offset: scale.scale(v), label: scale::format_tick(v, step) })
            .collect();
        Self { orient, extent: scale.range(), ticks }
    }

    /// Ticks at band centers, labeled in band order.
    pub fn band<S: AsRef<str>>(orient: Orient, scale: &BandScale, labels: &[S], extent: (f64, f64)) -> Self {
        let half = scale.bandwidth() / 2.0;
        let ticks = labels
            .iter()
            .enumerate()
            .filter_map(|(i, label)| {
                scale.position(i).map(|p| Tick { offset: p + half, label: label.as_ref().to_string() })
            })
            .collect();
        Self { orient, extent, ticks }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Circle { cx: f64, cy: f64, r: f64, fill: String },
    Rect { x: f64, y: f64, width: f64, height: f64, fill: String },
    Polyline { points: Vec<(f64, f64)>, stroke: String, stroke_width: f64 },
    Text { x: f64, y: f64, text: String, anchor: Anchor, font_size: f64, bold: bool },
}

/// A keyed drawable. `attrs` carries host metadata (css class, `data-*`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub key: String,
    pub shape: Shape,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(key: impl Into<String>, shape: Shape) -> Self {
        Self { key: key.into(), shape, attrs: Vec::new() }
    }

    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }
}

/// Result of binding a key list against a region's current elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Join {
    /// New keys, in data order
    pub enter: Vec<String>,
    /// Keys already rendered, in data order
    pub update: Vec<String>,
    /// Rendered keys absent from the data, in render order
    pub exit: Vec<String>,
}

impl Join {
    pub fn compute<S: AsRef<str>>(existing: &[S], keys: &[String]) -> Self {
        let current: HashSet<&str> = existing.iter().map(|k| k.as_ref()).collect();
        let wanted: HashSet<&str> = keys.iter().map(|k| k.as_str()).collect();

        let mut join = Join::default();
        for key in keys {
            if current.contains(key.as_str()) {
                join.update.push(key.clone());
            } else {
                join.enter.push(key.clone());
            }
        }
        for key in existing {
            if !wanted.contains(key.as_ref()) {
                join.exit.push(key.as_ref().to_string());
            }
        }
        join
    }
}

pub trait Surface {
    /// Declare a region at a pixel offset, or move an existing one.
    fn place(&mut self, region: &str, translate: (f64, f64));

    /// Remove every element, axis and text from a region.
    fn clear(&mut self, region: &str);

    fn draw_axis(&mut self, region: &str, axis: Axis);

    fn bind_data(&mut self, region: &str, keys: &[String]) -> Join;

    /// Insert an element, or replace the one with the same key in place.
    fn upsert(&mut self, region: &str, element: Element);

    fn remove(&mut self, region: &str, key: &str);

    fn element(&self, region: &str, key: &str) -> Option<&Element>;

    fn set_text(&mut self, region: &str, text: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ks: &[&str]) -> Vec<String> {
        ks.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_join_splits_enter_update_exit() {
        let join = Join::compute(&["a", "b", "c"], &keys(&["c", "d", "a"]));
        assert_eq!(join.enter, keys(&["d"]));
        assert_eq!(join.update, keys(&["c", "a"]));
        assert_eq!(join.exit, keys(&["b"]));
    }

    #[test]
    fn test_join_from_empty() {
        let existing: [&str; 0] = [];
        let join = Join::compute(&existing, &keys(&["x", "y"]));
        assert_eq!(join.enter, keys(&["x", "y"]));
        assert!(join.update.is_empty());
        assert!(join.exit.is_empty());
    }

    #[test]
    fn test_join_to_empty() {
        let join = Join::compute(&["x", "y"], &[]);
        assert!(join.enter.is_empty());
        assert_eq!(join.exit, keys(&["x", "y"]));
    }

    #[test]
    fn test_linear_axis_ticks() {
        let s = LinearScale::new((0.0, 100.0), (330.0, 0.0));
        let axis = Axis::linear(Orient::Left, &s, 5);
        let labels: Vec<_> = axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "20", "40", "60", "80", "100"]);
        assert_eq!(axis.ticks[0].offset, 330.0);
        assert_eq!(axis.ticks[5].offset, 0.0);
    }

    #[test]
    fn test_band_axis_centers() {
        let s = BandScale::new(2, (0.0, 100.0), 0.0);
        let axis = Axis::band(Orient::Left, &s, &["A", "B"], (0.0, 100.0));
        assert_eq!(axis.ticks.len(), 2);
        assert_eq!(axis.ticks[0].offset, 25.0);
        assert_eq!(axis.ticks[1].offset, 75.0);
        assert_eq!(axis.ticks[1].label, "B");
    }
}
