//! Retained SVG scene
//!
//! Holds one drawing canvas as an ordered list of regions (`<g>` groups).
//! Each region keeps its keyed elements in insertion order, an optional
//! axis, and a translate offset. [`SvgScene::to_svg`] serializes the whole
//! canvas; [`SvgScene::region_svg`] serializes a single region's contents.

use super::{Anchor, Axis, Element, Join, Orient, Shape, Surface};
use std::fmt::Write;

const TICK_SIZE: f64 = 6.0;
const AXIS_COLOR: &str = "currentColor";

#[derive(Debug, Clone, Default, PartialEq)]
struct Region {
    id: String,
    translate: (f64, f64),
    axis: Option<Axis>,
    elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvgScene {
    id: String,
    width: f64,
    height: f64,
    regions: Vec<Region>,
}

impl SvgScene {
    pub fn new(id: &str, width: f64, height: f64) -> Self {
        Self { id: id.to_string(), width, height, regions: Vec::new() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r.id == region)
    }

    /// Keys of a region's elements in render order.
    pub fn keys(&self, region: &str) -> Vec<String> {
        self.region(region)
            .map(|r| r.elements.iter().map(|e| e.key.clone()).collect())
            .unwrap_or_default()
    }

    pub fn elements(&self, region: &str) -> &[Element] {
        self.region(region).map(|r| r.elements.as_slice()).unwrap_or(&[])
    }

    pub fn axis(&self, region: &str) -> Option<&Axis> {
        self.region(region).and_then(|r| r.axis.as_ref())
    }

    /// Text content of the first text element in a region.
    pub fn text(&self, region: &str) -> Option<&str> {
        self.elements(region).iter().find_map(|e| match &e.shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" width="{}" height="{}" font-family="sans-serif" font-size="10">"#,
            escape(&self.id),
            num(self.width),
            num(self.height)
        );
        out.push('\n');
        for region in &self.regions {
            write_region(&mut out, region);
        }
        out.push_str("</svg>\n");
        out
    }

    /// Inner markup of one region, without its `<g>` wrapper.
    pub fn region_svg(&self, region: &str) -> String {
        let mut out = String::new();
        if let Some(r) = self.region(region) {
            write_region_body(&mut out, r);
        }
        out
    }

    fn region(&self, region: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == region)
    }

    fn region_mut(&mut self, region: &str) -> &mut Region {
        let idx = match self.regions.iter().position(|r| r.id == region) {
            Some(idx) => idx,
            None => {
                self.regions.push(Region { id: region.to_string(), ..Default::default() });
                self.regions.len() - 1
            }
        };
        &mut self.regions[idx]
    }
}

impl Surface for SvgScene {
    /// Regions render in the order they were first placed or written to.
    fn place(&mut self, region: &str, translate: (f64, f64)) {
        self.region_mut(region).translate = translate;
    }

    fn clear(&mut self, region: &str) {
        if let Some(idx) = self.regions.iter().position(|r| r.id == region) {
            let r = &mut self.regions[idx];
            r.axis = None;
            r.elements.clear();
        }
    }

    fn draw_axis(&mut self, region: &str, axis: Axis) {
        self.region_mut(region).axis = Some(axis);
    }

    fn bind_data(&mut self, region: &str, keys: &[String]) -> Join {
        let existing = self.keys(region);
        Join::compute(existing.as_slice(), keys)
    }

    fn upsert(&mut self, region: &str, element: Element) {
        let r = self.region_mut(region);
        match r.elements.iter_mut().find(|e| e.key == element.key) {
            Some(slot) => *slot = element,
            None => r.elements.push(element),
        }
    }

    fn remove(&mut self, region: &str, key: &str) {
        if let Some(idx) = self.regions.iter().position(|r| r.id == region) {
            self.regions[idx].elements.retain(|e| e.key != key);
        }
    }

    fn element(&self, region: &str, key: &str) -> Option<&Element> {
        self.region(region)?.elements.iter().find(|e| e.key == key)
    }

    fn set_text(&mut self, region: &str, text: &str) {
        let r = self.region_mut(region);
        let existing = r.elements.iter().position(|e| matches!(e.shape, Shape::Text { .. }));
        match existing {
            Some(idx) => {
                if let Shape::Text { text: t, .. } = &mut r.elements[idx].shape {
                    *t = text.to_string();
                }
            }
            None => r.elements.push(Element::new(
                region,
                Shape::Text {
                    x: 0.0,
                    y: 0.0,
                    text: text.to_string(),
                    anchor: Anchor::Start,
                    font_size: 12.0,
                    bold: false,
                },
            )),
        }
    }
}

fn write_region(out: &mut String, region: &Region) {
    let (dx, dy) = region.translate;
    if dx == 0.0 && dy == 0.0 {
        let _ = writeln!(out, r#"<g id="{}">"#, escape(&region.id));
    } else {
        let _ = writeln!(
            out,
            r#"<g id="{}" transform="translate({},{})">"#,
            escape(&region.id),
            num(dx),
            num(dy)
        );
    }
    write_region_body(out, region);
    out.push_str("</g>\n");
}

fn write_region_body(out: &mut String, region: &Region) {
    if let Some(axis) = &region.axis {
        write_axis(out, axis);
    }
    for e in &region.elements {
        write_element(out, e);
    }
}

fn write_axis(out: &mut String, axis: &Axis) {
    let (a, b) = axis.extent;
    let domain_path = match axis.orient {
        Orient::Bottom => format!("M{},{}V0H{}V{}", num(a), num(TICK_SIZE), num(b), num(TICK_SIZE)),
        Orient::Left => format!("M{},{}H0V{}H{}", num(-TICK_SIZE), num(a), num(b), num(-TICK_SIZE)),
    };
    let _ = writeln!(
        out,
        r#"<path class="domain" stroke="{}" fill="none" d="{}"/>"#,
        AXIS_COLOR, domain_path
    );
    for tick in &axis.ticks {
        match axis.orient {
            Orient::Bottom => {
                let _ = writeln!(
                    out,
                    r#"<g class="tick" transform="translate({},0)"><line stroke="{}" y2="{}"/><text fill="{}" y="{}" dy="0.71em" text-anchor="middle">{}</text></g>"#,
                    num(tick.offset),
                    AXIS_COLOR,
                    num(TICK_SIZE),
                    AXIS_COLOR,
                    num(TICK_SIZE + 3.0),
                    escape(&tick.label)
                );
            }
            Orient::Left => {
                let _ = writeln!(
                    out,
                    r#"<g class="tick" transform="translate(0,{})"><line stroke="{}" x2="{}"/><text fill="{}" x="{}" dy="0.32em" text-anchor="end">{}</text></g>"#,
                    num(tick.offset),
                    AXIS_COLOR,
                    num(-TICK_SIZE),
                    AXIS_COLOR,
                    num(-(TICK_SIZE + 3.0)),
                    escape(&tick.label)
                );
            }
        }
    }
}

fn write_element(out: &mut String, e: &Element) {
    let mut attrs = String::new();
    let _ = write!(attrs, r#" data-key="{}""#, escape(&e.key));
    for (name, value) in &e.attrs {
        let _ = write!(attrs, r#" {}="{}""#, escape(name), escape(value));
    }

    match &e.shape {
        Shape::Circle { cx, cy, r, fill } => {
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"{}/>"#,
                num(*cx),
                num(*cy),
                num(*r),
                escape(fill),
                attrs
            );
        }
        Shape::Rect { x, y, width, height, fill } => {
            let _ = writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{}/>"#,
                num(*x),
                num(*y),
                num(*width),
                num(*height),
                escape(fill),
                attrs
            );
        }
        Shape::Polyline { points, stroke, stroke_width } => {
            let mut d = String::new();
            for (i, (x, y)) in points.iter().enumerate() {
                let _ = write!(d, "{}{},{}", if i == 0 { "M" } else { "L" }, num(*x), num(*y));
            }
            let _ = writeln!(
                out,
                r#"<path fill="none" stroke="{}" stroke-width="{}" d="{}"{}/>"#,
                escape(stroke),
                num(*stroke_width),
                d,
                attrs
            );
        }
        Shape::Text { x, y, text, anchor, font_size, bold } => {
            let anchor = match anchor {
                Anchor::Start => "start",
                Anchor::Middle => "middle",
                Anchor::End => "end",
            };
            let weight = if *bold { r#" font-weight="bold""# } else { "" };
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" text-anchor="{}" font-size="{}" dominant-baseline="middle"{}{}>{}</text>"#,
                num(*x),
                num(*y),
                anchor,
                num(*font_size),
                weight,
                attrs,
                escape(text)
            );
        }
    }
}

/// Compact number formatting: integers without a fraction, others at 2 decimals.
fn num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
