//! Wires the pipeline together
//!
//! A [`Dashboard`] is built once per load: it normalizes nothing itself (the
//! [`Dataset`] already did), aggregates, renders the primary chart and mounts
//! an empty detail chart. After that it only reacts to [`PointerEvent`]s.
//!
//! Each event is handled to completion before the next one: the primary
//! view's hook posts into the mailbox, then the mailbox is drained and the
//! detail view redrawn (or hidden) synchronously.

use crate::aggregate::{CountTable, RatingBucketSet, YearSet};
use crate::config::ChartConfig;
use crate::data::{Dataset, LoadSummary, NormalizedRecord};
use crate::error::ScopeResult;
use crate::query::{self, BucketKey, TopNResult};
use crate::scene::SvgScene;
use crate::view::{DetailView, Mailbox, PrimaryView, SelectionEvent};
use std::path::Path;
use tracing::{debug, info};

pub const PRIMARY_CANVAS: &str = "line_chart";
pub const DETAIL_CANVAS: &str = "bar_chart";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter { year: i32, bucket: i32 },
    Leave { year: i32, bucket: i32 },
}

#[derive(Debug)]
pub struct Dashboard {
    config: ChartConfig,
    dataset: Dataset,
    years: YearSet,
    buckets: RatingBucketSet,
    table: CountTable,
    primary: PrimaryView,
    primary_scene: SvgScene,
    detail: DetailView,
    detail_scene: SvgScene,
    mailbox: Mailbox,
    selection: Option<BucketKey>,
}

impl Dashboard {
    pub fn load<P: AsRef<Path>>(path: P, config: ChartConfig) -> ScopeResult<Self> {
        let dataset = Dataset::load(path)?;
        Self::new(dataset, config)
    }

    pub fn new(dataset: Dataset, config: ChartConfig) -> ScopeResult<Self> {
        config.validate()?;

        let years = if config.include_empty_years {
            YearSet::span(config.years())
        } else {
            YearSet::observed(&dataset.records, config.years())
        };
        let buckets = RatingBucketSet::from_records(&dataset.records);
        let table = CountTable::build(&dataset.records, &years, &buckets);
        info!(
            years = years.len(),
            buckets = buckets.len(),
            counted = table.total(),
            "Aggregated counts"
        );

        let mut primary = PrimaryView::new(&config);
        let mut primary_scene = SvgScene::new(PRIMARY_CANVAS, config.primary.width, config.primary.height);
        primary.render(&mut primary_scene, &table, &years, &buckets);

        let detail = DetailView::new(&config);
        let mut detail_scene = SvgScene::new(DETAIL_CANVAS, config.detail.width, config.detail.height);
        detail.mount(&mut detail_scene);

        Ok(Self {
            config,
            dataset,
            years,
            buckets,
            table,
            primary,
            primary_scene,
            detail,
            detail_scene,
            mailbox: Mailbox::new(),
            selection: None,
        })
    }

    /// Apply one pointer event and return the selection that results.
    pub fn handle(&mut self, event: PointerEvent) -> Option<BucketKey> {
        match event {
            PointerEvent::Enter { year, bucket } => {
                let target = BucketKey { year, bucket };
                let exists = self.primary.marker_radius(&self.primary_scene, year, bucket).is_some();
                if exists {
                    // A missed leave must not leave the old marker enlarged.
                    if let Some(prev) = self.selection.filter(|prev| *prev != target) {
                        self.primary.pointer_leave(&mut self.primary_scene, &mut self.mailbox, prev.year, prev.bucket);
                    }
                    self.primary.pointer_enter(&mut self.primary_scene, &mut self.mailbox, year, bucket);
                } else {
                    debug!(year, bucket, "Pointer entered unknown marker");
                }
            }
            PointerEvent::Leave { year, bucket } => {
                let left = BucketKey { year, bucket };
                match self.selection {
                    // A late leave for a marker that lost the selection must
                    // not clear the one that holds it.
                    Some(current) if current != left => {
                        self.primary.release_marker(&mut self.primary_scene, year, bucket);
                        debug!(year, bucket, "Stale pointer leave");
                    }
                    _ => self.primary.pointer_leave(&mut self.primary_scene, &mut self.mailbox, year, bucket),
                }
            }
        }
        self.pump();
        self.selection
    }

    fn pump(&mut self) {
        while let Some(event) = self.mailbox.take() {
            match event {
                SelectionEvent::Enter(key) => {
                    let result = self.top(key.year, key.bucket);
                    self.detail.show(&mut self.detail_scene, &result, key.year, key.bucket);
                    self.selection = Some(key);
                    debug!(year = key.year, bucket = key.bucket, items = result.len(), "Selection set");
                }
                SelectionEvent::Leave => {
                    self.detail.hide(&mut self.detail_scene);
                    if self.selection.take().is_some() {
                        debug!("Selection cleared");
                    }
                }
            }
        }
    }

    /// Pure detail query against the loaded records.
    pub fn top(&self, year: i32, bucket: i32) -> TopNResult {
        query::top_n(&self.dataset.records, year, bucket, self.config.top_n)
    }

    /// Detail chart for one cell drawn on a scratch canvas. Session state is
    /// left alone.
    pub fn detail_preview(&self, year: i32, bucket: i32) -> String {
        let mut scene = SvgScene::new(DETAIL_CANVAS, self.config.detail.width, self.config.detail.height);
        self.detail.mount(&mut scene);
        self.detail.show(&mut scene, &self.top(year, bucket), year, bucket);
        scene.to_svg()
    }

    pub fn selection(&self) -> Option<BucketKey> {
        self.selection
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.dataset.records
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn summary(&self) -> LoadSummary {
        self.dataset.summary()
    }

    pub fn years(&self) -> &YearSet {
        &self.years
    }

    pub fn buckets(&self) -> &RatingBucketSet {
        &self.buckets
    }

    pub fn table(&self) -> &CountTable {
        &self.table
    }

    pub fn primary_scene(&self) -> &SvgScene {
        &self.primary_scene
    }

    pub fn detail_scene(&self) -> &SvgScene {
        &self.detail_scene
    }

    pub fn primary_svg(&self) -> String {
        self.primary_scene.to_svg()
    }

    pub fn detail_svg(&self) -> String {
        self.detail_scene.to_svg()
    }

    pub fn marker_radius(&self, year: i32, bucket: i32) -> Option<f64> {
        self.primary.marker_radius(&self.primary_scene, year, bucket)
    }
}
