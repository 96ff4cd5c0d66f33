//! ratingscope - explore board game ratings by year
//!
//! ratingscope loads a CSV of board games and draws two linked charts:
//!
//! - a **line chart** with one series per year, counting how many games fall
//!   into each integer rating bucket
//! - a **bar chart** that, while a marker on the line chart is hovered, shows
//!   the most-rated games of that year and bucket
//!
//! # Pipeline
//!
//! 1. [`data`]: read rows, coerce fields, drop malformed rows with a
//!    diagnostic, derive `rating_bucket = floor(average_rating)`
//! 2. [`aggregate`]: build the dense year × bucket [`CountTable`]
//! 3. [`view::PrimaryView`]: draw the line chart on a [`scene::Surface`]
//! 4. [`query`]: top-N most rated records of one (year, bucket)
//! 5. [`view::DetailView`]: draw and reconcile the bar chart
//!
//! [`Dashboard`] owns one session and routes pointer events between the two
//! views through a single-slot mailbox.
//!
//! # Quick Start
//!
//! ```no_run
//! use ratingscope::{ChartConfig, Dashboard, PointerEvent};
//!
//! let mut dashboard = Dashboard::load("games.csv", ChartConfig::default())?;
//! dashboard.handle(PointerEvent::Enter { year: 2016, bucket: 7 });
//!
//! for game in dashboard.top(2016, 7).iter() {
//!     println!("{}: {}", game.name, game.popularity);
//! }
//! println!("{}", dashboard.detail_svg());
//! # Ok::<(), ratingscope::ScopeError>(())
//! ```
//!
//! # Modules
//!
//! - [`data`]: loading and normalization
//! - [`aggregate`]: year and bucket sets, count table
//! - [`query`]: top-N detail query
//! - [`scene`]: scales, axes and the retained SVG surface
//! - [`view`]: the two chart controllers
//! - [`report`]: HTML, SVG, JSON and CSV output
//! - [`serve`]: local HTTP server for interactive use

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod query;
pub mod report;
pub mod scene;
pub mod serve;
pub mod view;

pub use aggregate::{CountTable, RatingBucketSet, YearSet};
pub use config::ChartConfig;
pub use dashboard::{Dashboard, PointerEvent};
pub use data::{Dataset, LoadSummary, NormalizedRecord, RawRecord, RowDiagnostic};
pub use error::{ScopeError, ScopeResult};
pub use query::{top_n, BucketKey, TopNResult};
