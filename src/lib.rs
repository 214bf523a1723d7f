//! Plotshelf - Browse pre-generated plot files in a local web UI
//!
//! Plotshelf serves a directory tree of chart exports - pre-rendered
//! `.html` documents and `.json` Plotly chart descriptions - as a small
//! browsable website. Pick a chart and step chronologically through the
//! other charts in its folder, or jump to the same-named snapshot in the
//! previous or next run folder.
//!
//! # Overview
//!
//! Long-running jobs often dump a plot per snapshot into per-run folders:
//!
//! ```text
//! plots/
//!   experiment/
//!     run1/loss.json
//!     run2/loss.json
//!     run3/loss.json
//! ```
//!
//! Plotshelf turns that tree into pages with four navigation links per
//! chart: previous/next within the folder (modification-time order) and
//! previous/next occurrence of the same filename across sibling runs.
//! JSON chart descriptions are rendered to standalone HTML on demand.
//!
//! # Quick Start
//!
//! ```no_run
//! use plotshelf::serve::{self, Options};
//!
//! serve::start(3001, "static/plots".into(), Options::default()).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`resolve`]: safe path resolution under the plot root
//! - [`list`]: directory listings sorted by creation time
//! - [`nav`]: sibling and cross-folder prev/next lookup
//! - [`chart`]: rendering JSON chart descriptions to standalone HTML
//! - [`serve`]: the HTTP surface tying it all together

pub mod chart;
pub mod list;
pub mod nav;
pub mod page;
pub mod resolve;
pub mod serve;

pub use chart::ChartDescription;
pub use list::{Entry, EntryKind, Listing};
pub use nav::Neighbors;
pub use resolve::PlotRoot;
