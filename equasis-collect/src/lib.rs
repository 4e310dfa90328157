// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Equasis Collect
//!
//! Turns fetched Equasis pages into vessel and fleet profiles.
//!
//! The data flow for one vessel is:
//!
//! ```text
//! SessionGateway -> RawDocument -> extract() -> PartialRecord -> merge() -> VesselProfile
//! ```
//!
//! - [`extract`] - Per-tab extraction rules over the page markup
//! - [`merge`] - Field-level merge precedence and section ownership
//! - [`collector`] - [`VesselCollector`] and [`FleetCollector`], one key at a time
//! - [`batch`] - [`run_batch`] over many keys with pacing and progress events
//! - [`search`] - Vessel search by name
//!
//! ## Example
//!
//! ```ignore
//! use equasis_collect::{run_batch, BatchOptions, VesselCollector};
//!
//! let collector = VesselCollector::from_settings(gateway.settings());
//! let options = BatchOptions::default();
//! let mut progress = |_: &ProgressEvent| {};
//! let run = run_batch(&collector, &mut gateway, &keys, &options, &mut progress).await;
//! println!("{} of {} succeeded", run.summary.succeeded, run.summary.total);
//! ```

pub mod batch;
pub mod collector;
pub mod error;
pub mod extract;
pub mod merge;
pub mod search;

pub use batch::{
    BatchMode, BatchOptions, BatchRun, NoProgress, ProgressEvent, ProgressPhase, ProgressSink,
    run_batch,
};
pub use collector::{Collector, FleetCollector, VesselCollector};
pub use error::{CollectError, ExtractError};
pub use extract::{extract, extract_fleet, extract_vessel_list};
pub use merge::merge;
pub use search::search_by_name;
