//! Runtime layer for the activity tracker.
//!
//! Fetches spreadsheet grids, runs the per-domain pipelines on a refresh
//! schedule and publishes the results for the HTTP layer.

pub mod orchestrator;
pub mod source;
pub mod store;

pub use tracker_core as core;
pub use tracker_data as data;
