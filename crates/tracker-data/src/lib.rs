//! Statistics layer for the activity tracker.
//!
//! Decodes spreadsheet grids into rows, normalizes them into typed records,
//! orders them chronologically, aggregates per-domain statistics and packs
//! them into the served response shapes.

pub mod analysis;
pub mod chess;
pub mod normalizer;
pub mod reader;
pub mod results;
pub mod running;
pub mod sorter;

pub use tracker_core as core;
