//! Shared building blocks for the activity tracker.
//!
//! Typed record models, field coercion, time and number formatting, the
//! least-squares trend calculation, error types and CLI settings.

pub mod calculations;
pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, TrackerError};
