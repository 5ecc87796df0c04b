//! Prayer schedule and Hijri calendar engine.
//!
//! Resolves the next prayer and its live countdown from five daily timing
//! strings, keeps a persisted per-day record of completed prayers, and lays
//! out Hijri months with completion tiers and significant dates.

pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod location;
pub mod models;
pub mod prayer_times;
pub mod tracker;
pub mod utils;

pub use error::{EngineError, EngineResult};
