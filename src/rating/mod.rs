//! Rating system built on the Elo expectation curve
//!
//! This module provides the margin-scaled Elo calculator (backed by the
//! skillratings crate) and the per-team rating store the engine trains.

pub mod calculator;
pub mod storage;

// Re-export commonly used types
pub use calculator::{EloCalculator, RatingUpdate};
pub use storage::RatingStore;
