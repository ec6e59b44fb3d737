//! Series Oracle - Win probabilities for best-of-N esports series
//!
//! This crate collects completed series, maintains margin-scaled Elo
//! ratings, head-to-head records and rolling team form, and blends them
//! into a calibrated win probability for any pair of teams.

pub mod collect;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod history;
pub mod persistence;
pub mod rating;
pub mod tracker;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{PredictorError, Result};
pub use types::*;

// Re-export key components
pub use collect::{DataCollector, Dataset, MatchSource, StaticMatchSource};
pub use engine::{PredictionEngine, TrainingReport};
pub use form::{FormAggregator, WinRateSource};
pub use tracker::PredictionTracker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
