//! User prediction tracking
//!
//! Records picks for upcoming series and scores them once results arrive.

pub mod predictions;

pub use predictions::{
    CompletedSeries, PredictionTracker, TrackerStats, UpcomingSeries, UserPrediction,
};
