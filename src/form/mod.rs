//! Team form tracking
//!
//! This module aggregates per-team results into long-run win rates and a
//! bounded window of recent outcomes, and exposes the win-rate view the
//! prediction engine reads.

pub mod aggregator;
pub mod statistics;

// Re-export commonly used types
pub use aggregator::{FormAggregator, FormRecord, WinRateSource};
pub use statistics::TeamStats;
