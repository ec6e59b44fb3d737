//! Match data collection
//!
//! This module defines the interface to the external match data source,
//! the collector that turns completed events into match records while
//! tracking team form, and the dataset file those records are stored in.

pub mod collector;
pub mod dataset;
pub mod source;

// Re-export commonly used types
pub use collector::DataCollector;
pub use dataset::Dataset;
pub use source::{
    Event, EventMatch, EventTeam, League, MatchSource, StaticMatchSource, TeamResult, Tournament,
};
