//! Rating system configuration

use serde::{Deserialize, Serialize};

/// Parameters of the margin-scaled Elo update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Base step size before margin scaling
    pub k_factor: f64,
    /// Rating assigned to a team the first time it is referenced
    pub initial_rating: f64,
    /// Extra step per game of series margin, as a fraction of `k_factor`
    pub margin_scale: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            initial_rating: 1500.0,
            margin_scale: 0.1,
        }
    }
}
