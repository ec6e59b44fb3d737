//! Rolling form configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Number of most recent outcomes kept per team
    pub window_size: usize,
    /// Default number of outcomes used for recent form
    pub recent_matches: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            recent_matches: 5,
        }
    }
}
