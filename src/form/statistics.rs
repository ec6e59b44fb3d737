//! Long-run statistics for a single team

use crate::types::TeamId;
use serde::{Deserialize, Serialize};

/// Neutral value used whenever there is nothing to compute a rate from
pub const NEUTRAL_RATE: f64 = 0.5;

/// Cumulative results for a team, as stored in the dataset file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_id: TeamId,
    pub team_name: String,
    pub team_code: String,
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
}

impl TeamStats {
    pub fn new(team_id: &str, team_name: &str, team_code: &str) -> Self {
        Self {
            team_id: team_id.to_string(),
            team_name: team_name.to_string(),
            team_code: team_code.to_string(),
            ..Self::default()
        }
    }

    /// Count one more series
    pub fn record(&mut self, won: bool) {
        self.games_played += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    /// Wins over games played; neutral when no games have been played
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return NEUTRAL_RATE;
        }
        f64::from(self.wins) / f64::from(self.games_played)
    }

    pub fn has_games(&self) -> bool {
        self.games_played > 0
    }
}
