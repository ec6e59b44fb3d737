//! Common types used throughout the prediction service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identifier for a team, as issued by the data source
pub type TeamId = String;

/// Factor key for the rating expectation
pub const FACTOR_ELO: &str = "elo";
/// Factor key for the direct head-to-head record
pub const FACTOR_HEAD_TO_HEAD: &str = "head_to_head";
/// Factor key for the normalized long-run win rate ratio
pub const FACTOR_WIN_RATE: &str = "win_rate";

/// Result of a single series from one team's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl Outcome {
    pub fn from_won(won: bool) -> Self {
        if won {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }

    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Win)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "W"),
            Outcome::Loss => write!(f, "L"),
        }
    }
}

/// A completed series with a determinate winner
///
/// Produced by the collector and consumed by training in ascending `date`
/// order. `date` is the source's ISO-8601 start time, so lexicographic order
/// is chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub tournament_id: String,
    pub tournament_name: String,
    pub date: String,
    pub team1_id: TeamId,
    pub team1_name: String,
    pub team1_code: String,
    pub team2_id: TeamId,
    pub team2_name: String,
    pub team2_code: String,
    pub winner_id: TeamId,
    pub winner_code: String,
    pub team1_score: u32,
    pub team2_score: u32,
    pub num_games: u32,
    /// Pre-match statistics stamped by the collector
    #[serde(default)]
    pub team1_win_rate: f64,
    #[serde(default)]
    pub team2_win_rate: f64,
    #[serde(default)]
    pub team1_recent_form: f64,
    #[serde(default)]
    pub team2_recent_form: f64,
}

impl MatchRecord {
    pub fn team1_won(&self) -> bool {
        self.winner_id == self.team1_id
    }

    /// Absolute game-count difference of the series
    pub fn margin(&self) -> u32 {
        self.team1_score.abs_diff(self.team2_score)
    }

    /// (winner, loser) ids
    pub fn winner_and_loser(&self) -> (&TeamId, &TeamId) {
        if self.team1_won() {
            (&self.team1_id, &self.team2_id)
        } else {
            (&self.team2_id, &self.team1_id)
        }
    }

    /// Score formatted from team1's side, e.g. "3-1"
    pub fn score_line(&self) -> String {
        format!("{}-{}", self.team1_score, self.team2_score)
    }
}

/// Coarse classification of how decisive a probability split is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Classify a probability gap; both thresholds are strict lower bounds.
    pub fn from_gap(gap: f64, high_threshold: f64, medium_threshold: f64) -> Self {
        if gap > high_threshold {
            Confidence::High
        } else if gap > medium_threshold {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Output of a point-in-time prediction query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub team1_name: String,
    pub team2_name: String,
    pub predicted_winner: String,
    pub team1_win_probability: f64,
    pub team2_win_probability: f64,
    pub confidence: Confidence,
    /// Only factors that had data to compute from
    pub factors: BTreeMap<String, f64>,
}

impl Prediction {
    pub fn has_factor(&self, name: &str) -> bool {
        self.factors.contains_key(name)
    }

    pub fn probability_gap(&self) -> f64 {
        (self.team1_win_probability - self.team2_win_probability).abs()
    }
}
