//! Margin-scaled Elo calculator
//!
//! Wraps the skillratings Elo implementation. The base K factor is scaled by
//! the series margin so a 3-0 sweep moves ratings further than a 2-1.

use crate::config::RatingConfig;
use serde::{Deserialize, Serialize};
use skillratings::elo::{elo, EloConfig, EloRating};
use skillratings::Outcomes;

/// Before/after ratings of one update, reported for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub winner_before: f64,
    pub winner_after: f64,
    pub loser_before: f64,
    pub loser_after: f64,
    /// Step size actually applied after margin scaling
    pub adjusted_k: f64,
}

impl RatingUpdate {
    pub fn winner_delta(&self) -> f64 {
        self.winner_after - self.winner_before
    }

    pub fn loser_delta(&self) -> f64 {
        self.loser_after - self.loser_before
    }
}

#[derive(Debug, Clone)]
pub struct EloCalculator {
    config: RatingConfig,
}

impl EloCalculator {
    pub fn new(config: RatingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Logistic expectation of A against B: `1 / (1 + 10^((rb - ra) / 400))`
    pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
        1.0 / (1.0 + 10_f64.powf((rating_b - rating_a) / 400.0))
    }

    /// Step size for a series decided by `margin` games
    pub fn adjusted_k(&self, margin: u32) -> f64 {
        self.config.k_factor * (1.0 + self.config.margin_scale * f64::from(margin))
    }

    /// Rate a decided series from both pre-update ratings.
    ///
    /// Both expectations are taken before either rating moves.
    pub fn rate(&self, winner_rating: f64, loser_rating: f64, margin: u32) -> RatingUpdate {
        let adjusted_k = self.adjusted_k(margin);
        let (winner_after, loser_after) = elo(
            &EloRating {
                rating: winner_rating,
            },
            &EloRating {
                rating: loser_rating,
            },
            &Outcomes::WIN,
            &EloConfig { k: adjusted_k },
        );

        RatingUpdate {
            winner_before: winner_rating,
            winner_after: winner_after.rating,
            loser_before: loser_rating,
            loser_after: loser_after.rating,
            adjusted_k,
        }
    }
}

impl Default for EloCalculator {
    fn default() -> Self {
        Self::new(RatingConfig::default())
    }
}
