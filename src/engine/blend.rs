//! Three-factor probability blend
//!
//! Every factor holds a value in [0, 1] from side one's perspective. A factor
//! without data is neutral (0.5) and hidden from the reported factor set, but
//! it still takes its full weight in the blend. Weight is never redistributed
//! to the factors that are present.

use crate::config::{FactorWeights, PredictionConfig};
use crate::types::{Confidence, FACTOR_ELO, FACTOR_HEAD_TO_HEAD, FACTOR_WIN_RATE};
use std::collections::BTreeMap;

const NEUTRAL: f64 = 0.5;

/// Factor values gathered for one query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorBlend {
    pub elo: f64,
    pub head_to_head: Option<f64>,
    pub win_rate: Option<f64>,
}

impl FactorBlend {
    /// Head-to-head factor from a directed record; `None` when they never met
    pub fn head_to_head_factor(a_wins: u32, b_wins: u32) -> Option<f64> {
        let total = a_wins + b_wins;
        if total == 0 {
            return None;
        }
        Some(f64::from(a_wins) / f64::from(total))
    }

    /// Normalized win-rate ratio; `None` unless both rates are known
    pub fn win_rate_factor(rate_a: Option<f64>, rate_b: Option<f64>) -> Option<f64> {
        let (rate_a, rate_b) = (rate_a?, rate_b?);
        let sum = rate_a + rate_b;
        if sum > 0.0 {
            Some(rate_a / sum)
        } else {
            Some(NEUTRAL)
        }
    }

    /// Side-one probability under the fixed weights
    pub fn probability(&self, weights: &FactorWeights) -> f64 {
        weights.elo * self.elo
            + weights.head_to_head * self.head_to_head.unwrap_or(NEUTRAL)
            + weights.win_rate * self.win_rate.unwrap_or(NEUTRAL)
    }

    /// Factors that had data, keyed by name
    pub fn reported(&self) -> BTreeMap<String, f64> {
        let mut factors = BTreeMap::new();
        factors.insert(FACTOR_ELO.to_string(), self.elo);
        if let Some(h2h) = self.head_to_head {
            factors.insert(FACTOR_HEAD_TO_HEAD.to_string(), h2h);
        }
        if let Some(win_rate) = self.win_rate {
            factors.insert(FACTOR_WIN_RATE.to_string(), win_rate);
        }
        factors
    }
}

/// Both side probabilities; side two is the complement of side one
pub fn split(side_one: f64) -> (f64, f64) {
    (side_one, 1.0 - side_one)
}

pub fn confidence(p_one: f64, p_two: f64, config: &PredictionConfig) -> Confidence {
    Confidence::from_gap(
        (p_one - p_two).abs(),
        config.high_confidence_gap,
        config.medium_confidence_gap,
    )
}
