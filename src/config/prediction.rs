//! Prediction blending configuration

use serde::{Deserialize, Serialize};

/// Fixed weights of the three-factor blend
///
/// Weights apply unconditionally: a factor without data still contributes
/// its neutral 0.5 at full weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub elo: f64,
    pub head_to_head: f64,
    pub win_rate: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            elo: 0.5,
            head_to_head: 0.25,
            win_rate: 0.25,
        }
    }
}

impl FactorWeights {
    pub fn total(&self) -> f64 {
        self.elo + self.head_to_head + self.win_rate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub weights: FactorWeights,
    /// Probability gap above which confidence is high
    pub high_confidence_gap: f64,
    /// Probability gap above which confidence is medium
    pub medium_confidence_gap: f64,
    /// Rating updates required before training starts self-validation
    pub validation_warmup: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            high_confidence_gap: 0.30,
            medium_confidence_gap: 0.15,
            validation_warmup: 20,
        }
    }
}
