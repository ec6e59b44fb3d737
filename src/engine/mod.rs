//! Prediction engine
//!
//! Trains the rating store and pairwise history over a chronological match
//! history and blends their signals with long-run win rates into a single
//! win probability.

pub mod blend;
pub mod predictor;

// Re-export commonly used types
pub use blend::FactorBlend;
pub use predictor::{EnginePhase, PredictionEngine, TrainingReport};
