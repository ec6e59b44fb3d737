//! Configuration management for the series-oracle service
//!
//! This module handles configuration loading from TOML files and
//! environment variables, validation, and default values for the engine.

pub mod app;
pub mod form;
pub mod prediction;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use form::FormConfig;
pub use prediction::{FactorWeights, PredictionConfig};
pub use rating::RatingConfig;
