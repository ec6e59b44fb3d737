//! Error types for the prediction service
//!
//! Core prediction never fails for business reasons (unknown teams, cold
//! start, empty history all degrade to neutral values). These errors cover
//! the boundaries: persisted files, configuration and the data source.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific prediction scenarios
#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("Model file {path} is malformed: {reason}")]
    MalformedModel { path: String, reason: String },

    #[error("Dataset file {path} is malformed: {reason}")]
    MalformedDataset { path: String, reason: String },

    #[error("Prediction log {path} is malformed: {reason}")]
    MalformedPredictionLog { path: String, reason: String },

    #[error("Team not found: {query}")]
    TeamNotFound { query: String },

    #[error("Invalid prediction: {reason}")]
    InvalidPrediction { reason: String },

    #[error("Data source failed: {message}")]
    DataSourceFailed { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
