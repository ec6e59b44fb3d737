//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! series-oracle service, including TOML/environment loading and validation.

use crate::config::{FormConfig, PredictionConfig, RatingConfig};
use crate::error::PredictorError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub form: FormConfig,
    pub prediction: PredictionConfig,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Directory holding the dataset, model and prediction log
    pub data_dir: PathBuf,
    /// Collected match data file name
    pub dataset_file: String,
    /// Trained model file name
    pub model_file: String,
    /// User prediction log file name
    pub predictions_file: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "series-oracle".to_string(),
            log_level: "info".to_string(),
            data_dir: PathBuf::from("data"),
            dataset_file: "match_data.json".to_string(),
            model_file: "model.json".to_string(),
            predictions_file: "predictions.json".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file; missing sections take defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Apply environment variable overrides on top of the current values
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(data_dir) = env::var("DATA_DIR") {
            self.service.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(k) = env::var("ELO_K_FACTOR") {
            self.rating.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_K_FACTOR value: {}", k))?;
        }
        if let Ok(initial) = env::var("ELO_INITIAL_RATING") {
            self.rating.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_INITIAL_RATING value: {}", initial))?;
        }
        if let Ok(window) = env::var("FORM_WINDOW_SIZE") {
            self.form.window_size = window
                .parse()
                .map_err(|_| anyhow!("Invalid FORM_WINDOW_SIZE value: {}", window))?;
        }
        if let Ok(warmup) = env::var("VALIDATION_WARMUP") {
            self.prediction.validation_warmup = warmup
                .parse()
                .map_err(|_| anyhow!("Invalid VALIDATION_WARMUP value: {}", warmup))?;
        }

        Ok(())
    }

    /// Apply command-line overrides on top of a loaded config and validate
    /// the result. `debug` wins over an explicit log level.
    pub fn apply_overrides(
        &mut self,
        log_level: Option<&str>,
        debug: bool,
        data_dir: Option<&Path>,
    ) -> Result<()> {
        if let Some(log_level) = log_level {
            self.service.log_level = log_level.to_string();
        }
        if debug {
            self.service.log_level = "debug".to_string();
        }
        if let Some(data_dir) = data_dir {
            self.service.data_dir = data_dir.to_path_buf();
        }

        validate_config(self)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.service.data_dir.join(&self.service.dataset_file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.service.data_dir.join(&self.service.model_file)
    }

    pub fn predictions_path(&self) -> PathBuf {
        self.service.data_dir.join(&self.service.predictions_file)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => {
            return Err(invalid(format!(
                "Invalid log level: {}",
                config.service.log_level
            )))
        }
    }

    if config.rating.k_factor <= 0.0 {
        return Err(invalid("K factor must be positive"));
    }
    if config.rating.margin_scale < 0.0 {
        return Err(invalid("Margin scale must be non-negative"));
    }

    if config.form.window_size == 0 {
        return Err(invalid("Form window size must be greater than 0"));
    }
    if config.form.recent_matches == 0 || config.form.recent_matches > config.form.window_size {
        return Err(invalid(format!(
            "Recent form length must be between 1 and the window size ({})",
            config.form.window_size
        )));
    }

    let weights = &config.prediction.weights;
    if weights.elo < 0.0 || weights.head_to_head < 0.0 || weights.win_rate < 0.0 {
        return Err(invalid("Factor weights must be non-negative"));
    }
    if (weights.total() - 1.0).abs() > 1e-9 {
        return Err(invalid(format!(
            "Factor weights must sum to 1.0, got {}",
            weights.total()
        )));
    }
    if config.prediction.medium_confidence_gap > config.prediction.high_confidence_gap {
        return Err(invalid(
            "Medium confidence gap cannot exceed the high confidence gap",
        ));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> anyhow::Error {
    PredictorError::ConfigurationError {
        message: message.into(),
    }
    .into()
}
