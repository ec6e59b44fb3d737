//! Collected match dataset file
//!
//! Holds every collected match record plus the long-run team statistics the
//! collector accumulated, so training and win-rate lookup can run without
//! contacting the data source again.

use crate::config::FormConfig;
use crate::error::{PredictorError, Result};
use crate::form::{FormAggregator, TeamStats};
use crate::types::{MatchRecord, TeamId};
use crate::utils::deserialize_optional_timestamp;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub num_matches: usize,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub team_stats: BTreeMap<TeamId, TeamStats>,
}

impl Dataset {
    /// Bundle freshly collected matches with the collector's statistics
    pub fn new(matches: Vec<MatchRecord>, team_stats: HashMap<TeamId, TeamStats>) -> Self {
        Self {
            collected_at: Some(Utc::now()),
            num_matches: matches.len(),
            matches,
            team_stats: team_stats.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Long-run statistics as a win-rate lookup
    pub fn team_stats_map(&self) -> HashMap<TeamId, TeamStats> {
        self.team_stats
            .iter()
            .map(|(id, stats)| (id.clone(), stats.clone()))
            .collect()
    }

    /// Aggregator with counters restored; rolling windows start empty
    pub fn form_aggregator(&self, config: FormConfig) -> FormAggregator {
        FormAggregator::from_team_stats(config, self.team_stats.values().cloned())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize dataset")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Saved {} matches to {}", self.matches.len(), path.display());
        Ok(())
    }

    /// Load a dataset; a missing file yields an empty dataset
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No dataset at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read dataset {}", path.display()))
            }
        };

        let dataset: Dataset =
            serde_json::from_str(&raw).map_err(|e| PredictorError::MalformedDataset {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(
            "Loaded {} matches and {} team records from {}",
            dataset.matches.len(),
            dataset.team_stats.len(),
            path.display()
        );
        Ok(dataset)
    }
}
