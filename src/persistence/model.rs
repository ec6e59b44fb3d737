//! Model file schema and load/store
//!
//! Schema:
//! `{ratings: {id: f64}, names: {id: string}, pairwise: {id: {id: [u32, u32]}}}`
//!
//! Pairwise records are nested under the canonical (lexicographically
//! smaller) id and hold `[first_wins, second_wins]`. `ratings` is required;
//! `names` and `pairwise` default to empty. Files written under the older
//! key names (`elo_ratings`, `team_names`, `h2h_records`) are accepted.

use crate::config::AppConfig;
use crate::engine::PredictionEngine;
use crate::error::{PredictorError, Result};
use crate::history::{PairKey, PairRecord, PairwiseHistory};
use crate::types::TeamId;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelFile {
    #[serde(alias = "elo_ratings")]
    pub ratings: BTreeMap<TeamId, f64>,
    #[serde(default, alias = "team_names")]
    pub names: BTreeMap<TeamId, String>,
    #[serde(default, alias = "h2h_records")]
    pub pairwise: BTreeMap<TeamId, BTreeMap<TeamId, [u32; 2]>>,
}

impl ModelFile {
    /// Snapshot the trained state of an engine
    pub fn capture(engine: &PredictionEngine) -> Self {
        let ratings = engine
            .ratings()
            .ratings()
            .iter()
            .map(|(id, rating)| (id.clone(), *rating))
            .collect();

        let names = engine
            .names()
            .iter()
            .map(|(id, name)| (id.clone(), name.clone()))
            .collect();

        let mut pairwise: BTreeMap<TeamId, BTreeMap<TeamId, [u32; 2]>> = BTreeMap::new();
        for (key, record) in engine.history().records() {
            pairwise
                .entry(key.first.clone())
                .or_default()
                .insert(key.second.clone(), [record.first_wins, record.second_wins]);
        }

        Self {
            ratings,
            names,
            pairwise,
        }
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some((id, rating)) = self.ratings.iter().find(|(_, r)| !r.is_finite()) {
            return Err(format!("rating for {} is not finite ({})", id, rating));
        }

        for (first, opponents) in &self.pairwise {
            for second in opponents.keys() {
                if first > second {
                    return Err(format!(
                        "pairwise record {} -> {} is not in canonical order",
                        first, second
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize model")
    }

    /// Parse and validate a model; `origin` names the source in errors
    pub fn from_json(raw: &str, origin: &str) -> Result<Self> {
        let model: ModelFile =
            serde_json::from_str(raw).map_err(|e| PredictorError::MalformedModel {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;

        model
            .validate()
            .map_err(|reason| PredictorError::MalformedModel {
                path: origin.to_string(),
                reason,
            })?;

        Ok(model)
    }

    /// Pairwise records rebuilt as canonical `(u32, u32)` tallies
    pub fn pairwise_history(&self) -> PairwiseHistory {
        let mut history = PairwiseHistory::new();
        for (first, opponents) in &self.pairwise {
            for (second, [first_wins, second_wins]) in opponents {
                history.insert_record(
                    PairKey {
                        first: first.clone(),
                        second: second.clone(),
                    },
                    PairRecord {
                        first_wins: *first_wins,
                        second_wins: *second_wins,
                    },
                );
            }
        }
        history
    }

    /// Consume the model into a ready engine
    pub fn into_engine(self, config: &AppConfig) -> PredictionEngine {
        let history = self.pairwise_history();
        PredictionEngine::from_parts(
            config,
            self.ratings.into_iter().collect::<HashMap<_, _>>(),
            self.names.into_iter().collect::<HashMap<_, _>>(),
            history,
        )
    }
}

/// Write the engine's trained state to `path` as pretty JSON
pub fn save_model(engine: &PredictionEngine, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = ModelFile::capture(engine).to_json()?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create model directory {}", dir.display()))?;
    }

    // Write beside the target and rename so a failed write never truncates
    // an existing model
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;

    info!("Model saved to {}", path.display());
    Ok(())
}

/// Read a model file; `Ok(None)` when no model has been saved yet
pub fn load_model(path: impl AsRef<Path>) -> Result<Option<ModelFile>> {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No model at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read model {}", path.display()))
        }
    };

    let model = ModelFile::from_json(&raw, &path.display().to_string())?;
    info!(
        "Model loaded from {} ({} teams, {} pairs)",
        path.display(),
        model.ratings.len(),
        model.pairwise.values().map(BTreeMap::len).sum::<usize>()
    );
    Ok(Some(model))
}

/// Load a model into an existing engine.
///
/// Returns `false` when no model exists. The engine is only touched after
/// the whole file has been read and validated.
pub fn load_into(engine: &mut PredictionEngine, path: impl AsRef<Path>) -> Result<bool> {
    let Some(model) = load_model(path)? else {
        return Ok(false);
    };

    let history = model.pairwise_history();
    engine.restore(
        model.ratings.into_iter().collect(),
        model.names.into_iter().collect(),
        history,
    );
    Ok(true)
}
