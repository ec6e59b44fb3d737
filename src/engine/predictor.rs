//! Prediction engine state and training loop
//!
//! The engine owns its rating store, pairwise history and a snapshot of
//! long-run win rates. Training mutates all three and must not run
//! concurrently with queries on the same instance; `predict` is a pure read.

use crate::config::{AppConfig, PredictionConfig};
use crate::engine::blend::{self, FactorBlend};
use crate::form::WinRateSource;
use crate::history::PairwiseHistory;
use crate::rating::RatingStore;
use crate::types::{MatchRecord, Prediction, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Lifecycle of an engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    /// Constructed with empty state; every prediction is neutral
    Untrained,
    /// Trained at least once or restored from a saved model
    Ready,
}

/// Diagnostics from one training pass
///
/// Validation predictions are scored before each update once the warm-up
/// has passed; they never affect stored state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub matches_processed: usize,
    pub validation_attempted: usize,
    pub validation_correct: usize,
    pub teams_known: usize,
    pub teams_with_win_rate: usize,
}

impl TrainingReport {
    /// Correct / attempted, or `None` when nothing was validated
    pub fn accuracy(&self) -> Option<f64> {
        if self.validation_attempted == 0 {
            return None;
        }
        Some(self.validation_correct as f64 / self.validation_attempted as f64)
    }
}

#[derive(Debug, Clone)]
pub struct PredictionEngine {
    ratings: RatingStore,
    history: PairwiseHistory,
    names: HashMap<TeamId, String>,
    win_rates: HashMap<TeamId, f64>,
    config: PredictionConfig,
    phase: EnginePhase,
}

impl PredictionEngine {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            ratings: RatingStore::new(config.rating.clone()),
            history: PairwiseHistory::new(),
            names: HashMap::new(),
            win_rates: HashMap::new(),
            config: config.prediction.clone(),
            phase: EnginePhase::Untrained,
        }
    }

    /// Rebuild an engine around previously trained state
    pub fn from_parts(
        config: &AppConfig,
        ratings: HashMap<TeamId, f64>,
        names: HashMap<TeamId, String>,
        history: PairwiseHistory,
    ) -> Self {
        let mut engine = Self::new(config);
        engine.restore(ratings, names, history);
        engine
    }

    /// Swap in restored model state.
    ///
    /// The win-rate snapshot is cleared; call `refresh_win_rates` to
    /// repopulate it from the collected dataset.
    pub fn restore(
        &mut self,
        ratings: HashMap<TeamId, f64>,
        names: HashMap<TeamId, String>,
        history: PairwiseHistory,
    ) {
        self.ratings.replace_all(ratings);
        self.names = names;
        self.history = history;
        self.win_rates.clear();
        self.phase = EnginePhase::Ready;
    }

    /// Train over a match history, then refresh win rates from `win_rates`
    pub fn train(
        &mut self,
        matches: &[MatchRecord],
        win_rates: &dyn WinRateSource,
    ) -> TrainingReport {
        info!("Training predictor on {} matches...", matches.len());

        // Stable sort: matches sharing a timestamp keep their input order
        let mut ordered: Vec<&MatchRecord> = matches.iter().collect();
        ordered.sort_by(|a, b| a.date.cmp(&b.date));

        let mut report = TrainingReport::default();
        let mut updates = 0usize;

        for record in ordered {
            self.names
                .insert(record.team1_id.clone(), record.team1_name.clone());
            self.names
                .insert(record.team2_id.clone(), record.team2_name.clone());

            if updates >= self.config.validation_warmup {
                if let Some(correct) = self.validate_before_update(record) {
                    report.validation_attempted += 1;
                    if correct {
                        report.validation_correct += 1;
                    }
                }
            }

            let team1_won = record.team1_won();
            let (winner, loser) = record.winner_and_loser();
            self.ratings.update_ratings(winner, loser, record.margin());
            self.history
                .add_result(&record.team1_id, &record.team2_id, team1_won);

            updates += 1;
            report.matches_processed += 1;
        }

        self.refresh_win_rates(win_rates);
        self.phase = EnginePhase::Ready;

        report.teams_known = self.names.len();
        report.teams_with_win_rate = self.win_rates.len();

        match report.accuracy() {
            Some(accuracy) => info!(
                "Training complete! Validation accuracy: {:.1}% ({}/{})",
                accuracy * 100.0,
                report.validation_correct,
                report.validation_attempted
            ),
            None => info!("Training complete!"),
        }

        report
    }

    /// Rating-only check of the winner before the match updates any state.
    ///
    /// Skipped when neither team has been rated yet.
    fn validate_before_update(&self, record: &MatchRecord) -> Option<bool> {
        if !self.ratings.contains(&record.team1_id) && !self.ratings.contains(&record.team2_id) {
            return None;
        }

        let (p1, p2) = self.ratings.predict(&record.team1_id, &record.team2_id);
        let predicted = if p1 > p2 {
            &record.team1_id
        } else {
            &record.team2_id
        };
        Some(*predicted == record.winner_id)
    }

    /// Replace the win-rate snapshot for every known team
    pub fn refresh_win_rates(&mut self, source: &dyn WinRateSource) {
        self.win_rates = self
            .known_team_ids()
            .into_iter()
            .filter_map(|id| source.long_run_win_rate(&id).map(|rate| (id, rate)))
            .collect();

        debug!(
            "Loaded win rates for {} of {} known teams",
            self.win_rates.len(),
            self.names.len().max(self.ratings.len())
        );
    }

    /// Blend all factors into a win probability for `team1` against `team2`
    pub fn predict(&self, team1_id: &str, team2_id: &str) -> Prediction {
        let (elo_p1, _elo_p2) = self.ratings.predict(team1_id, team2_id);

        let (a_wins, b_wins) = self.history.get_record(team1_id, team2_id);
        let factors = FactorBlend {
            elo: elo_p1,
            head_to_head: FactorBlend::head_to_head_factor(a_wins, b_wins),
            win_rate: FactorBlend::win_rate_factor(
                self.win_rates.get(team1_id).copied(),
                self.win_rates.get(team2_id).copied(),
            ),
        };

        let (team1_prob, team2_prob) = blend::split(factors.probability(&self.config.weights));
        let confidence = blend::confidence(team1_prob, team2_prob, &self.config);

        let team1_name = self.display_name(team1_id);
        let team2_name = self.display_name(team2_id);
        // Strict comparison: an exact tie goes to team2
        let predicted_winner = if team1_prob > team2_prob {
            team1_name.clone()
        } else {
            team2_name.clone()
        };

        Prediction {
            team1_name,
            team2_name,
            predicted_winner,
            team1_win_probability: team1_prob,
            team2_win_probability: team2_prob,
            confidence,
            factors: factors.reported(),
        }
    }

    /// Display name, falling back to the id for unknown teams
    pub fn display_name(&self, team_id: &str) -> String {
        self.names
            .get(team_id)
            .cloned()
            .unwrap_or_else(|| team_id.to_string())
    }

    /// First team (in id order) whose name contains the query, ignoring case
    pub fn find_team_id(&self, name_or_code: &str) -> Option<TeamId> {
        let needle = name_or_code.to_lowercase();
        let sorted: BTreeMap<&TeamId, &String> = self.names.iter().collect();

        sorted
            .into_iter()
            .find(|(id, name)| {
                name.to_lowercase().contains(&needle) || id.to_lowercase() == needle
            })
            .map(|(id, _)| id.clone())
    }

    /// Top teams by rating as (display name, rating)
    pub fn rankings(&self, top_n: usize) -> Vec<(String, f64)> {
        self.ratings
            .rankings(top_n)
            .into_iter()
            .map(|(id, rating)| (self.display_name(&id), rating))
            .collect()
    }

    pub fn head_to_head(&self, team1_id: &str, team2_id: &str) -> (u32, u32) {
        self.history.get_record(team1_id, team2_id)
    }

    pub fn rating(&self, team_id: &str) -> f64 {
        self.ratings.get(team_id)
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    pub fn history(&self) -> &PairwiseHistory {
        &self.history
    }

    pub fn names(&self) -> &HashMap<TeamId, String> {
        &self.names
    }

    pub fn win_rates(&self) -> &HashMap<TeamId, f64> {
        &self.win_rates
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_trained(&self) -> bool {
        self.phase == EnginePhase::Ready
    }

    fn known_team_ids(&self) -> Vec<TeamId> {
        let mut ids: Vec<TeamId> = self
            .names
            .keys()
            .chain(self.ratings.ratings().keys())
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}
