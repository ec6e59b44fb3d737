//! Prediction log and accuracy statistics

use crate::error::{PredictorError, Result};
use crate::utils::deserialize_timestamp;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// A series that can still be predicted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingSeries {
    pub match_id: String,
    pub start_time: String,
    pub team1_code: String,
    pub team1_name: String,
    pub team2_code: String,
    pub team2_name: String,
}

/// Final result of a series, used to score pending predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSeries {
    pub match_id: String,
    pub winner_code: String,
    /// Score from team1's side, e.g. "2-1"
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPrediction {
    pub prediction_id: String,
    pub match_id: String,
    pub match_date: String,
    pub team1_code: String,
    pub team1_name: String,
    pub team2_code: String,
    pub team2_name: String,
    /// Team code of the picked winner
    pub predicted_winner: String,
    pub predicted_score: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub actual_winner: Option<String>,
    #[serde(default)]
    pub actual_score: Option<String>,
    #[serde(default)]
    pub winner_correct: Option<bool>,
    #[serde(default)]
    pub score_correct: Option<bool>,
}

impl UserPrediction {
    pub fn is_resolved(&self) -> bool {
        self.actual_winner.is_some()
    }

    fn resolve(&mut self, result: &CompletedSeries) {
        self.winner_correct = Some(self.predicted_winner == result.winner_code);
        self.score_correct = Some(self.predicted_score == result.score);
        self.actual_winner = Some(result.winner_code.clone());
        self.actual_score = Some(result.score.clone());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerStats {
    pub total_predictions: usize,
    pub completed: usize,
    pub pending: usize,
    pub winner_correct: usize,
    /// Percentage in [0, 100]
    pub winner_accuracy: f64,
    pub score_correct: usize,
    /// Percentage in [0, 100]
    pub score_accuracy: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PredictionTracker {
    predictions: Vec<UserPrediction>,
}

impl PredictionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predictions(&self) -> &[UserPrediction] {
        &self.predictions
    }

    /// Record a pick for an upcoming series
    pub fn make_prediction(
        &mut self,
        series: &UpcomingSeries,
        winner_code: &str,
        score: &str,
    ) -> Result<UserPrediction> {
        if winner_code != series.team1_code && winner_code != series.team2_code {
            return Err(PredictorError::InvalidPrediction {
                reason: format!(
                    "{} is not playing in {} vs {}",
                    winner_code, series.team1_code, series.team2_code
                ),
            }
            .into());
        }
        let score = parse_score(score)?;

        let prediction = UserPrediction {
            prediction_id: format!("pred_{}", Uuid::new_v4().simple()),
            match_id: series.match_id.clone(),
            match_date: series.start_time.clone(),
            team1_code: series.team1_code.clone(),
            team1_name: series.team1_name.clone(),
            team2_code: series.team2_code.clone(),
            team2_name: series.team2_name.clone(),
            predicted_winner: winner_code.to_string(),
            predicted_score: score,
            created_at: Utc::now(),
            actual_winner: None,
            actual_score: None,
            winner_correct: None,
            score_correct: None,
        };

        info!(
            "Prediction saved: {} to win {} vs {}",
            winner_code, series.team1_code, series.team2_code
        );
        self.predictions.push(prediction.clone());
        Ok(prediction)
    }

    /// Score pending predictions against completed results.
    ///
    /// Returns the number of predictions that were resolved.
    pub fn resolve(&mut self, results: &[CompletedSeries]) -> usize {
        let by_match: HashMap<&str, &CompletedSeries> = results
            .iter()
            .map(|result| (result.match_id.as_str(), result))
            .collect();

        let mut updated = 0;
        for prediction in self.predictions.iter_mut().filter(|p| !p.is_resolved()) {
            if let Some(result) = by_match.get(prediction.match_id.as_str()) {
                prediction.resolve(result);
                updated += 1;
            }
        }

        if updated > 0 {
            info!("Updated {} prediction(s) with results", updated);
        }
        updated
    }

    pub fn stats(&self) -> TrackerStats {
        let total = self.predictions.len();
        let completed: Vec<&UserPrediction> =
            self.predictions.iter().filter(|p| p.is_resolved()).collect();

        if completed.is_empty() {
            return TrackerStats {
                total_predictions: total,
                pending: total,
                ..TrackerStats::default()
            };
        }

        let winner_correct = completed
            .iter()
            .filter(|p| p.winner_correct == Some(true))
            .count();
        let score_correct = completed
            .iter()
            .filter(|p| p.score_correct == Some(true))
            .count();
        let n = completed.len() as f64;

        TrackerStats {
            total_predictions: total,
            completed: completed.len(),
            pending: total - completed.len(),
            winner_correct,
            winner_accuracy: winner_correct as f64 / n * 100.0,
            score_correct,
            score_accuracy: score_correct as f64 / n * 100.0,
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.predictions)
            .context("Failed to serialize predictions")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Load the prediction log; a missing file yields an empty tracker
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read predictions {}", path.display()))
            }
        };

        let predictions: Vec<UserPrediction> =
            serde_json::from_str(&raw).map_err(|e| PredictorError::MalformedPredictionLog {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        debug!("Loaded {} predictions", predictions.len());
        Ok(Self { predictions })
    }
}

/// Normalize a series score such as "2-1" or " 3 - 0 "
fn parse_score(score: &str) -> Result<String> {
    let invalid = || PredictorError::InvalidPrediction {
        reason: format!("invalid score format '{}', expected e.g. 2-1", score),
    };

    let (left, right) = score.split_once('-').ok_or_else(invalid)?;
    let left: u32 = left.trim().parse().map_err(|_| invalid())?;
    let right: u32 = right.trim().parse().map_err(|_| invalid())?;
    Ok(format!("{}-{}", left, right))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upcoming(match_id: &str) -> UpcomingSeries {
        UpcomingSeries {
            match_id: match_id.to_string(),
            start_time: "2024-10-20T08:00:00Z".to_string(),
            team1_code: "T1".to_string(),
            team1_name: "T1".to_string(),
            team2_code: "BLG".to_string(),
            team2_name: "Bilibili Gaming".to_string(),
        }
    }

    fn result(match_id: &str, winner: &str, score: &str) -> CompletedSeries {
        CompletedSeries {
            match_id: match_id.to_string(),
            winner_code: winner.to_string(),
            score: score.to_string(),
        }
    }

    #[test]
    fn test_make_prediction_validates_input() {
        let mut tracker = PredictionTracker::new();
        assert!(tracker.make_prediction(&upcoming("m1"), "GEN", "3-1").is_err());
        assert!(tracker.make_prediction(&upcoming("m1"), "T1", "three").is_err());
        assert!(tracker.make_prediction(&upcoming("m1"), "T1", "3").is_err());

        let prediction = tracker.make_prediction(&upcoming("m1"), "T1", " 3 - 2").unwrap();
        assert_eq!(prediction.predicted_score, "3-2");
        assert!(prediction.prediction_id.starts_with("pred_"));
        assert_eq!(tracker.predictions().len(), 1);
    }

    #[test]
    fn test_resolve_and_stats() {
        let mut tracker = PredictionTracker::new();
        tracker.make_prediction(&upcoming("m1"), "T1", "3-1").unwrap();
        tracker.make_prediction(&upcoming("m2"), "BLG", "3-0").unwrap();
        tracker.make_prediction(&upcoming("m3"), "T1", "3-2").unwrap();

        let empty = tracker.stats();
        assert_eq!(empty.pending, 3);
        assert_eq!(empty.winner_accuracy, 0.0);

        let updated = tracker.resolve(&[result("m1", "T1", "3-1"), result("m2", "T1", "3-2")]);
        assert_eq!(updated, 2);

        let stats = tracker.stats();
        assert_eq!(stats.total_predictions, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.winner_correct, 1);
        assert_eq!(stats.score_correct, 1);
        assert_eq!(stats.winner_accuracy, 50.0);
    }

    #[test]
    fn test_resolved_predictions_are_not_rescored() {
        let mut tracker = PredictionTracker::new();
        tracker.make_prediction(&upcoming("m1"), "T1", "3-1").unwrap();

        assert_eq!(tracker.resolve(&[result("m1", "T1", "3-1")]), 1);
        assert_eq!(tracker.resolve(&[result("m1", "BLG", "0-3")]), 0);
        assert_eq!(tracker.predictions()[0].actual_winner.as_deref(), Some("T1"));
    }

    #[test]
    fn test_make_prediction_returns_the_logged_entry() {
        let mut tracker = PredictionTracker::new();
        let first = tracker.make_prediction(&upcoming("m1"), "T1", "3-1").unwrap();
        let second = tracker.make_prediction(&upcoming("m2"), "BLG", "3-0").unwrap();

        assert_eq!(tracker.predictions(), &[first.clone(), second.clone()]);
        assert_ne!(first.prediction_id, second.prediction_id);
        assert!(!second.is_resolved());
    }

    #[test]
    fn test_log_with_naive_created_at_loads() {
        let raw = r#"[{
            "prediction_id": "pred_1_20240601080000",
            "match_id": "m1",
            "match_date": "2024-06-02T09:00:00Z",
            "team1_code": "T1", "team1_name": "T1",
            "team2_code": "BLG", "team2_name": "Bilibili Gaming",
            "predicted_winner": "T1",
            "predicted_score": "3-1",
            "created_at": "2024-06-01T08:00:00.123456",
            "actual_winner": null, "actual_score": null,
            "winner_correct": null, "score_correct": null
        }]"#;
        let predictions: Vec<UserPrediction> = serde_json::from_str(raw).unwrap();
        assert_eq!(
            Some(predictions[0].created_at),
            crate::utils::parse_timestamp("2024-06-01T08:00:00.123456Z")
        );
        assert!(!predictions[0].is_resolved());

        let garbled = raw.replace("2024-06-01T08:00:00.123456", "soon");
        assert!(serde_json::from_str::<Vec<UserPrediction>>(&garbled).is_err());
    }
}
