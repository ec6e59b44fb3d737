//! Per-team rating storage
//!
//! Ratings are created lazily: a team that has never been rated reads as the
//! configured initial rating, and reading never inserts it.

use crate::config::RatingConfig;
use crate::rating::calculator::{EloCalculator, RatingUpdate};
use crate::types::TeamId;
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    ratings: HashMap<TeamId, f64>,
    calculator: EloCalculator,
}

impl RatingStore {
    pub fn new(config: RatingConfig) -> Self {
        Self {
            ratings: HashMap::new(),
            calculator: EloCalculator::new(config),
        }
    }

    /// Current rating, or the initial rating for an unseen team
    pub fn get(&self, team_id: &str) -> f64 {
        self.ratings
            .get(team_id)
            .copied()
            .unwrap_or(self.calculator.config().initial_rating)
    }

    /// Whether the team has been rated at least once
    pub fn contains(&self, team_id: &str) -> bool {
        self.ratings.contains_key(team_id)
    }

    pub fn expected_score(&self, rating_a: f64, rating_b: f64) -> f64 {
        EloCalculator::expected_score(rating_a, rating_b)
    }

    /// Win probabilities of both teams from their current ratings
    pub fn predict(&self, team_a: &str, team_b: &str) -> (f64, f64) {
        let rating_a = self.get(team_a);
        let rating_b = self.get(team_b);
        (
            self.expected_score(rating_a, rating_b),
            self.expected_score(rating_b, rating_a),
        )
    }

    /// Apply the result of a decided series
    pub fn update_ratings(&mut self, winner_id: &str, loser_id: &str, margin: u32) -> RatingUpdate {
        let update = self
            .calculator
            .rate(self.get(winner_id), self.get(loser_id), margin);

        self.ratings.insert(winner_id.to_string(), update.winner_after);
        self.ratings.insert(loser_id.to_string(), update.loser_after);

        trace!(
            "Rated {} {:.1} -> {:.1}, {} {:.1} -> {:.1} (k={:.1})",
            winner_id,
            update.winner_before,
            update.winner_after,
            loser_id,
            update.loser_before,
            update.loser_after,
            update.adjusted_k
        );

        update
    }

    pub fn ratings(&self) -> &HashMap<TeamId, f64> {
        &self.ratings
    }

    /// Replace every stored rating, e.g. when restoring a saved model
    pub fn replace_all(&mut self, ratings: HashMap<TeamId, f64>) {
        self.ratings = ratings;
    }

    /// Highest rated teams first; ties broken by id for a stable order
    pub fn rankings(&self, top_n: usize) -> Vec<(TeamId, f64)> {
        let mut entries: Vec<(TeamId, f64)> = self
            .ratings
            .iter()
            .map(|(id, rating)| (id.clone(), *rating))
            .collect();

        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries.truncate(top_n);
        entries
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
