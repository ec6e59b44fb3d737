//! Rolling form aggregation
//!
//! Every team gets monotonically growing counters plus a FIFO window of its
//! most recent outcomes. Once the window is full, recording an outcome
//! evicts the oldest one. Recent form therefore reflects insertion order:
//! callers must feed outcomes chronologically for "recent" to mean anything.

use crate::config::FormConfig;
use crate::form::statistics::{TeamStats, NEUTRAL_RATE};
use crate::types::{Outcome, TeamId};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Read-only view of long-run win rates consumed by the prediction engine
pub trait WinRateSource {
    /// Long-run win rate, or `None` when the team has no recorded games
    fn long_run_win_rate(&self, team_id: &str) -> Option<f64>;
}

/// Form state for one team
#[derive(Debug, Clone)]
pub struct FormRecord {
    pub stats: TeamStats,
    window: VecDeque<Outcome>,
}

impl FormRecord {
    fn new(stats: TeamStats, capacity: usize) -> Self {
        Self {
            stats,
            window: VecDeque::with_capacity(capacity),
        }
    }

    /// Recent outcomes, oldest first
    pub fn window(&self) -> impl Iterator<Item = Outcome> + '_ {
        self.window.iter().copied()
    }

    /// Window rendered as a token string, e.g. "WWLW"
    pub fn window_string(&self) -> String {
        self.window.iter().map(|o| o.to_string()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormAggregator {
    records: HashMap<TeamId, FormRecord>,
    config: FormConfig,
}

impl FormAggregator {
    pub fn new(config: FormConfig) -> Self {
        Self {
            records: HashMap::new(),
            config,
        }
    }

    /// Rebuild long-run counters from persisted statistics.
    ///
    /// Rolling windows are not persisted, so they start empty.
    pub fn from_team_stats(
        config: FormConfig,
        stats: impl IntoIterator<Item = TeamStats>,
    ) -> Self {
        let mut aggregator = Self::new(config);
        for team in stats {
            let capacity = aggregator.config.window_size;
            aggregator
                .records
                .insert(team.team_id.clone(), FormRecord::new(team, capacity));
        }
        debug!("Rebuilt form aggregator for {} teams", aggregator.len());
        aggregator
    }

    /// Set display name and code for a team, creating an empty record
    pub fn register_team(&mut self, team_id: &str, name: &str, code: &str) {
        let record = self.record_mut(team_id);
        record.stats.team_name = name.to_string();
        record.stats.team_code = code.to_string();
    }

    /// Record one series result in the counters and the rolling window
    pub fn record_outcome(&mut self, team_id: &str, won: bool) {
        let window_size = self.config.window_size;
        let record = self.record_mut(team_id);
        record.stats.record(won);
        record.window.push_back(Outcome::from_won(won));
        while record.window.len() > window_size {
            record.window.pop_front();
        }
    }

    /// Long-run win rate; neutral for teams without games
    pub fn win_rate(&self, team_id: &str) -> f64 {
        self.records
            .get(team_id)
            .map(|record| record.stats.win_rate())
            .unwrap_or(NEUTRAL_RATE)
    }

    /// Win fraction over the last `min(k, window length)` outcomes
    pub fn recent_form(&self, team_id: &str, k: usize) -> f64 {
        let Some(record) = self.records.get(team_id) else {
            return NEUTRAL_RATE;
        };

        let take = k.min(record.window.len());
        if take == 0 {
            return NEUTRAL_RATE;
        }

        let wins = record
            .window
            .iter()
            .rev()
            .take(take)
            .filter(|outcome| outcome.is_win())
            .count();
        wins as f64 / take as f64
    }

    /// Recent form over the configured default length
    pub fn recent_form_default(&self, team_id: &str) -> f64 {
        self.recent_form(team_id, self.config.recent_matches)
    }

    pub fn record(&self, team_id: &str) -> Option<&FormRecord> {
        self.records.get(team_id)
    }

    /// Snapshot of long-run statistics for every tracked team
    pub fn team_stats(&self) -> HashMap<TeamId, TeamStats> {
        self.records
            .iter()
            .map(|(id, record)| (id.clone(), record.stats.clone()))
            .collect()
    }

    /// Teams with at least `min_games` ordered by win rate, then games played
    pub fn top_by_win_rate(&self, min_games: u32, n: usize) -> Vec<&TeamStats> {
        let mut teams: Vec<&TeamStats> = self
            .records
            .values()
            .map(|record| &record.stats)
            .filter(|stats| stats.games_played >= min_games)
            .collect();

        teams.sort_by(|a, b| {
            b.win_rate()
                .partial_cmp(&a.win_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.games_played.cmp(&a.games_played))
                .then_with(|| a.team_id.cmp(&b.team_id))
        });
        teams.truncate(n);
        teams
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_mut(&mut self, team_id: &str) -> &mut FormRecord {
        let capacity = self.config.window_size;
        self.records
            .entry(team_id.to_string())
            .or_insert_with(|| FormRecord::new(TeamStats::new(team_id, "", ""), capacity))
    }
}

impl WinRateSource for FormAggregator {
    fn long_run_win_rate(&self, team_id: &str) -> Option<f64> {
        self.records
            .get(team_id)
            .filter(|record| record.stats.has_games())
            .map(|record| record.stats.win_rate())
    }
}

impl WinRateSource for HashMap<TeamId, TeamStats> {
    fn long_run_win_rate(&self, team_id: &str) -> Option<f64> {
        self.get(team_id)
            .filter(|stats| stats.has_games())
            .map(TeamStats::win_rate)
    }
}
