//! Match data source interface
//!
//! The remote esports API is an external collaborator. Its records are
//! modelled here with the same field names so snapshots of real responses
//! deserialize directly. `StaticMatchSource` serves such a snapshot from
//! memory.

use crate::error::{PredictorError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: String,
    #[serde(default)]
    pub slug: String,
}

/// Series result from one team's side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResult {
    /// "win" or "loss" once decided
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub game_wins: u32,
}

impl TeamResult {
    pub fn is_win(&self) -> bool {
        self.outcome.as_deref() == Some("win")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTeam {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub result: Option<TeamResult>,
}

impl EventTeam {
    pub fn won(&self) -> bool {
        self.result.as_ref().is_some_and(TeamResult::is_win)
    }

    pub fn game_wins(&self) -> u32 {
        self.result.as_ref().map_or(0, |r| r.game_wins)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMatch {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub teams: Vec<EventTeam>,
}

/// A scheduled or completed event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub start_time: String,
    #[serde(default, rename = "match")]
    pub match_info: Option<EventMatch>,
}

/// Interface to the remote match data source
pub trait MatchSource {
    /// All leagues the source knows about
    fn leagues(&self) -> Result<Vec<League>>;

    /// Tournaments of a league, most recent first
    fn tournaments_for_league(&self, league_id: &str) -> Result<Vec<Tournament>>;

    /// Completed events of a tournament, in source order
    fn completed_events(&self, tournament_id: &str) -> Result<Vec<Event>>;
}

/// Snapshot file layout served by `StaticMatchSource`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub leagues: Vec<LeagueSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    #[serde(flatten)]
    pub league: League,
    #[serde(default)]
    pub tournaments: Vec<TournamentSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    #[serde(flatten)]
    pub tournament: Tournament,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// In-memory match source
#[derive(Debug, Clone, Default)]
pub struct StaticMatchSource {
    leagues: Vec<League>,
    tournaments: HashMap<String, Vec<Tournament>>,
    events: HashMap<String, Vec<Event>>,
}

impl StaticMatchSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_league(&mut self, league: League) {
        self.leagues.push(league);
    }

    pub fn add_tournament(&mut self, league_id: &str, tournament: Tournament) {
        self.tournaments
            .entry(league_id.to_string())
            .or_default()
            .push(tournament);
    }

    pub fn add_events(&mut self, tournament_id: &str, events: Vec<Event>) {
        self.events
            .entry(tournament_id.to_string())
            .or_default()
            .extend(events);
    }

    pub fn from_snapshot(snapshot: SourceSnapshot) -> Self {
        let mut source = Self::new();
        for entry in snapshot.leagues {
            let league_id = entry.league.id.clone();
            source.add_league(entry.league);
            for tournament in entry.tournaments {
                let tournament_id = tournament.tournament.id.clone();
                source.add_tournament(&league_id, tournament.tournament);
                source.add_events(&tournament_id, tournament.events);
            }
        }
        source
    }

    /// Load a JSON snapshot of the source
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source snapshot {}", path.display()))?;
        let snapshot: SourceSnapshot =
            serde_json::from_str(&raw).map_err(|e| PredictorError::DataSourceFailed {
                message: format!("invalid snapshot {}: {}", path.display(), e),
            })?;
        Ok(Self::from_snapshot(snapshot))
    }
}

impl MatchSource for StaticMatchSource {
    fn leagues(&self) -> Result<Vec<League>> {
        Ok(self.leagues.clone())
    }

    fn tournaments_for_league(&self, league_id: &str) -> Result<Vec<Tournament>> {
        Ok(self.tournaments.get(league_id).cloned().unwrap_or_default())
    }

    fn completed_events(&self, tournament_id: &str) -> Result<Vec<Event>> {
        Ok(self.events.get(tournament_id).cloned().unwrap_or_default())
    }
}
