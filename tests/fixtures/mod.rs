//! Shared builders for integration tests

#![allow(dead_code)]

use series_oracle::collect::{
    Event, EventMatch, EventTeam, League, StaticMatchSource, TeamResult, Tournament,
};
use series_oracle::types::MatchRecord;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Build a decided series; the team with more game wins is the winner
pub fn series(
    match_id: &str,
    date: &str,
    team1: &str,
    team2: &str,
    team1_score: u32,
    team2_score: u32,
) -> MatchRecord {
    let winner = if team1_score > team2_score { team1 } else { team2 };
    MatchRecord {
        match_id: match_id.to_string(),
        tournament_id: "tournament".to_string(),
        tournament_name: "test_split".to_string(),
        date: date.to_string(),
        team1_id: team1.to_string(),
        team1_name: display_name(team1),
        team1_code: team1.to_uppercase(),
        team2_id: team2.to_string(),
        team2_name: display_name(team2),
        team2_code: team2.to_uppercase(),
        winner_id: winner.to_string(),
        winner_code: winner.to_uppercase(),
        team1_score,
        team2_score,
        num_games: team1_score + team2_score,
        team1_win_rate: 0.0,
        team2_win_rate: 0.0,
        team1_recent_form: 0.0,
        team2_recent_form: 0.0,
    }
}

/// Display name used by `series` for a team id
pub fn display_name(team_id: &str) -> String {
    format!("Team {}", team_id.to_uppercase())
}

/// A round robin season where `strong` beats everyone and the rest split
pub fn season(strong: &str, others: &[&str], rounds: usize) -> Vec<MatchRecord> {
    let mut matches = Vec::new();
    let mut day = 0;
    for round in 0..rounds {
        for (i, other) in others.iter().enumerate() {
            day += 1;
            matches.push(series(
                &format!("r{}_{}", round, other),
                &format!("2024-{:02}-{:02}T10:00:00Z", 1 + day / 28, 1 + day % 28),
                strong,
                other,
                2,
                (i % 2) as u32,
            ));
        }
    }
    matches
}

pub fn event_team(id: &str, won: bool, game_wins: u32) -> EventTeam {
    EventTeam {
        id: id.to_string(),
        name: display_name(id),
        code: id.to_uppercase(),
        result: Some(TeamResult {
            outcome: Some(if won { "win" } else { "loss" }.to_string()),
            game_wins,
        }),
    }
}

pub fn event(match_id: &str, start_time: &str, teams: Vec<EventTeam>) -> Event {
    Event {
        start_time: start_time.to_string(),
        match_info: Some(EventMatch {
            id: match_id.to_string(),
            teams,
        }),
    }
}

/// Single-league source with one tournament holding `events`
pub fn source_with(league_slug: &str, events: Vec<Event>) -> StaticMatchSource {
    let league_id = format!("{}_id", league_slug);
    let tournament_id = format!("{}_split", league_slug);

    let mut source = StaticMatchSource::new();
    source.add_league(League {
        id: league_id.clone(),
        slug: league_slug.to_string(),
        name: league_slug.to_uppercase(),
    });
    source.add_tournament(
        &league_id,
        Tournament {
            id: tournament_id.clone(),
            slug: tournament_id.clone(),
        },
    );
    source.add_events(&tournament_id, events);
    source
}

/// Scratch directory removed on drop
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("series-oracle-{}", Uuid::new_v4()));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
