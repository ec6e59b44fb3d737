//! Match collector
//!
//! Walks leagues and tournaments of a `MatchSource`, keeps only events that
//! resolve to exactly one winner, and turns them into `MatchRecord`s. Each
//! record is stamped with both teams' win rate and recent form as they stood
//! before the match; the match is then counted into the form aggregator.

use crate::collect::dataset::Dataset;
use crate::collect::source::{Event, EventTeam, MatchSource, Tournament};
use crate::config::FormConfig;
use crate::error::Result;
use crate::form::FormAggregator;
use crate::types::MatchRecord;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct DataCollector {
    form: FormAggregator,
}

impl DataCollector {
    pub fn new(config: FormConfig) -> Self {
        Self {
            form: FormAggregator::new(config),
        }
    }

    /// Continue collecting on top of previously aggregated form
    pub fn with_form(form: FormAggregator) -> Self {
        Self { form }
    }

    pub fn form(&self) -> &FormAggregator {
        &self.form
    }

    pub fn into_form(self) -> FormAggregator {
        self.form
    }

    /// Collect the most recent `num_tournaments` tournaments of a league.
    ///
    /// An unknown league slug yields no matches rather than an error.
    pub fn collect_league(
        &mut self,
        source: &dyn MatchSource,
        league_slug: &str,
        num_tournaments: usize,
    ) -> Result<Vec<MatchRecord>> {
        info!("Finding league: {}", league_slug);

        let leagues = source.leagues()?;
        let Some(league) = leagues.iter().find(|l| l.slug == league_slug) else {
            warn!("League '{}' not found", league_slug);
            return Ok(Vec::new());
        };
        info!("Found: {}", league.name);

        let tournaments = source.tournaments_for_league(&league.id)?;
        info!("Found {} tournaments", tournaments.len());

        let mut matches = Vec::new();
        for tournament in tournaments.iter().take(num_tournaments) {
            matches.extend(self.collect_tournament(source, tournament)?);
        }
        Ok(matches)
    }

    /// Collect several leagues; a failing league is logged and skipped
    pub fn collect_leagues(
        &mut self,
        source: &dyn MatchSource,
        league_slugs: &[String],
        num_tournaments: usize,
    ) -> Vec<MatchRecord> {
        let mut all_matches = Vec::new();
        for slug in league_slugs {
            match self.collect_league(source, slug, num_tournaments) {
                Ok(matches) => all_matches.extend(matches),
                Err(e) => warn!("Error collecting {}: {:#}", slug, e),
            }
        }
        all_matches
    }

    pub fn collect_tournament(
        &mut self,
        source: &dyn MatchSource,
        tournament: &Tournament,
    ) -> Result<Vec<MatchRecord>> {
        let tournament_name = if tournament.slug.is_empty() {
            "unknown"
        } else {
            tournament.slug.as_str()
        };
        debug!("Processing: {}", tournament_name);

        let events = source.completed_events(&tournament.id)?;
        let matches: Vec<MatchRecord> = events
            .iter()
            .filter_map(|event| self.process_event(event, &tournament.id, tournament_name))
            .collect();

        info!(
            "Collected {} of {} events from {}",
            matches.len(),
            events.len(),
            tournament_name
        );
        Ok(matches)
    }

    /// Turn one event into a record, or `None` if it has no single winner
    fn process_event(
        &mut self,
        event: &Event,
        tournament_id: &str,
        tournament_name: &str,
    ) -> Option<MatchRecord> {
        let info = event.match_info.as_ref()?;
        let [team1, team2, ..] = info.teams.as_slice() else {
            return None;
        };
        if team1.id.is_empty() || team2.id.is_empty() {
            debug!("Skipping event {} with unidentified teams", info.id);
            return None;
        }

        let winner = match (team1.won(), team2.won()) {
            (true, false) => team1,
            (false, true) => team2,
            _ => {
                debug!("Skipping event {} without a single winner", info.id);
                return None;
            }
        };

        let record = MatchRecord {
            match_id: info.id.clone(),
            tournament_id: tournament_id.to_string(),
            tournament_name: tournament_name.to_string(),
            date: event.start_time.clone(),
            team1_id: team1.id.clone(),
            team1_name: team1.name.clone(),
            team1_code: team1.code.clone(),
            team2_id: team2.id.clone(),
            team2_name: team2.name.clone(),
            team2_code: team2.code.clone(),
            winner_id: winner.id.clone(),
            winner_code: winner.code.clone(),
            team1_score: team1.game_wins(),
            team2_score: team2.game_wins(),
            num_games: team1.game_wins() + team2.game_wins(),
            team1_win_rate: self.form.win_rate(&team1.id),
            team2_win_rate: self.form.win_rate(&team2.id),
            team1_recent_form: self.form.recent_form_default(&team1.id),
            team2_recent_form: self.form.recent_form_default(&team2.id),
        };

        self.record_team(team1);
        self.record_team(team2);

        Some(record)
    }

    fn record_team(&mut self, team: &EventTeam) {
        self.form.register_team(&team.id, &team.name, &team.code);
        self.form.record_outcome(&team.id, team.won());
    }

    /// Package collected matches with the current statistics
    pub fn dataset(&self, matches: Vec<MatchRecord>) -> Dataset {
        Dataset::new(matches, self.form.team_stats())
    }
}
