//! Integration tests for the series-oracle predictor
//!
//! These tests drive the public API end to end:
//! - Training and querying the prediction engine
//! - Model save/load through the filesystem
//! - Collection from a static match source into a dataset
//! - User prediction tracking and configuration loading

mod fixtures;

use series_oracle::collect::{DataCollector, Dataset};
use series_oracle::config::{AppConfig, FormConfig};
use series_oracle::engine::{EnginePhase, PredictionEngine};
use series_oracle::error::PredictorError;
use series_oracle::form::{FormAggregator, WinRateSource};
use series_oracle::persistence::{load_into, load_model, save_model};
use series_oracle::tracker::{CompletedSeries, PredictionTracker, UpcomingSeries};
use series_oracle::types::{
    Confidence, MatchRecord, FACTOR_ELO, FACTOR_HEAD_TO_HEAD, FACTOR_WIN_RATE,
};
use std::fs;
use std::path::PathBuf;

use fixtures::{display_name, event, event_team, season, series, source_with, TempDir};

/// Form aggregated from the records, in the order given
fn form_from(matches: &[MatchRecord]) -> FormAggregator {
    let mut form = FormAggregator::new(FormConfig::default());
    for record in matches {
        form.record_outcome(&record.team1_id, record.team1_won());
        form.record_outcome(&record.team2_id, !record.team1_won());
    }
    form
}

fn trained(matches: &[MatchRecord]) -> PredictionEngine {
    let mut engine = PredictionEngine::new(&AppConfig::default());
    engine.train(matches, &form_from(matches));
    engine
}

#[test]
fn test_unseen_teams_are_a_coin_flip() {
    let engine = PredictionEngine::new(&AppConfig::default());
    let prediction = engine.predict("x", "y");

    assert_eq!(prediction.team1_win_probability, 0.5);
    assert_eq!(prediction.team2_win_probability, 0.5);
    assert_eq!(prediction.confidence, Confidence::Low);
    assert!(prediction.has_factor(FACTOR_ELO));
    assert!(!prediction.has_factor(FACTOR_HEAD_TO_HEAD));
    assert!(!prediction.has_factor(FACTOR_WIN_RATE));
    // Exact tie goes to the second team
    assert_eq!(prediction.predicted_winner, "y");
    assert_eq!(engine.phase(), EnginePhase::Untrained);
}

#[test]
fn test_three_sweeps_separate_ratings() {
    let matches = vec![
        series("m1", "2024-01-01", "x", "y", 2, 0),
        series("m2", "2024-01-02", "x", "y", 2, 0),
        series("m3", "2024-01-03", "x", "y", 2, 0),
    ];
    let engine = trained(&matches);

    assert!(engine.rating("x") > engine.rating("y"));
    assert!(engine.rating("x") > 1500.0);
    assert!(engine.rating("y") < 1500.0);
    assert_eq!(engine.head_to_head("x", "y"), (3, 0));
    assert_eq!(engine.head_to_head("y", "x"), (0, 3));
}

#[test]
fn test_training_order_is_chronological() {
    let chronological = vec![
        series("m1", "2024-01-01", "a", "b", 2, 1),
        series("m2", "2024-01-02", "b", "c", 2, 0),
        series("m3", "2024-01-03", "c", "a", 2, 1),
    ];
    let mut shuffled = chronological.clone();
    shuffled.reverse();

    let forward = trained(&chronological);
    let backward = trained(&shuffled);
    for team in ["a", "b", "c"] {
        assert_eq!(forward.rating(team), backward.rating(team));
    }
}

#[test]
fn test_training_report_validates_after_warmup() {
    let matches = season("t1", &["gen", "hle", "dk", "kt"], 6);
    let mut engine = PredictionEngine::new(&AppConfig::default());
    let report = engine.train(&matches, &form_from(&matches));

    assert_eq!(report.matches_processed, 24);
    assert_eq!(report.validation_attempted, 4);
    assert_eq!(report.accuracy(), Some(1.0));
    assert_eq!(report.teams_known, 5);
    assert_eq!(report.teams_with_win_rate, 5);
    assert!(engine.is_trained());
}

#[test]
fn test_short_history_skips_validation() {
    let matches = season("t1", &["gen", "hle"], 3);
    let mut engine = PredictionEngine::new(&AppConfig::default());
    let report = engine.train(&matches, &form_from(&matches));

    assert_eq!(report.validation_attempted, 0);
    assert_eq!(report.accuracy(), None);
}

#[test]
fn test_dominant_team_is_a_confident_favourite() {
    let matches = season("t1", &["gen", "hle", "dk", "kt"], 6);
    let engine = trained(&matches);

    let prediction = engine.predict("t1", "gen");
    assert_eq!(prediction.predicted_winner, display_name("t1"));
    assert!(prediction.team1_win_probability > 0.8);
    assert_eq!(prediction.confidence, Confidence::High);
    assert_eq!(prediction.factors.len(), 3);
    assert_eq!(prediction.factors[FACTOR_HEAD_TO_HEAD], 1.0);
    assert_eq!(
        prediction.team1_win_probability + prediction.team2_win_probability,
        1.0
    );

    let reversed = engine.predict("gen", "t1");
    assert_eq!(reversed.predicted_winner, display_name("t1"));
    assert_eq!(reversed.factors[FACTOR_HEAD_TO_HEAD], 0.0);
}

#[test]
fn test_find_team_and_rankings() {
    let matches = season("t1", &["gen", "hle"], 2);
    let engine = trained(&matches);

    assert_eq!(engine.find_team_id("team gen").as_deref(), Some("gen"));
    assert_eq!(engine.find_team_id("HLE").as_deref(), Some("hle"));
    assert_eq!(engine.find_team_id("nobody"), None);

    let rankings = engine.rankings(10);
    assert_eq!(rankings.len(), 3);
    assert_eq!(rankings[0].0, display_name("t1"));
    assert!(rankings[0].1 >= rankings[1].1 && rankings[1].1 >= rankings[2].1);
}

#[test]
fn test_model_round_trip() {
    let dir = TempDir::new();
    let path = dir.join("model.json");
    let matches = season("t1", &["gen", "hle", "dk"], 4);
    let engine = trained(&matches);

    save_model(&engine, &path).unwrap();
    assert!(!dir.join("model.json.tmp").exists());

    let mut restored = PredictionEngine::new(&AppConfig::default());
    assert!(load_into(&mut restored, &path).unwrap());

    assert_eq!(restored.ratings().ratings(), engine.ratings().ratings());
    assert_eq!(restored.names(), engine.names());
    assert_eq!(restored.history().records(), engine.history().records());
    assert!(restored.win_rates().is_empty());

    restored.refresh_win_rates(&form_from(&matches));
    assert_eq!(restored.predict("gen", "dk"), engine.predict("gen", "dk"));
}

#[test]
fn test_missing_model_is_not_an_error() {
    let dir = TempDir::new();
    let mut engine = PredictionEngine::new(&AppConfig::default());

    assert!(!load_into(&mut engine, dir.join("absent.json")).unwrap());
    assert!(load_model(dir.join("absent.json")).unwrap().is_none());
    assert_eq!(engine.phase(), EnginePhase::Untrained);
}

#[test]
fn test_malformed_model_leaves_engine_untouched() {
    let dir = TempDir::new();
    let path = dir.join("model.json");
    let engine_matches = vec![series("m1", "2024-01-01", "a", "b", 2, 0)];
    let mut engine = trained(&engine_matches);
    let before = engine.rating("a");

    for raw in [
        r#"{"ratings": {"a": "high"}}"#,
        r#"{"names": {"a": "Alpha"}}"#,
        r#"{"ratings": {"a": 1500.0}, "extra": true}"#,
        r#"{"ratings": {}, "pairwise": {"b": {"a": [1, 0]}}}"#,
        "not json",
    ] {
        fs::write(&path, raw).unwrap();
        let err = load_into(&mut engine, &path).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<PredictorError>(),
                Some(PredictorError::MalformedModel { .. })
            ),
            "expected a malformed model error for {}",
            raw
        );
    }

    assert_eq!(engine.rating("a"), before);
    assert_eq!(engine.head_to_head("a", "b"), (1, 0));
}

#[test]
fn test_older_model_keys_load() {
    let dir = TempDir::new();
    let path = dir.join("model.json");
    fs::write(
        &path,
        r#"{
            "elo_ratings": {"a": 1516.0, "b": 1484.0},
            "team_names": {"a": "Alpha", "b": "Bravo"},
            "h2h_records": {"a": {"b": [2, 1]}}
        }"#,
    )
    .unwrap();

    let mut engine = PredictionEngine::new(&AppConfig::default());
    assert!(load_into(&mut engine, &path).unwrap());
    assert_eq!(engine.rating("a"), 1516.0);
    assert_eq!(engine.head_to_head("b", "a"), (1, 2));
    assert_eq!(engine.display_name("b"), "Bravo");
}

#[test]
fn test_collect_train_predict_pipeline() {
    let dir = TempDir::new();
    let source = source_with(
        "lck",
        vec![
            event(
                "m1",
                "2024-06-01T08:00:00Z",
                vec![event_team("t1", true, 2), event_team("gen", false, 1)],
            ),
            event(
                "m2",
                "2024-06-02T08:00:00Z",
                vec![event_team("gen", true, 2), event_team("hle", false, 0)],
            ),
            event(
                "m3",
                "2024-06-03T08:00:00Z",
                vec![event_team("t1", true, 2), event_team("hle", false, 0)],
            ),
        ],
    );

    let mut collector = DataCollector::new(FormConfig::default());
    let matches = collector.collect_leagues(&source, &["lck".to_string(), "lpl".to_string()], 3);
    assert_eq!(matches.len(), 3);
    // Pre-match stamps reflect only earlier series
    assert_eq!(matches[0].team1_win_rate, 0.5);
    assert_eq!(matches[2].team1_win_rate, 1.0);
    assert_eq!(matches[2].team2_win_rate, 0.0);

    let path = dir.join("match_data.json");
    collector.dataset(matches).save(&path).unwrap();
    let dataset = Dataset::load(&path).unwrap();
    assert_eq!(dataset.num_matches, 3);
    assert_eq!(dataset.team_stats["t1"].wins, 2);

    let form = dataset.form_aggregator(FormConfig::default());
    assert_eq!(form.long_run_win_rate("hle"), Some(0.0));

    let mut engine = PredictionEngine::new(&AppConfig::default());
    engine.train(&dataset.matches, &form);
    let prediction = engine.predict("t1", "hle");
    assert_eq!(prediction.predicted_winner, display_name("t1"));
    assert!(prediction.has_factor(FACTOR_WIN_RATE));
}

#[test]
fn test_malformed_dataset_is_reported() {
    let dir = TempDir::new();
    let path = dir.join("match_data.json");
    fs::write(&path, r#"{"matches": 12}"#).unwrap();

    let err = Dataset::load(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PredictorError>(),
        Some(PredictorError::MalformedDataset { .. })
    ));
    assert!(Dataset::load(dir.join("absent.json")).unwrap().is_empty());
}

#[test]
fn test_prediction_tracker_persists() {
    let dir = TempDir::new();
    let path = dir.join("predictions.json");
    let upcoming = UpcomingSeries {
        match_id: "final".to_string(),
        start_time: "2024-11-02T08:00:00Z".to_string(),
        team1_code: "T1".to_string(),
        team1_name: "T1".to_string(),
        team2_code: "BLG".to_string(),
        team2_name: "Bilibili Gaming".to_string(),
    };

    let mut tracker = PredictionTracker::load(&path).unwrap();
    tracker.make_prediction(&upcoming, "T1", "3-2").unwrap();
    tracker.save(&path).unwrap();

    let mut reloaded = PredictionTracker::load(&path).unwrap();
    assert_eq!(reloaded.predictions(), tracker.predictions());

    let updated = reloaded.resolve(&[CompletedSeries {
        match_id: "final".to_string(),
        winner_code: "T1".to_string(),
        score: "3-2".to_string(),
    }]);
    assert_eq!(updated, 1);

    let stats = reloaded.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.winner_accuracy, 100.0);
    assert_eq!(stats.score_accuracy, 100.0);

    fs::write(&path, "[{").unwrap();
    let err = PredictionTracker::load(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PredictorError>(),
        Some(PredictorError::MalformedPredictionLog { .. })
    ));
}

#[test]
fn test_config_file_loading() {
    let dir = TempDir::new();
    let path = dir.join("config.toml");
    fs::write(
        &path,
        r#"
        [service]
        data_dir = "/var/lib/series-oracle"

        [rating]
        k_factor = 40.0

        [prediction.weights]
        elo = 0.6
        head_to_head = 0.2
        win_rate = 0.2
        "#,
    )
    .unwrap();

    let config = AppConfig::from_file(&path).unwrap();
    assert_eq!(config.rating.k_factor, 40.0);
    assert_eq!(config.prediction.weights.elo, 0.6);
    assert_eq!(
        config.model_path(),
        PathBuf::from("/var/lib/series-oracle/model.json")
    );

    fs::write(&path, "[prediction.weights]\nelo = 0.9\n").unwrap();
    assert!(AppConfig::from_file(&path).is_err());
}
