//! Main entry point for the Series Oracle command-line tool
//!
//! Collects match data from a source snapshot, trains the predictor,
//! answers head-to-head queries and keeps a log of user predictions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use series_oracle::collect::{DataCollector, Dataset, StaticMatchSource};
use series_oracle::config::AppConfig;
use series_oracle::engine::PredictionEngine;
use series_oracle::error::PredictorError;
use series_oracle::persistence::{load_into, save_model};
use series_oracle::tracker::{CompletedSeries, PredictionTracker, UpcomingSeries};
use series_oracle::utils::{format_percent, format_prediction, format_record, rule};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Series Oracle - Esports series win probability predictor
#[derive(Parser)]
#[command(
    name = "series-oracle",
    version,
    about = "Predict best-of-N esports series from Elo, head-to-head and form",
    long_about = "Series Oracle collects completed series, rates teams with a margin-scaled \
                 Elo system and blends ratings, head-to-head records and long-run win rates \
                 into a win probability for any two teams."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Data directory override
    #[arg(long, global = true, value_name = "DIR", help = "Override data directory")]
    data_dir: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect completed series from a source snapshot into the dataset
    Collect {
        /// JSON snapshot of the match source
        #[arg(long, value_name = "FILE")]
        snapshot: PathBuf,

        /// League slugs to collect
        #[arg(default_values_t = ["lck".to_string(), "lpl".to_string(), "lec".to_string(), "lcs".to_string()])]
        leagues: Vec<String>,

        /// Most recent tournaments per league
        #[arg(long, default_value_t = 3)]
        tournaments: usize,
    },

    /// Train on the collected dataset and save the model
    Train,

    /// Predict a series between two teams
    Predict {
        /// First team (name, code or id)
        team1: String,
        /// Second team (name, code or id)
        team2: String,
    },

    /// Show teams ordered by rating
    Rankings {
        #[arg(long, default_value_t = 20)]
        top: usize,
    },

    /// Record your own pick for an upcoming series
    Track {
        match_id: String,
        team1_code: String,
        team2_code: String,
        /// Code of the team you expect to win
        winner: String,
        /// Expected series score, e.g. 2-1
        score: String,
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long)]
        team1_name: Option<String>,
        #[arg(long)]
        team2_name: Option<String>,
    },

    /// Score pending picks against a JSON list of completed series
    Resolve {
        #[arg(value_name = "FILE")]
        results: PathBuf,
    },

    /// Show your prediction history and accuracy
    Stats,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    config.apply_overrides(args.log_level.as_deref(), args.debug, args.data_dir.as_deref())?;
    Ok(config)
}

fn run_collect(
    config: &AppConfig,
    snapshot: &Path,
    leagues: &[String],
    tournaments: usize,
) -> Result<()> {
    let source = StaticMatchSource::from_file(snapshot)?;
    let mut collector = DataCollector::new(config.form.clone());

    let matches = collector.collect_leagues(&source, leagues, tournaments);
    let dataset = collector.dataset(matches);
    dataset.save(config.dataset_path())?;

    println!("{}", rule(60));
    println!("Collection Summary");
    println!("{}", rule(60));
    println!("Total matches collected: {}", dataset.num_matches);
    println!("Unique teams: {}", dataset.team_stats.len());

    println!("\nTop 10 Teams by Win Rate:");
    for team in collector.form().top_by_win_rate(5, 10) {
        println!(
            "  {}: {} ({})",
            team.team_name,
            format_percent(team.win_rate()),
            format_record(team.wins, team.losses)
        );
    }
    Ok(())
}

/// Train a fresh engine from the dataset on disk
fn train_engine(config: &AppConfig, dataset: &Dataset) -> Result<PredictionEngine> {
    if dataset.is_empty() {
        return Err(anyhow::anyhow!(
            "No match data found at {}. Run `series-oracle collect` first",
            config.dataset_path().display()
        ));
    }

    let form = dataset.form_aggregator(config.form.clone());
    let mut engine = PredictionEngine::new(config);
    let report = engine.train(&dataset.matches, &form);
    info!(
        "Trained on {} matches covering {} teams",
        report.matches_processed, report.teams_known
    );
    Ok(engine)
}

/// Load the saved model, training one when none exists yet
fn ready_engine(config: &AppConfig) -> Result<PredictionEngine> {
    let dataset = Dataset::load(config.dataset_path())?;
    let mut engine = PredictionEngine::new(config);

    if load_into(&mut engine, config.model_path())? {
        info!("Using saved model");
        let form = dataset.form_aggregator(config.form.clone());
        engine.refresh_win_rates(&form);
        return Ok(engine);
    }

    let engine = train_engine(config, &dataset)?;
    save_model(&engine, config.model_path())?;
    Ok(engine)
}

fn resolve_team(engine: &PredictionEngine, query: &str) -> Result<String> {
    engine.find_team_id(query).ok_or_else(|| {
        PredictorError::TeamNotFound {
            query: query.to_string(),
        }
        .into()
    })
}

fn run_predict(config: &AppConfig, team1: &str, team2: &str) -> Result<()> {
    let engine = ready_engine(config)?;
    let team1_id = resolve_team(&engine, team1)?;
    let team2_id = resolve_team(&engine, team2)?;

    let prediction = engine.predict(&team1_id, &team2_id);
    let head_to_head = engine.head_to_head(&team1_id, &team2_id);
    println!("{}", format_prediction(&prediction, head_to_head));
    Ok(())
}

fn run_rankings(config: &AppConfig, top: usize) -> Result<()> {
    let engine = ready_engine(config)?;

    println!("{}", rule(60));
    println!("Team Power Rankings (by Elo)");
    println!("{}", rule(60));
    for (i, (team_name, rating)) in engine.rankings(top).into_iter().enumerate() {
        println!("  {:2}. {}: {:.0}", i + 1, team_name, rating);
    }
    Ok(())
}

fn run_stats(config: &AppConfig) -> Result<()> {
    let tracker = PredictionTracker::load(config.predictions_path())?;
    if tracker.predictions().is_empty() {
        println!("No predictions yet!");
        return Ok(());
    }

    println!("{}", rule(60));
    println!("YOUR PREDICTIONS");
    println!("{}", rule(60));
    for prediction in tracker.predictions() {
        let status = match prediction.winner_correct {
            Some(true) => "[correct]",
            Some(false) => "[wrong]",
            None => "[pending]",
        };
        println!(
            "\n  {} vs {} {}",
            prediction.team1_code, prediction.team2_code, status
        );
        println!(
            "    Your pick: {} ({})",
            prediction.predicted_winner, prediction.predicted_score
        );
        if let (Some(winner), Some(score)) = (&prediction.actual_winner, &prediction.actual_score)
        {
            println!("    Actual:    {} ({})", winner, score);
        }
    }

    let stats = tracker.stats();
    println!("\n{}", rule(60));
    println!(
        "Total: {}  Completed: {}  Pending: {}",
        stats.total_predictions, stats.completed, stats.pending
    );
    if stats.completed > 0 {
        println!(
            "Winner accuracy: {:.1}%  Exact score accuracy: {:.1}%",
            stats.winner_accuracy, stats.score_accuracy
        );
    }
    Ok(())
}

fn run(args: Args, config: AppConfig) -> Result<()> {
    match args.command {
        Command::Collect {
            snapshot,
            leagues,
            tournaments,
        } => run_collect(&config, &snapshot, &leagues, tournaments),
        Command::Train => {
            let dataset = Dataset::load(config.dataset_path())?;
            let engine = train_engine(&config, &dataset)?;
            save_model(&engine, config.model_path())
        }
        Command::Predict { team1, team2 } => run_predict(&config, &team1, &team2),
        Command::Rankings { top } => run_rankings(&config, top),
        Command::Track {
            match_id,
            team1_code,
            team2_code,
            winner,
            score,
            date,
            team1_name,
            team2_name,
        } => {
            let series = UpcomingSeries {
                match_id,
                start_time: date,
                team1_name: team1_name.unwrap_or_else(|| team1_code.clone()),
                team2_name: team2_name.unwrap_or_else(|| team2_code.clone()),
                team1_code,
                team2_code,
            };
            let mut tracker = PredictionTracker::load(config.predictions_path())?;
            tracker.make_prediction(&series, &winner, &score)?;
            tracker.save(config.predictions_path())
        }
        Command::Resolve { results } => {
            let raw = std::fs::read_to_string(&results)
                .with_context(|| format!("Failed to read results {}", results.display()))?;
            let completed: Vec<CompletedSeries> = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse results {}", results.display()))?;

            let mut tracker = PredictionTracker::load(config.predictions_path())?;
            let updated = tracker.resolve(&completed);
            if updated == 0 {
                warn!("No pending predictions matched the supplied results");
            }
            tracker.save(config.predictions_path())
        }
        Command::Stats => run_stats(&config),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args, config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
