//! Checkball model tuning CLI
//!
//! Replays past games to score the weighted-factor model and tune its weights.

use clap::{Parser, Subcommand};
use checkball::{Config, Result};

#[derive(Parser)]
#[command(name = "checkball")]
#[command(about = "Tune weighted-factor game predictions against past results", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,
    /// Score the configured weights against past games
    Evaluate {
        /// Games file (JSON), overrides the config
        #[arg(long)]
        games: Option<String>,
    },
    /// Search for better weights
    Optimize {
        /// Games file (JSON), overrides the config
        #[arg(long)]
        games: Option<String>,
        /// Number of improvements to list
        #[arg(long, default_value = "5")]
        top: usize,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Show a team's recent form
    Form {
        /// Team display name
        team: String,
        /// Games file (JSON), overrides the config
        #[arg(long)]
        games: Option<String>,
        /// Only use games before this instant (RFC 3339, default now)
        #[arg(long)]
        before: Option<String>,
    },
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Evaluate { games } => commands::evaluate(&config, games),
        Commands::Optimize { games, top, format } => {
            commands::optimize(&config, games, top, format)
        }
        Commands::Form {
            team,
            games,
            before,
        } => commands::form(&config, &team, games, before),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use checkball::data::{games::parse_game_date, GameSeries};
    use checkball::features::FormCalculator;
    use checkball::training::{AccuracyEvaluator, WeightSearch};
    use checkball::CheckballError;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Export completed games to {}", config.data.games_path);
        println!("  2. Run 'checkball evaluate' to score the current weights");
        println!("  3. Run 'checkball optimize' to search for better weights");

        Ok(())
    }

    fn load_games(config: &Config, games: Option<String>) -> Result<GameSeries> {
        let path = games.unwrap_or_else(|| config.data.games_path.clone());
        let series = GameSeries::load_json(&path)?.of_sport(config.data.sport);
        log::info!("{} {} games in {}", series.len(), config.data.sport, path);
        Ok(series)
    }

    fn form_calculator(config: &Config) -> FormCalculator {
        FormCalculator::new(config.form.window_size, config.form.min_games)
    }

    pub fn evaluate(config: &Config, games: Option<String>) -> Result<()> {
        let series = load_games(config, games)?;
        let evaluator = AccuracyEvaluator::new(form_calculator(config));

        match evaluator.evaluate(&series, &config.weights) {
            Some(result) => {
                println!("Model performance ({} games)", series.len());
                println!("───────────────────────────────");
                println!(
                    "  Accuracy:          {:.1}% ({}/{})",
                    result.accuracy * 100.0,
                    result.correct,
                    result.total
                );
                println!("  Avg score error:   {:.1} points", result.avg_score_error);
                println!("  Avg prob error:    {:.1}%", result.avg_prob_error);
            }
            None => println!("No game had enough prior history on both sides to score."),
        }

        Ok(())
    }

    pub fn optimize(
        config: &Config,
        games: Option<String>,
        top: usize,
        format: OutputFormat,
    ) -> Result<()> {
        let series = load_games(config, games)?;
        if series.len() < config.data.min_training_games {
            return Err(CheckballError::InsufficientGames {
                found: series.len(),
                required: config.data.min_training_games,
            });
        }

        let search = WeightSearch::new(
            AccuracyEvaluator::new(form_calculator(config)),
            config.search.ranges.clone(),
        );
        let outcome = search.run(&series, &config.weights);

        if let OutputFormat::Json = format {
            println!("{}", serde_json::to_string_pretty(&outcome.best_weights)?);
            return Ok(());
        }

        if let Some(baseline) = &outcome.baseline {
            println!("Current model: {}", baseline);
        }

        if outcome.improvements.is_empty() {
            println!("\nCurrent weights are already optimal for this dataset.");
        } else {
            println!("\nTop improvements:");
            for imp in outcome.top_improvements(top) {
                println!(
                    "  {}: {} -> {:.1}% (+{:.1}%)",
                    imp.param,
                    imp.value,
                    imp.accuracy * 100.0,
                    imp.improvement * 100.0
                );
            }
        }

        println!("\nOptimized model");
        println!("───────────────────────────────");
        println!("  Accuracy: {:.1}%", outcome.best_accuracy * 100.0);
        for (param, value) in outcome.best_weights.sorted_entries() {
            println!("  {:<16}{}", param.name(), value);
        }

        Ok(())
    }

    pub fn form(
        config: &Config,
        team: &str,
        games: Option<String>,
        before: Option<String>,
    ) -> Result<()> {
        let series = load_games(config, games)?;
        let cutoff = match before {
            Some(raw) => parse_game_date(&raw)
                .ok_or_else(|| CheckballError::Parse(format!("invalid date: {}", raw)))?,
            None => chrono::Utc::now(),
        };

        let Some(form) = form_calculator(config).form(&series, team, cutoff) else {
            println!(
                "{} has fewer than {} games before {}",
                team, config.form.min_games, cutoff
            );
            return Ok(());
        };

        println!("{} form before {}", team, cutoff);
        println!("───────────────────────────────");
        println!("  Games:         {}", form.games_played);
        println!("  Win rate:      {:.0}%", form.win_rate * 100.0);
        println!("  Home win rate: {:.0}%", form.home_win_rate * 100.0);
        println!("  Away win rate: {:.0}%", form.away_win_rate * 100.0);
        println!(
            "  Avg score:     {:.1} - {:.1}",
            form.avg_score, form.avg_opponent_score
        );
        println!("  FG%:           {:.1}", form.avg_fg_pct);
        println!("  3PT%:          {:.1}", form.avg_3pt_pct);
        println!("  Assists:       {:.1}", form.avg_assists);
        println!("  Rebounds:      {:.1}", form.avg_rebounds);
        println!("  Turnovers:     {:.1}", form.avg_turnovers);

        Ok(())
    }
}
