// NBA Game Predictor - CLI
// Single entry point for data management and game predictions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nba_predictor::{Config, ConfigError, PredictorError, PredictorResult, RecordKind, Vintage};
use tracing::{error, info, warn, Level};

// Load command modules from cli directory
#[path = "../cli/data_commands.rs"]
mod data_commands;
#[path = "../cli/predict_commands.rs"]
mod predict_commands;

#[derive(Parser)]
#[command(name = "nba-predictor")]
#[command(version = "0.3.0")]
#[command(about = "NBA game predictor with Monte Carlo simulation", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "predictor.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and database
    Init,

    /// Import a season CSV, replacing that record set
    Import {
        /// Season: current or ps1
        season: Vintage,

        /// Record set: players or teams
        kind: RecordKind,

        /// CSV file to import
        file: PathBuf,
    },

    /// Delete one imported record set
    Delete {
        /// Season: current or ps1
        season: Vintage,

        /// Record set: players or teams
        kind: RecordKind,
    },

    /// Show data source, record counts and recent imports
    Status,

    /// List merged team profiles
    Teams {
        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List merged player profiles
    Players {
        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,

        /// Only players on this team
        #[arg(short, long)]
        team: Option<String>,
    },

    /// Show a team's roster and minutes allocation
    Roster {
        team: String,

        /// Minutes override, e.g. --min "Jimmy Butler=34" (repeatable)
        #[arg(long = "min")]
        minutes: Vec<String>,
    },

    /// Predict a full game
    Predict {
        home: String,
        away: String,

        /// Number of simulations
        #[arg(short = 'n', long)]
        simulations: Option<usize>,

        /// Seed for a reproducible prediction
        #[arg(long)]
        seed: Option<u64>,

        /// Home minutes override "Name=minutes" (repeatable)
        #[arg(long = "home-min")]
        home_minutes: Vec<String>,

        /// Away minutes override "Name=minutes" (repeatable)
        #[arg(long = "away-min")]
        away_minutes: Vec<String>,

        /// Write a JSON report to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Win probability for a game in progress
    Live {
        home: String,
        away: String,

        /// Period: 1-4, Q1-Q4 or OT1, OT2, ...
        #[arg(long)]
        period: String,

        /// Time left in the period, MM:SS
        #[arg(long)]
        clock: String,

        #[arg(long, allow_hyphen_values = true)]
        home_score: String,

        #[arg(long, allow_hyphen_values = true)]
        away_score: String,

        /// Number of simulations
        #[arg(short = 'n', long)]
        simulations: Option<usize>,

        /// Seed for a reproducible prediction
        #[arg(long)]
        seed: Option<u64>,

        /// Home minutes override "Name=minutes" (repeatable)
        #[arg(long = "home-min")]
        home_minutes: Vec<String>,

        /// Away minutes override "Name=minutes" (repeatable)
        #[arg(long = "away-min")]
        away_minutes: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config is read before logging so [logging] level can apply; errors surface after
    let config = Config::load_or_default(&cli.config);
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config
            .as_ref()
            .ok()
            .and_then(|c| c.logging.level.parse::<Level>().ok())
            .unwrap_or(Level::INFO)
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    info!("🏀 NBA Predictor v0.3.0");

    if let Err(e) = run(cli, config).await {
        error!("❌ {}", e.user_message());
        error!("   ({} error)", e.category());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Result<Config, ConfigError>) -> PredictorResult<()> {
    match cli.command {
        // Init doesn't require a valid config (it creates it)
        Commands::Init => init_workspace(&cli.config),
        command => {
            let config = config.map_err(PredictorError::from)?;
            info!("📁 Config: {}", cli.config);
            dispatch(command, &config).await
        }
    }
}

async fn dispatch(command: Commands, config: &Config) -> PredictorResult<()> {
    match command {
        Commands::Init => Ok(()),
        Commands::Import { season, kind, file } => {
            data_commands::import_data(season, kind, &file, config).await
        }
        Commands::Delete { season, kind } => data_commands::delete_data(season, kind, config),
        Commands::Status => data_commands::show_status(config),
        Commands::Teams { search } => data_commands::list_teams(search.as_deref(), config),
        Commands::Players { search, team } => {
            data_commands::list_players(search.as_deref(), team.as_deref(), config)
        }
        Commands::Roster { team, minutes } => data_commands::show_roster(&team, &minutes, config),
        Commands::Predict {
            home,
            away,
            simulations,
            seed,
            home_minutes,
            away_minutes,
            json,
        } => {
            let request = predict_commands::PredictRequest {
                home,
                away,
                simulations,
                seed,
                home_overrides: home_minutes,
                away_overrides: away_minutes,
            };
            predict_commands::predict_game(request, json, config).await
        }
        Commands::Live {
            home,
            away,
            period,
            clock,
            home_score,
            away_score,
            simulations,
            seed,
            home_minutes,
            away_minutes,
        } => {
            let request = predict_commands::PredictRequest {
                home,
                away,
                simulations,
                seed,
                home_overrides: home_minutes,
                away_overrides: away_minutes,
            };
            predict_commands::predict_live(request, &period, &clock, &home_score, &away_score, config).await
        }
    }
}

fn init_workspace(config_path: &str) -> PredictorResult<()> {
    use std::fs;

    info!("🔧 Initializing workspace...");

    let config = if std::path::Path::new(config_path).exists() {
        warn!("⚠️  {} already exists, skipping", config_path);
        Config::from_file(config_path)?
    } else {
        let default_config = include_str!("../../config.toml.example");
        fs::write(config_path, default_config)
            .map_err(|e| PredictorError::FileWrite(format!("{}: {}", config_path, e)))?;
        info!("📝 Created {}", config_path);
        Config::from_file(config_path)?
    };

    let service = data_commands::open_service(&config)?;
    let source = service.data_source()?;
    info!("💾 Database ready: {}", config.database.db_path);

    info!("✅ Workspace initialized successfully!");
    info!("📊 Data source: {}", source.description());
    info!("💡 Next steps:");
    info!("   1. nba-predictor import current teams teams.csv");
    info!("   2. nba-predictor import current players players.csv");
    info!("   3. nba-predictor predict \"Boston Celtics\" \"Miami Heat\"");

    Ok(())
}
