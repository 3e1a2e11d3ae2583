// NBA Game Predictor Library
//
// Reconciles two seasons of player and team statistics and runs Monte Carlo
// game simulations for full games and games in progress

pub mod types;
pub mod config;
pub mod db;          // SQLite stat store
pub mod error;       // Unified error handling
pub mod import;      // CSV import
pub mod minutes;
pub mod progress;
pub mod reconciler;
pub mod simulation;
pub mod validation;  // Pre-flight validation

// Re-export core types
pub use types::{
    GameScore, LiveGameState, MergedProfile, Period, PlayerRecord, Provenance, RecordKind, TeamRecord, Vintage,
};

// Re-export error types
pub use error::{PredictorError, PredictorResult};

// Re-export configuration
pub use config::{Config, ConfigError, DatabaseConfig, EngineConfig, LoggingConfig, MinutesConfig};

// Re-export database types
pub use db::{CombinedData, Database, ImportLogEntry, SqliteStatStore, StatService, StatStore};

pub use import::{import_file, read_players, read_teams, ImportSummary};
pub use minutes::{parse_override, MinutesAllocation, MinutesStatus, TeamMinutes};
pub use progress::{SimulationProgress, Spinner};
pub use reconciler::{merge_players, merge_teams, DataSource};

// Re-export simulation components
pub use simulation::{
    AggregateResult, LiveWinProbability, Matchup, ProgressSink, RandomSource, ScoreDistribution, SimulationEngine,
};

pub use validation::{PredictionValidator, ValidationCheck, ValidationLevel, ValidationResult};
