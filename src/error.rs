//! Unified error handling for the NBA predictor
//!
//! One error type for the CLI, the stat store and the engine boundary,
//! with actionable messages for the cases a user can fix.

use std::fmt;
use std::io;

/// Main error type for the predictor
#[derive(Debug)]
pub enum PredictorError {
    // Configuration errors
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // Database errors
    DatabaseConnection(String),
    DatabaseQuery(String),
    DatabaseMigration(String),
    DatabaseConstraint(String),

    // Missing-data errors
    NoData,
    TeamNotFound(String),

    // Malformed-input errors
    InvalidParameter(String, String), // (parameter_name, reason)
    InvalidClock(String),
    InvalidPeriod(String),
    InvalidScore(String),
    SameTeam(String),
    ValidationFailed(String),

    // Import errors
    ImportParse(String),

    // IO errors
    FileNotFound(String),
    FileRead(String),
    FileWrite(String),

    // General errors
    Internal(String),
}

impl PredictorError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            PredictorError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: nba-predictor init\n\
                    2. Try again",
                    path
                )
            }
            PredictorError::NoData => {
                "No statistical data available.\n\n\
                💡 Import data first:\n\
                1. nba-predictor import current teams teams.csv\n\
                2. nba-predictor import current players players.csv"
                    .to_string()
            }
            PredictorError::TeamNotFound(team) => {
                format!(
                    "Team data not found: {}\n\n\
                    💡 Options:\n\
                    1. Check the spelling with: nba-predictor teams\n\
                    2. Import team data for the current or PS-1 season",
                    team
                )
            }
            PredictorError::InvalidClock(raw) => {
                format!(
                    "Invalid time remaining: '{}'\n\n\
                    💡 Enter time remaining in MM:SS format (e.g., 05:30)",
                    raw
                )
            }
            PredictorError::InvalidPeriod(raw) => {
                format!(
                    "Unrecognized period: '{}'\n\n\
                    💡 Use 1, 2, 3, 4 for quarters or OT1, OT2, ... for overtime",
                    raw
                )
            }
            PredictorError::SameTeam(team) => {
                format!(
                    "Home and away teams cannot be the same: {}\n\n\
                    💡 Select two different teams",
                    team
                )
            }
            PredictorError::DatabaseConnection(msg) => {
                format!(
                    "Database connection failed: {}\n\n\
                    💡 Try:\n\
                    1. Run: nba-predictor init\n\
                    2. Check data/ directory permissions",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            PredictorError::ConfigNotFound(_)
            | PredictorError::ConfigParse(_)
            | PredictorError::ConfigValidation(_) => "config",

            PredictorError::DatabaseConnection(_)
            | PredictorError::DatabaseQuery(_)
            | PredictorError::DatabaseMigration(_)
            | PredictorError::DatabaseConstraint(_) => "database",

            PredictorError::NoData | PredictorError::TeamNotFound(_) => "missing-data",

            PredictorError::InvalidParameter(_, _)
            | PredictorError::InvalidClock(_)
            | PredictorError::InvalidPeriod(_)
            | PredictorError::InvalidScore(_)
            | PredictorError::SameTeam(_)
            | PredictorError::ValidationFailed(_) => "input",

            PredictorError::ImportParse(_) => "import",

            PredictorError::FileNotFound(_)
            | PredictorError::FileRead(_)
            | PredictorError::FileWrite(_) => "io",

            PredictorError::Internal(_) => "internal",
        }
    }

    /// Whether the user can fix this by changing their input or imported data
    pub fn is_user_correctable(&self) -> bool {
        matches!(self.category(), "missing-data" | "input" | "config" | "import")
    }
}

impl fmt::Display for PredictorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictorError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            PredictorError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            PredictorError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }

            PredictorError::DatabaseConnection(msg) => {
                write!(f, "Database connection error: {}", msg)
            }
            PredictorError::DatabaseQuery(msg) => {
                write!(f, "Database query error: {}", msg)
            }
            PredictorError::DatabaseMigration(msg) => {
                write!(f, "Database migration error: {}", msg)
            }
            PredictorError::DatabaseConstraint(msg) => {
                write!(f, "Database constraint violation: {}", msg)
            }

            PredictorError::NoData => {
                write!(f, "No data available, please import data")
            }
            PredictorError::TeamNotFound(team) => {
                write!(f, "Team data not found: {}", team)
            }

            PredictorError::InvalidParameter(param, reason) => {
                write!(f, "Invalid parameter '{}': {}", param, reason)
            }
            PredictorError::InvalidClock(raw) => {
                write!(f, "Invalid time remaining '{}': expected MM:SS", raw)
            }
            PredictorError::InvalidPeriod(raw) => {
                write!(f, "Unrecognized period '{}'", raw)
            }
            PredictorError::InvalidScore(msg) => {
                write!(f, "Invalid score: {}", msg)
            }
            PredictorError::SameTeam(team) => {
                write!(f, "Home and away teams cannot be the same: {}", team)
            }
            PredictorError::ValidationFailed(msg) => {
                write!(f, "Validation failed: {}", msg)
            }

            PredictorError::ImportParse(msg) => {
                write!(f, "CSV parsing error: {}", msg)
            }

            PredictorError::FileNotFound(path) => {
                write!(f, "File not found: {}", path)
            }
            PredictorError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            PredictorError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }

            PredictorError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for PredictorError {}

// Conversion implementations for common error types

impl From<io::Error> for PredictorError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => PredictorError::FileNotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => PredictorError::FileRead(err.to_string()),
            _ => PredictorError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<rusqlite::Error> for PredictorError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE constraint") || msg.contains("CHECK constraint") {
                    PredictorError::DatabaseConstraint(msg)
                } else {
                    PredictorError::DatabaseQuery(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => {
                PredictorError::DatabaseQuery("Query returned no rows".to_string())
            }
            _ => PredictorError::DatabaseQuery(err.to_string()),
        }
    }
}

impl From<csv::Error> for PredictorError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            PredictorError::FileRead(err.to_string())
        } else {
            PredictorError::ImportParse(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PredictorError {
    fn from(err: serde_json::Error) -> Self {
        PredictorError::FileWrite(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for PredictorError {
    fn from(err: toml::de::Error) -> Self {
        PredictorError::ConfigParse(format!("TOML parse error: {}", err))
    }
}

impl From<crate::config::ConfigError> for PredictorError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::FileRead(msg) => PredictorError::FileRead(msg),
            ConfigError::FileWrite(msg) => PredictorError::FileWrite(msg),
            ConfigError::Parse(msg) => PredictorError::ConfigParse(msg),
            ConfigError::Serialize(msg) => PredictorError::Internal(msg),
            ConfigError::Validation(msg) => PredictorError::ConfigValidation(msg),
        }
    }
}

impl From<String> for PredictorError {
    fn from(msg: String) -> Self {
        PredictorError::Internal(msg)
    }
}

impl From<&str> for PredictorError {
    fn from(msg: &str) -> Self {
        PredictorError::Internal(msg.to_string())
    }
}

/// Result type alias using PredictorError
pub type PredictorResult<T> = Result<T, PredictorError>;
