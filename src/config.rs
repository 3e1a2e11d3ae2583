// Configuration management for the NBA predictor

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Simulation engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// League-average adjusted defensive rating used for defense factors
    #[serde(default = "default_league_average_rating")]
    pub league_average_rating: f64,
    #[serde(default = "default_simulations")]
    pub simulations: usize,
    #[serde(default = "default_bin_width")]
    pub bin_width: u32,
    /// Run aggregation trials across threads
    #[serde(default)]
    pub parallel: bool,
    /// Fixed seed for reproducible predictions; OS entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Reject unknown live period labels instead of assuming a full game remains
    #[serde(default = "default_true")]
    pub reject_unknown_periods: bool,
}

/// Minutes allocation sanity thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinutesConfig {
    #[serde(default = "default_target_total")]
    pub target_total: f64,
    #[serde(default = "default_warning_tolerance")]
    pub warning_tolerance: f64,
    #[serde(default = "default_danger_tolerance")]
    pub danger_tolerance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub minutes: MinutesConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default value functions
fn default_league_average_rating() -> f64 { 100.0 }
fn default_simulations() -> usize { 1000 }
fn default_bin_width() -> u32 { 5 }
fn default_true() -> bool { true }
fn default_target_total() -> f64 { 240.0 }
fn default_warning_tolerance() -> f64 { 10.0 }
fn default_danger_tolerance() -> f64 { 20.0 }
fn default_db_path() -> String { "data/predictor.db".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            league_average_rating: default_league_average_rating(),
            simulations: default_simulations(),
            bin_width: default_bin_width(),
            parallel: false,
            seed: None,
            reject_unknown_periods: true,
        }
    }
}

impl Default for MinutesConfig {
    fn default() -> Self {
        Self {
            target_total: default_target_total(),
            warning_tolerance: default_warning_tolerance(),
            danger_tolerance: default_danger_tolerance(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            minutes: MinutesConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            info!("📁 Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Load configuration from file, or fall back to defaults without writing anything
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.engine.league_average_rating.is_finite() && self.engine.league_average_rating > 0.0) {
            return Err(ConfigError::Validation("league_average_rating must be positive".to_string()));
        }

        if self.engine.simulations == 0 {
            return Err(ConfigError::Validation("simulations must be greater than 0".to_string()));
        }

        if self.engine.bin_width == 0 {
            return Err(ConfigError::Validation("bin_width must be greater than 0".to_string()));
        }

        if self.minutes.target_total <= 0.0 {
            return Err(ConfigError::Validation("target_total must be positive".to_string()));
        }

        if self.minutes.warning_tolerance < 0.0 || self.minutes.danger_tolerance < 0.0 {
            return Err(ConfigError::Validation("minutes tolerances must be non-negative".to_string()));
        }

        if self.minutes.danger_tolerance < self.minutes.warning_tolerance {
            return Err(ConfigError::Validation(
                "danger_tolerance must not be smaller than warning_tolerance".to_string(),
            ));
        }

        if self.database.db_path.trim().is_empty() {
            return Err(ConfigError::Validation("db_path must not be empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.league_average_rating, 100.0);
        assert_eq!(config.engine.simulations, 1000);
        assert_eq!(config.engine.bin_width, 5);
        assert!(config.engine.reject_unknown_periods);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.minutes.target_total, 240.0);
        assert_eq!(config.database.db_path, "data/predictor.db");
        assert!(config.engine.seed.is_none());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.engine.league_average_rating = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.engine.simulations = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.minutes.danger_tolerance = 5.0;
        assert!(config.validate().is_err());
    }
}
