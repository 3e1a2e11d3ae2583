// Common test utilities and helpers
#![allow(dead_code)]

use nba_predictor::{Config, PlayerRecord, TeamMinutes, TeamRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a test configuration pointing at `db_path`, seeded for reproducibility
pub fn create_test_config(db_path: &Path) -> Config {
    let mut config = Config::default();
    config.database.db_path = db_path.to_string_lossy().into_owned();
    config.engine.seed = Some(42);
    config
}

/// Create a temporary directory for test databases
pub fn create_temp_db_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    (temp_dir, db_path)
}

/// Write `content` to `name` inside `dir` and return the path
pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write CSV");
    path
}

/// Eight players at 30 minutes each (240 total) averaging `ppg` points
pub fn balanced_roster(team: &str, ppg: f64) -> Vec<PlayerRecord> {
    (1..=8)
        .map(|i| PlayerRecord::new(format!("{} Player {}", team, i), team).with_scoring(30.0, ppg))
        .collect()
}

/// Default minutes for every player on `team`
pub fn default_minutes(team: &str, roster: &[PlayerRecord]) -> TeamMinutes {
    roster
        .iter()
        .filter(|p| p.team == team)
        .map(|p| (p.player.clone(), p.default_minutes()))
        .collect()
}

pub fn team(name: &str, rating: f64) -> TeamRecord {
    TeamRecord::new(name, Some(rating))
}

pub const CURRENT_TEAMS_CSV: &str = "\
Team,Team Abbreviation,Adjusted Defensive Rating
Boston Celtics,BOS,108.0
Miami Heat,MIA,112.0
";

pub const PS1_TEAMS_CSV: &str = "\
Team,Team Abbreviation,Adjusted Defensive Rating
Boston Celtics,BOS,110.0
Miami Heat,MIA,110.0
Denver Nuggets,DEN,111.5
";

pub const CURRENT_PLAYERS_CSV: &str = "\
Player,Team,Pos,MP,PTS,FGA,3PA,2PA,FTA,FG%,3P%,2P%,FT%
Jayson Tatum,Boston Celtics,SF,36.0,27.0,20.1,8.5,11.6,7.0,47.1%,37.6%,55.0%,83.3%
Jaylen Brown,Boston Celtics,SG,34.0,23.0,17.8,5.8,12.0,5.2,49.9%,35.4%,57.1%,70.3%
Derrick White,Boston Celtics,PG,32.0,15.2,11.3,6.6,4.7,2.3,46.1%,39.6%,55.5%,90.1%
Kristaps Porzingis,Boston Celtics,C,30.0,20.1,14.5,5.1,9.4,5.0,51.6%,37.5%,59.9%,85.8%
Jrue Holiday,Boston Celtics,PG,33.0,12.5,10.0,4.4,5.6,1.4,48.0%,42.9%,52.6%,83.3%
Al Horford,Boston Celtics,C,27.0,8.6,7.0,4.7,2.3,0.6,51.1%,41.9%,69.5%,86.7%
Sam Hauser,Boston Celtics,F,22.0,9.0,7.1,6.0,1.1,0.3,45.0%,42.4%,60.3%,90.0%
Payton Pritchard,Boston Celtics,PG,22.0,9.6,8.0,4.5,3.5,0.8,46.8%,38.5%,57.0%,82.9%
Jimmy Butler,Miami Heat,SF,34.0,20.8,13.1,2.0,11.1,7.6,49.9%,41.4%,51.9%,85.8%
Bam Adebayo,Miami Heat,C,34.0,19.3,15.2,0.2,15.0,5.7,52.1%,35.7%,52.2%,75.5%
Tyler Herro,Miami Heat,SG,34.0,20.8,17.4,7.7,9.7,2.1,44.1%,39.6%,48.0%,85.7%
Terry Rozier,Miami Heat,PG,33.0,16.4,14.3,6.0,8.3,2.7,42.6%,35.3%,48.1%,82.4%
Duncan Robinson,Miami Heat,SF,28.0,12.9,9.5,6.9,2.6,1.3,46.1%,39.8%,62.0%,83.2%
Jaime Jaquez Jr.,Miami Heat,SF,28.0,11.9,9.1,2.3,6.8,2.6,48.9%,32.2%,54.4%,80.9%
Caleb Martin,Miami Heat,F,27.0,10.0,7.9,3.4,4.5,1.3,43.1%,35.1%,49.0%,81.6%
Kevin Love,Miami Heat,PF,22.0,8.8,6.5,3.5,3.0,1.5,45.0%,34.4%,56.2%,83.3%
";

pub const PS1_PLAYERS_CSV: &str = "\
Player,Team,Pos,MP,PTS
Jayson Tatum,Boston Celtics,SF,36.9,30.1
Jimmy Butler,Miami Heat,SF,33.4,22.9
Nikola Jokic,Denver Nuggets,C,33.7,24.5
";
