// Common types shared by the reconciler, the simulation engine and the stat store

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two independently imported data snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vintage {
    Current, // Current season
    Ps1,     // Prior season (PS-1)
}

impl Vintage {
    pub const ALL: [Vintage; 2] = [Vintage::Current, Vintage::Ps1];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vintage::Current => "current",
            Vintage::Ps1 => "ps1",
        }
    }
}

impl fmt::Display for Vintage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vintage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(Vintage::Current),
            "ps1" | "ps-1" => Ok(Vintage::Ps1),
            other => Err(format!("unknown season '{}' (expected current or ps1)", other)),
        }
    }
}

/// Which statistical record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Players,
    Teams,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Players, RecordKind::Teams];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Players => "players",
            RecordKind::Teams => "teams",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "players" | "player" => Ok(RecordKind::Players),
            "teams" | "team" => Ok(RecordKind::Teams),
            other => Err(format!("unknown record kind '{}' (expected players or teams)", other)),
        }
    }
}

/// Per-game season line for one player. Numeric fields are absent, never zero, when unknown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player: String,
    pub team: String,
    pub position: Option<String>,
    pub minutes: Option<f64>, // MP
    pub points: Option<f64>,  // PTS
    pub fga: Option<f64>,
    pub three_pa: Option<f64>,
    pub two_pa: Option<f64>,
    pub fta: Option<f64>,
    pub fg_pct: Option<f64>,    // fractions in [0,1]
    pub three_pct: Option<f64>,
    pub two_pct: Option<f64>,
    pub ft_pct: Option<f64>,
}

impl PlayerRecord {
    pub fn new(player: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            team: team.into(),
            ..Default::default()
        }
    }

    pub fn with_scoring(mut self, minutes: f64, points: f64) -> Self {
        self.minutes = Some(minutes);
        self.points = Some(points);
        self
    }

    /// Minutes used when no override exists: historical MP rounded
    pub fn default_minutes(&self) -> f64 {
        self.minutes
            .filter(|mp| mp.is_finite() && *mp > 0.0)
            .map(f64::round)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: String,
    pub abbreviation: Option<String>,
    /// Opponent scoring is scaled by league average / this rating
    pub adjusted_defensive_rating: Option<f64>,
}

impl TeamRecord {
    pub fn new(team: impl Into<String>, rating: Option<f64>) -> Self {
        Self {
            team: team.into(),
            abbreviation: None,
            adjusted_defensive_rating: rating,
        }
    }
}

/// Which vintage(s) a merged profile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Current,
    Ps1,
    Merged,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Current => "current",
            Provenance::Ps1 => "ps1",
            Provenance::Merged => "merged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedProfile<T> {
    pub record: T,
    pub source: Provenance,
}

impl<T> MergedProfile<T> {
    pub fn new(record: T, source: Provenance) -> Self {
        Self { record, source }
    }
}

impl<T> AsRef<T> for MergedProfile<T> {
    fn as_ref(&self) -> &T {
        &self.record
    }
}

/// Strip provenance tags, keeping order
pub fn into_records<T>(profiles: Vec<MergedProfile<T>>) -> Vec<T> {
    profiles.into_iter().map(|p| p.record).collect()
}

/// A single simulated game result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    pub home_score: u32,
    pub away_score: u32,
}

impl GameScore {
    pub fn home_won(&self) -> bool {
        self.home_score > self.away_score
    }

    pub fn away_won(&self) -> bool {
        self.away_score > self.home_score
    }
}

/// Game clock period for the live predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Quarter(u8),  // 1..=4
    Overtime(u8), // 1-based
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Quarter(q) => write!(f, "Q{}", q),
            Period::Overtime(n) => write!(f, "OT{}", n),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    /// Accepts "1".."4", "Q1".."Q4" and "OT1", "OT2", ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_uppercase();
        let quarter = label.strip_prefix('Q').unwrap_or(&label);

        if let Ok(q) = quarter.parse::<u8>() {
            if (1..=4).contains(&q) {
                return Ok(Period::Quarter(q));
            }
        }

        if let Some(ot) = label.strip_prefix("OT") {
            if let Ok(n) = ot.parse::<u8>() {
                if n >= 1 {
                    return Ok(Period::Overtime(n));
                }
            }
        }

        Err(format!("unrecognized period '{}'", s.trim()))
    }
}

/// In-progress game state consumed by the live predictor
#[derive(Debug, Clone, PartialEq)]
pub struct LiveGameState {
    /// Raw period label as entered; parsed by the engine
    pub period: String,
    pub seconds_remaining: u32,
    pub home_score: u32,
    pub away_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parsing() {
        assert_eq!("1".parse::<Period>(), Ok(Period::Quarter(1)));
        assert_eq!("q4".parse::<Period>(), Ok(Period::Quarter(4)));
        assert_eq!("OT2".parse::<Period>(), Ok(Period::Overtime(2)));
        assert!("5".parse::<Period>().is_err());
        assert!("OT".parse::<Period>().is_err());
        assert!("OT0".parse::<Period>().is_err());
        assert!("halftime".parse::<Period>().is_err());
    }

    #[test]
    fn test_vintage_and_kind_parsing() {
        assert_eq!("PS-1".parse::<Vintage>(), Ok(Vintage::Ps1));
        assert_eq!("current".parse::<Vintage>(), Ok(Vintage::Current));
        assert_eq!("teams".parse::<RecordKind>(), Ok(RecordKind::Teams));
        assert!("season".parse::<Vintage>().is_err());
    }

    #[test]
    fn test_default_minutes_rounds_mp() {
        let player = PlayerRecord::new("A", "T").with_scoring(29.6, 20.0);
        assert_eq!(player.default_minutes(), 30.0);

        let no_mp = PlayerRecord::new("B", "T");
        assert_eq!(no_mp.default_minutes(), 0.0);
    }
}
