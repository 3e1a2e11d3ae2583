//! Per-game minutes allocation
//!
//! Session-scoped playing-time overrides keyed by team then player. Players
//! without an override play their historical MP rounded to the nearest
//! minute. Nothing here is persisted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::MinutesConfig;
use crate::error::{PredictorError, PredictorResult};
use crate::types::PlayerRecord;

/// Ordered player -> minutes mapping for one side of a game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMinutes {
    entries: Vec<(String, f64)>,
}

impl TeamMinutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a player's minutes, keeping first-insertion order
    pub fn set(&mut self, player: impl Into<String>, minutes: f64) {
        let player = player.into();
        match self.entries.iter_mut().find(|(name, _)| *name == player) {
            Some(entry) => entry.1 = minutes,
            None => self.entries.push((player, minutes)),
        }
    }

    pub fn get(&self, player: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == player)
            .map(|(_, minutes)| *minutes)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(name, minutes)| (name.as_str(), *minutes))
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, m)| m.max(0.0)).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of players with positive minutes
    pub fn active_players(&self) -> usize {
        self.entries.iter().filter(|(_, m)| *m > 0.0).count()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TeamMinutes {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut minutes = TeamMinutes::new();
        for (player, m) in iter {
            minutes.set(player, m);
        }
        minutes
    }
}

/// How far a team's minutes total is from a regulation game's worth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinutesStatus {
    Ok,
    Warning,
    Danger,
}

impl MinutesStatus {
    pub fn classify(total: f64, config: &MinutesConfig) -> Self {
        let deviation = (total - config.target_total).abs();
        if deviation > config.danger_tolerance {
            MinutesStatus::Danger
        } else if deviation > config.warning_tolerance {
            MinutesStatus::Warning
        } else {
            MinutesStatus::Ok
        }
    }
}

/// User overrides for the current prediction session
#[derive(Debug, Clone, Default)]
pub struct MinutesAllocation {
    overrides: HashMap<String, TeamMinutes>,
}

impl MinutesAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a player's minutes; negatives are clamped to zero
    pub fn set(&mut self, team: &str, player: &str, minutes: f64) {
        let minutes = if minutes.is_finite() { minutes.max(0.0) } else { 0.0 };
        self.overrides
            .entry(team.to_string())
            .or_default()
            .set(player, minutes);
    }

    pub fn override_for(&self, team: &str, player: &str) -> Option<f64> {
        self.overrides.get(team).and_then(|m| m.get(player))
    }

    /// Effective minutes for every roster player on `team`, in roster order.
    /// An explicit override of 0 benches the player.
    pub fn team_minutes(&self, team: &str, roster: &[PlayerRecord]) -> TeamMinutes {
        roster
            .iter()
            .filter(|p| p.team == team)
            .map(|p| {
                let minutes = self
                    .override_for(team, &p.player)
                    .unwrap_or_else(|| p.default_minutes());
                (p.player.clone(), minutes)
            })
            .collect()
    }
}

/// Parse a `Name=minutes` override as typed on the command line
pub fn parse_override(raw: &str) -> PredictorResult<(String, f64)> {
    let (name, minutes) = raw.rsplit_once('=').ok_or_else(|| {
        PredictorError::InvalidParameter(
            "minutes".to_string(),
            format!("'{}' is not in Name=minutes form", raw),
        )
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(PredictorError::InvalidParameter(
            "minutes".to_string(),
            format!("'{}' has no player name", raw),
        ));
    }

    let minutes: f64 = minutes.trim().parse().map_err(|_| {
        PredictorError::InvalidParameter(
            "minutes".to_string(),
            format!("'{}' is not a number", minutes.trim()),
        )
    })?;

    if !minutes.is_finite() {
        return Err(PredictorError::InvalidParameter(
            "minutes".to_string(),
            format!("'{}' is not a finite number", raw),
        ));
    }

    Ok((name.to_string(), minutes.max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new("Guard", "Bulls").with_scoring(33.4, 24.0),
            PlayerRecord::new("Wing", "Bulls").with_scoring(27.5, 12.0),
            PlayerRecord::new("Center", "Heat").with_scoring(30.0, 18.0),
            PlayerRecord::new("Rookie", "Bulls"),
        ]
    }

    #[test]
    fn test_defaults_use_rounded_mp() {
        let allocation = MinutesAllocation::new();
        let minutes = allocation.team_minutes("Bulls", &roster());

        let entries: Vec<(&str, f64)> = minutes.iter().collect();
        assert_eq!(entries, vec![("Guard", 33.0), ("Wing", 28.0), ("Rookie", 0.0)]);
    }

    #[test]
    fn test_overrides_and_benching() {
        let mut allocation = MinutesAllocation::new();
        allocation.set("Bulls", "Guard", 38.0);
        allocation.set("Bulls", "Wing", 0.0);
        allocation.set("Bulls", "Rookie", -4.0);

        let minutes = allocation.team_minutes("Bulls", &roster());
        assert_eq!(minutes.get("Guard"), Some(38.0));
        assert_eq!(minutes.get("Wing"), Some(0.0));
        assert_eq!(minutes.get("Rookie"), Some(0.0));
        assert_eq!(minutes.active_players(), 1);
    }

    #[test]
    fn test_minutes_status_thresholds() {
        let config = MinutesConfig::default();
        assert_eq!(MinutesStatus::classify(240.0, &config), MinutesStatus::Ok);
        assert_eq!(MinutesStatus::classify(250.0, &config), MinutesStatus::Ok);
        assert_eq!(MinutesStatus::classify(225.0, &config), MinutesStatus::Warning);
        assert_eq!(MinutesStatus::classify(261.0, &config), MinutesStatus::Danger);
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(parse_override("Jimmy Butler=34").unwrap(), ("Jimmy Butler".to_string(), 34.0));
        assert_eq!(parse_override(" A = -3 ").unwrap(), ("A".to_string(), 0.0));
        assert!(parse_override("NoEquals").is_err());
        assert!(parse_override("=30").is_err());
        assert!(parse_override("A=lots").is_err());
    }
}
