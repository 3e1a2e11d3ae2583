//! Season-data reconciliation
//!
//! Merges the current-season and PS-1 vintages of player and team records
//! into one profile per entity. The current vintage seeds an insertion-ordered
//! map; each PS-1 record then either patches the numeric fields of a known
//! entity or is appended as a PS-1-only entity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{MergedProfile, PlayerRecord, Provenance, TeamRecord};

/// A record that can be reconciled across vintages
pub trait Reconcile: Clone {
    /// Identity key; never overwritten by the secondary vintage
    fn identity(&self) -> &str;

    /// Merge the secondary vintage's numeric fields into `self`
    fn absorb(&mut self, secondary: &Self);
}

/// Per-field merge rule: mean when both are valid numbers, secondary when only it is,
/// otherwise the primary value (including absent) stays untouched.
pub fn merge_field(primary: &mut Option<f64>, secondary: Option<f64>) {
    let current = primary.filter(|v| v.is_finite());
    let ps1 = secondary.filter(|v| v.is_finite());

    match (current, ps1) {
        (Some(a), Some(b)) => *primary = Some((a + b) / 2.0),
        (None, Some(b)) => *primary = Some(b),
        _ => {}
    }
}

impl Reconcile for PlayerRecord {
    fn identity(&self) -> &str {
        &self.player
    }

    fn absorb(&mut self, secondary: &Self) {
        // Team stays with the current vintage even if the player moved
        merge_field(&mut self.minutes, secondary.minutes);
        merge_field(&mut self.points, secondary.points);
        merge_field(&mut self.fga, secondary.fga);
        merge_field(&mut self.three_pa, secondary.three_pa);
        merge_field(&mut self.two_pa, secondary.two_pa);
        merge_field(&mut self.fta, secondary.fta);
        merge_field(&mut self.fg_pct, secondary.fg_pct);
        merge_field(&mut self.three_pct, secondary.three_pct);
        merge_field(&mut self.two_pct, secondary.two_pct);
        merge_field(&mut self.ft_pct, secondary.ft_pct);
    }
}

impl Reconcile for TeamRecord {
    fn identity(&self) -> &str {
        &self.team
    }

    fn absorb(&mut self, secondary: &Self) {
        merge_field(
            &mut self.adjusted_defensive_rating,
            secondary.adjusted_defensive_rating,
        );
    }
}

/// Merge two vintages of any reconcilable record type
pub fn merge_vintages<T: Reconcile>(current: &[T], ps1: &[T]) -> Vec<MergedProfile<T>> {
    if ps1.is_empty() {
        return current
            .iter()
            .cloned()
            .map(|record| MergedProfile::new(record, Provenance::Current))
            .collect();
    }

    let mut merged: Vec<MergedProfile<T>> = Vec::with_capacity(current.len() + ps1.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(current.len() + ps1.len());

    for record in current {
        let key = record.identity().to_string();
        match index.get(&key) {
            // Duplicate identity in one vintage: later row replaces the earlier one in place
            Some(&pos) => merged[pos] = MergedProfile::new(record.clone(), Provenance::Current),
            None => {
                index.insert(key, merged.len());
                merged.push(MergedProfile::new(record.clone(), Provenance::Current));
            }
        }
    }

    for record in ps1 {
        let key = record.identity().to_string();
        match index.get(&key) {
            Some(&pos) => {
                let entry = &mut merged[pos];
                entry.record.absorb(record);
                entry.source = match entry.source {
                    Provenance::Ps1 => Provenance::Ps1,
                    _ => Provenance::Merged,
                };
            }
            None => {
                index.insert(key, merged.len());
                merged.push(MergedProfile::new(record.clone(), Provenance::Ps1));
            }
        }
    }

    merged
}

pub fn merge_players(
    current: &[PlayerRecord],
    ps1: &[PlayerRecord],
) -> Vec<MergedProfile<PlayerRecord>> {
    merge_vintages(current, ps1)
}

pub fn merge_teams(current: &[TeamRecord], ps1: &[TeamRecord]) -> Vec<MergedProfile<TeamRecord>> {
    merge_vintages(current, ps1)
}

/// Which vintages contributed data; for status text only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSource {
    Combined,
    CurrentOnly,
    Ps1Only,
    NoData,
}

impl DataSource {
    /// Derive the descriptor from per-vintage record counts
    pub fn from_counts(current_records: usize, ps1_records: usize) -> Self {
        match (current_records > 0, ps1_records > 0) {
            (true, true) => DataSource::Combined,
            (true, false) => DataSource::CurrentOnly,
            (false, true) => DataSource::Ps1Only,
            (false, false) => DataSource::NoData,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Combined => "combined",
            DataSource::CurrentOnly => "current-only",
            DataSource::Ps1Only => "ps1-only",
            DataSource::NoData => "no-data",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DataSource::Combined => "combined Current & PS-1 data",
            DataSource::CurrentOnly => "Current Season data only",
            DataSource::Ps1Only => "PS-1 Season data only (Current data not found)",
            DataSource::NoData => "no data available. Please import data.",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, team: &str, mp: Option<f64>, pts: Option<f64>) -> PlayerRecord {
        PlayerRecord {
            minutes: mp,
            points: pts,
            ..PlayerRecord::new(name, team)
        }
    }

    #[test]
    fn test_empty_ps1_returns_current_verbatim() {
        let current = vec![
            player("B", "Bulls", Some(30.0), Some(20.0)),
            player("A", "Heat", None, Some(3.0)),
        ];
        let merged = merge_players(&current, &[]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].record, current[0]);
        assert_eq!(merged[1].record, current[1]);
        assert!(merged.iter().all(|p| p.source == Provenance::Current));
    }

    #[test]
    fn test_overlapping_fields_are_averaged() {
        let current = vec![player("A", "Bulls", Some(30.0), Some(20.0))];
        let ps1 = vec![player("A", "Lakers", Some(34.0), Some(25.0))];
        let merged = merge_players(&current, &ps1);

        assert_eq!(merged.len(), 1);
        let a = &merged[0];
        assert_eq!(a.source, Provenance::Merged);
        assert!((a.record.minutes.unwrap() - 32.0).abs() < 1e-9);
        assert!((a.record.points.unwrap() - 22.5).abs() < 1e-9);
        // Current team wins
        assert_eq!(a.record.team, "Bulls");
    }

    #[test]
    fn test_single_sided_fields() {
        let mut current = player("A", "Bulls", None, Some(20.0));
        current.ft_pct = Some(0.8);
        let mut ps1 = player("A", "Bulls", Some(28.0), None);
        ps1.ft_pct = Some(f64::NAN);

        let merged = merge_players(&[current], &[ps1]);
        let a = &merged[0].record;

        assert_eq!(a.minutes, Some(28.0)); // only ps1 valid
        assert_eq!(a.points, Some(20.0)); // only current valid
        assert_eq!(a.ft_pct, Some(0.8)); // ps1 invalid, current kept
        assert_eq!(a.fga, None); // neither present
    }

    #[test]
    fn test_ordering_current_first_then_ps1_only() {
        let current = vec![
            player("C", "T", Some(1.0), Some(1.0)),
            player("A", "T", Some(1.0), Some(1.0)),
        ];
        let ps1 = vec![
            player("Z", "T", Some(1.0), Some(1.0)),
            player("A", "T", Some(3.0), Some(3.0)),
            player("B", "T", Some(1.0), Some(1.0)),
        ];
        let merged = merge_players(&current, &ps1);
        let names: Vec<&str> = merged.iter().map(|p| p.record.player.as_str()).collect();

        assert_eq!(names, vec!["C", "A", "Z", "B"]);
        assert_eq!(merged[2].source, Provenance::Ps1);
        assert_eq!(merged[1].source, Provenance::Merged);
    }

    #[test]
    fn test_team_rating_merge() {
        let current = vec![TeamRecord::new("Bulls", Some(110.0)), TeamRecord::new("Heat", None)];
        let ps1 = vec![TeamRecord::new("Heat", Some(104.0)), TeamRecord::new("Bulls", Some(106.0))];
        let merged = merge_teams(&current, &ps1);

        assert_eq!(merged[0].record.adjusted_defensive_rating, Some(108.0));
        assert_eq!(merged[1].record.adjusted_defensive_rating, Some(104.0));
        assert_eq!(merged[1].record.team, "Heat");
    }

    #[test]
    fn test_data_source_descriptor() {
        assert_eq!(DataSource::from_counts(3, 2), DataSource::Combined);
        assert_eq!(DataSource::from_counts(3, 0), DataSource::CurrentOnly);
        assert_eq!(DataSource::from_counts(0, 2), DataSource::Ps1Only);
        assert_eq!(DataSource::from_counts(0, 0).as_str(), "no-data");
    }
}
