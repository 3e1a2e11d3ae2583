//! Stat service: reconciled season data on top of a stat store

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{import_log::ImportLogEntry, store::StatStore};
use crate::error::{PredictorError, PredictorResult};
use crate::reconciler::{self, DataSource};
use crate::types::{into_records, MergedProfile, PlayerRecord, RecordKind, TeamRecord, Vintage};

/// Merged players and teams, ready for the simulation engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedData {
    pub players: Vec<PlayerRecord>,
    pub teams: Vec<TeamRecord>,
}

impl CombinedData {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.teams.is_empty()
    }

    /// Find a team by exact name, then case-insensitively by name or abbreviation
    pub fn find_team(&self, name: &str) -> PredictorResult<&TeamRecord> {
        let wanted = name.trim();
        if let Some(team) = self.teams.iter().find(|t| t.team == wanted) {
            return Ok(team);
        }

        self.teams
            .iter()
            .find(|t| {
                t.team.eq_ignore_ascii_case(wanted)
                    || t.abbreviation
                        .as_deref()
                        .is_some_and(|abbr| abbr.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| PredictorError::TeamNotFound(wanted.to_string()))
    }

    /// Players listed on `team`, in merged order
    pub fn roster<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a PlayerRecord> + 'a {
        self.players.iter().filter(move |p| p.team == team)
    }
}

/// Record counts for each of the four sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCounts {
    pub current_players: usize,
    pub current_teams: usize,
    pub ps1_players: usize,
    pub ps1_teams: usize,
}

impl SetCounts {
    pub fn get(&self, vintage: Vintage, kind: RecordKind) -> usize {
        match (vintage, kind) {
            (Vintage::Current, RecordKind::Players) => self.current_players,
            (Vintage::Current, RecordKind::Teams) => self.current_teams,
            (Vintage::Ps1, RecordKind::Players) => self.ps1_players,
            (Vintage::Ps1, RecordKind::Teams) => self.ps1_teams,
        }
    }
}

/// Service combining stored vintages through the reconciler
pub struct StatService<S: StatStore> {
    store: S,
}

impl<S: StatStore> StatService<S> {
    pub fn new(store: S) -> Self {
        StatService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merged player profiles with provenance
    pub fn combined_players(&self) -> PredictorResult<Vec<MergedProfile<PlayerRecord>>> {
        let current = self.store.players(Vintage::Current)?;
        let ps1 = self.store.players(Vintage::Ps1)?;
        debug!("🔀 Merging players: {} current, {} ps1", current.len(), ps1.len());
        Ok(reconciler::merge_players(&current, &ps1))
    }

    /// Merged team profiles with provenance
    pub fn combined_teams(&self) -> PredictorResult<Vec<MergedProfile<TeamRecord>>> {
        let current = self.store.teams(Vintage::Current)?;
        let ps1 = self.store.teams(Vintage::Ps1)?;
        debug!("🔀 Merging teams: {} current, {} ps1", current.len(), ps1.len());
        Ok(reconciler::merge_teams(&current, &ps1))
    }

    pub fn combined_data(&self) -> PredictorResult<CombinedData> {
        Ok(CombinedData {
            players: into_records(self.combined_players()?),
            teams: into_records(self.combined_teams()?),
        })
    }

    /// Like `combined_data`, but an empty store is an error
    pub fn require_data(&self) -> PredictorResult<CombinedData> {
        let data = self.combined_data()?;
        if data.teams.is_empty() {
            return Err(PredictorError::NoData);
        }
        Ok(data)
    }

    pub fn counts(&self) -> PredictorResult<SetCounts> {
        Ok(SetCounts {
            current_players: self.store.count(Vintage::Current, RecordKind::Players)?,
            current_teams: self.store.count(Vintage::Current, RecordKind::Teams)?,
            ps1_players: self.store.count(Vintage::Ps1, RecordKind::Players)?,
            ps1_teams: self.store.count(Vintage::Ps1, RecordKind::Teams)?,
        })
    }

    /// Which vintages hold any records. Player and team sets both count, so a
    /// vintage with only a team import still shows up as a source.
    pub fn data_source(&self) -> PredictorResult<DataSource> {
        let counts = self.counts()?;
        Ok(DataSource::from_counts(
            counts.current_players + counts.current_teams,
            counts.ps1_players + counts.ps1_teams,
        ))
    }

    pub fn import_history(&self, limit: usize) -> PredictorResult<Vec<ImportLogEntry>> {
        self.store.import_history(limit)
    }

    pub fn delete(&self, vintage: Vintage, kind: RecordKind) -> PredictorResult<usize> {
        self.store.delete(vintage, kind)
    }
}
