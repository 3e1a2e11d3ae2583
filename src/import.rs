//! CSV import of season statistics
//!
//! Player files carry `Player, Team, Pos, MP, PTS, FGA, 3PA, 2PA, FTA, FG%,
//! 3P%, 2P%, FT%`; team files carry `Team, Team Abbreviation, Adjusted
//! Defensive Rating`. Extra columns are ignored. Cells are read as text and
//! converted here so that one bad number only blanks that field.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::{ImportLogEntry, StatStore};
use crate::error::{PredictorError, PredictorResult};
use crate::reconciler::Reconcile;
use crate::types::{PlayerRecord, RecordKind, TeamRecord, Vintage};

#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(rename = "Player", default)]
    player: Option<String>,
    #[serde(rename = "Team", default)]
    team: Option<String>,
    #[serde(rename = "Pos", default)]
    position: Option<String>,
    #[serde(rename = "MP", default)]
    minutes: Option<String>,
    #[serde(rename = "PTS", default)]
    points: Option<String>,
    #[serde(rename = "FGA", default)]
    fga: Option<String>,
    #[serde(rename = "3PA", default)]
    three_pa: Option<String>,
    #[serde(rename = "2PA", default)]
    two_pa: Option<String>,
    #[serde(rename = "FTA", default)]
    fta: Option<String>,
    #[serde(rename = "FG%", default)]
    fg_pct: Option<String>,
    #[serde(rename = "3P%", default)]
    three_pct: Option<String>,
    #[serde(rename = "2P%", default)]
    two_pct: Option<String>,
    #[serde(rename = "FT%", default)]
    ft_pct: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    #[serde(rename = "Team", default)]
    team: Option<String>,
    #[serde(rename = "Team Abbreviation", default)]
    abbreviation: Option<String>,
    #[serde(rename = "Adjusted Defensive Rating", default)]
    adjusted_defensive_rating: Option<String>,
}

/// Parsed rows of one file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSet<T> {
    pub records: Vec<T>,
    /// Rows dropped for a missing identity or an unreadable line
    pub skipped: usize,
    /// Rows that replaced an earlier row with the same identity
    pub duplicates: usize,
}

/// Outcome of importing one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub vintage: Vintage,
    pub kind: RecordKind,
    pub source: String,
    pub rows_imported: usize,
    pub rows_skipped: usize,
    pub duplicates: usize,
}

fn text_cell(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a numeric cell. Empty cells are absent; "45.2%" becomes 0.452.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (digits, is_percent) = match trimmed.strip_suffix('%') {
        Some(stripped) => (stripped.trim(), true),
        None => (trimmed, false),
    };

    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if is_percent { value / 100.0 } else { value })
}

fn number_cell(value: &Option<String>, column: &str, row: usize) -> Option<f64> {
    let raw = value.as_deref()?;
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_number(raw);
    if parsed.is_none() {
        warn!("⚠️  Row {}: unreadable {} value '{}', left blank", row, column, raw.trim());
    }
    parsed
}

/// Keep the last row per identity, in the position of the first
fn dedupe<T: Reconcile>(rows: Vec<T>) -> (Vec<T>, usize) {
    let mut records: Vec<T> = Vec::with_capacity(rows.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(rows.len());
    let mut duplicates = 0;

    for row in rows {
        match index.get(row.identity()) {
            Some(&pos) => {
                records[pos] = row;
                duplicates += 1;
            }
            None => {
                index.insert(row.identity().to_string(), records.len());
                records.push(row);
            }
        }
    }

    (records, duplicates)
}

pub fn read_players<R: Read>(reader: R) -> PredictorResult<ParsedSet<PlayerRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut rows = Vec::new();
    let mut skipped = 0;

    for (i, result) in reader.deserialize::<RawPlayer>().enumerate() {
        // Header is line 1
        let line = i + 2;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("⚠️  Skipping malformed player row {}: {}", line, e);
                skipped += 1;
                continue;
            }
        };

        let (Some(player), Some(team)) = (text_cell(raw.player), text_cell(raw.team)) else {
            warn!("⚠️  Skipping player row {}: missing Player or Team", line);
            skipped += 1;
            continue;
        };

        rows.push(PlayerRecord {
            player,
            team,
            position: text_cell(raw.position),
            minutes: number_cell(&raw.minutes, "MP", line),
            points: number_cell(&raw.points, "PTS", line),
            fga: number_cell(&raw.fga, "FGA", line),
            three_pa: number_cell(&raw.three_pa, "3PA", line),
            two_pa: number_cell(&raw.two_pa, "2PA", line),
            fta: number_cell(&raw.fta, "FTA", line),
            fg_pct: number_cell(&raw.fg_pct, "FG%", line),
            three_pct: number_cell(&raw.three_pct, "3P%", line),
            two_pct: number_cell(&raw.two_pct, "2P%", line),
            ft_pct: number_cell(&raw.ft_pct, "FT%", line),
        });
    }

    let (records, duplicates) = dedupe(rows);
    Ok(ParsedSet { records, skipped, duplicates })
}

pub fn read_teams<R: Read>(reader: R) -> PredictorResult<ParsedSet<TeamRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut rows = Vec::new();
    let mut skipped = 0;

    for (i, result) in reader.deserialize::<RawTeam>().enumerate() {
        let line = i + 2;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("⚠️  Skipping malformed team row {}: {}", line, e);
                skipped += 1;
                continue;
            }
        };

        let Some(team) = text_cell(raw.team) else {
            warn!("⚠️  Skipping team row {}: missing Team", line);
            skipped += 1;
            continue;
        };

        rows.push(TeamRecord {
            team,
            abbreviation: text_cell(raw.abbreviation),
            adjusted_defensive_rating: number_cell(
                &raw.adjusted_defensive_rating,
                "Adjusted Defensive Rating",
                line,
            ),
        });
    }

    let (records, duplicates) = dedupe(rows);
    Ok(ParsedSet { records, skipped, duplicates })
}

/// Replace one record set with the contents of a CSV file and log the import
pub fn import_file<S: StatStore + ?Sized, P: AsRef<Path>>(
    store: &S,
    vintage: Vintage,
    kind: RecordKind,
    path: P,
) -> PredictorResult<ImportSummary> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PredictorError::FileNotFound(path.display().to_string()));
    }
    let file = File::open(path)
        .map_err(|e| PredictorError::FileRead(format!("{}: {}", path.display(), e)))?;

    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let (rows_imported, rows_skipped, duplicates) = match kind {
        RecordKind::Players => {
            let parsed = read_players(file)?;
            let stored = store.replace_players(vintage, &parsed.records)?;
            (stored, parsed.skipped, parsed.duplicates)
        }
        RecordKind::Teams => {
            let parsed = read_teams(file)?;
            let stored = store.replace_teams(vintage, &parsed.records)?;
            (stored, parsed.skipped, parsed.duplicates)
        }
    };

    store.record_import(&ImportLogEntry::new(vintage, kind, source.clone(), rows_imported, rows_skipped))?;

    info!(
        "📥 Imported {} {} {} from {} ({} skipped, {} duplicates)",
        rows_imported, vintage, kind, source, rows_skipped, duplicates
    );

    Ok(ImportSummary {
        vintage,
        kind,
        source,
        rows_imported,
        rows_skipped,
        duplicates,
    })
}
