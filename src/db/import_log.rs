//! Import history database operations

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqlResult, Row};
use serde::{Deserialize, Serialize};

use crate::types::{RecordKind, Vintage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportLogEntry {
    pub id: Option<i64>,
    pub vintage: Vintage,
    pub kind: RecordKind,
    /// File name or other description of where the rows came from
    pub source: String,
    pub rows_imported: i64,
    pub rows_skipped: i64,
    pub imported_at: DateTime<Utc>,
}

fn conversion_error(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}

impl ImportLogEntry {
    pub fn new(vintage: Vintage, kind: RecordKind, source: impl Into<String>, rows_imported: usize, rows_skipped: usize) -> Self {
        ImportLogEntry {
            id: None,
            vintage,
            kind,
            source: source.into(),
            rows_imported: rows_imported as i64,
            rows_skipped: rows_skipped as i64,
            imported_at: Utc::now(),
        }
    }

    fn from_row(row: &Row) -> SqlResult<Self> {
        let vintage: String = row.get(1)?;
        let kind: String = row.get(2)?;
        let imported_at: String = row.get(6)?;

        Ok(ImportLogEntry {
            id: Some(row.get(0)?),
            vintage: vintage.parse().map_err(|e| conversion_error(1, e))?,
            kind: kind.parse().map_err(|e| conversion_error(2, e))?,
            source: row.get(3)?,
            rows_imported: row.get(4)?,
            rows_skipped: row.get(5)?,
            imported_at: DateTime::parse_from_rfc3339(&imported_at)
                .map_err(|e| conversion_error(6, e.to_string()))?
                .with_timezone(&Utc),
        })
    }

    pub fn insert(&self, conn: &Connection) -> SqlResult<i64> {
        conn.execute(
            "INSERT INTO import_log (vintage, kind, source, rows_imported, rows_skipped, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.vintage.as_str(),
                self.kind.as_str(),
                self.source,
                self.rows_imported,
                self.rows_skipped,
                self.imported_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent imports first
    pub fn list_recent(conn: &Connection, limit: usize) -> SqlResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, vintage, kind, source, rows_imported, rows_skipped, imported_at
             FROM import_log ORDER BY id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], Self::from_row)?;
        rows.collect()
    }

    /// Latest import of one record set, if any
    pub fn latest(conn: &Connection, vintage: Vintage, kind: RecordKind) -> SqlResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, vintage, kind, source, rows_imported, rows_skipped, imported_at
             FROM import_log WHERE vintage = ?1 AND kind = ?2 ORDER BY id DESC LIMIT 1",
        )?;

        let mut rows = stmt.query(params![vintage.as_str(), kind.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::from_row(row)?)),
            None => Ok(None),
        }
    }
}
