//! Team rating database operations

use rusqlite::{params, Connection, Result as SqlResult, Row};

use crate::types::{TeamRecord, Vintage};

fn from_row(row: &Row) -> SqlResult<TeamRecord> {
    Ok(TeamRecord {
        team: row.get(0)?,
        abbreviation: row.get(1)?,
        adjusted_defensive_rating: row.get(2)?,
    })
}

/// All teams of one vintage in import order
pub fn list(conn: &Connection, vintage: Vintage) -> SqlResult<Vec<TeamRecord>> {
    let mut stmt = conn.prepare(
        "SELECT team, abbreviation, adjusted_defensive_rating
         FROM teams WHERE vintage = ?1 ORDER BY id",
    )?;

    let rows = stmt.query_map(params![vintage.as_str()], from_row)?;
    rows.collect()
}

pub fn upsert(conn: &Connection, vintage: Vintage, team: &TeamRecord) -> SqlResult<usize> {
    conn.execute(
        "INSERT INTO teams (vintage, team, abbreviation, adjusted_defensive_rating)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(vintage, team) DO UPDATE SET
            abbreviation = excluded.abbreviation,
            adjusted_defensive_rating = excluded.adjusted_defensive_rating",
        params![
            vintage.as_str(),
            team.team,
            team.abbreviation,
            team.adjusted_defensive_rating,
        ],
    )
}

pub fn delete_all(conn: &Connection, vintage: Vintage) -> SqlResult<usize> {
    conn.execute("DELETE FROM teams WHERE vintage = ?1", params![vintage.as_str()])
}

pub fn count(conn: &Connection, vintage: Vintage) -> SqlResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM teams WHERE vintage = ?1",
        params![vintage.as_str()],
        |row| row.get(0),
    )
}
