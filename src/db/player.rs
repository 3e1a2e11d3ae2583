//! Player season-line database operations

use rusqlite::{params, Connection, Result as SqlResult, Row};

use crate::types::{PlayerRecord, Vintage};

const SELECT_COLUMNS: &str = "player, team, position, mp, pts, fga, three_pa, two_pa, fta,
     fg_pct, three_pct, two_pct, ft_pct";

/// Parse a row from the database
fn from_row(row: &Row) -> SqlResult<PlayerRecord> {
    Ok(PlayerRecord {
        player: row.get(0)?,
        team: row.get(1)?,
        position: row.get(2)?,
        minutes: row.get(3)?,
        points: row.get(4)?,
        fga: row.get(5)?,
        three_pa: row.get(6)?,
        two_pa: row.get(7)?,
        fta: row.get(8)?,
        fg_pct: row.get(9)?,
        three_pct: row.get(10)?,
        two_pct: row.get(11)?,
        ft_pct: row.get(12)?,
    })
}

/// All players of one vintage in import order
pub fn list(conn: &Connection, vintage: Vintage) -> SqlResult<Vec<PlayerRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM players WHERE vintage = ?1 ORDER BY id",
        SELECT_COLUMNS
    ))?;

    let rows = stmt.query_map(params![vintage.as_str()], from_row)?;
    rows.collect()
}

/// Insert one player; a repeated name keeps its first position and takes the new values
pub fn upsert(conn: &Connection, vintage: Vintage, player: &PlayerRecord) -> SqlResult<usize> {
    conn.execute(
        "INSERT INTO players (
            vintage, player, team, position, mp, pts, fga, three_pa, two_pa, fta,
            fg_pct, three_pct, two_pct, ft_pct
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        ON CONFLICT(vintage, player) DO UPDATE SET
            team = excluded.team, position = excluded.position,
            mp = excluded.mp, pts = excluded.pts, fga = excluded.fga,
            three_pa = excluded.three_pa, two_pa = excluded.two_pa, fta = excluded.fta,
            fg_pct = excluded.fg_pct, three_pct = excluded.three_pct,
            two_pct = excluded.two_pct, ft_pct = excluded.ft_pct",
        params![
            vintage.as_str(),
            player.player,
            player.team,
            player.position,
            player.minutes,
            player.points,
            player.fga,
            player.three_pa,
            player.two_pa,
            player.fta,
            player.fg_pct,
            player.three_pct,
            player.two_pct,
            player.ft_pct,
        ],
    )
}

pub fn delete_all(conn: &Connection, vintage: Vintage) -> SqlResult<usize> {
    conn.execute("DELETE FROM players WHERE vintage = ?1", params![vintage.as_str()])
}

pub fn count(conn: &Connection, vintage: Vintage) -> SqlResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM players WHERE vintage = ?1",
        params![vintage.as_str()],
        |row| row.get(0),
    )
}
