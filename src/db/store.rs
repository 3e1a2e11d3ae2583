//! Stat store: four record sets keyed by vintage and record kind

use tracing::{debug, info};

use super::{import_log::ImportLogEntry, player, team, Database};
use crate::error::PredictorResult;
use crate::types::{PlayerRecord, RecordKind, TeamRecord, Vintage};

/// Persistence for imported season data. Every write replaces a whole
/// record set; there are no partial updates.
pub trait StatStore {
    /// Players of one vintage in import order
    fn players(&self, vintage: Vintage) -> PredictorResult<Vec<PlayerRecord>>;

    /// Teams of one vintage in import order
    fn teams(&self, vintage: Vintage) -> PredictorResult<Vec<TeamRecord>>;

    /// Atomically clear then bulk-insert one player set; returns rows stored
    fn replace_players(&self, vintage: Vintage, players: &[PlayerRecord]) -> PredictorResult<usize>;

    /// Atomically clear then bulk-insert one team set; returns rows stored
    fn replace_teams(&self, vintage: Vintage, teams: &[TeamRecord]) -> PredictorResult<usize>;

    /// Remove every record of one set; returns rows removed
    fn delete(&self, vintage: Vintage, kind: RecordKind) -> PredictorResult<usize>;

    fn count(&self, vintage: Vintage, kind: RecordKind) -> PredictorResult<usize>;

    fn record_import(&self, entry: &ImportLogEntry) -> PredictorResult<()>;

    /// Most recent imports first
    fn import_history(&self, limit: usize) -> PredictorResult<Vec<ImportLogEntry>>;
}

/// `StatStore` on a SQLite database
#[derive(Clone)]
pub struct SqliteStatStore {
    db: Database,
}

impl SqliteStatStore {
    pub fn new(db: Database) -> Self {
        SqliteStatStore { db }
    }

    /// Open a store on an existing database and make sure the schema exists
    pub fn open(db: Database) -> PredictorResult<Self> {
        db.run_migrations()?;
        Ok(Self::new(db))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl StatStore for SqliteStatStore {
    fn players(&self, vintage: Vintage) -> PredictorResult<Vec<PlayerRecord>> {
        let conn = self.db.lock()?;
        Ok(player::list(&conn, vintage)?)
    }

    fn teams(&self, vintage: Vintage) -> PredictorResult<Vec<TeamRecord>> {
        let conn = self.db.lock()?;
        Ok(team::list(&conn, vintage)?)
    }

    fn replace_players(&self, vintage: Vintage, players: &[PlayerRecord]) -> PredictorResult<usize> {
        let mut conn = self.db.lock()?;
        let tx = conn.transaction()?;

        let removed = player::delete_all(&tx, vintage)?;
        for record in players {
            player::upsert(&tx, vintage, record)?;
        }
        let stored = player::count(&tx, vintage)? as usize;
        tx.commit()?;

        debug!("🗑️  Cleared {} {} players", removed, vintage);
        info!("💾 Stored {} {} players", stored, vintage);
        Ok(stored)
    }

    fn replace_teams(&self, vintage: Vintage, teams: &[TeamRecord]) -> PredictorResult<usize> {
        let mut conn = self.db.lock()?;
        let tx = conn.transaction()?;

        let removed = team::delete_all(&tx, vintage)?;
        for record in teams {
            team::upsert(&tx, vintage, record)?;
        }
        let stored = team::count(&tx, vintage)? as usize;
        tx.commit()?;

        debug!("🗑️  Cleared {} {} teams", removed, vintage);
        info!("💾 Stored {} {} teams", stored, vintage);
        Ok(stored)
    }

    fn delete(&self, vintage: Vintage, kind: RecordKind) -> PredictorResult<usize> {
        let conn = self.db.lock()?;
        let removed = match kind {
            RecordKind::Players => player::delete_all(&conn, vintage)?,
            RecordKind::Teams => team::delete_all(&conn, vintage)?,
        };
        info!("🗑️  Deleted {} {} {}", removed, vintage, kind);
        Ok(removed)
    }

    fn count(&self, vintage: Vintage, kind: RecordKind) -> PredictorResult<usize> {
        let conn = self.db.lock()?;
        let count = match kind {
            RecordKind::Players => player::count(&conn, vintage)?,
            RecordKind::Teams => team::count(&conn, vintage)?,
        };
        Ok(count as usize)
    }

    fn record_import(&self, entry: &ImportLogEntry) -> PredictorResult<()> {
        let conn = self.db.lock()?;
        entry.insert(&conn)?;
        Ok(())
    }

    fn import_history(&self, limit: usize) -> PredictorResult<Vec<ImportLogEntry>> {
        let conn = self.db.lock()?;
        Ok(ImportLogEntry::list_recent(&conn, limit)?)
    }
}
