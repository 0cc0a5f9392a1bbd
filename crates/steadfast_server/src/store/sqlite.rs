//! SQLite-backed storage.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use steadfast_tictactoe::MoveRecord;
use tracing::{debug, info, instrument};

use super::models::{MoveRow, NewMove, SNAPSHOT_ID, SnapshotRecord};
use super::{CommitUnit, DurableLog, SnapshotRow, SnapshotStore, Storage, schema};
use crate::error::StorageError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Storage in a SQLite database file.
///
/// A connection is established per operation; every write runs inside an
/// `IMMEDIATE` transaction with `synchronous = FULL`, so a commit that
/// returned `Ok` survives a process crash.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at `db_path`, creating tables if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, StorageError> {
        info!(path = %db_path, "Opening SqliteStore");
        let store = Self { db_path };
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StorageError::new(format!("Migrations failed: {}", e)))?;
        debug!(count = applied.len(), "Migrations applied");
        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StorageError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StorageError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA synchronous = FULL;")?;
        Ok(conn)
    }

    fn insert_move(conn: &mut SqliteConnection, record: &MoveRecord) -> Result<(), StorageError> {
        let new_move = NewMove::try_from(record)?;
        diesel::insert_into(schema::moves::table)
            .values(&new_move)
            .execute(conn)?;
        Ok(())
    }

    fn replace_snapshot(
        conn: &mut SqliteConnection,
        row: &SnapshotRow,
    ) -> Result<(), StorageError> {
        diesel::replace_into(schema::session_snapshot::table)
            .values(&SnapshotRecord::from(row))
            .execute(conn)?;
        Ok(())
    }

    fn delete_moves(conn: &mut SqliteConnection) -> Result<(), StorageError> {
        diesel::delete(schema::moves::table).execute(conn)?;
        Ok(())
    }
}

impl DurableLog for SqliteStore {
    #[instrument(skip(self))]
    fn append(&self, record: &MoveRecord) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| Self::insert_move(conn, record))?;
        debug!("Move appended");
        Ok(())
    }

    #[instrument(skip(self))]
    fn read_all(&self) -> Result<Vec<MoveRecord>, StorageError> {
        let mut conn = self.connection()?;
        let rows: Vec<MoveRow> = schema::moves::table
            .order(schema::moves::id.asc())
            .select(MoveRow::as_select())
            .load(&mut conn)?;
        debug!(count = rows.len(), "Moves loaded");
        rows.into_iter().map(MoveRecord::try_from).collect()
    }

    #[instrument(skip(self))]
    fn clear(&self) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        conn.immediate_transaction(Self::delete_moves)?;
        info!("Move log cleared");
        Ok(())
    }
}

impl SnapshotStore for SqliteStore {
    #[instrument(skip(self))]
    fn write(&self, row: &SnapshotRow) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| Self::replace_snapshot(conn, row))?;
        debug!("Snapshot written");
        Ok(())
    }

    #[instrument(skip(self))]
    fn read(&self) -> Result<SnapshotRow, StorageError> {
        let mut conn = self.connection()?;
        let record: Option<SnapshotRecord> = schema::session_snapshot::table
            .filter(schema::session_snapshot::id.eq(SNAPSHOT_ID))
            .select(SnapshotRecord::as_select())
            .first(&mut conn)
            .optional()?;
        match record {
            Some(record) => SnapshotRow::try_from(record),
            None => {
                debug!("No snapshot row, using default");
                Ok(SnapshotRow::default())
            }
        }
    }

    #[instrument(skip(self))]
    fn clear(&self) -> Result<(), StorageError> {
        SnapshotStore::write(self, &SnapshotRow::default())
    }
}

impl Storage for SqliteStore {
    #[instrument(skip(self, unit))]
    fn commit(&self, unit: &CommitUnit) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| match unit {
            CommitUnit::Mutation { record, snapshot } => {
                if let Some(record) = record {
                    Self::insert_move(conn, record)?;
                }
                Self::replace_snapshot(conn, snapshot)
            }
            CommitUnit::Reset => {
                Self::delete_moves(conn)?;
                Self::replace_snapshot(conn, &SnapshotRow::default())
            }
        })?;
        info!(?unit, "Commit durable");
        Ok(())
    }
}
