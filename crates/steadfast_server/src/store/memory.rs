//! In-memory storage with switchable commit failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use steadfast_tictactoe::MoveRecord;
use tracing::{debug, instrument, warn};

use super::{CommitUnit, DurableLog, SnapshotRow, SnapshotStore, Storage};
use crate::error::StorageError;

#[derive(Debug, Default)]
struct Tables {
    moves: Vec<MoveRecord>,
    snapshot: SnapshotRow,
}

/// Storage held in process memory.
///
/// Survives nothing, but shares the [`Storage`] contract with
/// [`SqliteStore`](super::SqliteStore). [`MemoryStore::set_unavailable`]
/// makes every operation fail until switched back, which exercises the
/// session manager's rollback path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes operations fail (`true`) or succeed (`false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        warn!(unavailable, "Memory store availability switched");
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::new("Memory store unavailable"));
        }
        Ok(self.tables.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DurableLog for MemoryStore {
    fn append(&self, record: &MoveRecord) -> Result<(), StorageError> {
        self.tables()?.moves.push(*record);
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<MoveRecord>, StorageError> {
        Ok(self.tables()?.moves.clone())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.tables()?.moves.clear();
        Ok(())
    }
}

impl SnapshotStore for MemoryStore {
    fn write(&self, row: &SnapshotRow) -> Result<(), StorageError> {
        self.tables()?.snapshot = *row;
        Ok(())
    }

    fn read(&self) -> Result<SnapshotRow, StorageError> {
        Ok(self.tables()?.snapshot)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.tables()?.snapshot = SnapshotRow::default();
        Ok(())
    }
}

impl Storage for MemoryStore {
    #[instrument(skip(self, unit))]
    fn commit(&self, unit: &CommitUnit) -> Result<(), StorageError> {
        let mut tables = self.tables()?;
        match unit {
            CommitUnit::Mutation { record, snapshot } => {
                if let Some(record) = record {
                    tables.moves.push(*record);
                }
                tables.snapshot = *snapshot;
            }
            CommitUnit::Reset => {
                tables.moves.clear();
                tables.snapshot = SnapshotRow::default();
            }
        }
        debug!(?unit, "Commit applied in memory");
        Ok(())
    }
}
