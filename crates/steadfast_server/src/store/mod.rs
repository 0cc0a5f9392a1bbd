//! Durable storage for the active session.
//!
//! Two logical tables back recovery: an append-only move log, ordered by
//! acceptance, and a single snapshot row of session scalars that is
//! overwritten on every mutation. [`Storage::commit`] writes both as one
//! unit.

mod memory;
mod models;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use steadfast_tictactoe::{Mark, MoveRecord, Session};

/// Scalar summary of a session. Exactly one logical row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Whether start was called.
    pub started: bool,
    /// Whose move it is, 1 or 2.
    pub turn: u8,
    /// Winning player id, 0 for none.
    pub winner: u8,
    /// Whether the game was drawn.
    pub is_draw: bool,
    /// Player 1's mark, once seated.
    pub player1_mark: Option<Mark>,
    /// Player 2's mark, once seated.
    pub player2_mark: Option<Mark>,
}

impl Default for SnapshotRow {
    fn default() -> Self {
        Self {
            started: false,
            turn: 1,
            winner: 0,
            is_draw: false,
            player1_mark: None,
            player2_mark: None,
        }
    }
}

impl SnapshotRow {
    /// Captures the scalar state of a session.
    pub fn capture(session: &Session) -> Self {
        let outcome = session.outcome();
        Self {
            started: session.started(),
            turn: session.turn().as_u8(),
            winner: outcome.winner().map_or(0, |id| id.as_u8()),
            is_draw: outcome == steadfast_tictactoe::Outcome::Draw,
            player1_mark: session.player1().map(|p| p.mark()),
            player2_mark: session.player2().map(|p| p.mark()),
        }
    }
}

/// A set of writes that must become durable together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitUnit {
    /// A start, join or move: at most one log append plus the new snapshot.
    Mutation {
        /// Accepted move, if the mutation was a move.
        record: Option<MoveRecord>,
        /// Snapshot after the mutation.
        snapshot: SnapshotRow,
    },
    /// New game: empty the log and reset the snapshot.
    Reset,
}

/// Append-only log of accepted moves.
pub trait DurableLog {
    /// Durably appends one record.
    fn append(&self, record: &MoveRecord) -> Result<(), StorageError>;

    /// Returns every committed record in acceptance order.
    fn read_all(&self) -> Result<Vec<MoveRecord>, StorageError>;

    /// Removes every record.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Single-row store of session scalars.
pub trait SnapshotStore {
    /// Atomically replaces the row.
    fn write(&self, row: &SnapshotRow) -> Result<(), StorageError>;

    /// Returns the row, or the default row if none was ever written.
    fn read(&self) -> Result<SnapshotRow, StorageError>;

    /// Resets the row to its default.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Log and snapshot behind one transactional commit.
pub trait Storage: DurableLog + SnapshotStore + Send + Sync + 'static {
    /// Makes every write in `unit` durable, or none of them.
    fn commit(&self, unit: &CommitUnit) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use steadfast_tictactoe::Engine;

    #[test]
    fn test_default_row() {
        let row = SnapshotRow::default();
        assert_eq!(row, SnapshotRow::capture(&Session::new()));
    }

    #[test]
    fn test_capture_after_win() {
        let mut engine = Engine::new();
        engine.start(Mark::O).unwrap();
        engine.join().unwrap();
        for (row, col, id) in [(0, 0, 1), (1, 0, 2), (0, 1, 1), (1, 1, 2), (0, 2, 1)] {
            engine.make_move(row, col, id);
        }
        let row = SnapshotRow::capture(engine.session());
        assert!(row.started);
        assert_eq!(row.winner, 1);
        assert!(!row.is_draw);
        assert_eq!(row.turn, 2);
        assert_eq!(row.player1_mark, Some(Mark::O));
        assert_eq!(row.player2_mark, Some(Mark::X));
    }
}
