//! The single active session, coordinated with durable storage.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use steadfast_tictactoe::{Engine, EngineError, Mark, Message, MoveRecord, Session};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::error::{ManagerError, RecoveryError};
use crate::recovery;
use crate::store::{CommitUnit, SnapshotRow, Storage};

/// Default number of session updates buffered for slow subscribers.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

/// Result of a move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResponse {
    /// Result code and text for the caller.
    pub message: Message,
    /// Session after the request, changed only if the move was accepted.
    pub session: Session,
}

/// Owns the active session and serializes every mutation.
///
/// A mutation runs the engine on a copy of the current session, commits
/// the result, and adopts the copy only once the commit succeeded. Readers
/// never see a session that is not durable.
#[derive(Debug)]
pub struct SessionManager<S: Storage> {
    store: Arc<S>,
    current: RwLock<Session>,
    gate: Mutex<()>,
    updates: broadcast::Sender<Session>,
}

impl<S: Storage> SessionManager<S> {
    /// Creates a manager over an already rebuilt session.
    #[instrument(skip(store, session))]
    pub fn new(store: Arc<S>, session: Session, capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity.max(1));
        info!(phase = %session.phase(), "Creating session manager");
        Self {
            store,
            current: RwLock::new(session),
            gate: Mutex::new(()),
            updates,
        }
    }

    /// Rebuilds the session from `store` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError`] if the stored state cannot be read or is
    /// inconsistent. No manager exists in that case.
    #[instrument(skip(store))]
    pub fn recover(store: Arc<S>, capacity: usize) -> Result<Self, RecoveryError> {
        let session = recovery::rebuild(store.as_ref())?;
        Ok(Self::new(store, session, capacity))
    }

    /// Clears storage and starts over with an empty session.
    #[instrument(skip(self))]
    pub fn new_game(&self) -> Result<Session, ManagerError> {
        let _gate = self.lock_gate();
        self.adopt(CommitUnit::Reset, Session::new())
    }

    /// Seats player 1 with the mark named by `symbol`.
    #[instrument(skip(self))]
    pub fn start(&self, symbol: char) -> Result<Session, ManagerError> {
        let _gate = self.lock_gate();
        let mark = Mark::try_from(symbol).map_err(EngineError::from)?;
        let mut engine = Engine::from_session(self.status());
        engine.start(mark)?;
        let next = engine.into_session();
        self.adopt(Self::mutation(None, &next), next)
    }

    /// Seats player 2 with the opposite mark.
    #[instrument(skip(self))]
    pub fn join(&self) -> Result<Session, ManagerError> {
        let _gate = self.lock_gate();
        let mut engine = Engine::from_session(self.status());
        engine.join()?;
        let next = engine.into_session();
        self.adopt(Self::mutation(None, &next), next)
    }

    /// Attempts a move. Rejected moves return their code with the session
    /// unchanged and touch no storage.
    ///
    /// # Errors
    ///
    /// Only [`ManagerError::StorageUnavailable`]: rule violations are
    /// reported through the message code.
    #[instrument(skip(self))]
    pub fn make_move(&self, row: i32, col: i32, player_id: i32) -> Result<MoveResponse, ManagerError> {
        let _gate = self.lock_gate();
        let mut engine = Engine::from_session(self.status());
        let report = engine.make_move(row, col, player_id);
        let message = Message::new(report.code);

        let session = match report.record {
            Some(record) => {
                let next = engine.into_session();
                self.adopt(Self::mutation(Some(record), &next), next)?
            }
            None => {
                debug!(code = report.code.code(), "Move rejected, nothing to commit");
                self.status()
            }
        };
        Ok(MoveResponse { message, session })
    }

    /// Returns a copy of the current session.
    ///
    /// Takes no part in mutation ordering: a read racing a mutation sees
    /// the state before it.
    pub fn status(&self) -> Session {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Receives every session adopted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Session> {
        self.updates.subscribe()
    }

    fn lock_gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutation(record: Option<MoveRecord>, next: &Session) -> CommitUnit {
        CommitUnit::Mutation {
            record,
            snapshot: SnapshotRow::capture(next),
        }
    }

    /// Commits `unit`, then replaces the current session with `next`.
    /// On failure the current session is left as it was.
    fn adopt(&self, unit: CommitUnit, next: Session) -> Result<Session, ManagerError> {
        if let Err(e) = self.store.commit(&unit) {
            warn!(error = %e, "Commit failed, discarding mutation");
            return Err(e.into());
        }
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next.clone();
        debug!(phase = %next.phase(), "Session adopted");

        if self.updates.send(next.clone()).is_err() {
            debug!("No subscribers for session update");
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DurableLog, MemoryStore, SnapshotStore};
    use steadfast_tictactoe::{MoveCode, Phase, PlayerId};

    fn manager() -> (Arc<MemoryStore>, SessionManager<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(Arc::clone(&store), Session::new(), 4);
        (store, manager)
    }

    #[test]
    fn test_start_commits_snapshot_only() {
        let (store, manager) = manager();
        let session = manager.start('X').unwrap();
        assert_eq!(session.phase(), Phase::AwaitingPlayer2);
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.read().unwrap().player1_mark, Some(Mark::X));
    }

    #[test]
    fn test_invalid_symbol_rejected() {
        let (store, manager) = manager();
        let err = manager.start('Q').unwrap_err();
        assert!(matches!(
            err,
            ManagerError::Rejected(EngineError::InvalidMark(_))
        ));
        assert_eq!(store.read().unwrap(), SnapshotRow::default());
    }

    #[test]
    fn test_rejected_move_commits_nothing() {
        let (store, manager) = manager();
        manager.start('X').unwrap();
        manager.join().unwrap();
        let response = manager.make_move(0, 0, 2).unwrap();
        assert_eq!(response.message.code(), MoveCode::WrongTurn.code());
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(response.session.turn(), PlayerId::One);
    }

    #[test]
    fn test_failed_commit_keeps_session() {
        let (store, manager) = manager();
        manager.start('O').unwrap();
        manager.join().unwrap();
        let before = manager.status();

        store.set_unavailable(true);
        let err = manager.make_move(1, 1, 1).unwrap_err();
        assert!(matches!(err, ManagerError::StorageUnavailable(_)));
        assert_eq!(manager.status(), before);

        store.set_unavailable(false);
        let response = manager.make_move(1, 1, 1).unwrap();
        assert!(response.message.move_validity());
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_subscribers_see_adopted_sessions() {
        let (_store, manager) = manager();
        let mut rx = manager.subscribe();
        let started = manager.start('X').unwrap();
        assert_eq!(rx.try_recv().unwrap(), started);
        manager.make_move(0, 0, 1).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_recover_adopts_stored_session() {
        let store = Arc::new(MemoryStore::new());
        {
            let manager = SessionManager::new(Arc::clone(&store), Session::new(), 4);
            manager.start('X').unwrap();
            manager.join().unwrap();
            manager.make_move(2, 2, 1).unwrap();
        }
        let manager = SessionManager::recover(store, 4).unwrap();
        let session = manager.status();
        assert_eq!(session.turn(), PlayerId::Two);
        assert_eq!(session.board().used_positions(), 1);
    }
}
