//! Startup recovery: rebuild the session from the snapshot and move log.
//!
//! Players and scalars come from the snapshot. The board comes from
//! replaying the log without validation, since every record in it was
//! accepted before it was written. The outcome is taken from the snapshot
//! as stored, not recomputed.

use steadfast_tictactoe::{Board, MoveRecord, Outcome, Player, PlayerId, Session, Square};
use tracing::{debug, info, instrument, warn};

use crate::error::RecoveryError;
use crate::store::{SnapshotRow, Storage};

/// Seats being reassembled during replay.
#[derive(Debug, Default)]
struct Seats {
    player1: Option<Player>,
    player2: Option<Player>,
}

impl Seats {
    fn from_snapshot(row: &SnapshotRow) -> Result<Self, RecoveryError> {
        let seats = Self {
            player1: row.player1_mark.map(|m| Player::new(PlayerId::One, m)),
            player2: row.player2_mark.map(|m| Player::new(PlayerId::Two, m)),
        };
        match (seats.player1, seats.player2) {
            (None, Some(_)) => Err(RecoveryError::corrupt("player 2 seated without player 1")),
            (Some(p1), Some(p2)) if p1.mark() == p2.mark() => {
                Err(RecoveryError::corrupt("both players hold the same mark"))
            }
            _ => Ok(seats),
        }
    }

    fn slot(&mut self, id: PlayerId) -> &mut Option<Player> {
        match id {
            PlayerId::One => &mut self.player1,
            PlayerId::Two => &mut self.player2,
        }
    }

    /// Seats the mover from a log record if the snapshot lacked them,
    /// inferring the other seat as the complement.
    fn seat_from_record(&mut self, record: &MoveRecord) -> Result<(), RecoveryError> {
        let mover = Player::new(record.player_id, record.mark);
        match *self.slot(record.player_id) {
            Some(existing) if existing.mark() != record.mark => {
                return Err(RecoveryError::corrupt(format!(
                    "player {} recorded with {} but seated with {}",
                    record.player_id,
                    record.mark,
                    existing.mark()
                )));
            }
            Some(_) => {}
            None => {
                debug!(player = %record.player_id, mark = %record.mark, "Seat inferred from log");
                *self.slot(record.player_id) = Some(mover);
            }
        }
        let other = mover.opponent();
        match *self.slot(other.id()) {
            Some(existing) if existing.mark() != other.mark() => Err(RecoveryError::corrupt(
                format!("player {} holds {} like the opponent", other.id(), existing.mark()),
            )),
            Some(_) => Ok(()),
            None => {
                *self.slot(other.id()) = Some(other);
                Ok(())
            }
        }
    }
}

/// Places a known-accepted move with no rule checks.
///
/// Only recovery calls this; live requests go through
/// [`Engine::make_move`](steadfast_tictactoe::Engine::make_move).
fn replay_trusted(board: &mut Board, record: &MoveRecord) -> Result<(), RecoveryError> {
    match board.get(record.row, record.col) {
        Err(e) => Err(RecoveryError::corrupt(format!("logged move off the board: {}", e))),
        Ok(Square::Occupied(mark)) => Err(RecoveryError::corrupt(format!(
            "square ({}, {}) logged twice, already holds {}",
            record.row, record.col, mark
        ))),
        Ok(Square::Empty) => board
            .place(record.row, record.col, record.mark)
            .map_err(|e| RecoveryError::corrupt(e.to_string())),
    }
}

fn outcome_from(row: &SnapshotRow) -> Result<Outcome, RecoveryError> {
    match (row.winner, row.is_draw) {
        (0, false) => Ok(Outcome::Undecided),
        (0, true) => Ok(Outcome::Draw),
        (id, false) => PlayerId::try_from(id)
            .map(Outcome::Win)
            .map_err(|e| RecoveryError::corrupt(e.to_string())),
        (_, true) => Err(RecoveryError::corrupt("snapshot is both won and drawn")),
    }
}

/// Rebuilds the session from durable storage.
///
/// All-or-nothing: any read failure or inconsistency returns an error and
/// no partial session.
///
/// # Errors
///
/// [`RecoveryError::StorageUnavailable`] if storage cannot be read,
/// [`RecoveryError::Corrupt`] if the persisted data contradicts itself.
#[instrument(skip(store))]
pub fn rebuild<S: Storage + ?Sized>(store: &S) -> Result<Session, RecoveryError> {
    let snapshot = store.read()?;
    let records = store.read_all()?;
    debug!(?snapshot, moves = records.len(), "Durable state loaded");

    let turn = PlayerId::try_from(snapshot.turn).map_err(|e| RecoveryError::corrupt(e.to_string()))?;
    let outcome = outcome_from(&snapshot)?;
    let mut seats = Seats::from_snapshot(&snapshot)?;

    let mut board = Board::new();
    for record in &records {
        seats.seat_from_record(record)?;
        replay_trusted(&mut board, record)?;
    }

    if !snapshot.started {
        if seats.player1.is_some() || !records.is_empty() {
            warn!("Snapshot says not started but players or moves exist");
            return Err(RecoveryError::corrupt("players or moves recorded before start"));
        }
        if outcome != Outcome::Undecided || turn != PlayerId::One {
            warn!(?outcome, %turn, "Snapshot says not started but game has progressed");
            return Err(RecoveryError::corrupt("outcome or turn recorded before start"));
        }
    }

    let session = Session::from_parts(
        snapshot.started,
        board,
        seats.player1,
        seats.player2,
        turn,
        outcome,
    );
    info!(
        phase = %session.phase(),
        moves = records.len(),
        player1 = ?session.player1().map(|p| p.mark()),
        "Session recovered"
    );
    Ok(session)
}
