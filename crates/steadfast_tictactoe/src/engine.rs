//! The session state machine.
//!
//! `NotStarted -> AwaitingPlayer2 -> InProgress -> Decided`. Every
//! operation either applies fully or leaves the session untouched.

use crate::board::OutOfBounds;
use crate::message::MoveCode;
use crate::rules;
use crate::session::{Outcome, Phase, Session};
use crate::types::{InvalidMark, Mark, MoveRecord, Player, PlayerId, Square};
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

/// Why start or join was refused. The session is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// The requested symbol is not a mark.
    #[display("{}", _0)]
    InvalidMark(InvalidMark),
    /// Start was already called; only a new game resets it.
    #[display("Game already started")]
    AlreadyStarted,
    /// Join requires a started game.
    #[display("Game not started")]
    NotStarted,
    /// Player 2 is already seated.
    #[display("Player 2 already joined")]
    AlreadyJoined,
}

impl From<InvalidMark> for EngineError {
    fn from(err: InvalidMark) -> Self {
        EngineError::InvalidMark(err)
    }
}

/// What a move request produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    /// Result code for the caller.
    pub code: MoveCode,
    /// The record to commit, present only when the move was placed.
    pub record: Option<MoveRecord>,
}

impl MoveReport {
    fn rejected(code: MoveCode) -> Self {
        Self { code, record: None }
    }
}

/// Tic-tac-toe engine over a single [`Session`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    session: Session,
}

impl Engine {
    /// Creates an engine over a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing session.
    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    /// Returns the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Consumes the engine, returning the session.
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Number of occupied squares.
    pub fn used_positions(&self) -> usize {
        self.session.board.used_positions()
    }

    /// Seats player 1 with `mark`.
    #[instrument(skip(self))]
    pub fn start(&mut self, mark: Mark) -> Result<Player, EngineError> {
        if self.session.phase() != Phase::NotStarted {
            warn!(phase = %self.session.phase(), "Start refused");
            return Err(EngineError::AlreadyStarted);
        }
        let player = Player::new(PlayerId::One, mark);
        self.session.player1 = Some(player);
        self.session.started = true;
        info!(%mark, "Player 1 seated");
        Ok(player)
    }

    /// Seats player 2 with the mark opposite player 1's.
    #[instrument(skip(self))]
    pub fn join(&mut self) -> Result<Player, EngineError> {
        let first = match self.session.phase() {
            Phase::AwaitingPlayer2 => self.session.player1.ok_or(EngineError::NotStarted)?,
            Phase::NotStarted => {
                warn!("Join before start");
                return Err(EngineError::NotStarted);
            }
            Phase::InProgress | Phase::Decided => {
                warn!("Join with both players seated");
                return Err(EngineError::AlreadyJoined);
            }
        };
        let player = first.opponent();
        self.session.player2 = Some(player);
        info!(mark = %player.mark(), "Player 2 seated");
        Ok(player)
    }

    /// Validates and applies a move. Rules apply in order; the first that
    /// matches decides the result and only an accepted move mutates.
    #[instrument(skip(self))]
    pub fn make_move(&mut self, row: i32, col: i32, player_id: i32) -> MoveReport {
        if self.session.outcome.is_decided() {
            debug!("Move after game end");
            return MoveReport::rejected(MoveCode::GameOver);
        }

        let (Some(player1), Some(player2)) = (self.session.player1, self.session.player2) else {
            debug!("Move before both players present");
            return MoveReport::rejected(MoveCode::NotAllPlayersPresent);
        };

        if player_id != i32::from(self.session.turn.as_u8()) {
            debug!(turn = %self.session.turn, "Move out of turn");
            return MoveReport::rejected(MoveCode::WrongTurn);
        }
        let mover = match self.session.turn {
            PlayerId::One => player1,
            PlayerId::Two => player2,
        };

        let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
            debug!("Negative coordinate");
            return MoveReport::rejected(MoveCode::OutOfBounds);
        };
        match self.session.board.get(row, col) {
            Err(e) => {
                debug!(error = %e, "Coordinate past edge");
                return MoveReport::rejected(MoveCode::OutOfBounds);
            }
            Ok(Square::Occupied(_)) => {
                debug!("Square taken");
                return MoveReport::rejected(MoveCode::CellOccupied);
            }
            Ok(Square::Empty) => {}
        }

        let record = MoveRecord {
            player_id: mover.id(),
            mark: mover.mark(),
            row,
            col,
        };
        if let Err(e) = self.apply(&record, mover.id()) {
            debug!(error = %e, "Placement refused");
            return MoveReport::rejected(MoveCode::OutOfBounds);
        }

        let code = match self.session.outcome {
            Outcome::Win(_) => MoveCode::Win,
            Outcome::Draw => MoveCode::Draw,
            Outcome::Undecided => MoveCode::Accepted,
        };
        info!(%code, used = self.used_positions(), "Move placed");
        MoveReport {
            code,
            record: Some(record),
        }
    }

    /// Places a validated move, flips the turn and recomputes the outcome.
    /// Nothing changes if the square is off the board.
    fn apply(&mut self, record: &MoveRecord, mover: PlayerId) -> Result<(), OutOfBounds> {
        self.session
            .board
            .place(record.row, record.col, record.mark)?;
        self.session.turn = mover.other();
        self.session.outcome = if rules::check_winner(&self.session.board).is_some() {
            Outcome::Win(mover)
        } else if rules::is_full(&self.session.board) {
            Outcome::Draw
        } else {
            Outcome::Undecided
        };
        Ok(())
    }
}
