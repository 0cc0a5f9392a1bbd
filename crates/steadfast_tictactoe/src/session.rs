//! The single game session: board, players, turn and outcome.

use crate::board::Board;
use crate::types::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// How the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    /// Still being played.
    #[default]
    Undecided,
    /// A player completed a line.
    Win(PlayerId),
    /// The board filled with no line.
    Draw,
}

impl Outcome {
    /// True for `Win` and `Draw`.
    pub fn is_decided(self) -> bool {
        !matches!(self, Outcome::Undecided)
    }

    /// The winner, if there is one.
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            Outcome::Win(id) => Some(id),
            Outcome::Undecided | Outcome::Draw => None,
        }
    }
}

/// Lifecycle phase, derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Phase {
    /// Nobody has called start.
    NotStarted,
    /// Player 1 is seated, waiting for player 2.
    AwaitingPlayer2,
    /// Both seated and the game is open.
    InProgress,
    /// Won or drawn.
    Decided,
}

/// Complete state of the active game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) started: bool,
    pub(crate) board: Board,
    pub(crate) player1: Option<Player>,
    pub(crate) player2: Option<Player>,
    pub(crate) turn: PlayerId,
    pub(crate) outcome: Outcome,
}

impl Session {
    /// Creates an empty, not-started session.
    pub fn new() -> Self {
        Self {
            started: false,
            board: Board::new(),
            player1: None,
            player2: None,
            turn: PlayerId::One,
            outcome: Outcome::Undecided,
        }
    }

    /// Reassembles a session from its parts.
    ///
    /// No rule checks are applied; this is for restoring state that was
    /// already validated when it was first produced.
    pub fn from_parts(
        started: bool,
        board: Board,
        player1: Option<Player>,
        player2: Option<Player>,
        turn: PlayerId,
        outcome: Outcome,
    ) -> Self {
        Self {
            started,
            board,
            player1,
            player2,
            turn,
            outcome,
        }
    }

    /// Whether start has been called.
    pub fn started(&self) -> bool {
        self.started
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player 1, seated by start.
    pub fn player1(&self) -> Option<Player> {
        self.player1
    }

    /// Player 2, seated by join.
    pub fn player2(&self) -> Option<Player> {
        self.player2
    }

    /// The player in the given seat.
    pub fn player(&self, id: PlayerId) -> Option<Player> {
        match id {
            PlayerId::One => self.player1,
            PlayerId::Two => self.player2,
        }
    }

    /// Whose move it is.
    pub fn turn(&self) -> PlayerId {
        self.turn
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Derives the lifecycle phase.
    pub fn phase(&self) -> Phase {
        if self.outcome.is_decided() {
            Phase::Decided
        } else if !self.started || self.player1.is_none() {
            Phase::NotStarted
        } else if self.player2.is_none() {
            Phase::AwaitingPlayer2
        } else {
            Phase::InProgress
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
