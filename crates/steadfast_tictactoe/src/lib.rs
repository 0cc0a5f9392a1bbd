//! Server-authoritative tic-tac-toe.
//!
//! Pure game logic with no I/O: the board, the session with its two
//! players, and the [`Engine`] state machine that validates moves and
//! decides wins and draws. Every accepted move yields a [`MoveRecord`]
//! for the caller to persist.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod engine;
mod message;
pub mod rules;
mod session;
mod types;

pub use board::{BOARD_SIZE, Board, OutOfBounds};
pub use engine::{Engine, EngineError, MoveReport};
pub use message::{Message, MoveCode};
pub use session::{Outcome, Phase, Session};
pub use types::{InvalidMark, Mark, MoveRecord, Player, PlayerId, Square, UnknownPlayer};
