//! Move result codes and the message clients receive for them.

use serde::{Deserialize, Serialize};

/// Result of a move request.
///
/// Wire values are fixed by existing clients. A drawing move has no code of
/// its own and reports `100`; the session's draw flag tells it apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
pub enum MoveCode {
    /// Move placed, game continues.
    Accepted,
    /// Move placed and the board filled with no line.
    Draw,
    /// Row or column outside the board.
    OutOfBounds,
    /// Target square already holds a mark.
    CellOccupied,
    /// Player 2 has not joined yet.
    NotAllPlayersPresent,
    /// Not this player's move.
    WrongTurn,
    /// Move placed and completed a line.
    Win,
    /// The game is already won or drawn.
    GameOver,
}

impl MoveCode {
    /// Numeric code sent to clients.
    pub fn code(self) -> u16 {
        match self {
            MoveCode::Accepted | MoveCode::Draw => 100,
            MoveCode::OutOfBounds => 201,
            MoveCode::CellOccupied => 202,
            MoveCode::NotAllPlayersPresent => 301,
            MoveCode::WrongTurn => 302,
            MoveCode::Win => 401,
            MoveCode::GameOver => 402,
        }
    }

    /// Decodes a numeric code. `100` decodes as `Accepted`.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            100 => Some(MoveCode::Accepted),
            201 => Some(MoveCode::OutOfBounds),
            202 => Some(MoveCode::CellOccupied),
            301 => Some(MoveCode::NotAllPlayersPresent),
            302 => Some(MoveCode::WrongTurn),
            401 => Some(MoveCode::Win),
            402 => Some(MoveCode::GameOver),
            _ => None,
        }
    }

    /// True when the move was placed on the board.
    pub fn is_accepted(self) -> bool {
        matches!(self, MoveCode::Accepted | MoveCode::Draw | MoveCode::Win)
    }

    /// Human-readable explanation.
    pub fn text(self) -> &'static str {
        match self {
            MoveCode::Accepted => "",
            MoveCode::Draw => "The game is a draw.",
            MoveCode::OutOfBounds => "This position is out of bounds.",
            MoveCode::CellOccupied => "This position has been occupied.",
            MoveCode::NotAllPlayersPresent => "Please wait for the other player to join.",
            MoveCode::WrongTurn => "It's not your turn.",
            MoveCode::Win => "You win!",
            MoveCode::GameOver => "The game is over.",
        }
    }
}

/// Response body for a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    move_validity: bool,
    code: u16,
    message: String,
}

impl Message {
    /// Builds the message for a known result.
    pub fn new(code: MoveCode) -> Self {
        Self {
            move_validity: code.is_accepted(),
            code: code.code(),
            message: code.text().to_string(),
        }
    }

    /// Builds a message for any numeric code; unknown codes yield an
    /// invalid move with empty text.
    pub fn from_code(code: u16) -> Self {
        match MoveCode::from_code(code) {
            Some(known) => Self::new(known),
            None => Self {
                move_validity: false,
                code,
                message: String::new(),
            },
        }
    }

    /// Whether the move was placed.
    pub fn move_validity(&self) -> bool {
        self.move_validity
    }

    /// Numeric code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Explanation text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<MoveCode> for Message {
    fn from(code: MoveCode) -> Self {
        Self::new(code)
    }
}
