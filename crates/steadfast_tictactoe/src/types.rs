//! Core domain types for tic-tac-toe.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Symbol a player places on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, strum::EnumIter,
)]
pub enum Mark {
    /// Cross.
    #[display("X")]
    X,
    /// Nought.
    #[display("O")]
    O,
}

impl Mark {
    /// Returns the opposite mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Returns the character clients use for this mark.
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// A symbol that is neither `X` nor `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Invalid mark: {:?}", symbol)]
pub struct InvalidMark {
    /// The rejected symbol.
    pub symbol: char,
}

impl TryFrom<char> for Mark {
    type Error = InvalidMark;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol {
            'X' => Ok(Mark::X),
            'O' => Ok(Mark::O),
            other => Err(InvalidMark { symbol: other }),
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Mark>", into = "Option<Mark>")]
pub enum Square {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Square holds a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Square {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(Square::Empty, Square::Occupied)
    }
}

impl From<Square> for Option<Mark> {
    fn from(square: Square) -> Self {
        square.mark()
    }
}

/// Seat of a player in the session: whoever started is `One`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PlayerId {
    /// The player who called start.
    #[display("1")]
    One,
    /// The player who joined.
    #[display("2")]
    Two,
}

impl PlayerId {
    /// Numeric id used on the wire and in storage.
    pub fn as_u8(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// Returns the other seat.
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

/// A numeric player id outside `{1, 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Unknown player id: {}", id)]
pub struct UnknownPlayer {
    /// The rejected id.
    pub id: u8,
}

impl TryFrom<u8> for PlayerId {
    type Error = UnknownPlayer;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            other => Err(UnknownPlayer { id: other }),
        }
    }
}

/// A seated player. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    mark: Mark,
}

impl Player {
    /// Creates a player.
    pub fn new(id: PlayerId, mark: Mark) -> Self {
        Self { id, mark }
    }

    /// Seat of this player.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Mark this player places.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// The player in the other seat, holding the opposite mark.
    pub fn opponent(&self) -> Self {
        Self::new(self.id.other(), self.mark.opponent())
    }
}

/// One accepted move, as written to the durable log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Who moved.
    pub player_id: PlayerId,
    /// What they placed.
    pub mark: Mark,
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_decoding() {
        assert_eq!(Mark::try_from('X'), Ok(Mark::X));
        assert_eq!(Mark::try_from('O'), Ok(Mark::O));
        assert_eq!(Mark::try_from('P'), Err(InvalidMark { symbol: 'P' }));
        assert_eq!(Mark::try_from('x'), Err(InvalidMark { symbol: 'x' }));
    }

    #[test]
    fn test_opponent_is_complement() {
        let player = Player::new(PlayerId::One, Mark::O);
        let other = player.opponent();
        assert_eq!(other.id(), PlayerId::Two);
        assert_eq!(other.mark(), Mark::X);
    }

    #[test]
    fn test_player_id_decoding() {
        assert_eq!(PlayerId::try_from(1), Ok(PlayerId::One));
        assert_eq!(PlayerId::try_from(2), Ok(PlayerId::Two));
        assert!(PlayerId::try_from(0).is_err());
        assert!(PlayerId::try_from(3).is_err());
    }
}
