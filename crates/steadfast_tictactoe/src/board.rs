//! The fixed-size grid of squares.

use crate::types::{Mark, Square};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board.
pub const BOARD_SIZE: usize = 3;

/// A coordinate outside `[0, BOARD_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Position ({}, {}) is out of bounds", row, col)]
pub struct OutOfBounds {
    /// Requested row.
    pub row: usize,
    /// Requested column.
    pub col: usize,
}

/// 3x3 tic-tac-toe board, indexed by `(row, col)`.
///
/// The board itself has no occupancy policy; a square can be overwritten
/// through [`Board::set`]. Callers that need "empty squares only" semantics
/// check [`Board::is_empty`] first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    squares: [[Square; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the square at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Square, OutOfBounds> {
        self.squares
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .ok_or(OutOfBounds { row, col })
    }

    /// Sets the square at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, square: Square) -> Result<(), OutOfBounds> {
        let cell = self
            .squares
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(OutOfBounds { row, col })?;
        *cell = square;
        Ok(())
    }

    /// Places a mark at `(row, col)`.
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), OutOfBounds> {
        self.set(row, col, Square::Occupied(mark))
    }

    /// Checks if a square is empty. Out-of-bounds squares are not empty.
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Ok(Square::Empty))
    }

    /// True iff no square is empty.
    pub fn is_full(&self) -> bool {
        self.used_positions() == BOARD_SIZE * BOARD_SIZE
    }

    /// Number of occupied squares.
    pub fn used_positions(&self) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|square| **square != Square::Empty)
            .count()
    }

    /// Rows in top-to-bottom order.
    pub fn rows(&self) -> &[[Square; BOARD_SIZE]; BOARD_SIZE] {
        &self.squares
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.squares.iter().enumerate() {
            for (c, square) in row.iter().enumerate() {
                let symbol = square.mark().map_or('.', Mark::symbol);
                write!(f, "{symbol}")?;
                if c + 1 < BOARD_SIZE {
                    write!(f, "|")?;
                }
            }
            if r + 1 < BOARD_SIZE {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.used_positions(), 0);
        assert!(!board.is_full());
        assert_eq!(board.get(1, 1), Ok(Square::Empty));
    }

    #[test]
    fn test_bounds_are_checked() {
        let mut board = Board::new();
        assert_eq!(board.get(3, 0), Err(OutOfBounds { row: 3, col: 0 }));
        assert_eq!(board.get(0, 3), Err(OutOfBounds { row: 0, col: 3 }));
        assert!(board.place(3, 3, Mark::X).is_err());
        assert_eq!(board.used_positions(), 0);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                assert!(!board.is_full());
                board.place(row, col, Mark::O).unwrap();
            }
        }
        assert!(board.is_full());
        assert_eq!(board.used_positions(), 9);
    }

    #[test]
    fn test_display() {
        let mut board = Board::new();
        board.place(0, 0, Mark::X).unwrap();
        board.place(2, 2, Mark::O).unwrap();
        assert_eq!(board.to_string(), "X|.|.\n-+-+-\n.|.|.\n-+-+-\n.|.|O");
    }

    #[test]
    fn test_serializes_as_nested_marks() {
        let mut board = Board::new();
        board.place(0, 1, Mark::X).unwrap();
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "squares": [[null, "X", null], [null, null, null], [null, null, null]]
            })
        );
    }
}
