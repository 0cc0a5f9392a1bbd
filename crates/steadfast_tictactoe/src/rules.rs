//! Win and draw detection.
//!
//! Pure functions over a [`Board`], usable without driving moves through
//! the engine.

use crate::board::{BOARD_SIZE, Board};
use crate::types::{Mark, Square};
use tracing::instrument;

/// Every line that wins: each row, each column, both diagonals.
fn lines() -> impl Iterator<Item = [(usize, usize); BOARD_SIZE]> {
    let rows = (0..BOARD_SIZE).map(|r| std::array::from_fn(|i| (r, i)));
    let cols = (0..BOARD_SIZE).map(|c| std::array::from_fn(|i| (i, c)));
    let diagonal = std::array::from_fn(|i| (i, i));
    let anti_diagonal = std::array::from_fn(|i| (i, BOARD_SIZE - 1 - i));
    rows.chain(cols).chain([diagonal, anti_diagonal])
}

/// Returns the mark that fills a whole line, if any.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    let rows = board.rows();
    lines().find_map(|line| {
        let [(r0, c0), rest @ ..] = line;
        let first = rows[r0][c0].mark()?;
        rest.iter()
            .all(|&(r, c)| rows[r][c] == Square::Occupied(first))
            .then_some(first)
    })
}

/// True iff every square is occupied.
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

/// A full board with no winning line.
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}
