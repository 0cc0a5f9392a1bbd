//! Database rows and their conversion to domain types.

use derive_new::new;
use diesel::prelude::*;
use steadfast_tictactoe::{Mark, MoveRecord, PlayerId};

use super::{SnapshotRow, schema};
use crate::error::StorageError;

/// Row id of the only snapshot row.
pub const SNAPSHOT_ID: i32 = 1;

/// A committed move.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schema::moves)]
pub struct MoveRow {
    id: i32,
    player_id: i32,
    mark: String,
    board_row: i32,
    board_col: i32,
}

/// Insertable move.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::moves)]
pub struct NewMove {
    player_id: i32,
    mark: String,
    board_row: i32,
    board_col: i32,
}

/// The snapshot row as stored.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = schema::session_snapshot)]
pub struct SnapshotRecord {
    pub id: i32,
    pub started: bool,
    pub turn: i32,
    pub winner: i32,
    pub is_draw: bool,
    pub player1_mark: Option<String>,
    pub player2_mark: Option<String>,
}

#[track_caller]
fn parse_mark(text: &str) -> Result<Mark, StorageError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Mark::try_from(symbol)
            .map_err(|e| StorageError::new(format!("Stored mark unreadable: {}", e))),
        _ => Err(StorageError::new(format!("Stored mark unreadable: {:?}", text))),
    }
}

#[track_caller]
fn narrow<T: TryFrom<i32>>(value: i32, column: &str) -> Result<T, StorageError> {
    T::try_from(value)
        .map_err(|_| StorageError::new(format!("Column {} out of range: {}", column, value)))
}

impl TryFrom<&MoveRecord> for NewMove {
    type Error = StorageError;

    fn try_from(record: &MoveRecord) -> Result<Self, Self::Error> {
        let row = i32::try_from(record.row)
            .map_err(|_| StorageError::new(format!("Row too large: {}", record.row)))?;
        let col = i32::try_from(record.col)
            .map_err(|_| StorageError::new(format!("Column too large: {}", record.col)))?;
        Ok(NewMove::new(
            i32::from(record.player_id.as_u8()),
            record.mark.to_string(),
            row,
            col,
        ))
    }
}

impl TryFrom<MoveRow> for MoveRecord {
    type Error = StorageError;

    fn try_from(row: MoveRow) -> Result<Self, Self::Error> {
        let id: u8 = narrow(row.player_id, "player_id")?;
        let player_id = PlayerId::try_from(id)
            .map_err(|e| StorageError::new(format!("Move {}: {}", row.id, e)))?;
        Ok(MoveRecord {
            player_id,
            mark: parse_mark(&row.mark)?,
            row: narrow(row.board_row, "board_row")?,
            col: narrow(row.board_col, "board_col")?,
        })
    }
}

impl From<&SnapshotRow> for SnapshotRecord {
    fn from(row: &SnapshotRow) -> Self {
        Self {
            id: SNAPSHOT_ID,
            started: row.started,
            turn: i32::from(row.turn),
            winner: i32::from(row.winner),
            is_draw: row.is_draw,
            player1_mark: row.player1_mark.map(|m| m.to_string()),
            player2_mark: row.player2_mark.map(|m| m.to_string()),
        }
    }
}

impl TryFrom<SnapshotRecord> for SnapshotRow {
    type Error = StorageError;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        Ok(SnapshotRow {
            started: record.started,
            turn: narrow(record.turn, "turn")?,
            winner: narrow(record.winner, "winner")?,
            is_draw: record.is_draw,
            player1_mark: record.player1_mark.as_deref().map(parse_mark).transpose()?,
            player2_mark: record.player2_mark.as_deref().map(parse_mark).transpose()?,
        })
    }
}
