//! Wire shape of the session as existing clients read it.

use serde::Serialize;
use steadfast_tictactoe::{BOARD_SIZE, Mark, Outcome, Player, Session, Square};

/// A seated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// The player's mark.
    #[serde(rename = "type")]
    pub mark: Mark,
    /// Seat number, 1 or 2.
    pub id: u8,
}

impl From<Player> for PlayerView {
    fn from(player: Player) -> Self {
        Self {
            mark: player.mark(),
            id: player.id().as_u8(),
        }
    }
}

/// Session JSON sent by the board routes and the game board socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStatus {
    /// Player 1, null until start.
    pub p1: Option<PlayerView>,
    /// Player 2, null until join.
    pub p2: Option<PlayerView>,
    /// Whether start was called.
    pub game_started: bool,
    /// Seat to move next.
    pub turn: u8,
    /// Rows of `null`, `"X"` or `"O"`.
    pub board_state: [[Square; BOARD_SIZE]; BOARD_SIZE],
    /// Winning seat, 0 while undecided or drawn.
    pub winner: u8,
    /// Whether the game ended in a draw.
    pub is_draw: bool,
}

impl From<&Session> for BoardStatus {
    fn from(session: &Session) -> Self {
        let outcome = session.outcome();
        Self {
            p1: session.player1().map(PlayerView::from),
            p2: session.player2().map(PlayerView::from),
            game_started: session.started(),
            turn: session.turn().as_u8(),
            board_state: *session.board().rows(),
            winner: outcome.winner().map_or(0, |id| id.as_u8()),
            is_draw: outcome == Outcome::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use steadfast_tictactoe::Engine;

    #[test]
    fn test_fresh_session_json() {
        let value = serde_json::to_value(BoardStatus::from(&Session::new())).unwrap();
        assert_eq!(
            value,
            json!({
                "p1": null,
                "p2": null,
                "gameStarted": false,
                "turn": 1,
                "boardState": [[null, null, null], [null, null, null], [null, null, null]],
                "winner": 0,
                "isDraw": false
            })
        );
    }

    #[test]
    fn test_players_and_marks_json() {
        let mut engine = Engine::new();
        engine.start(Mark::O).unwrap();
        engine.join().unwrap();
        engine.make_move(1, 2, 1);
        let value = serde_json::to_value(BoardStatus::from(engine.session())).unwrap();
        assert_eq!(value["p1"], json!({"type": "O", "id": 1}));
        assert_eq!(value["p2"], json!({"type": "X", "id": 2}));
        assert_eq!(value["boardState"][1][2], json!("O"));
        assert_eq!(value["turn"], json!(2));
    }
}
