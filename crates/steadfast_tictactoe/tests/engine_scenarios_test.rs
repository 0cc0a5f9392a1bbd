//! Scenario tests for the session state machine.

use steadfast_tictactoe::{
    BOARD_SIZE, Engine, EngineError, Mark, MoveCode, Outcome, Phase, PlayerId, Square,
};
use strum::IntoEnumIterator;

fn joined(mark: Mark) -> Engine {
    let mut engine = Engine::new();
    engine.start(mark).expect("start");
    engine.join().expect("join");
    engine
}

#[test]
fn test_join_assigns_opposite_mark() {
    for mark in Mark::iter() {
        let engine = joined(mark);
        let session = engine.session();
        assert_eq!(session.player1().map(|p| p.mark()), Some(mark));
        assert_eq!(session.player2().map(|p| p.mark()), Some(mark.opponent()));
        assert_eq!(session.phase(), Phase::InProgress);
    }
}

#[test]
fn test_invalid_symbol_leaves_session_untouched() {
    let mut engine = Engine::new();
    let result = Mark::try_from('P')
        .map_err(EngineError::from)
        .and_then(|mark| engine.start(mark));
    assert!(matches!(result, Err(EngineError::InvalidMark(_))));
    assert!(!engine.session().started());
    assert_eq!(engine.session().phase(), Phase::NotStarted);
}

#[test]
fn test_out_of_bounds_never_mutates() {
    let mut engine = joined(Mark::X);
    let edges = [-5, -1, 3, 4, i32::MAX, i32::MIN];
    for &bad in &edges {
        for good in 0..3 {
            assert_eq!(engine.make_move(bad, good, 1).code, MoveCode::OutOfBounds);
            assert_eq!(engine.make_move(good, bad, 1).code, MoveCode::OutOfBounds);
        }
    }
    assert_eq!(engine.used_positions(), 0);
    assert_eq!(engine.session().turn(), PlayerId::One);
}

#[test]
fn test_moves_before_join_report_missing_player() {
    let mut engine = Engine::new();
    assert_eq!(engine.make_move(0, 0, 1).code, MoveCode::NotAllPlayersPresent);
    assert_eq!(engine.make_move(0, 0, 2).code, MoveCode::NotAllPlayersPresent);
    engine.start(Mark::X).expect("start");
    assert_eq!(engine.make_move(0, 0, 1).code, MoveCode::NotAllPlayersPresent);
    assert_eq!(engine.make_move(0, 0, 2).code, MoveCode::NotAllPlayersPresent);
}

#[test]
fn test_turns_alternate() {
    let mut engine = joined(Mark::X);
    assert_eq!(engine.make_move(0, 0, 1).code, MoveCode::Accepted);
    assert_eq!(engine.make_move(0, 1, 1).code, MoveCode::WrongTurn);
    assert_eq!(engine.make_move(0, 1, 2).code, MoveCode::Accepted);
    assert_eq!(engine.make_move(0, 2, 2).code, MoveCode::WrongTurn);
    assert_eq!(engine.session().turn(), PlayerId::One);
}

#[test]
fn test_occupied_square_keeps_its_mark() {
    let mut engine = joined(Mark::X);
    engine.make_move(1, 1, 1);
    // Walk every square in order and try to overwrite the centre each turn.
    let mut player = 2;
    for row in 0..BOARD_SIZE as i32 {
        for col in 0..BOARD_SIZE as i32 {
            if engine.session().outcome().is_decided() {
                break;
            }
            assert_eq!(engine.make_move(1, 1, player).code, MoveCode::CellOccupied);
            let report = engine.make_move(row, col, player);
            if report.code.is_accepted() {
                player = 3 - player;
            }
            assert_eq!(
                engine.session().board().get(1, 1),
                Ok(Square::Occupied(Mark::X))
            );
        }
    }
}

#[test]
fn test_concrete_opening() {
    let mut engine = joined(Mark::X);
    assert_eq!(engine.make_move(0, 0, 1).code, MoveCode::Accepted);
    assert_eq!(
        engine.session().board().get(0, 0),
        Ok(Square::Occupied(Mark::X))
    );
    assert_eq!(engine.session().turn(), PlayerId::Two);
    assert_eq!(engine.make_move(0, 0, 2).code, MoveCode::CellOccupied);
    assert_eq!(engine.make_move(1, 0, 2).code, MoveCode::Accepted);
    assert_eq!(engine.session().turn(), PlayerId::One);
}

#[test]
fn test_row_win_then_game_over() {
    let mut engine = joined(Mark::X);
    engine.make_move(0, 0, 1);
    engine.make_move(1, 0, 2);
    engine.make_move(0, 1, 1);
    engine.make_move(1, 1, 2);
    assert_eq!(engine.make_move(0, 2, 1).code, MoveCode::Win);
    assert_eq!(engine.session().outcome(), Outcome::Win(PlayerId::One));

    let before = engine.session().clone();
    assert_eq!(engine.make_move(2, 2, 2).code, MoveCode::GameOver);
    assert_eq!(engine.make_move(2, 2, 1).code, MoveCode::GameOver);
    assert_eq!(engine.session(), &before);
}

#[test]
fn test_player_two_can_win() {
    let mut engine = joined(Mark::O);
    engine.make_move(0, 0, 1);
    engine.make_move(1, 0, 2);
    engine.make_move(0, 1, 1);
    engine.make_move(1, 1, 2);
    engine.make_move(2, 2, 1);
    assert_eq!(engine.make_move(1, 2, 2).code, MoveCode::Win);
    assert_eq!(engine.session().outcome().winner(), Some(PlayerId::Two));
}

#[test]
fn test_draw_on_last_square() {
    // X O X
    // X O O
    // O X X
    let moves = [
        (0, 0, 1),
        (0, 1, 2),
        (0, 2, 1),
        (1, 1, 2),
        (1, 0, 1),
        (2, 0, 2),
        (2, 1, 1),
        (1, 2, 2),
    ];
    let mut engine = joined(Mark::X);
    for (row, col, id) in moves {
        assert_eq!(engine.make_move(row, col, id).code, MoveCode::Accepted);
        assert_eq!(engine.session().outcome(), Outcome::Undecided);
    }
    assert_eq!(engine.make_move(2, 2, 1).code, MoveCode::Draw);
    assert_eq!(engine.session().outcome(), Outcome::Draw);
    assert_eq!(engine.used_positions(), 9);
    assert_eq!(engine.make_move(0, 0, 2).code, MoveCode::GameOver);
}

#[test]
fn test_win_on_last_square_beats_draw() {
    // X O X
    // O X O
    // O X X  <- final move fills the board and completes the diagonal
    let moves = [
        (0, 0, 1),
        (0, 1, 2),
        (0, 2, 1),
        (1, 0, 2),
        (1, 1, 1),
        (1, 2, 2),
        (2, 1, 1),
        (2, 0, 2),
    ];
    let mut engine = joined(Mark::X);
    for (row, col, id) in moves {
        assert_eq!(engine.make_move(row, col, id).code, MoveCode::Accepted);
    }
    assert_eq!(engine.make_move(2, 2, 1).code, MoveCode::Win);
    assert!(engine.session().board().is_full());
    assert_eq!(engine.session().outcome(), Outcome::Win(PlayerId::One));
}
