//! Integration tests for move-list import and export.

use goban_engine::board::Board;
use goban_engine::error::{MoveError, ReplayError};
use goban_engine::location::Location;
use goban_engine::moves::Action;
use goban_engine::player::{RandomPlayer, Strategy};
use goban_engine::position::Color;
use goban_engine::record::{MoveRecord, format_records, parse_records};

#[test]
fn test_records_round_trip_through_replay() {
    let mut board = Board::new(9);
    let mut player = RandomPlayer::with_seed(5);
    for _ in 0..30 {
        let action = player.choose(&board);
        board.make_move(action).unwrap();
    }

    let mut copy = Board::new(9);
    copy.replay(&board.records()).unwrap();
    assert_eq!(copy.records(), board.records());
    assert_eq!(copy.structural_snapshot(), board.structural_snapshot());
}

#[test]
fn test_text_round_trip_keeps_captures() {
    let mut board = Board::new(9);
    board.replay_text(";B[ba];W[aa];B[ab]").unwrap();
    assert_eq!(board.captures(Color::Black), 1);
    assert!(board.is_empty_at(Location::new(1, 1)));

    let text = board.record_text();
    assert_eq!(text, ";B[ba];W[aa];B[ab]");
    let mut copy = Board::new(9);
    copy.replay_text(&text).unwrap();
    assert_eq!(copy.hash(), board.hash());
}

#[test]
fn test_pass_and_resign_tokens() {
    let records = vec![
        MoveRecord::new(Action::Place(Location::new(4, 3)), Color::Black),
        MoveRecord::new(Action::Pass, Color::White),
        MoveRecord::new(Action::Resign, Color::Black),
    ];
    let text = format_records(&records);
    assert_eq!(text, ";B[cd];W[];B[resign]");
    assert_eq!(parse_records(&text).unwrap(), records);

    let mut board = Board::new(9);
    board.replay(&records).unwrap();
    assert!(board.is_game_over());
}

#[test]
fn test_malformed_token_is_a_parse_error() {
    let mut board = Board::new(9);
    match board.replay_text(";B[ee];W[e]") {
        Err(ReplayError::Parse(err)) => {
            assert_eq!(err.index, 1);
            assert_eq!(err.token, "W[e]");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
    // Moves before the bad token stay applied.
    assert_eq!(board.num_moves(), 1);
    assert_eq!(board.color_at(Location::new(5, 5)), Some(Color::Black));
}

#[test]
fn test_point_off_the_board_is_rejected_on_replay() {
    let mut board = Board::new(9);
    let err = board.replay_text(";B[jj]").unwrap_err();
    assert_eq!(
        err,
        ReplayError::Illegal {
            index: 0,
            source: MoveError::OutOfBounds(Location::new(10, 10)),
        }
    );
}
