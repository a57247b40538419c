//! Integration tests for loading configuration files.

use std::io::Write;

use goban_engine::board::Board;
use goban_engine::config::{BoardConfig, GameConfig, SearchStrategy};
use goban_engine::error::ConfigError;
use goban_engine::position::Color;

#[test]
fn test_load_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "board": {{ "size": 13, "handicap": 2, "enforce_ko": false }},
            "search": {{ "depth": 3, "strategy": "minimax", "threads": 2 }},
            "weights": {{ "captures": 2.0 }}
        }}"#
    )
    .unwrap();

    let config = GameConfig::from_file(file.path()).unwrap();
    assert_eq!(config.board.size, 13);
    assert_eq!(config.board.handicap, 2);
    assert!(!config.board.enforce_ko);
    assert_eq!(config.search.depth, 3);
    assert_eq!(config.search.strategy, SearchStrategy::Minimax);
    assert_eq!(config.search.effective_threads(), 2);
    assert_eq!(config.weights.captures, 2.0);
    assert_eq!(config.weights.health, 1.0);

    let board = Board::with_config(&config.board);
    assert_eq!(board.size(), 13);
    assert_eq!(board.stone_count(Color::Black), 2);
    assert!(!board.enforces_ko());
    assert_eq!(board.to_move(), Color::White);
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.json");
    let mut config = GameConfig::default();
    config.search.time_budget_ms = 250;
    config.board.size = 19;
    std::fs::write(&path, config.to_json().unwrap()).unwrap();

    assert_eq!(GameConfig::from_file(&path).unwrap(), config);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = GameConfig::from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_invalid_values_are_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "search": {{ "best_moves_percentage": 0 }} }}"#).unwrap();
    assert!(matches!(
        GameConfig::from_file(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_board_from_unchecked_config_is_an_error() {
    let config = BoardConfig {
        size: 40,
        ..BoardConfig::default()
    };
    assert!(matches!(
        Board::try_with_config(&config),
        Err(ConfigError::Invalid(_))
    ));

    let config = BoardConfig {
        size: 9,
        handicap: 2,
        ..BoardConfig::default()
    };
    let board = Board::try_with_config(&config).unwrap();
    assert_eq!(board.size(), 9);
    assert_eq!(board.to_move(), Color::White);
}
