//! Integration tests for the alpha-beta searcher.

use std::sync::Arc;

use goban_engine::board::Board;
use goban_engine::cache::ScoreCache;
use goban_engine::config::{SearchConfig, SearchStrategy};
use goban_engine::eval::{Weights, WorthEvaluator};
use goban_engine::location::Location;
use goban_engine::moves::Action;
use goban_engine::player::{RandomPlayer, Strategy};
use goban_engine::search::Searcher;

// =============================================================================
// Helper functions
// =============================================================================

fn small_search(depth: u8) -> SearchConfig {
    SearchConfig {
        depth,
        parallel: false,
        threads: 1,
        max_candidates: 4,
        cache_capacity: 10_000,
        ..SearchConfig::default()
    }
}

fn assert_playable(board: &Board, action: Action) {
    match action {
        Action::Place(loc) => assert!(
            board.is_legal(loc, board.to_move()),
            "search chose illegal {loc}\n{board}"
        ),
        Action::Pass => {}
        Action::Resign => panic!("search resigned"),
    }
}

/// Positions reached by random play from an empty board.
fn random_positions(count: usize, moves: usize) -> Vec<Board> {
    (0..count as u64)
        .map(|seed| {
            let mut board = Board::new(9);
            let mut player = RandomPlayer::with_seed(seed);
            for _ in 0..moves {
                let action = player.choose(&board);
                board.make_move(action).unwrap();
            }
            board
        })
        .collect()
}

// =============================================================================
// Legality
// =============================================================================

#[test]
fn test_search_always_returns_a_legal_move() {
    let searcher = Searcher::new(small_search(2), Weights::default());
    for board in random_positions(3, 12) {
        let result = searcher.search(&board);
        assert_playable(&board, result.action);
    }
}

#[test]
fn test_parallel_search_returns_a_legal_move() {
    let config = SearchConfig {
        parallel: true,
        threads: 3,
        ..small_search(2)
    };
    let searcher = Searcher::new(config, Weights::default());
    for board in random_positions(2, 10) {
        let result = searcher.search(&board);
        assert_playable(&board, result.action);
        assert_eq!(result.stats.depth, 2);
    }
}

#[test]
fn test_search_leaves_board_untouched() {
    let mut board = Board::new(9);
    board.play(Location::new(3, 3)).unwrap();
    let before = board.structural_snapshot();
    Searcher::new(small_search(2), Weights::default()).search(&board);
    assert_eq!(board.structural_snapshot(), before);
    assert_eq!(board.num_moves(), 1);
}

// =============================================================================
// Strategies and limits
// =============================================================================

#[test]
fn test_minimax_and_negamax_find_the_same_value() {
    let mut board = Board::new(9);
    board.play(Location::new(3, 3)).unwrap();
    board.play(Location::new(7, 7)).unwrap();

    let negamax = Searcher::new(small_search(2), Weights::default()).search(&board);
    let minimax_config = SearchConfig {
        strategy: SearchStrategy::Minimax,
        ..small_search(2)
    };
    let minimax = Searcher::new(minimax_config, Weights::default()).search(&board);
    assert!((negamax.value - minimax.value).abs() < 1e-9);
}

#[test]
fn test_time_budget_stops_deepening() {
    let mut board = Board::new(9);
    board.play(Location::new(5, 5)).unwrap();
    let config = SearchConfig {
        depth: 12,
        time_budget_ms: 1,
        max_candidates: 8,
        ..small_search(12)
    };
    let result = Searcher::new(config, Weights::default()).search(&board);
    assert!(result.stats.timed_out);
    assert!(result.stats.depth < 12);
    assert_playable(&board, result.action);
}

#[test]
fn test_searchers_can_share_a_cache() {
    let board = Board::new(9);
    let cache = Arc::new(ScoreCache::new(1_000));
    let evaluator = Arc::new(WorthEvaluator::new(Weights::default()));
    let first = Searcher::with_parts(small_search(1), evaluator.clone(), Arc::clone(&cache));
    let second = Searcher::with_parts(small_search(1), evaluator, Arc::clone(&cache));

    first.search(&board);
    let filled = cache.len();
    assert!(filled > 0);
    let result = second.search(&board);
    assert!(result.stats.cache_hits > 0);
    assert_eq!(cache.len(), filled);
}

#[test]
fn test_cache_capacity_is_respected() {
    let config = SearchConfig {
        cache_capacity: 16,
        ..small_search(2)
    };
    let searcher = Searcher::new(config, Weights::default());
    searcher.search(&Board::new(9));
    assert!(searcher.cache().len() <= 16);
}
