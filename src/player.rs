//! Move-choosing strategies.

use std::sync::Arc;

use crate::board::Board;
use crate::config::SearchConfig;
use crate::eval::Weights;
use crate::movegen::is_own_eye;
use crate::moves::Action;
use crate::oracle::{FeatureTensor, ScoringOracle};
use crate::search::{SearchResult, SearchStats, Searcher};

/// Something that picks the next move for the side to move.
pub trait Strategy: Send {
    fn name(&self) -> &str;

    /// Pick a move for `board.to_move()`. The board is left unchanged.
    fn choose(&mut self, board: &Board) -> Action;
}

/// Plays the alpha-beta search result.
#[derive(Debug)]
pub struct SearchPlayer {
    searcher: Searcher,
    last: Option<SearchResult>,
}

impl SearchPlayer {
    pub fn new(config: SearchConfig, weights: Weights) -> Self {
        Self::with_searcher(Searcher::new(config, weights))
    }

    pub fn with_searcher(searcher: Searcher) -> Self {
        Self {
            searcher,
            last: None,
        }
    }

    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// Statistics of the most recent decision.
    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last.as_ref().map(|r| &r.stats)
    }

    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last.as_ref()
    }
}

impl Strategy for SearchPlayer {
    fn name(&self) -> &str {
        "search"
    }

    fn choose(&mut self, board: &Board) -> Action {
        let result = self.searcher.search(board);
        tracing::debug!(
            action = %result.action,
            value = result.value,
            depth = result.stats.depth,
            nodes = result.stats.nodes,
            "search decision"
        );
        let action = result.action;
        self.last = Some(result);
        action
    }
}

/// Plays the oracle's favourite legal move. The oracle is asked once per
/// decision.
pub struct PolicyPlayer {
    oracle: Arc<dyn ScoringOracle>,
}

impl PolicyPlayer {
    pub fn new(oracle: Arc<dyn ScoringOracle>) -> Self {
        Self { oracle }
    }
}

impl Strategy for PolicyPlayer {
    fn name(&self) -> &str {
        "policy"
    }

    fn choose(&mut self, board: &Board) -> Action {
        let color = board.to_move();
        let features = FeatureTensor::from_board(board, color);
        let policy = self.oracle.policy(&features);
        let prior = |index: usize| policy.get(index).copied().unwrap_or(f32::NEG_INFINITY);

        let mut scratch = board.clone();
        let mut best = (Action::Pass, prior(features.pass_index()));
        for loc in board.legal_moves(color) {
            let p = prior(features.policy_index(loc));
            if p > best.1 && !is_own_eye(&mut scratch, loc, color) {
                best = (Action::Place(loc), p);
            }
        }
        best.0
    }
}

impl std::fmt::Debug for PolicyPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyPlayer").finish_non_exhaustive()
    }
}

/// Plays a uniformly random legal move, never filling its own eyes.
#[derive(Debug)]
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomPlayer {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, board: &Board) -> Action {
        let color = board.to_move();
        let mut scratch = board.clone();
        let mut candidates = board.legal_moves(color);
        candidates.retain(|&loc| !is_own_eye(&mut scratch, loc, color));
        if candidates.is_empty() {
            return Action::Pass;
        }
        Action::Place(candidates[self.rng.usize(..candidates.len())])
    }
}
