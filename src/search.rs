//! Alpha-beta search.
//!
//! The search deepens iteratively from one ply to the configured depth. Each
//! iteration evaluates every root candidate, on the worker pool when one is
//! available, with each branch working on its own copy of the board. Leaf
//! positions are scored by the [`Evaluator`] through the shared
//! [`ScoreCache`].
//!
//! Cancellation is cooperative: every node checks the [`CancelToken`], and
//! every `TIME_CHECK_INTERVAL` nodes the deadline. An interrupted iteration
//! is discarded unless no iteration has completed, in which case its partial
//! results are used. Failing that the best-ordered candidate is played, and
//! failing that a pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::cache::ScoreCache;
use crate::config::{SearchConfig, SearchStrategy};
use crate::constants::TIME_CHECK_INTERVAL;
use crate::eval::{Evaluator, Weights, WorthEvaluator};
use crate::movegen::MoveGenerator;
use crate::moves::{Action, Move};
use crate::pool::{Task, WorkerPool};
use crate::position::Color;

/// Shared flag asking a running search to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One explored move, recorded when tree recording is on.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTreeNode {
    /// `None` for the root.
    pub action: Option<Action>,
    pub color: Option<Color>,
    /// Window the node was searched with.
    pub alpha: f64,
    pub beta: f64,
    /// Value from the mover's side, if the node was finished.
    pub value: Option<f64>,
    /// Whether the remaining children were cut off.
    pub pruned: bool,
    pub children: Vec<SearchTreeNode>,
}

impl SearchTreeNode {
    fn root() -> Self {
        Self::new(None, None, f64::NEG_INFINITY, f64::INFINITY)
    }

    fn new(action: Option<Action>, color: Option<Color>, alpha: f64, beta: f64) -> Self {
        Self {
            action,
            color,
            alpha,
            beta,
            value: None,
            pruned: false,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SearchTreeNode::size).sum::<usize>()
    }
}

/// Counters for one decision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Deepest fully completed iteration; 0 if none completed.
    pub depth: u8,
    pub nodes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub elapsed: Duration,
    /// The deadline or the cancel token stopped the search.
    pub timed_out: bool,
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub action: Action,
    /// Value of `action` from the mover's side.
    pub value: f64,
    /// Root candidates in the order of the last completed iteration, with
    /// their values.
    pub root_moves: Vec<Move>,
    pub stats: SearchStats,
    pub tree: Option<SearchTreeNode>,
}

/// State shared, read-only, by every search thread.
#[derive(Clone)]
struct Shared {
    evaluator: Arc<dyn Evaluator>,
    cache: Arc<ScoreCache>,
    generator: MoveGenerator,
    strategy: SearchStrategy,
    cancel: CancelToken,
    deadline: Option<Instant>,
    record: bool,
}

impl Shared {
    /// Player-1 worth, memoised.
    fn leaf_value(&self, board: &mut Board) -> f64 {
        let key = board.hash();
        let digest = board.digest();
        if let Some(score) = self.cache.get(key, digest) {
            return score;
        }
        let score = self.evaluator.worth(board, Color::Black);
        self.cache.put(key, digest, score);
        score
    }

    fn value_for(&self, board: &mut Board, color: Color) -> f64 {
        self.leaf_value(board) * f64::from(color.sign())
    }

    fn ordered_moves(&self, board: &mut Board, color: Color) -> Vec<Move> {
        let mut score = |b: &mut Board| self.value_for(b, color);
        self.generator.ordered_moves(board, color, &mut score)
    }
}

/// Per-thread walker.
struct Walker<'a> {
    shared: &'a Shared,
    nodes: u64,
    aborted: bool,
}

impl<'a> Walker<'a> {
    fn new(shared: &'a Shared) -> Self {
        Self {
            shared,
            nodes: 0,
            aborted: false,
        }
    }

    fn should_stop(&mut self) -> bool {
        if !self.aborted {
            if self.shared.cancel.is_cancelled() {
                self.aborted = true;
            } else if self.nodes % TIME_CHECK_INTERVAL == 0 {
                self.aborted = self.shared.deadline.is_some_and(|d| Instant::now() >= d);
            }
        }
        self.aborted
    }

    /// Value of the position after `color` has moved, from `color`'s side.
    /// `None` if the search was interrupted.
    fn branch_value(
        &mut self,
        board: &mut Board,
        depth: u8,
        alpha: f64,
        beta: f64,
        color: Color,
        node: Option<&mut SearchTreeNode>,
    ) -> Option<f64> {
        let opponent = color.opponent();
        match self.shared.strategy {
            SearchStrategy::Negamax => self
                .negamax(board, depth, -beta, -alpha, opponent, node)
                .map(|v| -v),
            SearchStrategy::Minimax => {
                let sign = f64::from(color.sign());
                let (lo, hi) = if color.is_player1() {
                    (alpha, beta)
                } else {
                    (-beta, -alpha)
                };
                self.minimax(board, depth, lo, hi, opponent, node)
                    .map(|v| v * sign)
            }
        }
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: f64,
        beta: f64,
        color: Color,
        mut node: Option<&mut SearchTreeNode>,
    ) -> Option<f64> {
        self.nodes += 1;
        if self.should_stop() {
            return None;
        }
        if depth == 0 || board.is_game_over() {
            return Some(self.shared.value_for(board, color));
        }

        let mut best = f64::NEG_INFINITY;
        for mv in self.shared.ordered_moves(board, color) {
            if board.make_move_as(mv.action, color).is_err() {
                continue;
            }
            let mut child = node
                .is_some()
                .then(|| SearchTreeNode::new(Some(mv.action), Some(color), alpha, beta));
            let value =
                self.negamax(board, depth - 1, -beta, -alpha, color.opponent(), child.as_mut());
            board.undo();
            let value = -value?;

            if let (Some(parent), Some(mut child)) = (node.as_deref_mut(), child) {
                child.value = Some(value);
                parent.children.push(child);
            }
            best = best.max(value);
            alpha = alpha.max(value);
            if alpha >= beta {
                if let Some(parent) = node.as_deref_mut() {
                    parent.pruned = true;
                }
                break;
            }
        }
        if best == f64::NEG_INFINITY {
            best = self.shared.value_for(board, color);
        }
        Some(best)
    }

    /// Player-1 value with `color` to move.
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        color: Color,
        mut node: Option<&mut SearchTreeNode>,
    ) -> Option<f64> {
        self.nodes += 1;
        if self.should_stop() {
            return None;
        }
        if depth == 0 || board.is_game_over() {
            return Some(self.shared.leaf_value(board));
        }

        let maximizing = color.is_player1();
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for mv in self.shared.ordered_moves(board, color) {
            if board.make_move_as(mv.action, color).is_err() {
                continue;
            }
            let mut child = node
                .is_some()
                .then(|| SearchTreeNode::new(Some(mv.action), Some(color), alpha, beta));
            let value = self.minimax(board, depth - 1, alpha, beta, color.opponent(), child.as_mut());
            board.undo();
            let value = value?;

            if let (Some(parent), Some(mut child)) = (node.as_deref_mut(), child) {
                child.value = Some(value * f64::from(color.sign()));
                parent.children.push(child);
            }
            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            if alpha >= beta {
                if let Some(parent) = node.as_deref_mut() {
                    parent.pruned = true;
                }
                break;
            }
        }
        if best.is_infinite() {
            best = self.shared.leaf_value(board);
        }
        Some(best)
    }
}

/// Values of the root moves after one iteration.
struct Iteration {
    values: Vec<Option<f64>>,
    nodes: u64,
    aborted: bool,
    tree: Option<SearchTreeNode>,
}

/// Alpha-beta searcher with a shared score cache and an optional worker
/// pool for the root split.
pub struct Searcher {
    config: SearchConfig,
    evaluator: Arc<dyn Evaluator>,
    cache: Arc<ScoreCache>,
    pool: Option<WorkerPool>,
}

impl Searcher {
    pub fn new(config: SearchConfig, weights: Weights) -> Self {
        let cache = Arc::new(ScoreCache::new(config.cache_capacity));
        Self::with_parts(config, Arc::new(WorthEvaluator::new(weights)), cache)
    }

    /// Build from an explicit evaluator and a cache that may be shared with
    /// other searchers.
    pub fn with_parts(
        config: SearchConfig,
        evaluator: Arc<dyn Evaluator>,
        cache: Arc<ScoreCache>,
    ) -> Self {
        let threads = config.effective_threads();
        let pool = (config.parallel && threads > 1).then(|| WorkerPool::new(threads));
        Self {
            config,
            evaluator,
            cache,
            pool,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ScoreCache> {
        &self.cache
    }

    /// Search without outside cancellation.
    pub fn search(&self, board: &Board) -> SearchResult {
        self.search_with_cancel(board, &CancelToken::new())
    }

    /// Pick a move for the side to move on `board`. The board itself is
    /// never modified.
    pub fn search_with_cancel(&self, board: &Board, cancel: &CancelToken) -> SearchResult {
        let start = Instant::now();
        let (hits, misses) = (self.cache.hits(), self.cache.misses());
        let deadline = (self.config.time_budget_ms > 0)
            .then(|| start + Duration::from_millis(self.config.time_budget_ms));
        let shared = Shared {
            evaluator: Arc::clone(&self.evaluator),
            cache: Arc::clone(&self.cache),
            generator: MoveGenerator::from_config(&self.config),
            strategy: self.config.strategy,
            cancel: cancel.clone(),
            deadline,
            record: self.config.record_tree,
        };
        let color = board.to_move();
        let mut stats = SearchStats::default();

        if board.is_game_over() {
            stats.elapsed = start.elapsed();
            return SearchResult {
                action: Action::Pass,
                value: 0.0,
                root_moves: Vec::new(),
                stats,
                tree: None,
            };
        }

        let mut root = board.clone();
        let mut moves = shared.ordered_moves(&mut root, color);
        let mut best: Option<(Action, f64)> = None;
        let mut partial: Option<(Action, f64)> = None;
        let mut tree = None;

        for depth in 1..=self.config.depth {
            if depth > 1 && deadline.is_some_and(|d| Instant::now() >= d) {
                stats.timed_out = true;
                break;
            }
            let iteration = self.run_iteration(&shared, &root, &moves, depth, color);
            stats.nodes += iteration.nodes;
            let leader = moves
                .iter()
                .zip(&iteration.values)
                .filter_map(|(mv, v)| v.map(|v| (mv.action, v)))
                .max_by(|a, b| a.1.total_cmp(&b.1));

            if iteration.aborted {
                partial = leader;
                stats.timed_out = true;
                tracing::debug!(depth, "search interrupted");
                break;
            }
            let Some(leader) = leader else { break };
            best = Some(leader);
            stats.depth = depth;
            tree = iteration.tree;

            for (mv, v) in moves.iter_mut().zip(&iteration.values) {
                mv.inherited_value = v.unwrap_or(f64::NEG_INFINITY);
            }
            moves.sort_by(|a, b| b.inherited_value.total_cmp(&a.inherited_value));
            tracing::debug!(depth, action = %leader.0, value = leader.1, nodes = stats.nodes, "iteration complete");
        }

        let (action, value) = best
            .or(partial)
            .or_else(|| moves.first().map(|m| (m.action, m.value)))
            .unwrap_or((Action::Pass, 0.0));

        stats.cache_hits = self.cache.hits().saturating_sub(hits);
        stats.cache_misses = self.cache.misses().saturating_sub(misses);
        stats.elapsed = start.elapsed();
        SearchResult {
            action,
            value,
            root_moves: moves,
            stats,
            tree,
        }
    }

    fn run_iteration(
        &self,
        shared: &Shared,
        board: &Board,
        moves: &[Move],
        depth: u8,
        color: Color,
    ) -> Iteration {
        match &self.pool {
            Some(pool) if moves.len() > 1 => {
                Self::parallel_iteration(pool, shared, board, moves, depth, color)
            }
            _ => Self::sequential_iteration(shared, board, moves, depth, color),
        }
    }

    fn sequential_iteration(
        shared: &Shared,
        board: &Board,
        moves: &[Move],
        depth: u8,
        color: Color,
    ) -> Iteration {
        let mut walker = Walker::new(shared);
        let mut scratch = board.clone();
        let mut root_node = shared.record.then(SearchTreeNode::root);
        let mut values = vec![None; moves.len()];
        let mut alpha = f64::NEG_INFINITY;

        for (slot, mv) in values.iter_mut().zip(moves) {
            if scratch.make_move_as(mv.action, color).is_err() {
                continue;
            }
            let mut child = root_node
                .is_some()
                .then(|| SearchTreeNode::new(Some(mv.action), Some(color), alpha, f64::INFINITY));
            let value = walker.branch_value(
                &mut scratch,
                depth - 1,
                alpha,
                f64::INFINITY,
                color,
                child.as_mut(),
            );
            scratch.undo();
            let Some(value) = value else { break };

            if let (Some(root), Some(mut child)) = (root_node.as_mut(), child) {
                child.value = Some(value);
                root.children.push(child);
            }
            *slot = Some(value);
            alpha = alpha.max(value);
        }

        Iteration {
            values,
            nodes: walker.nodes,
            aborted: walker.aborted,
            tree: root_node,
        }
    }

    fn parallel_iteration(
        pool: &WorkerPool,
        shared: &Shared,
        board: &Board,
        moves: &[Move],
        depth: u8,
        color: Color,
    ) -> Iteration {
        let record = shared.record;
        type Branch = (Option<f64>, u64, bool, Option<SearchTreeNode>);
        let tasks: Vec<Task<Branch>> = moves
            .iter()
            .map(|mv| {
                let shared = shared.clone();
                let mut branch = board.clone();
                let action = mv.action;
                Box::new(move || {
                    if branch.make_move_as(action, color).is_err() {
                        return (None, 0, false, None);
                    }
                    let mut walker = Walker::new(&shared);
                    let mut node = record.then(|| {
                        SearchTreeNode::new(
                            Some(action),
                            Some(color),
                            f64::NEG_INFINITY,
                            f64::INFINITY,
                        )
                    });
                    let value = walker.branch_value(
                        &mut branch,
                        depth - 1,
                        f64::NEG_INFINITY,
                        f64::INFINITY,
                        color,
                        node.as_mut(),
                    );
                    if let Some(n) = node.as_mut() {
                        n.value = value;
                    }
                    (value, walker.nodes, walker.aborted, node)
                }) as Task<Branch>
            })
            .collect();

        let mut iteration = Iteration {
            values: Vec::with_capacity(moves.len()),
            nodes: 0,
            aborted: false,
            tree: record.then(SearchTreeNode::root),
        };
        for result in pool.run_all(tasks) {
            match result {
                Some((value, nodes, aborted, node)) => {
                    iteration.nodes += nodes;
                    iteration.aborted |= aborted;
                    iteration.values.push(value);
                    if let (Some(root), Some(node)) = (iteration.tree.as_mut(), node) {
                        root.children.push(node);
                    }
                }
                None => iteration.values.push(None),
            }
        }
        iteration
    }

    /// Record trees for the following searches.
    pub fn set_record_tree(&mut self, record: bool) {
        self.config.record_tree = record;
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("config", &self.config)
            .field("cache", &self.cache.stats())
            .field("pool", &self.pool)
            .finish()
    }
}
