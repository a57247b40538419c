//! Static evaluation ("worth") of a position.
//!
//! Worth is a weighted sum of:
//! - territory difference (which already folds in group health)
//! - stone placement by line
//! - a penalty for clumped shapes
//! - the capture difference
//!
//! All terms are from player 1's side; [`Evaluator::worth`] flips the sign
//! for player 2.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::{LINE_VALUES, WINNING_VALUE};
use crate::location::Location;
use crate::moves::Action;
use crate::position::Color;

/// Linear weights of the evaluation terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub health: f64,
    pub position: f64,
    pub bad_shape: f64,
    pub captures: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            health: 1.0,
            position: 0.5,
            bad_shape: 0.5,
            captures: 1.0,
        }
    }
}

/// Scores a board for one side. Higher is better for `perspective`.
pub trait Evaluator: Send + Sync {
    fn worth(&self, board: &mut Board, perspective: Color) -> f64;
}

/// The weighted worth function.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorthEvaluator {
    pub weights: Weights,
}

impl WorthEvaluator {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    /// Worth from player 1's side.
    pub fn player1_worth(&self, board: &mut Board) -> f64 {
        if let Some(last) = board.last_move().filter(|m| m.action == Action::Resign) {
            return -WINNING_VALUE * f64::from(last.color.sign());
        }
        let w = &self.weights;
        let territory = f64::from(board.territory_difference());
        let position = position_score(board);
        let shape = f64::from(bad_shape_count(board, Color::Black))
            - f64::from(bad_shape_count(board, Color::White));
        let captures =
            f64::from(board.captures(Color::Black)) - f64::from(board.captures(Color::White));

        w.health * territory + w.position * position - w.bad_shape * shape + w.captures * captures
    }
}

impl Evaluator for WorthEvaluator {
    fn worth(&self, board: &mut Board, perspective: Color) -> f64 {
        self.player1_worth(board) * f64::from(perspective.sign())
    }
}

/// Sum of line values of all stones, signed for player 1.
pub fn position_score(board: &Board) -> f64 {
    board
        .positions()
        .filter_map(|p| p.color().map(|c| (p.loc, c)))
        .map(|(loc, color)| {
            let line = loc.line(board.size()).min(LINE_VALUES.len() - 1);
            f64::from(LINE_VALUES[line] * color.sign())
        })
        .sum()
}

/// Penalty for inefficient 2x2 clumps of `color`: an empty triangle scores
/// one, a solid block of four scores two.
pub fn bad_shape_count(board: &Board, color: Color) -> u32 {
    let size = board.size() as u8;
    let mut penalty = 0;
    for row in 1..size {
        for col in 1..size {
            let window = [
                Location::new(row, col),
                Location::new(row, col + 1),
                Location::new(row + 1, col),
                Location::new(row + 1, col + 1),
            ];
            let friends = window.iter().filter(|&&l| board.color_at(l) == Some(color)).count();
            let empties = window.iter().filter(|&&l| board.is_empty_at(l)).count();
            penalty += match (friends, empties) {
                (3, 1) => 1,
                (4, 0) => 2,
                _ => 0,
            };
        }
    }
    penalty
}
