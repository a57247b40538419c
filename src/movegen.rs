//! Candidate generation and move ordering.
//!
//! Only "reasonable" points are searched: the 3x3 blocks around the star
//! points, plus a splat around every stone on the board (a 5x5 square
//! without its corners). Candidates are ordered by the worth of the position
//! one ply ahead, and only the best share of them is kept. Passing is always
//! offered last.

use std::collections::BTreeSet;

use crate::board::{Board, star_points};
use crate::config::SearchConfig;
use crate::constants::SPLAT_RADIUS;
use crate::eye_type::EyeType;
use crate::location::Location;
use crate::moves::{Action, Move};
use crate::position::Color;

/// Candidate generator configured from [`SearchConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveGenerator {
    pub best_moves_percentage: u8,
    pub max_candidates: usize,
}

impl MoveGenerator {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            best_moves_percentage: config.best_moves_percentage,
            max_candidates: config.max_candidates,
        }
    }

    /// Legal, sensible points for `color`, in board order.
    pub fn candidate_points(&self, board: &mut Board, color: Color) -> Vec<Location> {
        let mut area: BTreeSet<Location> = BTreeSet::new();
        for star in star_points(board.size()) {
            for dr in -1..=1 {
                for dc in -1..=1 {
                    area.extend(star.offset(dr, dc));
                }
            }
        }
        let stones: Vec<Location> = board
            .positions()
            .filter(|p| p.is_occupied())
            .map(|p| p.loc)
            .collect();
        for stone in stones {
            for dr in -SPLAT_RADIUS..=SPLAT_RADIUS {
                for dc in -SPLAT_RADIUS..=SPLAT_RADIUS {
                    if dr.abs() == SPLAT_RADIUS && dc.abs() == SPLAT_RADIUS {
                        continue;
                    }
                    area.extend(stone.offset(dr, dc));
                }
            }
        }

        let mut points = Vec::new();
        for loc in area {
            if board.is_legal(loc, color) && !is_own_eye(board, loc, color) {
                points.push(loc);
            }
        }
        points
    }

    /// Ordered moves for `color`, trimmed to the configured share, with a
    /// pass appended. `score` rates the board after a move from the mover's
    /// side.
    pub fn ordered_moves(
        &self,
        board: &mut Board,
        color: Color,
        score: &mut dyn FnMut(&mut Board) -> f64,
    ) -> Vec<Move> {
        let mut moves = Vec::new();
        for loc in self.candidate_points(board, color) {
            let action = Action::Place(loc);
            if board.make_move_as(action, color).is_err() {
                continue;
            }
            let value = score(board);
            board.undo();
            let mut mv = Move::new(action, color);
            mv.value = value;
            moves.push(mv);
        }

        moves.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.action.location().cmp(&b.action.location()))
        });
        let keep = self.keep_count(moves.len());
        moves.truncate(keep);

        let mut pass = Move::new(Action::Pass, color);
        if board.make_move_as(Action::Pass, color).is_ok() {
            pass.value = score(board);
            board.undo();
        }
        moves.push(pass);
        moves
    }

    /// `ceil(n * percentage / 100)`, capped, and never zero when `n > 0`.
    pub fn keep_count(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let share = (n * usize::from(self.best_moves_percentage)).div_ceil(100);
        share.clamp(1, self.max_candidates.max(1)).min(n)
    }
}

/// Whether `loc` is a single-point eye of a healthy `color` group.
pub fn is_own_eye(board: &mut Board, loc: Location, color: Color) -> bool {
    board.update_health();
    let Some(eye) = board.get(loc).and_then(|p| p.eye()).and_then(|id| board.eye(id)) else {
        return false;
    };
    if eye.eye_type() != EyeType::E1 {
        return false;
    }
    board
        .group(eye.group())
        .is_some_and(|g| g.color() == color && g.relative_health() >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> MoveGenerator {
        MoveGenerator {
            best_moves_percentage: 50,
            max_candidates: 4,
        }
    }

    #[test]
    fn test_empty_board_uses_star_footprint() {
        let mut board = Board::new(9);
        let points = generator().candidate_points(&mut board, Color::Black);
        // Five 3x3 blocks; the center block shares a corner with each of
        // the other four.
        assert_eq!(points.len(), 41);
        assert!(points.contains(&Location::new(5, 5)));
        assert!(!points.contains(&Location::new(1, 1)));
    }

    #[test]
    fn test_splat_around_stone() {
        let mut board = Board::new(19);
        board.play(Location::new(10, 1)).unwrap();
        let points = generator().candidate_points(&mut board, Color::White);
        assert!(points.contains(&Location::new(12, 2)));
        assert!(!points.contains(&Location::new(12, 3)));
        assert!(!points.contains(&Location::new(10, 1)));
    }

    #[test]
    fn test_keep_count() {
        let g = generator();
        assert_eq!(g.keep_count(0), 0);
        assert_eq!(g.keep_count(1), 1);
        assert_eq!(g.keep_count(5), 3);
        assert_eq!(g.keep_count(100), 4);
    }

    #[test]
    fn test_ordered_moves_end_with_pass() {
        let mut board = Board::new(9);
        let mut score = |b: &mut Board| b.stone_count(Color::Black) as f64;
        let moves = generator().ordered_moves(&mut board, Color::Black, &mut score);
        assert_eq!(moves.len(), 5);
        assert!(moves.last().is_some_and(Move::is_pass));
        assert_eq!(board.num_moves(), 0);
    }

    #[test]
    fn test_own_eye_is_skipped() {
        let mut board = Board::new(9);
        for (r, c) in [(1, 2), (2, 1), (2, 2), (2, 3), (1, 4), (2, 4), (3, 1), (3, 2)] {
            board
                .make_move_as(Action::Place(Location::new(r, c)), Color::Black)
                .unwrap();
        }
        assert!(is_own_eye(&mut board, Location::new(1, 1), Color::Black));
        let points = generator().candidate_points(&mut board, Color::Black);
        assert!(!points.contains(&Location::new(1, 1)));
    }
}
