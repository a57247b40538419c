//! Interface to an external scoring oracle (for instance a trained network).
//!
//! The engine only prepares the input planes and consumes the outputs; how
//! the oracle computes them is its own business.

use crate::board::Board;
use crate::location::Location;
use crate::position::Color;

/// Number of feature planes.
pub const PLANES: usize = 8;

/// Plane indices.
pub mod plane {
    pub const OWN: usize = 0;
    pub const OPPONENT: usize = 1;
    pub const EMPTY: usize = 2;
    pub const ONE_LIBERTY: usize = 3;
    pub const TWO_LIBERTIES: usize = 4;
    pub const THREE_PLUS_LIBERTIES: usize = 5;
    pub const KO: usize = 6;
    /// All ones when the perspective player is player 1.
    pub const PLAYER1_TO_MOVE: usize = 7;
}

/// Board features from one player's side, plane-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTensor {
    size: usize,
    perspective: Color,
    data: Vec<f32>,
}

impl FeatureTensor {
    /// Encode `board` as seen by `perspective`.
    pub fn from_board(board: &Board, perspective: Color) -> Self {
        let size = board.size();
        let mut tensor = Self {
            size,
            perspective,
            data: vec![0.0; PLANES * size * size],
        };

        for pos in board.positions() {
            let loc = pos.loc;
            match pos.color() {
                None => tensor.set(plane::EMPTY, loc, 1.0),
                Some(color) => {
                    let side = if color == perspective {
                        plane::OWN
                    } else {
                        plane::OPPONENT
                    };
                    tensor.set(side, loc, 1.0);
                    let liberties = board.liberty_count_at(loc);
                    let plane = match liberties {
                        0 | 1 => plane::ONE_LIBERTY,
                        2 => plane::TWO_LIBERTIES,
                        _ => plane::THREE_PLUS_LIBERTIES,
                    };
                    tensor.set(plane, loc, 1.0);
                }
            }
        }
        if let Some(ko) = board.ko_point() {
            tensor.set(plane::KO, ko, 1.0);
        }
        if perspective.is_player1() {
            let start = plane::PLAYER1_TO_MOVE * size * size;
            tensor.data[start..start + size * size].fill(1.0);
        }
        tensor
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn perspective(&self) -> Color {
        self.perspective
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, plane: usize, loc: Location) -> f32 {
        self.data[self.offset(plane, loc)]
    }

    fn set(&mut self, plane: usize, loc: Location, value: f32) {
        let offset = self.offset(plane, loc);
        self.data[offset] = value;
    }

    fn offset(&self, plane: usize, loc: Location) -> usize {
        let row = usize::from(loc.row) - 1;
        let col = usize::from(loc.col) - 1;
        (plane * self.size + row) * self.size + col
    }

    /// Index of `loc` in a policy vector.
    pub fn policy_index(&self, loc: Location) -> usize {
        (usize::from(loc.row) - 1) * self.size + usize::from(loc.col) - 1
    }

    /// Index of the pass move in a policy vector.
    pub fn pass_index(&self) -> usize {
        self.size * self.size
    }
}

/// A pure, synchronous position scorer.
pub trait ScoringOracle: Send + Sync {
    /// Move preferences: one entry per point in row-major order, then one
    /// for passing.
    fn policy(&self, features: &FeatureTensor) -> Vec<f32>;

    /// Expected outcome for `color`, in [-1, 1].
    fn value(&self, features: &FeatureTensor, color: Color) -> f32;
}

/// Oracle with no opinion: every move equally likely, every position even.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformOracle;

impl ScoringOracle for UniformOracle {
    fn policy(&self, features: &FeatureTensor) -> Vec<f32> {
        let n = features.pass_index() + 1;
        vec![1.0 / n as f32; n]
    }

    fn value(&self, _features: &FeatureTensor, _color: Color) -> f32 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planes_follow_perspective() {
        let mut board = Board::new(9);
        board.play(Location::new(3, 3)).unwrap();
        board.play(Location::new(3, 4)).unwrap();

        let black = FeatureTensor::from_board(&board, Color::Black);
        assert_eq!(black.as_slice().len(), PLANES * 81);
        assert_eq!(black.get(plane::OWN, Location::new(3, 3)), 1.0);
        assert_eq!(black.get(plane::OPPONENT, Location::new(3, 4)), 1.0);
        assert_eq!(black.get(plane::EMPTY, Location::new(1, 1)), 1.0);
        assert_eq!(black.get(plane::THREE_PLUS_LIBERTIES, Location::new(3, 3)), 1.0);
        assert_eq!(black.get(plane::PLAYER1_TO_MOVE, Location::new(9, 9)), 1.0);

        let white = FeatureTensor::from_board(&board, Color::White);
        assert_eq!(white.get(plane::OWN, Location::new(3, 4)), 1.0);
        assert_eq!(white.get(plane::PLAYER1_TO_MOVE, Location::new(9, 9)), 0.0);
    }

    #[test]
    fn test_atari_marks_one_liberty() {
        let mut board = Board::new(9);
        board.play(Location::new(1, 1)).unwrap();
        board.play(Location::new(1, 2)).unwrap();
        let tensor = FeatureTensor::from_board(&board, Color::Black);
        assert_eq!(tensor.get(plane::ONE_LIBERTY, Location::new(1, 1)), 1.0);
        assert_eq!(tensor.get(plane::TWO_LIBERTIES, Location::new(1, 2)), 1.0);
    }

    #[test]
    fn test_uniform_policy_covers_pass() {
        let board = Board::new(5);
        let tensor = FeatureTensor::from_board(&board, Color::Black);
        let policy = UniformOracle.policy(&tensor);
        assert_eq!(policy.len(), 26);
        assert_eq!(tensor.pass_index(), 25);
        assert_eq!(tensor.policy_index(Location::new(2, 1)), 5);
    }
}
