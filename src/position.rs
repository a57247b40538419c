//! Per-cell board state: colors, stones and what occupies each point.
//!
//! A cell either holds a stone (and then always references the string it
//! belongs to) or is empty (and then may reference the eye it lies in).
//! Encoding this as a tagged variant makes "string XOR eye" impossible to
//! break.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{EyeId, StringId};
use crate::location::Location;

/// Stone color. Black is player 1 and moves first in an even game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    pub fn is_player1(self) -> bool {
        self == Color::Black
    }

    /// +1 for player 1, -1 for player 2. Scores and healths are signed this way.
    pub fn sign(self) -> f32 {
        match self {
            Color::Black => 1.0,
            Color::White => -1.0,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    /// Single-letter tag used by the move-list format.
    pub fn letter(self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// A stone on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stone {
    pub color: Color,
    /// Player-1-perspective health in [-1, 1], written by the health analyzer.
    pub health: f32,
    /// Set only by end-of-game scoring.
    pub dead: bool,
    /// Move number that placed the stone (debug output only).
    pub annotation: Option<u16>,
}

impl Stone {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            health: 0.0,
            dead: false,
            annotation: None,
        }
    }
}

/// What a cell holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Occupant {
    Empty { eye: Option<EyeId> },
    Stone { stone: Stone, string: StringId },
}

/// One cell of the board.
#[derive(Debug, Clone)]
pub struct Position {
    pub loc: Location,
    pub occupant: Occupant,
    /// Signed territory contribution (positive favors player 1).
    pub score_contribution: f32,
}

impl Position {
    pub fn new(loc: Location) -> Self {
        Self {
            loc,
            occupant: Occupant::Empty { eye: None },
            score_contribution: 0.0,
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self.occupant, Occupant::Stone { .. })
    }

    pub fn is_empty(&self) -> bool {
        !self.is_occupied()
    }

    pub fn stone(&self) -> Option<&Stone> {
        match &self.occupant {
            Occupant::Stone { stone, .. } => Some(stone),
            Occupant::Empty { .. } => None,
        }
    }

    pub(crate) fn stone_mut(&mut self) -> Option<&mut Stone> {
        match &mut self.occupant {
            Occupant::Stone { stone, .. } => Some(stone),
            Occupant::Empty { .. } => None,
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.stone().map(|s| s.color)
    }

    pub fn string(&self) -> Option<StringId> {
        match self.occupant {
            Occupant::Stone { string, .. } => Some(string),
            Occupant::Empty { .. } => None,
        }
    }

    pub fn eye(&self) -> Option<EyeId> {
        match self.occupant {
            Occupant::Empty { eye } => eye,
            Occupant::Stone { .. } => None,
        }
    }

    pub(crate) fn set_eye(&mut self, id: Option<EyeId>) {
        if let Occupant::Empty { eye } = &mut self.occupant {
            *eye = id;
        }
    }

    pub(crate) fn set_string(&mut self, id: StringId) {
        if let Occupant::Stone { string, .. } = &mut self.occupant {
            *string = id;
        }
    }

    /// Character used by the text rendering of the board.
    pub fn symbol(&self) -> char {
        match self.occupant {
            Occupant::Stone { stone, .. } => match (stone.color, stone.dead) {
                (Color::Black, false) => 'X',
                (Color::White, false) => 'O',
                (Color::Black, true) => 'x',
                (Color::White, true) => 'o',
            },
            Occupant::Empty { .. } => '.',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_opponent_and_sign() {
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.sign(), 1.0);
        assert_eq!(Color::White.sign(), -1.0);
        assert!(Color::Black.is_player1());
    }

    #[test]
    fn test_empty_position_has_no_string() {
        let pos = Position::new(Location::new(2, 2));
        assert!(pos.is_empty());
        assert_eq!(pos.string(), None);
        assert_eq!(pos.eye(), None);
        assert_eq!(pos.symbol(), '.');
    }

    #[test]
    fn test_set_eye_ignored_on_stone() {
        let mut pos = Position::new(Location::new(2, 2));
        pos.occupant = Occupant::Stone {
            stone: Stone::new(Color::White),
            string: StringId(0),
        };
        pos.set_eye(Some(EyeId(3)));
        assert_eq!(pos.eye(), None);
        assert_eq!(pos.string(), Some(StringId(0)));
        assert_eq!(pos.symbol(), 'O');
    }
}
