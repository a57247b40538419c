//! Moves, capture lists and the synchronized move history.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::position::Color;

/// What a move does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Place(Location),
    Pass,
    Resign,
}

impl Action {
    pub fn location(self) -> Option<Location> {
        match self {
            Action::Place(loc) => Some(loc),
            Action::Pass | Action::Resign => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Place(loc) => write!(f, "{loc}"),
            Action::Pass => write!(f, "pass"),
            Action::Resign => write!(f, "resign"),
        }
    }
}

/// Stones removed from the board by one move, in removal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureList {
    stones: Vec<(Location, Color)>,
}

impl CaptureList {
    pub(crate) fn push(&mut self, loc: Location, color: Color) {
        self.stones.push((loc, color));
    }

    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.stones.iter().map(|&(loc, _)| loc)
    }

    pub fn contains(&self, loc: Location) -> bool {
        self.stones.iter().any(|&(l, _)| l == loc)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Location, Color)> {
        self.stones.iter()
    }
}

/// A move as applied to a board.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub action: Action,
    pub color: Color,
    /// Static evaluation assigned by move ordering or search.
    pub value: f64,
    /// Value backed up from deeper search.
    pub inherited_value: f64,
    pub captures: CaptureList,
    /// Whether this move took a ko.
    pub is_ko: bool,
    /// Ko point in force before the move, restored on undo.
    pub(crate) prior_ko: Option<Location>,
}

impl Move {
    pub fn new(action: Action, color: Color) -> Self {
        Self {
            action,
            color,
            value: 0.0,
            inherited_value: 0.0,
            captures: CaptureList::default(),
            is_ko: false,
            prior_ko: None,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.action == Action::Pass
    }
}

/// Append-only move history with undo via pop, guarded by a lock so other
/// threads can read it while the owning thread plays.
///
/// `Clone` takes a deep copy: cloned boards never share history.
#[derive(Debug, Default)]
pub struct MoveList {
    moves: Mutex<Vec<Move>>,
}

impl Clone for MoveList {
    fn clone(&self) -> Self {
        Self {
            moves: Mutex::new(self.moves.lock().clone()),
        }
    }
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, mv: Move) {
        self.moves.lock().push(mv);
    }

    pub fn pop(&self) -> Option<Move> {
        self.moves.lock().pop()
    }

    pub fn last(&self) -> Option<Move> {
        self.moves.lock().last().cloned()
    }

    pub(crate) fn last_color(&self) -> Option<Color> {
        self.moves.lock().last().map(|m| m.color)
    }

    pub fn len(&self) -> usize {
        self.moves.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.lock().is_empty()
    }

    /// The first `n` moves (fewer if the history is shorter).
    pub fn prefix(&self, n: usize) -> Vec<Move> {
        let moves = self.moves.lock();
        moves[..n.min(moves.len())].to_vec()
    }

    /// The last `n` moves (fewer if the history is shorter).
    pub fn suffix(&self, n: usize) -> Vec<Move> {
        let moves = self.moves.lock();
        moves[moves.len().saturating_sub(n)..].to_vec()
    }

    pub fn snapshot(&self) -> Vec<Move> {
        self.moves.lock().clone()
    }

    /// Run `f` on the locked history without copying it.
    pub fn with<R>(&self, f: impl FnOnce(&[Move]) -> R) -> R {
        f(&self.moves.lock())
    }
}
