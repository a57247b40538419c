//! Applying and undoing moves.
//!
//! A placement goes through these steps:
//! - validate (bounds, occupancy, suicide, ko)
//! - put the stone and merge it with friendly neighbor strings
//! - drop stale liberty caches around it
//! - capture enemy strings left without liberties
//! - set or clear the ko point
//! - rebuild groups, which also drops eye and health analysis
//!
//! Undo runs the same steps backwards. Captured stones come back as new
//! strings, and the string of the removed stone is re-flooded in case it
//! falls apart.

use std::collections::BTreeSet;

use crate::board::{Board, StringId};
use crate::error::MoveError;
use crate::location::Location;
use crate::moves::{Action, CaptureList, Move};
use crate::position::Color;

impl Board {
    /// Play for the side to move.
    pub fn make_move(&mut self, action: Action) -> Result<(), MoveError> {
        self.make_move_as(action, self.to_move())
    }

    /// Place a stone for the side to move.
    pub fn play(&mut self, loc: Location) -> Result<(), MoveError> {
        self.make_move(Action::Place(loc))
    }

    pub fn pass(&mut self) -> Result<(), MoveError> {
        self.make_move(Action::Pass)
    }

    pub fn resign(&mut self) -> Result<(), MoveError> {
        self.make_move(Action::Resign)
    }

    /// Apply `action` for `color`. On error the board is unchanged.
    pub fn make_move_as(&mut self, action: Action, color: Color) -> Result<(), MoveError> {
        if self.moves.last().is_some_and(|m| m.action == Action::Resign) {
            return Err(MoveError::GameOver);
        }
        let mut mv = Move::new(action, color);
        mv.prior_ko = self.ko;

        match action {
            Action::Pass | Action::Resign => {
                self.ko = None;
                tracing::debug!(%color, %action, "move");
            }
            Action::Place(loc) => {
                self.check_placement(loc, color)?;
                let annotation = u16::try_from(self.moves.len() + 1).ok();
                self.put_stone(loc, color, annotation);
                self.join_strings_at(loc, color);
                self.invalidate_neighbor_liberties(loc);

                mv.captures = self.capture_around(loc, color);
                let captured = mv.captures.len();
                self.captures[color.index()] += captured as u32;

                mv.is_ko = captured == 1 && self.is_ko_shape(loc, color);
                self.ko = if mv.is_ko {
                    mv.captures.locations().next()
                } else {
                    None
                };
                self.rebuild_groups();
                tracing::debug!(%color, %loc, captured, ko = mv.is_ko, "move");
            }
        }

        self.moves.push(mv);
        self.debug_validate("make_move");
        Ok(())
    }

    /// Take back the last move. Returns it, or `None` at the start of the
    /// game.
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.moves.pop()?;
        if let Action::Place(loc) = mv.action {
            self.remove_stone_from_string(loc);
            self.lift_stone(loc);
            self.invalidate_neighbor_liberties(loc);

            for &(captured, color) in mv.captures.iter() {
                self.put_stone(captured, color, None);
            }
            for &(captured, _) in mv.captures.iter() {
                if self.position(captured).string() == Some(StringId::PENDING) {
                    self.create_string_at(captured);
                }
                self.invalidate_neighbor_liberties(captured);
            }
            let index = mv.color.index();
            self.captures[index] = self.captures[index].saturating_sub(mv.captures.len() as u32);
            self.rebuild_groups();
        }
        self.ko = mv.prior_ko;
        tracing::debug!(color = %mv.color, action = %mv.action, "undo");
        self.debug_validate("undo");
        Some(mv)
    }

    /// Why `color` may not play at `loc`, if it may not.
    pub fn check_placement(&self, loc: Location, color: Color) -> Result<(), MoveError> {
        if !self.in_bounds(loc) {
            return Err(MoveError::OutOfBounds(loc));
        }
        if !self.is_empty_at(loc) {
            return Err(MoveError::Occupied(loc));
        }
        if self.is_suicide(loc, color) {
            return Err(MoveError::Suicide(loc));
        }
        if self.enforce_ko && self.is_ko_recapture(loc, color) {
            return Err(MoveError::Ko(loc));
        }
        Ok(())
    }

    pub fn is_legal(&self, loc: Location, color: Color) -> bool {
        self.check_placement(loc, color).is_ok()
    }

    /// Every empty point `color` may legally play.
    pub fn legal_moves(&self, color: Color) -> Vec<Location> {
        self.positions()
            .filter(|p| p.is_empty())
            .map(|p| p.loc)
            .filter(|&loc| self.is_legal(loc, color))
            .collect()
    }

    /// A stone at `loc` would have no liberties, join no friendly string
    /// with a spare liberty, and capture nothing.
    pub fn is_suicide(&self, loc: Location, color: Color) -> bool {
        let mut seen = BTreeSet::new();
        for n in self.neighbors(loc) {
            let Some(cell) = self.get(n) else { continue };
            let Some(id) = cell.string() else {
                return false;
            };
            if !seen.insert(id) {
                continue;
            }
            let liberties = self.liberty_count(id);
            match cell.color() {
                Some(c) if c == color && liberties > 1 => return false,
                Some(c) if c != color && liberties == 1 => return false,
                _ => {}
            }
        }
        true
    }

    /// Whether the last move took a ko.
    pub fn is_ko(&self) -> bool {
        self.moves.last().is_some_and(|m| m.is_ko)
    }

    /// `color` would immediately retake the ko at `loc`. Only the side that
    /// just lost the single stone is bound; the capturer may fill the point.
    fn is_ko_recapture(&self, loc: Location, color: Color) -> bool {
        self.ko == Some(loc) && self.moves.last_color() == Some(color.opponent())
    }

    /// The stone at `loc` is surrounded by enemy stones on every side but the
    /// point it just captured.
    fn is_ko_shape(&self, loc: Location, color: Color) -> bool {
        let enemies = self
            .neighbors(loc)
            .filter(|&n| self.color_at(n) == Some(color.opponent()))
            .count();
        enemies + 1 == self.neighbor_slots(loc)
    }

    /// Remove enemy strings next to `loc` that have run out of liberties.
    fn capture_around(&mut self, loc: Location, color: Color) -> CaptureList {
        let enemy = color.opponent();
        let dead: BTreeSet<StringId> = self
            .neighbors(loc)
            .filter(|&n| self.color_at(n) == Some(enemy))
            .filter_map(|n| self.position(n).string())
            .filter(|&id| self.liberty_count(id) == 0)
            .collect();

        let mut captures = CaptureList::default();
        for id in dead {
            let Some(string) = self.strings.remove(id.0) else { continue };
            for &stone in string.members() {
                self.lift_stone(stone);
                captures.push(stone, enemy);
            }
            for &stone in string.members() {
                self.invalidate_neighbor_liberties(stone);
            }
        }
        if !captures.is_empty() {
            tracing::debug!(count = captures.len(), %color, "captured");
        }
        captures
    }
}
