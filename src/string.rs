//! Strings: maximal 4-connected sets of same-colored stones.
//!
//! Each string caches its liberties lazily. Any change to the string's
//! membership or to a neighboring cell must call [`GoString::invalidate`];
//! the next [`GoString::liberties`] call recomputes the set.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use crate::board::{Board, GroupId, StringId};
use crate::location::Location;
use crate::position::Color;

/// A chain of stones.
#[derive(Debug, Clone)]
pub struct GoString {
    color: Color,
    members: Vec<Location>,
    liberties: OnceCell<BTreeSet<Location>>,
    pub(crate) group: Option<GroupId>,
}

impl GoString {
    pub(crate) fn new(color: Color, members: Vec<Location>) -> Self {
        Self {
            color,
            members,
            liberties: OnceCell::new(),
            group: None,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn members(&self) -> &[Location] {
        &self.members
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, loc: Location) -> bool {
        self.members.contains(&loc)
    }

    /// Group this string belongs to, once groups have been built.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Empty points orthogonally adjacent to any member. Cached until the
    /// next [`invalidate`](Self::invalidate).
    pub fn liberties(&self, board: &Board) -> &BTreeSet<Location> {
        self.liberties.get_or_init(|| {
            self.members
                .iter()
                .flat_map(|&m| board.neighbors(m))
                .filter(|&n| board.is_empty_at(n))
                .collect()
        })
    }

    pub fn is_liberties_cached(&self) -> bool {
        self.liberties.get().is_some()
    }

    pub fn invalidate(&mut self) {
        self.liberties.take();
    }
}

impl Board {
    /// Liberties of a string, or `None` if the id is stale.
    pub fn liberties(&self, id: StringId) -> Option<&BTreeSet<Location>> {
        self.string(id).map(|s| s.liberties(self))
    }

    /// Liberty count of the string at `loc`; 0 for empty points.
    pub fn liberty_count_at(&self, loc: Location) -> usize {
        self.string_at(loc).map_or(0, |s| s.liberties(self).len())
    }

    pub fn liberty_count(&self, id: StringId) -> usize {
        self.liberties(id).map_or(0, BTreeSet::len)
    }

    /// Maximal 4-connected region of stones colored like the one at `start`.
    /// Empty for an empty start point.
    pub fn flood_string(&self, start: Location) -> Vec<Location> {
        let Some(color) = self.color_at(start) else {
            return Vec::new();
        };
        let mut visited = vec![false; self.size() * self.size()];
        let mut stack = vec![start];
        let mut region = Vec::new();
        visited[self.index(start)] = true;

        while let Some(loc) = stack.pop() {
            region.push(loc);
            for n in self.neighbors(loc) {
                let idx = self.index(n);
                if !visited[idx] && self.color_at(n) == Some(color) {
                    visited[idx] = true;
                    stack.push(n);
                }
            }
        }
        region
    }

    /// Build a fresh string from the stones connected to `loc` and point
    /// every member cell at it. Any string previously referenced by those
    /// cells must already be gone.
    pub(crate) fn create_string_at(&mut self, loc: Location) -> StringId {
        let members = self.flood_string(loc);
        let color = self.color_at(loc).unwrap_or(Color::Black);
        let id = StringId(self.strings.insert(GoString::new(color, members.clone())));
        for m in members {
            self.position_mut(m).set_string(id);
        }
        id
    }

    /// Fold `absorbed` into `survivor`. Merging a string with itself does
    /// nothing.
    pub(crate) fn merge_strings(&mut self, survivor: StringId, absorbed: StringId) -> StringId {
        if survivor == absorbed {
            return survivor;
        }
        let Some(gone) = self.strings.remove(absorbed.0) else {
            return survivor;
        };
        for &m in &gone.members {
            self.position_mut(m).set_string(survivor);
        }
        if let Some(s) = self.strings.get_mut(survivor.0) {
            s.members.extend(gone.members);
            s.invalidate();
        }
        survivor
    }

    /// Attach the stone just put at `loc` to its neighboring friendly strings,
    /// merging them as needed.
    pub(crate) fn join_strings_at(&mut self, loc: Location, color: Color) -> StringId {
        let friends: BTreeSet<StringId> = self
            .neighbors(loc)
            .filter(|&n| self.color_at(n) == Some(color))
            .filter_map(|n| self.position(n).string())
            .collect();

        let mut iter = friends.into_iter();
        let Some(first) = iter.next() else {
            return self.create_string_at(loc);
        };
        if let Some(s) = self.strings.get_mut(first.0) {
            s.members.push(loc);
            s.invalidate();
        }
        self.position_mut(loc).set_string(first);
        for other in iter {
            self.merge_strings(first, other);
        }
        first
    }

    /// Detach a stone from its string before the stone is lifted. If the
    /// string empties it is dropped; if the remainder falls apart, it is
    /// rebuilt as one string per connected piece. Returns the pieces.
    pub(crate) fn remove_stone_from_string(&mut self, loc: Location) -> Vec<StringId> {
        let Some(id) = self.position(loc).string() else {
            return Vec::new();
        };
        let Some(mut old) = self.strings.remove(id.0) else {
            return Vec::new();
        };
        if let Some(group) = old.group.and_then(|g| self.groups.get_mut(g.0)) {
            group.strings.retain(|&s| s != id);
        }
        old.members.retain(|&m| m != loc);
        self.position_mut(loc).set_string(StringId::PENDING);
        for &m in &old.members {
            self.position_mut(m).set_string(StringId::PENDING);
        }

        let mut pieces = Vec::new();
        for &m in &old.members {
            if self.position(m).string() == Some(StringId::PENDING) && m != loc {
                pieces.push(self.create_string_at_excluding(m, loc));
            }
        }
        pieces
    }

    /// Like [`create_string_at`](Self::create_string_at) but treats `hole`
    /// as empty. Used while the departing stone is still on the board.
    fn create_string_at_excluding(&mut self, start: Location, hole: Location) -> StringId {
        let members: Vec<Location> = self
            .flood_string_excluding(start, hole)
            .into_iter()
            .collect();
        let color = self.color_at(start).unwrap_or(Color::Black);
        let id = StringId(self.strings.insert(GoString::new(color, members.clone())));
        for m in members {
            self.position_mut(m).set_string(id);
        }
        id
    }

    fn flood_string_excluding(&self, start: Location, hole: Location) -> Vec<Location> {
        let Some(color) = self.color_at(start) else {
            return Vec::new();
        };
        let mut visited = vec![false; self.size() * self.size()];
        visited[self.index(hole)] = true;
        visited[self.index(start)] = true;
        let mut stack = vec![start];
        let mut region = Vec::new();
        while let Some(loc) = stack.pop() {
            region.push(loc);
            for n in self.neighbors(loc) {
                let idx = self.index(n);
                if !visited[idx] && self.color_at(n) == Some(color) {
                    visited[idx] = true;
                    stack.push(n);
                }
            }
        }
        region
    }

    /// Clear cached liberties of every string touching `loc`.
    pub(crate) fn invalidate_neighbor_liberties(&mut self, loc: Location) {
        let ids: Vec<StringId> = self
            .neighbors(loc)
            .chain(std::iter::once(loc))
            .filter_map(|n| self.position(n).string())
            .collect();
        for id in ids {
            if let Some(s) = self.strings.get_mut(id.0) {
                s.invalidate();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(stones: &[(u8, u8, Color)]) -> Board {
        let mut board = Board::new(9);
        for &(r, c, color) in stones {
            let loc = Location::new(r, c);
            board.put_stone(loc, color, None);
            board.join_strings_at(loc, color);
        }
        board.rebuild_groups();
        board
    }

    #[test]
    fn test_single_stone_liberties() {
        let board = setup(&[(5, 5, Color::Black)]);
        assert_eq!(board.liberty_count_at(Location::new(5, 5)), 4);
        let corner = setup(&[(1, 1, Color::White)]);
        assert_eq!(corner.liberty_count_at(Location::new(1, 1)), 2);
    }

    #[test]
    fn test_liberties_are_cached_until_invalidated() {
        let board = setup(&[(3, 3, Color::Black), (3, 4, Color::Black)]);
        let id = board.position(Location::new(3, 3)).string().unwrap();
        let s = board.string(id).unwrap();
        assert!(!s.is_liberties_cached());
        let first = s.liberties(&board).clone();
        assert!(s.is_liberties_cached());
        let second = s.liberties(&board);
        assert_eq!(&first, second);
        assert_eq!(first.len(), 6);
    }

    #[test]
    fn test_join_merges_strings() {
        let board = setup(&[
            (4, 4, Color::Black),
            (4, 6, Color::Black),
            (4, 5, Color::Black),
        ]);
        assert_eq!(board.num_strings(), 1);
        let s = board.string_at(Location::new(4, 6)).unwrap();
        assert_eq!(s.size(), 3);
        assert_eq!(s.liberties(&board).len(), 8);
        assert!(board.check_invariants().is_ok());
    }

    #[test]
    fn test_self_merge_is_noop() {
        let mut board = setup(&[(2, 2, Color::White)]);
        let id = board.position(Location::new(2, 2)).string().unwrap();
        assert_eq!(board.merge_strings(id, id), id);
        assert_eq!(board.string(id).map(GoString::size), Some(1));
    }

    #[test]
    fn test_removal_splits_string() {
        let mut board = setup(&[
            (5, 4, Color::Black),
            (5, 5, Color::Black),
            (5, 6, Color::Black),
        ]);
        let middle = Location::new(5, 5);
        let pieces = board.remove_stone_from_string(middle);
        board.lift_stone(middle);
        board.invalidate_neighbor_liberties(middle);
        board.rebuild_groups();

        assert_eq!(pieces.len(), 2);
        assert_eq!(board.num_strings(), 2);
        assert_eq!(board.liberty_count_at(Location::new(5, 4)), 4);
        assert!(board.check_invariants().is_ok());
    }

    #[test]
    fn test_flood_of_empty_point_is_empty() {
        let board = setup(&[(1, 2, Color::Black)]);
        assert!(board.flood_string(Location::new(1, 1)).is_empty());
    }
}
