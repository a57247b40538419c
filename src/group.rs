//! Groups: same-colored strings joined by diagonal or one-point-jump links.
//!
//! Groups are rebuilt from scratch after every change to the string layout.
//! Connectivity can change far from the move that caused it, so patching
//! them in place is not attempted.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::board::{Board, EyeId, GroupId, StringId};
use crate::constants::{DIAGONAL_OFFSETS, JUMP_OFFSETS};
use crate::location::{BoundingBox, Location};
use crate::position::Color;

/// A set of strings treated as one life-or-death unit.
#[derive(Debug, Clone)]
pub struct Group {
    color: Color,
    pub(crate) strings: Vec<StringId>,
    bbox: BoundingBox,
    pub(crate) potential: OnceCell<f32>,
    /// `None` until eyes have been discovered for this layout.
    pub(crate) eyes: Option<Vec<EyeId>>,
    pub(crate) absolute_health: f32,
    pub(crate) relative_health: f32,
    pub(crate) unconditionally_alive: bool,
}

impl Group {
    fn new(color: Color, strings: Vec<StringId>, bbox: BoundingBox) -> Self {
        Self {
            color,
            strings,
            bbox,
            potential: OnceCell::new(),
            eyes: None,
            absolute_health: 0.0,
            relative_health: 0.0,
            unconditionally_alive: false,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn strings(&self) -> &[StringId] {
        &self.strings
    }

    /// Bounding box of the group's stones.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Eyes found by the last analysis, empty if none has run.
    pub fn eyes(&self) -> &[EyeId] {
        self.eyes.as_deref().unwrap_or(&[])
    }

    /// Health ignoring neighboring groups, from the group owner's side.
    pub fn absolute_health(&self) -> f32 {
        self.absolute_health
    }

    /// Health adjusted for the weakest neighboring enemy group, from the
    /// group owner's side.
    pub fn relative_health(&self) -> f32 {
        self.relative_health
    }

    pub fn is_unconditionally_alive(&self) -> bool {
        self.unconditionally_alive
    }

    pub(crate) fn reset_analysis(&mut self) {
        self.potential.take();
        self.eyes = None;
        self.absolute_health = 0.0;
        self.relative_health = 0.0;
        self.unconditionally_alive = false;
    }
}

/// Minimal union-find over dense string indices.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

impl Board {
    /// Whether the stones at `a` and `b` (same color, not 4-adjacent) are
    /// linked: diagonal unless both cutting points hold enemy stones, or a
    /// one-point jump over an empty point.
    pub fn is_linked(&self, a: Location, b: Location) -> bool {
        let (Some(color), Some(other)) = (self.color_at(a), self.color_at(b)) else {
            return false;
        };
        if color != other {
            return false;
        }
        let dr = i32::from(b.row) - i32::from(a.row);
        let dc = i32::from(b.col) - i32::from(a.col);
        match (dr.abs(), dc.abs()) {
            (1, 1) => {
                let cut1 = a.offset(dr, 0);
                let cut2 = a.offset(0, dc);
                let enemy = Some(color.opponent());
                !(cut1.and_then(|c| self.color_at(c)) == enemy
                    && cut2.and_then(|c| self.color_at(c)) == enemy)
            }
            (2, 0) | (0, 2) => a
                .offset(dr / 2, dc / 2)
                .is_some_and(|mid| self.is_empty_at(mid)),
            _ => false,
        }
    }

    /// Recompute every group from the current strings and drop all analysis.
    pub(crate) fn rebuild_groups(&mut self) {
        // Order by first stone so group numbering does not depend on arena slots.
        let mut ids: Vec<StringId> = self.strings().map(|(id, _)| id).collect();
        ids.sort_by_key(|&id| self.string(id).and_then(|s| s.members().iter().min().copied()));
        let dense: BTreeMap<StringId, usize> =
            ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut sets = DisjointSet::new(ids.len());

        for (i, &id) in ids.iter().enumerate() {
            let Some(string) = self.string(id) else { continue };
            for &loc in string.members() {
                for &(dr, dc) in DIAGONAL_OFFSETS.iter().chain(JUMP_OFFSETS.iter()) {
                    let Some(other) = loc.offset(dr, dc).filter(|&o| self.in_bounds(o)) else {
                        continue;
                    };
                    let Some(other_id) = self.position(other).string() else {
                        continue;
                    };
                    if other_id == id || !self.is_linked(loc, other) {
                        continue;
                    }
                    if let Some(&j) = dense.get(&other_id) {
                        sets.union(i, j);
                    }
                }
            }
        }

        let mut members: BTreeMap<usize, Vec<StringId>> = BTreeMap::new();
        for (i, &id) in ids.iter().enumerate() {
            members.entry(sets.find(i)).or_default().push(id);
        }

        let mut groups = Vec::with_capacity(members.len());
        for strings in members.into_values() {
            let stones = strings
                .iter()
                .filter_map(|&id| self.string(id))
                .flat_map(|s| s.members().iter().copied());
            let Some(bbox) = BoundingBox::of(stones) else { continue };
            let color = strings
                .first()
                .and_then(|&id| self.string(id))
                .map_or(Color::Black, |s| s.color());
            let gid = GroupId(groups.len());
            for &id in &strings {
                if let Some(s) = self.strings.get_mut(id.0) {
                    s.group = Some(gid);
                }
            }
            groups.push(Group::new(color, strings, bbox));
        }
        self.groups = groups;
        self.invalidate_analysis();
    }

    /// All stones of a group.
    pub fn group_stones(&self, id: GroupId) -> Vec<Location> {
        self.group(id).map_or_else(Vec::new, |g| {
            g.strings()
                .iter()
                .filter_map(|&s| self.string(s))
                .flat_map(|s| s.members().iter().copied())
                .collect()
        })
    }

    /// Union of the liberties of a group's strings.
    pub fn group_liberties(&self, id: GroupId) -> BTreeSet<Location> {
        self.group(id).map_or_else(BTreeSet::new, |g| {
            g.strings()
                .iter()
                .filter_map(|&s| self.string(s))
                .flat_map(|s| s.liberties(self).iter().copied())
                .collect()
        })
    }

    /// Enemy groups with a stone orthogonally adjacent to this group or
    /// sharing one of its liberties.
    pub fn neighboring_enemy_groups(&self, id: GroupId) -> BTreeSet<GroupId> {
        let Some(group) = self.group(id) else {
            return BTreeSet::new();
        };
        let enemy = group.color().opponent();
        let mut touching: BTreeSet<Location> = BTreeSet::new();
        for stone in self.group_stones(id) {
            touching.extend(self.neighbors(stone));
        }
        for liberty in self.group_liberties(id) {
            touching.extend(self.neighbors(liberty));
        }
        touching
            .into_iter()
            .filter(|&loc| self.color_at(loc) == Some(enemy))
            .filter_map(|loc| self.group_at(loc))
            .collect()
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
    fn test_diagonal_link() {
        let board = setup(&[(3, 3, Color::Black), (4, 4, Color::Black)]);
        assert_eq!(board.num_strings(), 2);
        assert_eq!(board.num_groups(), 1);
        assert_eq!(board.group_at(Location::new(3, 3)), board.group_at(Location::new(4, 4)));
    }

    #[test]
    fn test_cut_diagonal_is_not_linked() {
        let board = setup(&[
            (3, 3, Color::Black),
            (4, 4, Color::Black),
            (3, 4, Color::White),
            (4, 3, Color::White),
        ]);
        assert_ne!(board.group_at(Location::new(3, 3)), board.group_at(Location::new(4, 4)));
        assert_eq!(board.num_groups(), 4);
    }

    #[test]
    fn test_one_point_jump_needs_empty_middle() {
        let open = setup(&[(5, 3, Color::White), (5, 5, Color::White)]);
        assert_eq!(open.num_groups(), 1);

        let blocked = setup(&[
            (5, 3, Color::White),
            (5, 5, Color::White),
            (5, 4, Color::Black),
        ]);
        assert_eq!(blocked.num_groups(), 3);
    }

    #[test]
    fn test_group_liberties_and_bbox() {
        let board = setup(&[(2, 2, Color::Black), (3, 3, Color::Black)]);
        let gid = board.group_at(Location::new(2, 2)).unwrap();
        assert_eq!(board.group_liberties(gid).len(), 6);
        let bbox = board.group(gid).unwrap().bbox();
        assert_eq!((bbox.min_row, bbox.max_row), (2, 3));
        assert_eq!(board.group_stones(gid).len(), 2);
    }

    #[test]
    fn test_neighboring_enemy_groups() {
        let board = setup(&[(5, 5, Color::Black), (5, 6, Color::White), (1, 1, Color::White)]);
        let gid = board.group_at(Location::new(5, 5)).unwrap();
        let enemies = board.neighboring_enemy_groups(gid);
        assert_eq!(enemies.len(), 1);
        assert!(enemies.contains(&board.group_at(Location::new(5, 6)).unwrap()));
    }
}
