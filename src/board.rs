//! The Go board: a grid of cells plus arenas of strings, groups and eyes.
//!
//! Cells refer to strings and eyes by index rather than by reference, so the
//! whole board is a plain value: `clone()` is a deep copy that search
//! threads can mutate without touching the live game.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::BoardConfig;
use crate::constants::{
    DIAGONAL_OFFSETS, MAX_BOARD_SIZE, MAX_HANDICAP, MIN_BOARD_SIZE, NOBI_OFFSETS,
};
use crate::error::{ConfigError, InvariantViolation};
use crate::eye::Eye;
use crate::eye_type::{EyeStatus, EyeType};
use crate::group::Group;
use crate::location::Location;
use crate::moves::{Action, Move, MoveList};
use crate::position::{Color, Occupant, Position, Stone};
use crate::string::GoString;
use crate::zobrist;

/// Index of a string in the board's string arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(pub(crate) usize);

/// Index of a group; groups are rebuilt after every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

/// Index of an eye; eyes are recomputed lazily per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EyeId(pub(crate) usize);

impl StringId {
    /// Placeholder for stones whose string is about to be rebuilt.
    pub(crate) const PENDING: StringId = StringId(usize::MAX);
}

/// Slot storage with index reuse.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn insert(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        }
    }

    pub(crate) fn remove(&mut self, idx: usize) -> Option<T> {
        let value = self.slots.get_mut(idx)?.take();
        if value.is_some() {
            self.free.push(idx);
        }
        value
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

/// Canonical, id-free description of a board used to compare states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralSnapshot {
    pub stones: Vec<(Location, Color)>,
    /// Sorted member lists of every string, sorted.
    pub strings: Vec<Vec<Location>>,
    /// Each group as its sorted list of sorted strings.
    pub groups: Vec<Vec<Vec<Location>>>,
    pub eyes: Vec<(Vec<Location>, EyeType, EyeStatus)>,
    pub captures: [u32; 2],
    pub ko: Option<Location>,
    pub hash: u64,
}

/// A Go board with its derived string/group/eye structure and move history.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Position>,
    pub(crate) strings: Arena<GoString>,
    pub(crate) groups: Vec<Group>,
    pub(crate) eyes: Vec<Eye>,
    pub(crate) moves: MoveList,
    handicap: usize,
    /// Stones captured by black (index 0) and by white (index 1).
    pub(crate) captures: [u32; 2],
    pub(crate) ko: Option<Location>,
    pub(crate) stone_hash: u64,
    pub(crate) stone_digest: u64,
    pub(crate) enforce_ko: bool,
    /// Whether eyes, health and territory contributions are current.
    pub(crate) analysis_valid: bool,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Panics
    /// If `size` is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    pub fn new(size: usize) -> Self {
        assert!(
            (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size),
            "board size {size} out of range"
        );
        let mut cells = Vec::with_capacity(size * size);
        for row in 1..=size {
            for col in 1..=size {
                cells.push(Position::new(Location::new(row as u8, col as u8)));
            }
        }
        Self {
            size,
            cells,
            strings: Arena::default(),
            groups: Vec::new(),
            eyes: Vec::new(),
            moves: MoveList::new(),
            handicap: 0,
            captures: [0, 0],
            ko: None,
            stone_hash: 0,
            stone_digest: 0,
            enforce_ko: true,
            analysis_valid: false,
        }
    }

    /// Like [`Board::with_config`], but rejects an out-of-range size or
    /// handicap instead of panicking.
    pub fn try_with_config(config: &BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Create a board from configuration, placing handicap stones.
    ///
    /// # Panics
    /// If the size is out of range; see [`Board::try_with_config`].
    pub fn with_config(config: &BoardConfig) -> Self {
        let mut board = Self::new(config.size);
        board.enforce_ko = config.enforce_ko;
        board.place_handicap(config.handicap);
        board
    }

    /// Place `count` black handicap stones on star points. They are not moves;
    /// white moves first afterwards.
    pub fn place_handicap(&mut self, count: usize) {
        let points = star_points(self.size);
        let count = count.min(MAX_HANDICAP).min(points.len());
        for &loc in points.iter().take(count) {
            self.put_stone(loc, Color::Black, None);
            self.create_string_at(loc);
        }
        self.handicap = count;
        self.rebuild_groups();
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn handicap(&self) -> usize {
        self.handicap
    }

    pub fn enforces_ko(&self) -> bool {
        self.enforce_ko
    }

    pub fn set_enforce_ko(&mut self, enforce: bool) {
        self.enforce_ko = enforce;
    }

    pub fn in_bounds(&self, loc: Location) -> bool {
        loc.row >= 1
            && loc.col >= 1
            && usize::from(loc.row) <= self.size
            && usize::from(loc.col) <= self.size
    }

    pub(crate) fn index(&self, loc: Location) -> usize {
        (usize::from(loc.row) - 1) * self.size + usize::from(loc.col) - 1
    }

    /// The cell at `loc`, or `None` off the board.
    pub fn get(&self, loc: Location) -> Option<&Position> {
        if self.in_bounds(loc) {
            Some(&self.cells[self.index(loc)])
        } else {
            None
        }
    }

    /// The cell at an on-board location.
    pub fn position(&self, loc: Location) -> &Position {
        &self.cells[self.index(loc)]
    }

    pub(crate) fn position_mut(&mut self, loc: Location) -> &mut Position {
        let idx = self.index(loc);
        &mut self.cells[idx]
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }

    pub(crate) fn positions_mut(&mut self) -> impl Iterator<Item = &mut Position> {
        self.cells.iter_mut()
    }

    pub fn color_at(&self, loc: Location) -> Option<Color> {
        self.get(loc).and_then(Position::color)
    }

    pub fn is_empty_at(&self, loc: Location) -> bool {
        self.get(loc).is_some_and(Position::is_empty)
    }

    fn offsets(&self, loc: Location, offsets: &'static [(i32, i32)]) -> impl Iterator<Item = Location> + '_ {
        offsets
            .iter()
            .filter_map(move |&(dr, dc)| loc.offset(dr, dc))
            .filter(move |&n| self.in_bounds(n))
    }

    /// Orthogonal neighbors on the board.
    pub fn neighbors(&self, loc: Location) -> impl Iterator<Item = Location> + '_ {
        self.offsets(loc, &NOBI_OFFSETS)
    }

    /// Diagonal neighbors on the board.
    pub fn diagonals(&self, loc: Location) -> impl Iterator<Item = Location> + '_ {
        self.offsets(loc, &DIAGONAL_OFFSETS)
    }

    /// 4 in the interior, 3 on an edge, 2 in a corner.
    pub fn neighbor_slots(&self, loc: Location) -> usize {
        self.neighbors(loc).count()
    }

    pub fn is_edge(&self, loc: Location) -> bool {
        self.neighbor_slots(loc) < 4
    }

    pub fn is_corner(&self, loc: Location) -> bool {
        self.neighbor_slots(loc) == 2
    }

    pub fn stone_count(&self, color: Color) -> usize {
        self.cells.iter().filter(|p| p.color() == Some(color)).count()
    }

    /// Stones captured so far by `color`.
    pub fn captures(&self, color: Color) -> u32 {
        self.captures[color.index()]
    }

    pub fn ko_point(&self) -> Option<Location> {
        self.ko
    }

    pub fn moves(&self) -> &MoveList {
        &self.moves
    }

    pub fn last_move(&self) -> Option<Move> {
        self.moves.last()
    }

    pub fn num_moves(&self) -> usize {
        self.moves.len()
    }

    /// Color of the player to move next.
    pub fn to_move(&self) -> Color {
        match self.moves.last_color() {
            Some(color) => color.opponent(),
            None if self.handicap > 0 => Color::White,
            None => Color::Black,
        }
    }

    /// Two consecutive passes, or a resignation.
    pub fn is_game_over(&self) -> bool {
        let tail = self.moves.suffix(2);
        if tail.last().is_some_and(|m| m.action == Action::Resign) {
            return true;
        }
        tail.len() == 2 && tail.iter().all(|m| m.action == Action::Pass)
    }

    /// Zobrist key of the position, including side to move and ko point.
    pub fn hash(&self) -> u64 {
        let keys = zobrist::keys();
        let mut hash = self.stone_hash;
        if let Some(ko) = self.ko {
            hash ^= keys.ko(ko);
        }
        if self.to_move() == Color::White {
            hash ^= keys.white_to_move;
        }
        hash
    }

    /// Independent digest used to verify cache hits; also covers captures.
    pub fn digest(&self) -> u64 {
        let keys = zobrist::check_keys();
        let mut digest = self.stone_digest;
        if let Some(ko) = self.ko {
            digest ^= keys.ko(ko);
        }
        if self.to_move() == Color::White {
            digest ^= keys.white_to_move;
        }
        let captures = (u64::from(self.captures[0]) << 32) | u64::from(self.captures[1]);
        digest ^ zobrist::mix(captures)
    }

    /// Put a stone on an empty cell with a pending string id and update hashes.
    pub(crate) fn put_stone(&mut self, loc: Location, color: Color, annotation: Option<u16>) {
        let mut stone = Stone::new(color);
        stone.annotation = annotation;
        self.position_mut(loc).occupant = Occupant::Stone {
            stone,
            string: StringId::PENDING,
        };
        self.toggle_hash(loc, color);
    }

    /// Clear a cell and update hashes. String bookkeeping is the caller's job.
    pub(crate) fn lift_stone(&mut self, loc: Location) -> Option<Color> {
        let color = self.color_at(loc)?;
        self.position_mut(loc).occupant = Occupant::Empty { eye: None };
        self.toggle_hash(loc, color);
        Some(color)
    }

    fn toggle_hash(&mut self, loc: Location, color: Color) {
        self.stone_hash ^= zobrist::keys().stone(loc, color);
        self.stone_digest ^= zobrist::check_keys().stone(loc, color);
    }

    pub fn string(&self, id: StringId) -> Option<&GoString> {
        self.strings.get(id.0)
    }

    pub fn string_at(&self, loc: Location) -> Option<&GoString> {
        self.get(loc)?.string().and_then(|id| self.string(id))
    }

    pub fn strings(&self) -> impl Iterator<Item = (StringId, &GoString)> {
        self.strings.iter().map(|(i, s)| (StringId(i), s))
    }

    pub fn num_strings(&self) -> usize {
        self.strings.len()
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    pub fn group_at(&self, loc: Location) -> Option<GroupId> {
        self.string_at(loc).and_then(GoString::group)
    }

    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups.iter().enumerate().map(|(i, g)| (GroupId(i), g))
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn eye(&self, id: EyeId) -> Option<&Eye> {
        self.eyes.get(id.0)
    }

    /// Drop everything derived from the current string layout.
    pub(crate) fn invalidate_analysis(&mut self) {
        self.analysis_valid = false;
        self.eyes.clear();
        for cell in &mut self.cells {
            cell.set_eye(None);
            cell.score_contribution = 0.0;
            if let Some(stone) = cell.stone_mut() {
                stone.health = 0.0;
                stone.dead = false;
            }
        }
        for group in &mut self.groups {
            group.reset_analysis();
        }
    }

    /// Id-free description of the board, eyes included.
    pub fn structural_snapshot(&mut self) -> StructuralSnapshot {
        self.update_health();

        let stones = self
            .cells
            .iter()
            .filter_map(|p| p.color().map(|c| (p.loc, c)))
            .collect();

        let sorted_members = |s: &GoString| {
            let mut members = s.members().to_vec();
            members.sort();
            members
        };
        let mut strings: Vec<Vec<Location>> =
            self.strings.iter().map(|(_, s)| sorted_members(s)).collect();
        strings.sort();

        let mut groups: Vec<Vec<Vec<Location>>> = self
            .groups
            .iter()
            .map(|g| {
                let mut members: Vec<Vec<Location>> = g
                    .strings()
                    .iter()
                    .filter_map(|&id| self.string(id))
                    .map(sorted_members)
                    .collect();
                members.sort();
                members
            })
            .collect();
        groups.sort();

        let mut eyes: Vec<(Vec<Location>, EyeType, EyeStatus)> = self
            .eyes
            .iter()
            .map(|e| (e.members().to_vec(), e.eye_type(), e.status()))
            .collect();
        eyes.sort_by(|a, b| a.0.cmp(&b.0));

        StructuralSnapshot {
            stones,
            strings,
            groups,
            eyes,
            captures: self.captures,
            ko: self.ko,
            hash: self.hash(),
        }
    }

    /// Deep check of the cell / string / group / eye relations.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for cell in &self.cells {
            if let Occupant::Stone { stone, string } = cell.occupant {
                let s = self
                    .string(string)
                    .ok_or(InvariantViolation::DanglingString(cell.loc))?;
                if !s.contains(cell.loc) {
                    return Err(InvariantViolation::MemberMismatch {
                        id: string.0,
                        loc: cell.loc,
                    });
                }
                if s.color() != stone.color {
                    return Err(InvariantViolation::MixedColors(string.0));
                }
            }
        }

        for (id, s) in self.strings.iter() {
            if s.members().is_empty() {
                return Err(InvariantViolation::EmptyString(id));
            }
            for &loc in s.members() {
                if self.position(loc).string() != Some(StringId(id)) {
                    return Err(InvariantViolation::MemberMismatch { id, loc });
                }
            }
            let flooded: BTreeSet<Location> = self.flood_string(s.members()[0]).into_iter().collect();
            let members: BTreeSet<Location> = s.members().iter().copied().collect();
            if flooded != members {
                return Err(InvariantViolation::NotMaximal(id));
            }
            let count = self
                .groups
                .iter()
                .filter(|g| g.strings().contains(&StringId(id)))
                .count();
            if count != 1 {
                return Err(InvariantViolation::GroupMembership { id, count });
            }
        }

        for (id, eye) in self.eyes.iter().enumerate() {
            for &loc in eye.members() {
                let cell = self.position(loc);
                if cell.is_empty() && cell.eye() != Some(EyeId(id)) {
                    return Err(InvariantViolation::EyeMembership { id, loc });
                }
            }
        }
        Ok(())
    }

    /// Run the invariant check in debug builds; release builds only log.
    pub(crate) fn debug_validate(&self, context: &str) {
        if let Err(err) = self.check_invariants() {
            tracing::warn!(%err, context, "board invariant violated");
            debug_assert!(false, "board invariant violated after {context}: {err}");
        }
    }
}

/// Standard star points, corners first, then center, then sides.
pub fn star_points(size: usize) -> Vec<Location> {
    let mid = (size as u8 + 1) / 2;
    if size < 7 {
        return if size % 2 == 1 {
            vec![Location::new(mid, mid)]
        } else {
            Vec::new()
        };
    }
    let near: u8 = if size >= 13 { 4 } else { 3 };
    let far = size as u8 + 1 - near;
    let mut points = vec![
        Location::new(near, far),
        Location::new(far, near),
        Location::new(far, far),
        Location::new(near, near),
    ];
    if size % 2 == 1 {
        points.push(Location::new(mid, mid));
        if size >= 15 {
            points.extend([
                Location::new(mid, near),
                Location::new(mid, far),
                Location::new(near, mid),
                Location::new(far, mid),
            ]);
        }
    }
    points
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 1..=self.size {
            write!(f, "{} ", (b'a' + col as u8 - 1) as char)?;
        }
        writeln!(f)?;
        for row in 1..=self.size {
            write!(f, "{row:>2} ")?;
            for col in 1..=self.size {
                let cell = self.position(Location::new(row as u8, col as u8));
                write!(f, "{} ", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(9);
        assert_eq!(board.size(), 9);
        assert_eq!(board.positions().count(), 81);
        assert!(board.positions().all(Position::is_empty));
        assert_eq!(board.to_move(), Color::Black);
        assert_eq!(board.num_strings(), 0);
        assert!(board.check_invariants().is_ok());
    }

    #[test]
    fn test_neighbor_slots() {
        let board = Board::new(9);
        assert_eq!(board.neighbor_slots(Location::new(1, 1)), 2);
        assert_eq!(board.neighbor_slots(Location::new(1, 5)), 3);
        assert_eq!(board.neighbor_slots(Location::new(5, 5)), 4);
        assert!(board.is_corner(Location::new(9, 9)));
        assert!(board.is_edge(Location::new(9, 4)));
        assert!(!board.is_edge(Location::new(2, 2)));
        assert_eq!(board.diagonals(Location::new(1, 1)).count(), 1);
    }

    #[test]
    fn test_star_points() {
        assert_eq!(star_points(9).len(), 5);
        assert_eq!(star_points(13).len(), 5);
        assert_eq!(star_points(19).len(), 9);
        assert!(star_points(19).contains(&Location::new(4, 4)));
        assert!(star_points(9).contains(&Location::new(3, 7)));
    }

    #[test]
    fn test_handicap_makes_white_move_first() {
        let mut board = Board::new(9);
        board.place_handicap(2);
        assert_eq!(board.handicap(), 2);
        assert_eq!(board.stone_count(Color::Black), 2);
        assert_eq!(board.to_move(), Color::White);
        assert_eq!(board.num_groups(), 2);
        assert!(board.check_invariants().is_ok());
    }

    #[test]
    fn test_arena_reuses_slots() {
        let mut arena: Arena<u32> = Arena::default();
        let a = arena.insert(1);
        let b = arena.insert(2);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.remove(a), None);
        let c = arena.insert(3);
        assert_eq!(c, a);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(b), Some(&2));
    }

    #[test]
    fn test_hash_changes_with_side_to_move() {
        let mut board = Board::new(9);
        let empty = board.hash();
        board.pass().unwrap();
        assert_ne!(board.hash(), empty);
        board.undo();
        assert_eq!(board.hash(), empty);
    }
}
