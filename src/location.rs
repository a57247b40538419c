//! Board geometry: 1-indexed locations and bounding boxes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point on the board, 1-indexed by row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub row: u8,
    pub col: u8,
}

impl Location {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Shift by a (row, col) delta. Returns `None` when the result would
    /// fall above or left of the board; the lower/right bound is the
    /// board's business.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Location> {
        let row = i32::from(self.row) + dr;
        let col = i32::from(self.col) + dc;
        if row < 1 || col < 1 || row > i32::from(u8::MAX) || col > i32::from(u8::MAX) {
            return None;
        }
        Some(Location::new(row as u8, col as u8))
    }

    /// Euclidean distance.
    pub fn distance(self, other: Location) -> f32 {
        let dr = f32::from(self.row) - f32::from(other.row);
        let dc = f32::from(self.col) - f32::from(other.col);
        (dr * dr + dc * dc).sqrt()
    }

    /// Distance to the nearest edge on a board of `size` (0 = first line).
    pub fn line(self, size: usize) -> usize {
        let row = usize::from(self.row);
        let col = usize::from(self.col);
        let d_row = (row - 1).min(size - row);
        let d_col = (col - 1).min(size - col);
        d_row.min(d_col)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// An inclusive rectangle of board locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_row: u8,
    pub min_col: u8,
    pub max_row: u8,
    pub max_col: u8,
}

impl BoundingBox {
    /// A box holding a single location.
    pub fn around(loc: Location) -> Self {
        Self {
            min_row: loc.row,
            min_col: loc.col,
            max_row: loc.row,
            max_col: loc.col,
        }
    }

    /// The smallest box holding every location, or `None` for an empty input.
    pub fn of<I: IntoIterator<Item = Location>>(locs: I) -> Option<Self> {
        let mut iter = locs.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::around(first), |mut bbox, loc| {
            bbox.include(loc);
            bbox
        }))
    }

    pub fn include(&mut self, loc: Location) {
        self.min_row = self.min_row.min(loc.row);
        self.min_col = self.min_col.min(loc.col);
        self.max_row = self.max_row.max(loc.row);
        self.max_col = self.max_col.max(loc.col);
    }

    pub fn contains(&self, loc: Location) -> bool {
        (self.min_row..=self.max_row).contains(&loc.row)
            && (self.min_col..=self.max_col).contains(&loc.col)
    }

    /// Grow by `amount` in every direction, clamped to a board of `size`.
    pub fn expand(&self, amount: u8, size: usize) -> Self {
        let max = size as u8;
        Self {
            min_row: self.min_row.saturating_sub(amount).max(1),
            min_col: self.min_col.saturating_sub(amount).max(1),
            max_row: self.max_row.saturating_add(amount).min(max),
            max_col: self.max_col.saturating_add(amount).min(max),
        }
    }

    /// Push any side lying within `threshold` of the edge onto the edge.
    pub fn snap_to_edges(&self, size: usize, threshold: usize) -> Self {
        let max = size as u8;
        let t = threshold as u8;
        let mut snapped = *self;
        if snapped.min_row <= 1 + t {
            snapped.min_row = 1;
        }
        if snapped.min_col <= 1 + t {
            snapped.min_col = 1;
        }
        if snapped.max_row + t >= max {
            snapped.max_row = max;
        }
        if snapped.max_col + t >= max {
            snapped.max_col = max;
        }
        snapped
    }

    pub fn rows(&self) -> usize {
        usize::from(self.max_row - self.min_row) + 1
    }

    pub fn cols(&self) -> usize {
        usize::from(self.max_col - self.min_col) + 1
    }

    /// Whether any side of the box lies on the edge of a board of `size`.
    pub fn touches_edge(&self, size: usize) -> bool {
        self.min_row == 1
            || self.min_col == 1
            || usize::from(self.max_row) == size
            || usize::from(self.max_col) == size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_stops_at_top_left() {
        let loc = Location::new(1, 3);
        assert_eq!(loc.offset(-1, 0), None);
        assert_eq!(loc.offset(0, -1), Some(Location::new(1, 2)));
        assert_eq!(loc.offset(2, 1), Some(Location::new(3, 4)));
    }

    #[test]
    fn test_distance_is_euclidean() {
        let a = Location::new(1, 1);
        let b = Location::new(4, 5);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_line_numbers() {
        assert_eq!(Location::new(1, 5).line(9), 0);
        assert_eq!(Location::new(3, 3).line(9), 2);
        assert_eq!(Location::new(5, 5).line(9), 4);
        assert_eq!(Location::new(9, 7).line(9), 0);
    }

    #[test]
    fn test_bbox_expand_and_snap() {
        let bbox = BoundingBox::of([Location::new(3, 4), Location::new(5, 6)]).unwrap();
        assert_eq!(bbox.rows(), 3);
        assert_eq!(bbox.cols(), 3);

        let grown = bbox.expand(1, 9);
        assert_eq!((grown.min_row, grown.min_col, grown.max_row, grown.max_col), (2, 3, 6, 7));

        let snapped = grown.snap_to_edges(9, 1);
        assert_eq!(snapped.min_row, 1);
        assert_eq!(snapped.min_col, 3);
        assert_eq!(snapped.max_row, 6);
        assert!(snapped.touches_edge(9));
    }
}
