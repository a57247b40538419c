//! Eye potential: how much room a group has to make eyes.
//!
//! The group's bounding box is grown by one point (snapped to the board edge
//! when it comes within one line of it). Every row and column of the box is
//! split into runs of points that are either empty or hold the group's own
//! stones. A run is worth more when it has more empty points, when its ends
//! are closed off by the group or the edge, and when the group already has
//! a stone in it.

use crate::board::{Board, GroupId};
use crate::constants::{EDGE_SNAP_THRESHOLD, EYE_POTENTIAL_SCALE, MAX_EYE_POTENTIAL};
use crate::location::{BoundingBox, Location};

/// Contribution of one run of open points.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    empties: usize,
    has_own_stone: bool,
    closed_ends: usize,
}

impl Run {
    fn potential(self) -> f32 {
        let closure = 0.25 + 0.25 * self.closed_ends as f32;
        let support = if self.has_own_stone { 1.0 } else { 0.5 };
        self.empties as f32 * closure * support
    }
}

impl Board {
    /// Eye potential of a group in `[0, MAX_EYE_POTENTIAL]`. Cached until the
    /// next structural change.
    pub fn eye_potential(&self, id: GroupId) -> f32 {
        let Some(group) = self.group(id) else {
            return 0.0;
        };
        *group.potential.get_or_init(|| self.compute_eye_potential(id))
    }

    fn compute_eye_potential(&self, id: GroupId) -> f32 {
        let Some(group) = self.group(id) else {
            return 0.0;
        };
        let area = group
            .bbox()
            .expand(1, self.size())
            .snap_to_edges(self.size(), EDGE_SNAP_THRESHOLD);

        let mut total = 0.0;
        for row in area.min_row..=area.max_row {
            let line: Vec<Location> = (area.min_col..=area.max_col)
                .map(|col| Location::new(row, col))
                .collect();
            total += self.line_potential(id, &line);
        }
        for col in area.min_col..=area.max_col {
            let line: Vec<Location> = (area.min_row..=area.max_row)
                .map(|row| Location::new(row, col))
                .collect();
            total += self.line_potential(id, &line);
        }
        (total.sqrt() / EYE_POTENTIAL_SCALE).min(MAX_EYE_POTENTIAL)
    }

    fn line_potential(&self, id: GroupId, line: &[Location]) -> f32 {
        let own = |loc: Location| self.is_occupied_by_group(loc, id);
        let open = |loc: Location| self.is_empty_at(loc) || own(loc);

        let mut total = 0.0;
        let mut i = 0;
        while i < line.len() {
            if !open(line[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < line.len() && open(line[i]) {
                i += 1;
            }
            let run = &line[start..i];
            let closed = |loc: Location| own(loc) || self.is_edge(loc);
            let mut closed_ends = usize::from(closed(run[0]));
            if run.len() > 1 {
                closed_ends += usize::from(closed(run[run.len() - 1]));
            }
            total += Run {
                empties: run.iter().filter(|&&l| self.is_empty_at(l)).count(),
                has_own_stone: run.iter().any(|&l| own(l)),
                closed_ends,
            }
            .potential();
        }
        total
    }

    fn is_occupied_by_group(&self, loc: Location, id: GroupId) -> bool {
        self.group_at(loc) == Some(id)
    }
}

/// Box used for the eye-potential scan of a group, exposed for diagnostics.
pub fn scan_area(board: &Board, id: GroupId) -> Option<BoundingBox> {
    board.group(id).map(|g| {
        g.bbox()
            .expand(1, board.size())
            .snap_to_edges(board.size(), EDGE_SNAP_THRESHOLD)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Color;

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
    fn test_run_potential() {
        let run = Run {
            empties: 3,
            has_own_stone: true,
            closed_ends: 2,
        };
        assert!((run.potential() - 2.25).abs() < 1e-6);
        let open = Run {
            empties: 2,
            has_own_stone: false,
            closed_ends: 0,
        };
        assert!((open.potential() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_potential_is_bounded() {
        let board = setup(&[(5, 5, Color::Black)]);
        let gid = board.group_at(Location::new(5, 5)).unwrap();
        let p = board.eye_potential(gid);
        assert!(p > 0.0 && p <= MAX_EYE_POTENTIAL);
        // Cached value is stable.
        assert_eq!(board.eye_potential(gid), p);
    }

    #[test]
    fn test_surrounded_group_has_less_potential() {
        let free = setup(&[(5, 5, Color::Black), (5, 6, Color::Black)]);
        let boxed = setup(&[
            (5, 5, Color::Black),
            (5, 6, Color::Black),
            (4, 5, Color::White),
            (4, 6, Color::White),
            (6, 5, Color::White),
            (6, 6, Color::White),
            (5, 4, Color::White),
            (5, 7, Color::White),
        ]);
        let loc = Location::new(5, 5);
        let free_p = free.eye_potential(free.group_at(loc).unwrap());
        let boxed_p = boxed.eye_potential(boxed.group_at(loc).unwrap());
        assert!(boxed_p < free_p);
    }

    #[test]
    fn test_scan_area_snaps_to_edge() {
        let board = setup(&[(2, 2, Color::White)]);
        let area = scan_area(&board, board.group_at(Location::new(2, 2)).unwrap()).unwrap();
        assert_eq!((area.min_row, area.min_col), (1, 1));
        assert_eq!((area.max_row, area.max_col), (3, 3));
    }
}
