//! Benson's algorithm for unconditional life.
//!
//! A set of strings is unconditionally alive when each of them has at least
//! two vital regions: enclosed regions whose every empty point is a liberty
//! of the string and whose bordering strings all belong to the set. Strings
//! failing the test are removed, regions bordering removed strings stop
//! counting, and the process repeats until nothing changes.

use std::collections::BTreeSet;

use crate::board::{Board, StringId};
use crate::location::Location;
use crate::position::Color;

/// A maximal region of points not holding `color` stones.
#[derive(Debug, Clone)]
struct Region {
    points: Vec<Location>,
    empties: Vec<Location>,
    borders: BTreeSet<StringId>,
}

/// Result of running the algorithm for one color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnconditionalLife {
    /// Strings that cannot be captured even if the owner always passes.
    pub strings: BTreeSet<StringId>,
    /// Points of the regions that keep those strings alive.
    pub vital_points: BTreeSet<Location>,
}

impl Board {
    /// Unconditionally alive strings of `color` and their vital regions.
    pub fn unconditional_life(&self, color: Color) -> UnconditionalLife {
        let regions = self.benson_regions(color);
        let mut alive: BTreeSet<StringId> = self
            .strings()
            .filter(|(_, s)| s.color() == color)
            .map(|(id, _)| id)
            .collect();

        loop {
            let healthy_regions: Vec<&Region> = regions
                .iter()
                .filter(|r| r.borders.iter().all(|b| alive.contains(b)))
                .collect();
            let before = alive.len();
            alive.retain(|&id| {
                let Some(liberties) = self.liberties(id) else {
                    return false;
                };
                let vital = healthy_regions
                    .iter()
                    .filter(|r| r.borders.contains(&id))
                    .filter(|r| r.empties.iter().all(|e| liberties.contains(e)))
                    .count();
                vital >= 2
            });
            if alive.len() == before {
                break;
            }
        }

        let vital_points = regions
            .iter()
            .filter(|r| !r.borders.is_empty() && r.borders.iter().all(|b| alive.contains(b)))
            .filter(|r| {
                r.borders.iter().any(|&b| {
                    self.liberties(b)
                        .is_some_and(|libs| r.empties.iter().all(|e| libs.contains(e)))
                })
            })
            .flat_map(|r| r.points.iter().copied())
            .collect();

        UnconditionalLife {
            strings: alive,
            vital_points,
        }
    }

    fn benson_regions(&self, color: Color) -> Vec<Region> {
        let mut visited = vec![false; self.size() * self.size()];
        let mut regions = Vec::new();
        for cell in self.positions() {
            let start = cell.loc;
            if visited[self.index(start)] || cell.color() == Some(color) {
                continue;
            }
            visited[self.index(start)] = true;
            let mut stack = vec![start];
            let mut region = Region {
                points: Vec::new(),
                empties: Vec::new(),
                borders: BTreeSet::new(),
            };
            while let Some(loc) = stack.pop() {
                region.points.push(loc);
                if self.is_empty_at(loc) {
                    region.empties.push(loc);
                }
                for n in self.neighbors(loc) {
                    if self.color_at(n) == Some(color) {
                        if let Some(id) = self.position(n).string() {
                            region.borders.insert(id);
                        }
                    } else if !visited[self.index(n)] {
                        visited[self.index(n)] = true;
                        stack.push(n);
                    }
                }
            }
            regions.push(region);
        }
        regions
    }
}
