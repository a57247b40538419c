//! Eye discovery and false-eye detection.
//!
//! An eye of a group is a maximal 4-connected region of empty points and
//! moribund enemy stones that lies inside the group's bounding box and is
//! bordered only by that group's stones.

use crate::board::{Board, EyeId, GroupId};
use crate::constants::{MIN_LIFE_THRESH, SAFE_LIBERTIES};
use crate::eye_type::{EyeStatus, EyeType, classify_shape};
use crate::location::Location;
use crate::position::Color;

/// An enclosed region belonging to one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Eye {
    group: GroupId,
    members: Vec<Location>,
    eye_type: EyeType,
    status: EyeStatus,
    signature: Option<String>,
    vital_point: Option<Location>,
    pub(crate) unconditionally_alive: bool,
}

impl Eye {
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Sorted member points, including any moribund enemy stones.
    pub fn members(&self) -> &[Location] {
        &self.members
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn eye_type(&self) -> EyeType {
        self.eye_type
    }

    pub fn status(&self) -> EyeStatus {
        self.status
    }

    /// Neighbor-count signature of four to seven point eyes.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn vital_point(&self) -> Option<Location> {
        self.vital_point
    }

    pub fn is_false(&self) -> bool {
        self.eye_type == EyeType::FalseEye
    }

    pub fn is_unconditionally_alive(&self) -> bool {
        self.unconditionally_alive
    }

    /// Number of eyes this region is worth to its group.
    pub fn value(&self) -> f32 {
        if self.is_false() {
            0.0
        } else {
            self.status.eye_value()
        }
    }
}

impl Board {
    /// A stone in short-term danger: its string is in atari, or its group has
    /// little room for eyes and few liberties.
    pub fn is_moribund(&self, loc: Location) -> bool {
        let Some(id) = self.position(loc).string() else {
            return false;
        };
        if self.liberty_count(id) <= 1 {
            return true;
        }
        let Some(gid) = self.group_at(loc) else {
            return false;
        };
        self.eye_potential(gid) < MIN_LIFE_THRESH && self.group_liberties(gid).len() < SAFE_LIBERTIES
    }

    /// Eyes of a group, discovering them on first use after a change.
    pub fn find_eyes(&mut self, gid: GroupId) -> Vec<EyeId> {
        match self.group(gid) {
            None => return Vec::new(),
            Some(group) => {
                if let Some(eyes) = &group.eyes {
                    return eyes.clone();
                }
            }
        }

        let Some(color) = self.group(gid).map(|g| g.color()) else {
            return Vec::new();
        };
        let mut ids = Vec::new();
        for members in self.eye_regions(gid) {
            let claimed = members
                .iter()
                .any(|&m| self.position(m).eye().is_some());
            if claimed {
                continue;
            }
            let eye = self.build_eye(gid, color, members);
            let id = EyeId(self.eyes.len());
            for &m in eye.members() {
                self.position_mut(m).set_eye(Some(id));
            }
            self.eyes.push(eye);
            ids.push(id);
        }

        if let Some(group) = self.groups.get_mut(gid.0) {
            group.eyes = Some(ids.clone());
        }
        ids
    }

    fn build_eye(&self, gid: GroupId, color: Color, mut members: Vec<Location>) -> Eye {
        members.sort();
        if self.is_false_eye(&members, color) {
            return Eye {
                group: gid,
                members,
                eye_type: EyeType::FalseEye,
                status: EyeStatus::Nakade,
                signature: None,
                vital_point: None,
                unconditionally_alive: false,
            };
        }

        let class = classify_shape(&members);
        let enemy_on_vital = class
            .vital_point
            .is_some_and(|v| self.color_at(v) == Some(color.opponent()));
        let status = if class.status == EyeStatus::Unsettled && enemy_on_vital {
            EyeStatus::Nakade
        } else {
            class.status
        };
        Eye {
            group: gid,
            members,
            eye_type: class.eye_type,
            status,
            signature: class.signature,
            vital_point: class.vital_point,
            unconditionally_alive: false,
        }
    }

    /// Candidate eye regions of a group, before classification.
    fn eye_regions(&self, gid: GroupId) -> Vec<Vec<Location>> {
        let Some(group) = self.group(gid) else {
            return Vec::new();
        };
        let color = group.color();
        let bbox = group.bbox();
        let is_space = |loc: Location| match self.color_at(loc) {
            None => true,
            Some(c) => c != color && self.is_moribund(loc),
        };

        let mut visited = vec![false; self.size() * self.size()];
        let mut regions = Vec::new();
        for row in bbox.min_row..=bbox.max_row {
            for col in bbox.min_col..=bbox.max_col {
                let start = Location::new(row, col);
                if visited[self.index(start)] || !is_space(start) {
                    continue;
                }

                let mut stack = vec![start];
                let mut region = Vec::new();
                let mut enclosed = true;
                visited[self.index(start)] = true;
                while let Some(loc) = stack.pop() {
                    region.push(loc);
                    for n in self.neighbors(loc) {
                        if is_space(n) {
                            if !bbox.contains(n) {
                                enclosed = false;
                            } else if !visited[self.index(n)] {
                                visited[self.index(n)] = true;
                                stack.push(n);
                            }
                        } else if self.group_at(n) != Some(gid) {
                            enclosed = false;
                        }
                    }
                }
                if enclosed {
                    regions.push(region);
                }
            }
        }
        regions
    }

    /// Whether an eye space of `color` can be destroyed by the opponent
    /// because of cutting stones on its diagonals.
    pub fn is_false_eye(&self, members: &[Location], color: Color) -> bool {
        let enemy = color.opponent();
        members.iter().any(|&point| {
            let friends = self
                .neighbors(point)
                .filter(|&n| self.color_at(n) == Some(color))
                .count();
            if friends < 2 {
                return false;
            }
            let qualified = self
                .diagonals(point)
                .filter(|&d| self.color_at(d) == Some(enemy))
                .filter(|&d| {
                    let corner_a = Location::new(point.row, d.col);
                    let corner_b = Location::new(d.row, point.col);
                    self.color_at(corner_a) == Some(color) && self.color_at(corner_b) == Some(color)
                })
                .filter(|&d| !self.is_moribund(d))
                .count();
            (qualified >= 2 && friends >= 3) || (self.is_edge(point) && friends >= 2 && qualified >= 1)
        })
    }

    /// Sum of eye values of a group, analysing eyes if needed.
    pub fn eye_count(&mut self, gid: GroupId) -> f32 {
        self.find_eyes(gid)
            .into_iter()
            .filter_map(|id| self.eye(id))
            .map(Eye::value)
            .sum()
    }
}
