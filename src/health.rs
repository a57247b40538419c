//! Group health.
//!
//! Absolute health looks at one group on its own: eyes, eye potential and
//! liberties. Relative health then compares it with the weakest enemy group
//! it touches, since in a capturing race the weaker side is the one that
//! dies. Stones receive their group's relative health signed from player 1's
//! side.

use crate::board::{Board, GroupId};
use crate::constants::{DIFFERENCE_THRESHOLD, MAX_EYE_POTENTIAL};
use crate::position::Color;

/// Health of a group given its analysed features, from the owner's side.
pub fn absolute_health(eyes: f32, potential: f32, liberties: usize, unconditional: bool) -> f32 {
    if unconditional {
        return 1.0;
    }
    let liberty_term = match liberties {
        0 | 1 => -0.8,
        2 => -0.4,
        3 => -0.1,
        _ => 0.0,
    };
    let mut health =
        -0.2 + 0.4 * eyes.min(2.0) + 0.4 * (potential / MAX_EYE_POTENTIAL) + liberty_term;
    if eyes >= 2.0 {
        health = health.max(0.8);
    }
    health.clamp(-1.0, 1.0)
}

/// Adjust absolute health by the weakest neighboring enemy's health.
pub fn relative_health(own: f32, weakest_enemy: Option<f32>) -> f32 {
    let Some(enemy) = weakest_enemy else {
        return own;
    };
    let diff = own - enemy;
    if diff.abs() > DIFFERENCE_THRESHOLD {
        (own + diff * 0.5).clamp(-1.0, 1.0)
    } else {
        own
    }
}

impl Board {
    /// Bring eyes, unconditional life and health up to date. Does nothing if
    /// the board has not changed since the last call.
    pub fn update_health(&mut self) {
        if self.analysis_valid {
            return;
        }
        let ids: Vec<GroupId> = self.groups().map(|(id, _)| id).collect();

        for &id in &ids {
            self.eye_potential(id);
        }
        for &id in &ids {
            self.find_eyes(id);
        }
        self.mark_unconditional_life();

        for &id in &ids {
            let eyes = self.eye_count(id);
            let potential = self.eye_potential(id);
            let liberties = self.group_liberties(id).len();
            let Some(group) = self.groups.get_mut(id.0) else { continue };
            group.absolute_health =
                absolute_health(eyes, potential, liberties, group.unconditionally_alive);
        }

        let relative: Vec<f32> = ids
            .iter()
            .map(|&id| {
                let own = self.group(id).map_or(0.0, |g| g.absolute_health());
                let weakest = self
                    .neighboring_enemy_groups(id)
                    .into_iter()
                    .filter_map(|e| self.group(e))
                    .map(|g| g.absolute_health())
                    .min_by(f32::total_cmp);
                relative_health(own, weakest)
            })
            .collect();

        for (&id, health) in ids.iter().zip(relative) {
            let Some(group) = self.groups.get_mut(id.0) else { continue };
            group.relative_health = health;
            let sign = group.color().sign();
            for loc in self.group_stones(id) {
                if let Some(stone) = self.position_mut(loc).stone_mut() {
                    stone.health = health * sign;
                }
            }
        }
        self.analysis_valid = true;
        tracing::trace!(groups = ids.len(), eyes = self.eyes.len(), "health updated");
    }

    fn mark_unconditional_life(&mut self) {
        for color in [Color::Black, Color::White] {
            let life = self.unconditional_life(color);
            for group in &mut self.groups {
                if group.color() == color && !group.strings.is_empty() {
                    group.unconditionally_alive =
                        group.strings.iter().all(|s| life.strings.contains(s));
                }
            }
            for eye in &mut self.eyes {
                if eye.members().iter().all(|m| life.vital_points.contains(m)) {
                    let owner = self.groups.get(eye.group().0).map(|g| g.color());
                    if owner == Some(color) {
                        eye.unconditionally_alive = true;
                    }
                }
            }
        }
    }

    /// Relative health of the group at `loc`, from player 1's side.
    pub fn health_at(&mut self, loc: crate::location::Location) -> Option<f32> {
        self.update_health();
        self.position(loc).stone().map(|s| s.health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    #[test]
    fn test_absolute_health_shape() {
        let dead = absolute_health(0.0, 0.0, 1, false);
        assert!((dead - (-1.0)).abs() < 1e-6);
        let two_eyes = absolute_health(2.0, 0.5, 2, false);
        assert!(two_eyes >= 0.8);
        assert_eq!(absolute_health(0.0, 0.0, 0, true), 1.0);
        let open = absolute_health(0.0, 1.9, 4, false);
        assert!((open - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_relative_health_only_moves_past_threshold() {
        assert_eq!(relative_health(0.3, Some(0.1)), 0.3);
        assert_eq!(relative_health(0.3, None), 0.3);
        let winning = relative_health(0.5, Some(-0.5));
        assert!((winning - 1.0).abs() < 1e-6);
        let losing = relative_health(-0.5, Some(0.5));
        assert!((losing - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_stone_health_sign_follows_color() {
        let mut board = Board::new(9);
        board.play(Location::new(3, 3)).unwrap();
        board.play(Location::new(7, 7)).unwrap();
        let black = board.health_at(Location::new(3, 3)).unwrap();
        let white = board.health_at(Location::new(7, 7)).unwrap();
        assert!((black + white).abs() < 1e-6);
    }

    #[test]
    fn test_atari_stone_is_unhealthy() {
        let mut board = Board::new(9);
        board.play(Location::new(1, 2)).unwrap();
        board.play(Location::new(1, 1)).unwrap();
        let white = board.health_at(Location::new(1, 1)).unwrap();
        let black = board.health_at(Location::new(1, 2)).unwrap();
        // Player-1 perspective: a weak white stone reads as positive.
        assert!(white > 0.0);
        assert!(black > -white);
    }
}
