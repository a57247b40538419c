//! Territory estimation.
//!
//! Each empty region takes the mean health of the stones bordering it, seen
//! from player 1's side, as its score contribution. Regions larger than half
//! the board are damped since nobody has really enclosed them yet. At the end
//! of the game contributions collapse to a definite owner.

use crate::board::Board;
use crate::constants::{MIN_LIFE_THRESH, OPEN_REGION_DAMPING};
use crate::location::Location;
use crate::position::Color;

/// Collapse a graded contribution to +1, -1 or 0.
fn settle(value: f32) -> f32 {
    if value > MIN_LIFE_THRESH {
        1.0
    } else if value < -MIN_LIFE_THRESH {
        -1.0
    } else {
        0.0
    }
}

impl Board {
    /// Write the score contribution of every empty point and, at the end of
    /// the game, mark dead stones.
    pub fn update_score_contributions(&mut self, end_of_game: bool) {
        self.update_health();

        let size = self.size();
        let half_board = size * size / 2;
        let mut visited = vec![false; size * size];
        let mut updates: Vec<(Vec<Location>, f32)> = Vec::new();

        for cell in self.positions() {
            let start = cell.loc;
            if cell.is_occupied() || visited[self.index(start)] {
                continue;
            }
            visited[self.index(start)] = true;
            let mut stack = vec![start];
            let mut region = Vec::new();
            let mut border = Vec::new();
            while let Some(loc) = stack.pop() {
                region.push(loc);
                for n in self.neighbors(loc) {
                    let idx = self.index(n);
                    match self.position(n).stone() {
                        Some(_) if !visited[idx] => {
                            visited[idx] = true;
                            border.push(n);
                        }
                        Some(_) => {}
                        None if !visited[idx] => {
                            visited[idx] = true;
                            stack.push(n);
                        }
                        None => {}
                    }
                }
            }
            // Border stones may border several regions.
            for &b in &border {
                visited[self.index(b)] = false;
            }

            let mut value = if border.is_empty() {
                0.0
            } else {
                border
                    .iter()
                    .filter_map(|&b| self.position(b).stone())
                    .map(|s| s.health)
                    .sum::<f32>()
                    / border.len() as f32
            };
            if region.len() > half_board {
                value *= OPEN_REGION_DAMPING;
            }
            if end_of_game {
                value = settle(value);
            }
            updates.push((region, value));
        }

        for (region, value) in updates {
            for loc in region {
                self.position_mut(loc).score_contribution = value;
            }
        }

        if end_of_game {
            for cell in self.positions_mut() {
                if let Some(stone) = cell.stone_mut() {
                    stone.dead = stone.health * stone.color.sign() < -MIN_LIFE_THRESH;
                }
            }
        }
    }

    /// Territory credited to black (`for_black`) or white: favorable empty
    /// point contributions plus opponent stones judged dead.
    pub fn territory_estimate(&mut self, for_black: bool, end_of_game: bool) -> i32 {
        self.update_score_contributions(end_of_game);
        let player = if for_black { Color::Black } else { Color::White };
        let sign = player.sign();

        let mut total = 0.0f32;
        for cell in self.positions() {
            match cell.stone() {
                None => {
                    let favor = cell.score_contribution * sign;
                    if favor > 0.0 {
                        total += favor;
                    }
                }
                Some(stone) if stone.color != player => {
                    let owner_health = stone.health * stone.color.sign();
                    if owner_health < -MIN_LIFE_THRESH {
                        total += if end_of_game { 1.0 } else { -owner_health };
                    }
                }
                Some(_) => {}
            }
        }
        total.round() as i32
    }

    /// Final score, black minus white, counting territory and prisoners.
    /// Positive means black is ahead.
    pub fn update_territory_at_end_of_game(&mut self) -> i32 {
        let black = self.territory_estimate(true, true) + self.captures(Color::Black) as i32;
        let white = self.territory_estimate(false, true) + self.captures(Color::White) as i32;
        tracing::debug!(black, white, "final count");
        black - white
    }

    /// Territory differential during play, from player 1's side.
    pub fn territory_difference(&mut self) -> i32 {
        self.territory_estimate(true, false) - self.territory_estimate(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Action;

    #[test]
    fn test_empty_board_has_no_territory() {
        let mut board = Board::new(9);
        assert_eq!(board.territory_estimate(true, false), 0);
        assert_eq!(board.territory_estimate(false, true), 0);
        assert_eq!(board.update_territory_at_end_of_game(), 0);
    }

    #[test]
    fn test_settle() {
        assert_eq!(settle(0.5), 1.0);
        assert_eq!(settle(-0.5), -1.0);
        assert_eq!(settle(0.1), 0.0);
    }

    #[test]
    fn test_walled_corner_counts_for_owner() {
        let mut board = Board::new(9);
        // Black wall on the third line around the lower-left corner.
        for (r, c) in [(7, 1), (7, 2), (7, 3), (8, 3), (9, 3)] {
            board.make_move_as(Action::Place(Location::new(r, c)), Color::Black).unwrap();
        }
        board.update_score_contributions(false);
        let inside = board.position(Location::new(9, 1)).score_contribution;
        assert!(inside > 0.0);
        assert!(board.territory_estimate(true, false) >= board.territory_estimate(false, false));
    }

    #[test]
    fn test_end_of_game_marks_dead_stones() {
        let mut board = Board::new(9);
        for (r, c) in [(1, 2), (2, 1)] {
            board.make_move_as(Action::Place(Location::new(r, c)), Color::Black).unwrap();
        }
        board.make_move_as(Action::Place(Location::new(3, 3)), Color::White).unwrap();
        board.update_score_contributions(true);
        for cell in board.positions() {
            if cell.is_empty() {
                assert!([-1.0, 0.0, 1.0].contains(&cell.score_contribution));
            }
        }
    }
}
