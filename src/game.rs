//! A game between two strategies.

use crate::board::Board;
use crate::config::BoardConfig;
use crate::error::{ConfigError, MoveError};
use crate::moves::Action;
use crate::player::Strategy;
use crate::position::Color;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Both players passed; positive scores favour player 1.
    Scored(i32),
    Resignation { winner: Color },
    /// The move limit was reached before the game ended.
    Unfinished,
}

/// Owns the board and both players.
pub struct GameSession {
    board: Board,
    black: Box<dyn Strategy>,
    white: Box<dyn Strategy>,
    max_moves: usize,
}

impl GameSession {
    /// Set up a board from `config`. Fails if the size or handicap is out
    /// of range.
    pub fn new(
        config: &BoardConfig,
        black: Box<dyn Strategy>,
        white: Box<dyn Strategy>,
    ) -> Result<Self, ConfigError> {
        let board = Board::try_with_config(config)?;
        let size = config.size;
        Ok(Self {
            board,
            black,
            white,
            max_moves: 3 * size * size,
        })
    }

    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Ask the side to move for a move and play it.
    pub fn step(&mut self) -> Result<Action, MoveError> {
        let color = self.board.to_move();
        let player = match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        };
        let action = player.choose(&self.board);
        self.board.make_move_as(action, color)?;
        tracing::info!(
            move_number = self.board.num_moves(),
            player = %color,
            strategy = player.name(),
            %action,
            "move played"
        );
        Ok(action)
    }

    /// Play until two consecutive passes, a resignation or the move limit.
    pub fn play_out(&mut self) -> Result<Outcome, MoveError> {
        while !self.board.is_game_over() {
            if self.board.num_moves() >= self.max_moves {
                tracing::warn!(max_moves = self.max_moves, "move limit reached");
                return Ok(Outcome::Unfinished);
            }
            self.step()?;
        }
        let outcome = self.outcome();
        tracing::info!(?outcome, "game over");
        Ok(outcome)
    }

    fn outcome(&mut self) -> Outcome {
        match self.board.last_move() {
            Some(last) if last.action == Action::Resign => Outcome::Resignation {
                winner: last.color.opponent(),
            },
            _ if self.board.is_game_over() => Outcome::Scored(self.final_score()),
            _ => Outcome::Unfinished,
        }
    }

    /// Territory plus captures, player 1 minus player 2, with dead stones
    /// settled.
    pub fn final_score(&mut self) -> i32 {
        self.board.update_territory_at_end_of_game()
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("black", &self.black.name())
            .field("white", &self.white.name())
            .field("moves", &self.board.num_moves())
            .finish()
    }
}
