//! Engine configuration.
//!
//! Every field has a default, so a JSON file only needs to name the values
//! it changes:
//!
//! ```json
//! { "board": { "size": 13, "handicap": 2 }, "search": { "depth": 3 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BEST_MOVES_PERCENTAGE, DEFAULT_BOARD_SIZE, DEFAULT_CACHE_CAPACITY,
    DEFAULT_MAX_CANDIDATES, DEFAULT_SEARCH_DEPTH, MAX_BOARD_SIZE, MAX_HANDICAP, MIN_BOARD_SIZE,
};
use crate::error::ConfigError;
use crate::eval::Weights;
use crate::pool::default_threads;

/// Board setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub size: usize,
    pub handicap: usize,
    /// Reject immediate ko recaptures.
    pub enforce_ko: bool,
}

impl BoardConfig {
    /// Check the size and handicap ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.size) {
            return Err(ConfigError::Invalid(format!(
                "board size {} outside {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}",
                self.size
            )));
        }
        if self.handicap > MAX_HANDICAP {
            return Err(ConfigError::Invalid(format!(
                "handicap {} exceeds {MAX_HANDICAP}",
                self.handicap
            )));
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            handicap: 0,
            enforce_ko: true,
        }
    }
}

/// Which alpha-beta formulation the search uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    #[default]
    Negamax,
    Minimax,
}

/// Search limits and tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum depth in plies for iterative deepening.
    pub depth: u8,
    /// Wall-clock budget per decision; 0 means unlimited.
    pub time_budget_ms: u64,
    pub strategy: SearchStrategy,
    /// Share of ordered candidates kept at each node, in percent.
    pub best_moves_percentage: u8,
    pub max_candidates: usize,
    pub cache_capacity: usize,
    /// Worker threads for the root split; 0 means one per hardware thread.
    pub threads: usize,
    /// Evaluate root branches on the worker pool.
    pub parallel: bool,
    /// Keep the explored tree in the search result.
    pub record_tree: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            time_budget_ms: 0,
            strategy: SearchStrategy::Negamax,
            best_moves_percentage: DEFAULT_BEST_MOVES_PERCENTAGE,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            threads: 0,
            parallel: true,
            record_tree: false,
        }
    }
}

impl SearchConfig {
    /// Worker count with 0 resolved to the hardware parallelism.
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            default_threads()
        } else {
            self.threads
        }
    }
}

/// Everything needed to set up a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub search: SearchConfig,
    pub weights: Weights,
}

impl GameConfig {
    /// Parse JSON, filling unnamed fields with defaults, and validate.
    pub fn load_from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::load_from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        if self.search.depth == 0 {
            return Err(ConfigError::Invalid("search depth must be at least 1".into()));
        }
        if self.search.best_moves_percentage == 0 || self.search.best_moves_percentage > 100 {
            return Err(ConfigError::Invalid(format!(
                "best_moves_percentage {} outside 1..=100",
                self.search.best_moves_percentage
            )));
        }
        if self.search.max_candidates == 0 {
            return Err(ConfigError::Invalid("max_candidates must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.board.size, 9);
        assert!(config.board.enforce_ko);
        assert_eq!(config.search.depth, DEFAULT_SEARCH_DEPTH);
        assert_eq!(config.search.strategy, SearchStrategy::Negamax);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::load_from_json(r#"{ "search": { "depth": 4 } }"#).unwrap();
        assert_eq!(config.search.depth, 4);
        assert_eq!(config.search.max_candidates, DEFAULT_MAX_CANDIDATES);
        assert_eq!(config.board, BoardConfig::default());
    }

    #[test]
    fn test_strategy_is_lowercase() {
        let config =
            GameConfig::load_from_json(r#"{ "search": { "strategy": "minimax" } }"#).unwrap();
        assert_eq!(config.search.strategy, SearchStrategy::Minimax);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            GameConfig::load_from_json(r#"{ "board": { "size": 40 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::load_from_json("{ invalid json }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_board_config_checks_ranges() {
        let mut board = BoardConfig::default();
        assert!(board.validate().is_ok());
        board.size = MIN_BOARD_SIZE - 1;
        assert!(matches!(board.validate(), Err(ConfigError::Invalid(_))));
        board.size = 9;
        board.handicap = MAX_HANDICAP + 1;
        assert!(matches!(board.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_effective_threads() {
        let mut search = SearchConfig::default();
        assert!(search.effective_threads() >= 1);
        search.threads = 3;
        assert_eq!(search.effective_threads(), 3);
    }
}
