//! Goban: a Go engine built on explicit life-and-death analysis.
//!
//! The board keeps its stones organised as strings (connected stones),
//! groups (strings that are linked) and eyes (enclosed spaces), and derives a
//! health value for every stone from them. Territory, static evaluation and
//! an alpha-beta search sit on top of that analysis.
//!
//! ## Modules
//!
//! - [`board`], [`position`], [`location`] - Cells, geometry and the arena
//!   that owns strings, groups and eyes
//! - [`string`], [`group`] - Chains and linked groups
//! - [`eye`], [`eye_type`], [`eye_potential`], [`benson`] - Eye discovery,
//!   shape classification and unconditional life
//! - [`health`], [`territory`], [`eval`] - Health, territory and worth
//! - [`updater`], [`moves`], [`zobrist`] - Move application, undo and hashing
//! - [`movegen`], [`search`], [`cache`], [`pool`] - Candidate generation and
//!   parallel alpha-beta search
//! - [`record`], [`oracle`], [`player`], [`game`] - Move lists, external
//!   scorers, strategies and game sessions
//! - [`config`], [`error`], [`constants`] - Settings, error types and tuning
//!
//! ## Example
//!
//! ```
//! use goban_engine::board::Board;
//! use goban_engine::config::SearchConfig;
//! use goban_engine::eval::Weights;
//! use goban_engine::location::Location;
//! use goban_engine::search::Searcher;
//!
//! let mut board = Board::new(9);
//! board.play(Location::new(5, 5)).unwrap();
//!
//! let config = SearchConfig { depth: 1, parallel: false, ..SearchConfig::default() };
//! let searcher = Searcher::new(config, Weights::default());
//! let result = searcher.search(&board);
//! println!("White plays {} ({:.2})", result.action, result.value);
//! ```

pub mod benson;
pub mod board;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod eval;
pub mod eye;
pub mod eye_potential;
pub mod eye_type;
pub mod game;
pub mod group;
pub mod health;
pub mod location;
pub mod movegen;
pub mod moves;
pub mod oracle;
pub mod player;
pub mod pool;
pub mod position;
pub mod record;
pub mod search;
pub mod string;
pub mod territory;
pub mod updater;
pub mod zobrist;

pub use board::Board;
pub use config::GameConfig;
pub use error::{MoveError, ParseError, ReplayError};
pub use location::Location;
pub use moves::{Action, Move};
pub use position::Color;
pub use search::{SearchResult, Searcher};
