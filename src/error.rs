//! Error types for move application, move-list import and board invariants.

use thiserror::Error;

use crate::location::Location;

/// Reasons a move is rejected. A rejected move is never applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The location lies outside the board.
    #[error("illegal move: {0} is out of bounds")]
    OutOfBounds(Location),
    /// The point already holds a stone.
    #[error("illegal move: {0} is occupied")]
    Occupied(Location),
    /// The stone would have no liberties and captures nothing.
    #[error("illegal move: {0} is suicide")]
    Suicide(Location),
    /// The move immediately retakes a ko.
    #[error("illegal move: {0} retakes ko")]
    Ko(Location),
    /// The game already ended by resignation.
    #[error("illegal move: the game is over")]
    GameOver,
}

/// A malformed move-list token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("bad move token #{index} `{token}`: {reason}")]
pub struct ParseError {
    /// Zero-based index of the token in the sequence.
    pub index: usize,
    /// The offending token text.
    pub token: String,
    /// What was wrong with it.
    pub reason: String,
}

impl ParseError {
    pub(crate) fn new(index: usize, token: &str, reason: impl Into<String>) -> Self {
        Self {
            index,
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while replaying a recorded move list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A well-formed move that the board rejected.
    #[error("move #{index} rejected: {source}")]
    Illegal {
        index: usize,
        #[source]
        source: MoveError,
    },
}

/// A broken relation between cells, strings, groups and eyes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("stone at {0} references a missing string")]
    DanglingString(Location),
    #[error("string {id} does not contain its member {loc}")]
    MemberMismatch { id: usize, loc: Location },
    #[error("string {0} is empty")]
    EmptyString(usize),
    #[error("string {0} mixes colors")]
    MixedColors(usize),
    #[error("string {0} is not maximal or not connected")]
    NotMaximal(usize),
    #[error("string {id} belongs to {count} groups")]
    GroupMembership { id: usize, count: usize },
    #[error("eye {id} lists {loc}, which does not point back at it")]
    EyeMembership { id: usize, loc: Location },
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
