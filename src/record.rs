//! Move-list import and export.
//!
//! The text form is a sequence of `;C[xy]` tokens: `C` is `B` or `W`, `x` the
//! column and `y` the row as letters (`a` = 1). Empty brackets are a pass
//! and `[resign]` a resignation:
//!
//! ```text
//! ;B[dc];W[cd];B[];W[resign]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{ParseError, ReplayError};
use crate::location::Location;
use crate::moves::Action;
use crate::position::Color;

/// One recorded move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub action: Action,
    pub player: Color,
}

impl MoveRecord {
    pub fn new(action: Action, player: Color) -> Self {
        Self { action, player }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.player.letter())?;
        match self.action {
            Action::Place(loc) => write!(f, "{}{}", letter(loc.col), letter(loc.row))?,
            Action::Pass => {}
            Action::Resign => f.write_str("resign")?,
        }
        f.write_str("]")
    }
}

fn letter(coord: u8) -> char {
    char::from(b'a' + coord - 1)
}

fn coordinate(c: char) -> Option<u8> {
    c.is_ascii_lowercase().then(|| c as u8 - b'a' + 1)
}

/// Render records in the `;B[dc];W[]` form.
pub fn format_records(records: &[MoveRecord]) -> String {
    records.iter().map(|r| format!(";{r}")).collect()
}

/// Parse the `;B[dc];W[]` form. Whitespace between tokens is ignored.
pub fn parse_records(text: &str) -> Result<Vec<MoveRecord>, ParseError> {
    tokens(text)
        .map(|(index, token)| parse_token(index, token))
        .collect()
}

fn tokens(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .enumerate()
}

fn parse_token(index: usize, token: &str) -> Result<MoveRecord, ParseError> {
    let mut chars = token.chars();
    let player = match chars.next() {
        Some('B') => Color::Black,
        Some('W') => Color::White,
        _ => return Err(ParseError::new(index, token, "expected player B or W")),
    };
    let body = chars
        .as_str()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ParseError::new(index, token, "expected bracketed point"))?;

    let action = match body {
        "" => Action::Pass,
        "resign" => Action::Resign,
        point => {
            let mut letters = point.chars();
            match (letters.next(), letters.next(), letters.next()) {
                (Some(c), Some(r), None) => {
                    let col = coordinate(c)
                        .ok_or_else(|| ParseError::new(index, token, "bad column letter"))?;
                    let row = coordinate(r)
                        .ok_or_else(|| ParseError::new(index, token, "bad row letter"))?;
                    Action::Place(Location::new(row, col))
                }
                _ => return Err(ParseError::new(index, token, "point must be two letters")),
            }
        }
    };
    Ok(MoveRecord::new(action, player))
}

impl Board {
    /// Moves played so far, oldest first.
    pub fn records(&self) -> Vec<MoveRecord> {
        self.moves()
            .with(|moves| moves.iter().map(|m| MoveRecord::new(m.action, m.color)).collect())
    }

    /// Moves played so far in text form.
    pub fn record_text(&self) -> String {
        format_records(&self.records())
    }

    /// Apply `records` in order. Stops at the first rejected move; the moves
    /// before it stay on the board.
    pub fn replay(&mut self, records: &[MoveRecord]) -> Result<(), ReplayError> {
        for (index, record) in records.iter().enumerate() {
            self.make_move_as(record.action, record.player)
                .map_err(|source| ReplayError::Illegal { index, source })?;
        }
        tracing::debug!(moves = records.len(), "replayed move list");
        Ok(())
    }

    /// Parse and apply a text move list one token at a time. On error the
    /// moves before the offending token stay on the board.
    pub fn replay_text(&mut self, text: &str) -> Result<(), ReplayError> {
        for (index, token) in tokens(text) {
            let record = parse_token(index, token)?;
            self.make_move_as(record.action, record.player)
                .map_err(|source| ReplayError::Illegal { index, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;

    #[test]
    fn test_column_letter_comes_first() {
        let record = MoveRecord::new(Action::Place(Location::new(3, 4)), Color::Black);
        assert_eq!(record.to_string(), "B[dc]");
        let parsed = parse_records(";B[dc]").unwrap();
        assert_eq!(parsed, vec![record]);
    }

    #[test]
    fn test_pass_and_resign() {
        let parsed = parse_records(";B[aa];W[] ; B[resign]").unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].action, Action::Place(Location::new(1, 1)));
        assert_eq!(parsed[1], MoveRecord::new(Action::Pass, Color::White));
        assert_eq!(parsed[2], MoveRecord::new(Action::Resign, Color::Black));
        assert_eq!(format_records(&parsed), ";B[aa];W[];B[resign]");
    }

    #[test]
    fn test_parse_errors_name_the_token() {
        let err = parse_records(";B[dc];X[aa]").unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.token, "X[aa]");
        assert!(parse_records(";B[d]").is_err());
        assert!(parse_records(";B[dc").is_err());
        assert!(parse_records(";W[D1]").is_err());
    }

    #[test]
    fn test_board_round_trip() {
        let mut board = Board::new(9);
        board.play(Location::new(5, 5)).unwrap();
        board.play(Location::new(5, 4)).unwrap();
        board.pass().unwrap();
        let text = board.record_text();
        assert_eq!(text, ";B[ee];W[de];B[]");

        let mut copy = Board::new(9);
        copy.replay_text(&text).unwrap();
        assert_eq!(copy.records(), board.records());
        assert_eq!(copy.hash(), board.hash());
    }

    #[test]
    fn test_replay_reports_illegal_move() {
        let mut board = Board::new(9);
        let err = board.replay_text(";B[ee];W[ee]").unwrap_err();
        assert_eq!(
            err,
            ReplayError::Illegal {
                index: 1,
                source: MoveError::Occupied(Location::new(5, 5)),
            }
        );
        assert_eq!(board.num_moves(), 1);
    }
}
