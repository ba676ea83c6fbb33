#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for comma-separated Sudoku puzzles.
//!
//! A puzzle is a flattened sequence of exactly 81 integers in row-major
//! order, 0 meaning empty and 1 through 9 a given digit. Values are
//! separated by commas; whitespace (including newlines) around values is
//! ignored, as is a trailing comma. Lines starting with `#` are comments.
//!
//! ```text
//! # websudoku easy
//! 0, 1, 6,  0, 0, 2,  0, 0, 0,
//! 0, 0, 0,  8, 0, 0,  0, 1, 0,
//! ...
//! ```
//!
//! The parser feeds givens to the board in sequence order, so a puzzle
//! whose givens contradict each other is rejected here with the offending
//! cell and its flat index, before any search starts.

use crate::sudoku::board::{Board, FillError};
use itertools::Itertools;
use std::fmt;
use std::io;
use std::path::Path;

/// A known-solvable easy instance.
/// <https://www.websudoku.com/?level=1&set_id=8443424605>
pub const EXAMPLE_EASY: &str = "\
    0, 1, 6,  0, 0, 2,  0, 0, 0,\
    0, 0, 0,  8, 0, 0,  0, 1, 0,\
    2, 0, 0,  0, 3, 0,  5, 0, 9,\
    6, 2, 8,  3, 0, 0,  4, 0, 0,\
    7, 4, 5,  1, 0, 8,  9, 6, 3,\
    0, 0, 9,  0, 0, 6,  7, 8, 2,\
    8, 0, 3,  0, 1, 0,  0, 0, 5,\
    0, 6, 0,  0, 0, 7,  0, 0, 0,\
    0, 0, 0,  9, 0, 0,  8, 2, 0";

/// A known-solvable medium instance.
/// <https://www.websudoku.com/?level=2&set_id=1938763555>
pub const EXAMPLE_MEDIUM: &str = "\
    0, 0, 8,  5, 0, 0,  0, 0, 6,\
    0, 0, 1,  0, 7, 6,  0, 0, 0,\
    0, 5, 9,  1, 4, 0,  0, 7, 0,\
    0, 0, 4,  0, 0, 2,  0, 0, 0,\
    5, 0, 0,  4, 0, 7,  0, 0, 2,\
    0, 0, 0,  9, 0, 0,  4, 0, 0,\
    0, 1, 0,  0, 9, 4,  5, 6, 0,\
    0, 0, 0,  6, 8, 0,  3, 0, 0,\
    7, 0, 0,  0, 0, 5,  9, 0, 0,";

/// A known-solvable evil instance.
/// <https://www.websudoku.com/?level=4&set_id=9372712401>
pub const EXAMPLE_EVIL: &str = "\
    1, 0, 0,  6, 0, 0,  9, 5, 0,\
    0, 0, 0,  5, 0, 7,  0, 0, 0,\
    0, 0, 0,  0, 3, 0,  0, 6, 0,\
    0, 2, 0,  0, 0, 3,  0, 0, 8,\
    0, 3, 9,  0, 0, 0,  6, 4, 0,\
    4, 0, 0,  9, 0, 0,  0, 1, 0,\
    0, 9, 0,  0, 7, 0,  0, 0, 0,\
    0, 0, 0,  2, 0, 9,  0, 0, 0,\
    0, 7, 8,  0, 0, 5,  0, 0, 9,";

/// A malformed or contradictory puzzle.
#[derive(Debug)]
pub enum PuzzleError {
    /// The input did not hold exactly 81 values.
    CellCount(usize),
    /// A value could not be parsed as an integer.
    BadToken {
        /// Flat row-major index of the value.
        index: usize,
        /// The offending text.
        token: String,
    },
    /// A value was outside 0..=9.
    BadDigit {
        /// Flat row-major index of the value.
        index: usize,
        /// The offending value.
        digit: u8,
    },
    /// A given violated legality against the givens placed before it.
    Placement {
        /// Flat row-major index of the given.
        index: usize,
        /// The rejected placement.
        source: FillError,
    },
    /// The puzzle file could not be read.
    Io(io::Error),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellCount(count) => write!(f, "invalid cell count {count}, expected 81"),
            Self::BadToken { index, token } => {
                write!(f, "invalid cell value '{token}' (index: {index})")
            }
            Self::BadDigit { index, digit } => {
                write!(f, "cell value {digit} out of range (index: {index})")
            }
            Self::Placement { index, source } => write!(f, "{source} (index: {index})"),
            Self::Io(error) => write!(f, "cannot read puzzle: {error}"),
        }
    }
}

impl std::error::Error for PuzzleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Placement { source, .. } => Some(source),
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for PuzzleError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

/// Parses a comma-separated puzzle into a [`Board`].
///
/// # Errors
///
/// [`PuzzleError::BadToken`] for a value that is not an integer, plus
/// everything [`Board::from_values`] rejects: wrong cell count,
/// out-of-range values and contradictory givens.
pub fn parse_board(input: &str) -> Result<Board, PuzzleError> {
    let tokens = input
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect_vec();

    let mut values = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.into_iter().enumerate() {
        let digit = token.parse::<u8>().map_err(|_| PuzzleError::BadToken {
            index,
            token: token.to_string(),
        })?;
        values.push(digit);
    }

    Board::from_values(&values)
}

/// Parses the puzzle file at `path`.
///
/// This is a convenience wrapper that reads the file and calls
/// [`parse_board`].
///
/// # Errors
///
/// [`PuzzleError::Io`] if the file cannot be read, otherwise whatever
/// [`parse_board`] rejects.
pub fn parse_board_file<P: AsRef<Path>>(path: P) -> Result<Board, PuzzleError> {
    let input = std::fs::read_to_string(path)?;
    parse_board(&input)
}
