#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The constraint-tracking backtracking Sudoku solver.
//!
//! The solver is built from three components in dependency order: the
//! grid store ([`cells`]), the constraint index ([`rules`]) and the
//! search engine ([`search`]), composed behind the single mutation point
//! of a solve session ([`board`]). Puzzle input parsing lives in
//! [`parse`]; rendering is the board's `Display` implementation.

/// The board: grid store, constraint index and population in lockstep.
pub mod board;

/// The grid store: 81 cells packed four bits per cell.
pub mod cells;

/// The puzzle loader for comma-separated 81-value input.
pub mod parse;

/// The constraint index: row/column/block legality sets.
pub mod rules;

/// The backtracking search engine.
pub mod search;
