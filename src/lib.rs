#![deny(missing_docs)]
//! This crate provides a constraint-tracking backtracking solver for standard 9x9 Sudoku puzzles.


/// The `sudoku` module implements the solver core: the packed grid store, the
/// row/column/block legality sets, and the most-constrained-cell backtracking
/// search engine, together with the puzzle loader and the text renderer.
pub mod sudoku;
