#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The backtracking search engine.
//!
//! The engine fills a board one cell at a time with a classical
//! most-constrained-variable heuristic:
//!
//! 1. **Selection:** scan all 81 cells in row-major order and pick the
//!    empty cell whose row/column/block legality union has the highest
//!    cardinality short of fully constrained — the cell with the fewest
//!    remaining options. A cell with exactly one legal digit left is a
//!    forced move and ends the scan immediately, since trying it carries
//!    no branching factor. A cell with *no* legal digit left means the
//!    current partial assignment is unsolvable, and the scan reports a
//!    dead end at once.
//! 2. **Trial:** place each remaining legal digit of the chosen cell in
//!    ascending order and recurse on the rest of the board.
//! 3. **Backtracking:** when a trial's subtree fails, the placement is
//!    undone and the next candidate is tried; each frame undoes exactly
//!    the one placement it made, so failure propagates upward through an
//!    unchanged board.
//!
//! The recursion depth is bounded by 81 (one frame per filled cell): every
//! successful descent strictly increases the population count, and failure
//! exhausts a finite candidate set before returning control upward.
//!
//! Search exhaustion is a normal outcome, reported as boolean failure.
//! Trace output is gated on a flag and never affects behaviour.

use crate::sudoku::board::Board;
use crate::sudoku::cells::{COLS, ROWS};
use crate::sudoku::rules::{DigitSet, FULL_CARDINALITY};
use smallvec::SmallVec;

/// Counters collected during one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Placements tried, including the ones later undone.
    pub decisions: usize,
    /// Placements undone after their subtree failed.
    pub backtracks: usize,
    /// Selections that were forced moves (a single legal digit).
    pub forced: usize,
}

/// Outcome of one most-constrained-cell scan.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    /// The best cell to try next, with its legality union.
    Found { x: usize, y: usize, in_use: DigitSet },
    /// No empty cell remains; the caller checks the population count to
    /// distinguish completion from a vacuous scan.
    NoPosition,
    /// An empty cell with no legal digit: this branch cannot succeed.
    DeadEnd { x: usize, y: usize },
}

/// A depth-first backtracking solver over a mutably borrowed board.
///
/// The board is the session state: on success the complete assignment is
/// left in place, on failure the board is restored to its initial
/// contents by the undo chain.
#[derive(Debug)]
pub struct Backtracker<'a> {
    board: &'a mut Board,
    stats: SearchStats,
    trace: bool,
}

impl<'a> Backtracker<'a> {
    /// Creates a solver for `board`.
    pub fn new(board: &'a mut Board) -> Self {
        Self {
            board,
            stats: SearchStats::default(),
            trace: false,
        }
    }

    /// Runs the search to completion.
    ///
    /// Returns true iff a complete legal assignment was found; the
    /// assignment is left on the board. With `trace` set, decisions and
    /// failures are printed as the search runs.
    pub fn solve(&mut self, trace: bool) -> bool {
        self.trace = trace;
        self.solve_from_here()
    }

    /// Statistics of the last solve.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// One level of the search: select a cell and run its trials.
    fn solve_from_here(&mut self) -> bool {
        match self.select() {
            Selection::Found { x, y, in_use } => self.try_valid(x, y, &in_use),
            Selection::NoPosition => self.board.is_complete(),
            Selection::DeadEnd { x, y } => {
                if self.trace {
                    println!("[solve] dead end at <{x}, {y}>");
                }
                false
            }
        }
    }

    /// The most-constrained-cell scan (see the module docs).
    fn select(&self) -> Selection {
        let mut best = Selection::NoPosition;
        let mut best_cardinality = 0;

        for y in 0..ROWS {
            for x in 0..COLS {
                if self.board.get(x, y) != 0 {
                    continue;
                }

                let in_use = self.board.in_use_at(x, y);
                let cardinality = in_use.cardinality();
                if cardinality == FULL_CARDINALITY {
                    return Selection::DeadEnd { x, y };
                }
                if cardinality > best_cardinality {
                    best_cardinality = cardinality;
                    best = Selection::Found { x, y, in_use };
                    if cardinality == FULL_CARDINALITY - 1 {
                        // Forced move: a single digit remains legal.
                        return best;
                    }
                }
            }
        }

        best
    }

    /// Tries every remaining legal digit at `(x, y)` in ascending order,
    /// backtracking on failure.
    fn try_valid(&mut self, x: usize, y: usize, in_use: &DigitSet) -> bool {
        let candidates: SmallVec<[u8; 9]> = in_use.absent_digits().collect();
        if candidates.len() == 1 {
            self.stats.forced += 1;
        }

        for digit in candidates {
            if self.trace {
                println!("[solve] <{x}, {y}> trying {digit} of {in_use}");
            }

            // Candidates are derived from the same rule sets the board
            // checks, so this placement cannot be rejected.
            if self.board.fill_cell(x, y, digit).is_err() {
                continue;
            }
            self.stats.decisions += 1;

            if self.board.is_complete() {
                if self.trace {
                    println!("[solve] puzzle solved");
                }
                return true;
            }

            if self.solve_from_here() {
                return true;
            }

            if self.trace {
                println!("[solve] <{x}, {y}> failed with {digit}");
            }
            self.board.clear_cell(x, y);
            self.stats.backtracks += 1;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::parse::{EXAMPLE_EASY, EXAMPLE_EVIL, EXAMPLE_MEDIUM, parse_board};

    /// Loads cleanly but admits no completion: the empty cell (0, 0) sees
    /// 1-3 in its row, 4-6 in its column and 7-9 in its block.
    const UNSOLVABLE: &str = "\
        0, 0, 0,  1, 2, 3,  0, 0, 0,\
        0, 7, 8,  0, 0, 0,  0, 0, 0,\
        0, 9, 0,  0, 0, 0,  0, 0, 0,\
        4, 0, 0,  0, 0, 0,  0, 0, 0,\
        5, 0, 0,  0, 0, 0,  0, 0, 0,\
        6, 0, 0,  0, 0, 0,  0, 0, 0,\
        0, 0, 0,  0, 0, 0,  0, 0, 0,\
        0, 0, 0,  0, 0, 0,  0, 0, 0,\
        0, 0, 0,  0, 0, 0,  0, 0, 0";

    fn solve_instance(input: &str) -> Board {
        let mut board = parse_board(input).unwrap();
        let mut solver = Backtracker::new(&mut board);
        assert!(solver.solve(false));
        board
    }

    #[test]
    fn test_solve_easy() {
        let board = solve_instance(EXAMPLE_EASY);
        assert!(board.is_complete());
        assert!(board.verify());
    }

    #[test]
    fn test_solve_medium() {
        let board = solve_instance(EXAMPLE_MEDIUM);
        assert!(board.is_complete());
        assert!(board.verify());
    }

    #[test]
    fn test_solve_evil() {
        let board = solve_instance(EXAMPLE_EVIL);
        assert!(board.is_complete());
        assert!(board.verify());
    }

    #[test]
    fn test_solve_preserves_givens() {
        let given = parse_board(EXAMPLE_EASY).unwrap();
        let solved = solve_instance(EXAMPLE_EASY);
        for y in 0..ROWS {
            for x in 0..COLS {
                if given.get(x, y) != 0 {
                    assert_eq!(solved.get(x, y), given.get(x, y));
                }
            }
        }
    }

    #[test]
    fn test_solve_is_deterministic() {
        let first = solve_instance(EXAMPLE_MEDIUM);
        let second = solve_instance(EXAMPLE_MEDIUM);
        assert_eq!(first, second);
    }

    #[test]
    fn test_solve_empty_board() {
        let mut board = Board::new();
        let mut solver = Backtracker::new(&mut board);
        assert!(solver.solve(false));
        assert!(board.is_complete());
        assert!(board.verify());
    }

    #[test]
    fn test_solve_complete_board_is_success() {
        let mut board = solve_instance(EXAMPLE_EASY);
        let before = board.clone();
        let mut solver = Backtracker::new(&mut board);
        assert!(solver.solve(false));
        assert_eq!(solver.stats(), SearchStats::default());
        assert_eq!(board, before);
    }

    #[test]
    fn test_unsolvable_reports_failure_and_restores_board() {
        let mut board = parse_board(UNSOLVABLE).unwrap();
        let before = board.clone();
        let mut solver = Backtracker::new(&mut board);
        assert!(!solver.solve(false));
        assert_eq!(board, before, "failure must undo every placement");
    }

    #[test]
    fn test_stats_are_counted() {
        let mut board = parse_board(EXAMPLE_EASY).unwrap();
        let mut solver = Backtracker::new(&mut board);
        assert!(solver.solve(false));

        let stats = solver.stats();
        // 45 blanks were filled; every surviving placement is a decision.
        assert!(stats.decisions >= 45);
        assert_eq!(stats.decisions - stats.backtracks, 45);
        assert!(stats.forced > 0, "an easy instance is full of forced moves");
    }
}
