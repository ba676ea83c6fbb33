#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The board: grid store, constraint index and population, mutated in
//! lockstep.
//!
//! `Board` is the single mutation point of a solve session. The search
//! engine never touches the packed cells or the rule sets directly; every
//! placement goes through [`Board::fill_cell`] and every undo through
//! [`Board::clear_cell`], which keep all three structures consistent:
//!
//! 1. the packed cell storage ([`Cells`]),
//! 2. the 27 legality sets ([`Rules`]),
//! 3. the population bitset of filled cells, with a cached count.

use crate::sudoku::cells::{CELL_COUNT, COLS, Cells, ROWS};
use crate::sudoku::parse::PuzzleError;
use crate::sudoku::rules::{BLOCK_COUNT, BLOCK_STRIDE, DigitSet, Rules};
use bit_vec::BitVec;
use std::fmt;

/// A rejected placement.
///
/// Both variants are caller-contract violations: legality is checked before
/// placing, so a correct caller never sees them. The loader surfaces them
/// verbatim when a puzzle's givens contradict each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillError {
    /// The target cell already holds a digit.
    Occupied {
        /// Column of the rejected placement.
        x: usize,
        /// Row of the rejected placement.
        y: usize,
    },
    /// The digit is already present in the cell's row, column or block.
    Conflict {
        /// Column of the rejected placement.
        x: usize,
        /// Row of the rejected placement.
        y: usize,
        /// The digit that was refused.
        digit: u8,
    },
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Occupied { x, y } => write!(f, "cell ({x}, {y}) is already occupied"),
            Self::Conflict { x, y, digit } => {
                write!(f, "digit {digit} is already in use at ({x}, {y})")
            }
        }
    }
}

impl std::error::Error for FillError {}

/// A 9x9 Sudoku board with constraint tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Cells,
    rules: Rules,
    population: BitVec,
    filled: usize,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        let cells = Cells::new();
        let mut rules = Rules::new();
        rules.recompute(&cells);
        Self {
            cells,
            rules,
            population: BitVec::from_elem(CELL_COUNT, false),
            filled: 0,
        }
    }

    /// Builds a board from a flattened row-major sequence of 81 values,
    /// 0 meaning empty.
    ///
    /// Givens are placed in sequence order, so a contradictory puzzle is
    /// rejected here, before any search starts.
    ///
    /// # Errors
    ///
    /// [`PuzzleError::CellCount`] if the slice does not hold exactly 81
    /// values, [`PuzzleError::BadDigit`] if a value exceeds 9, and
    /// [`PuzzleError::Placement`] if a given violates row/column/block
    /// legality against the givens placed before it.
    pub fn from_values(values: &[u8]) -> Result<Self, PuzzleError> {
        if values.len() != CELL_COUNT {
            return Err(PuzzleError::CellCount(values.len()));
        }

        let mut board = Self::new();
        for (index, &digit) in values.iter().enumerate() {
            if digit > 9 {
                return Err(PuzzleError::BadDigit { index, digit });
            }
            if digit == 0 {
                continue;
            }

            let x = index % COLS;
            let y = index / COLS;
            board
                .fill_cell(x, y, digit)
                .map_err(|source| PuzzleError::Placement { index, source })?;
        }
        Ok(board)
    }

    /// Returns the value at `(x, y)`, 0 if the cell is empty.
    #[must_use]
    pub const fn get(&self, x: usize, y: usize) -> u8 {
        self.cells.get(x, y)
    }

    /// True if the cell at `(x, y)` holds a digit.
    #[must_use]
    pub fn is_populated(&self, x: usize, y: usize) -> bool {
        self.population.get(y * COLS + x).unwrap_or(false)
    }

    /// True if `digit` may be placed at `(x, y)`: the cell is empty and
    /// the digit is absent from the covering row, column and block sets.
    /// Side-effect free.
    #[must_use]
    pub fn can_fill(&self, x: usize, y: usize, digit: u8) -> bool {
        !self.is_populated(x, y) && !self.rules.digit_in_use(x, y, digit)
    }

    /// Union of the row, column and block legality sets covering `(x, y)`.
    #[must_use]
    pub fn in_use_at(&self, x: usize, y: usize) -> DigitSet {
        self.rules.in_use_at(x, y)
    }

    /// Places `digit` at `(x, y)`, recording it in the constraint index
    /// and the population.
    ///
    /// # Errors
    ///
    /// [`FillError::Occupied`] if the cell already holds a digit,
    /// [`FillError::Conflict`] if the digit is present in a covering unit.
    /// The board is unchanged on error.
    pub fn fill_cell(&mut self, x: usize, y: usize, digit: u8) -> Result<(), FillError> {
        if self.is_populated(x, y) {
            return Err(FillError::Occupied { x, y });
        }
        if self.rules.digit_in_use(x, y, digit) {
            return Err(FillError::Conflict { x, y, digit });
        }

        self.cells.set(x, y, digit);
        self.rules.record(x, y, digit);
        self.population.set(y * COLS + x, true);
        self.filled += 1;
        Ok(())
    }

    /// Undoes the placement at `(x, y)`; a no-op if the cell is empty.
    ///
    /// Together with [`fill_cell`](Self::fill_cell) this is a true
    /// inverse: grid, population and all three legality-set families are
    /// restored to their pre-placement state.
    pub fn clear_cell(&mut self, x: usize, y: usize) {
        let digit = self.cells.get(x, y);
        if digit == 0 {
            return;
        }
        self.cells.clear(x, y);
        self.rules.forget(x, y, digit);
        self.population.set(y * COLS + x, false);
        self.filled -= 1;
    }

    /// Number of filled cells.
    #[must_use]
    pub const fn filled_count(&self) -> usize {
        self.filled
    }

    /// True if all 81 cells hold a digit.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.filled == CELL_COUNT
    }

    /// The population bits of row `y`, column 0 first.
    #[must_use]
    pub fn row_population(&self, y: usize) -> BitVec {
        let mut bits = BitVec::from_elem(COLS, false);
        for x in 0..COLS {
            if self.is_populated(x, y) {
                bits.set(x, true);
            }
        }
        bits
    }

    /// Read-only view of the constraint index.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Read-only view of the packed cell storage.
    #[must_use]
    pub const fn cells(&self) -> &Cells {
        &self.cells
    }

    /// Checks the legality invariant over the whole grid: no digit occurs
    /// twice in any row, column or block, and the population matches the
    /// cell contents.
    #[must_use]
    pub fn verify(&self) -> bool {
        let mut non_zero = 0;
        for y in 0..ROWS {
            for x in 0..COLS {
                let digit = self.get(x, y);
                if (digit != 0) != self.is_populated(x, y) {
                    return false;
                }
                if digit != 0 {
                    non_zero += 1;
                }
            }
        }
        if non_zero != self.filled {
            return false;
        }

        (0..ROWS).all(|y| unit_is_legal((0..COLS).map(|x| self.get(x, y))))
            && (0..COLS).all(|x| unit_is_legal((0..ROWS).map(|y| self.get(x, y))))
            && (0..BLOCK_COUNT).all(|index| {
                let left = (index % BLOCK_STRIDE) * BLOCK_STRIDE;
                let top = (index / BLOCK_STRIDE) * BLOCK_STRIDE;
                unit_is_legal(
                    (top..top + BLOCK_STRIDE).flat_map(|y| {
                        (left..left + BLOCK_STRIDE).map(move |x| self.get(x, y))
                    }),
                )
            })
    }

    /// Attempts one placement of a random digit at a random cell.
    ///
    /// Returns whether the placement succeeded. The random source is
    /// caller-owned so that seeding stays in the caller's hands and the
    /// search engine itself remains deterministic.
    pub fn random_fill(&mut self, rng: &mut fastrand::Rng) -> bool {
        let digit = rng.u8(1..=9);
        let x = rng.usize(0..COLS);
        let y = rng.usize(0..ROWS);
        self.fill_cell(x, y, digit).is_ok()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// True if the unit's non-zero digits are pairwise distinct.
fn unit_is_legal(digits: impl Iterator<Item = u8>) -> bool {
    let mut seen = DigitSet::new();
    for digit in digits {
        if digit == 0 {
            continue;
        }
        if seen.contains(digit) {
            return false;
        }
        seen.insert(digit);
    }
    true
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn separator(f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "{}", "-".repeat(4 + COLS * 4))
        }

        writeln!(f, "   | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 |")?;
        separator(f)?;
        for y in 0..ROWS {
            write!(f, " {y} |")?;
            for x in 0..COLS {
                let digit = self.get(x, y);
                if digit == 0 {
                    write!(f, "   ")?;
                } else {
                    write!(f, " {digit} ")?;
                }
                if x < COLS - 1 && (x + 1) % BLOCK_STRIDE == 0 {
                    write!(f, "!")?;
                } else {
                    write!(f, "|")?;
                }
            }
            writeln!(f)?;
            if (y + 1) % BLOCK_STRIDE == 0 {
                separator(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::rules::block_index;

    #[test]
    fn test_legality_after_fill() {
        let mut board = Board::new();
        board.fill_cell(0, 0, 1).unwrap();

        assert!(!board.can_fill(0, 0, 1), "occupied");
        assert!(!board.can_fill(8, 0, 1), "same row");
        assert!(!board.can_fill(0, 8, 1), "same column");
        assert!(!board.can_fill(2, 2, 1), "same block");
        assert!(board.can_fill(8, 1, 1), "unrelated row, column and block");
        assert!(board.can_fill(1, 8, 1), "unrelated row, column and block");

        board.fill_cell(8, 8, 2).unwrap();
        assert!(board.can_fill(6, 6, 1));
        assert!(!board.can_fill(6, 8, 2));
        assert!(!board.can_fill(8, 6, 2));
    }

    #[test]
    fn test_fill_errors() {
        let mut board = Board::new();
        board.fill_cell(4, 4, 9).unwrap();

        assert_eq!(
            board.fill_cell(4, 4, 3),
            Err(FillError::Occupied { x: 4, y: 4 })
        );
        assert_eq!(
            board.fill_cell(4, 8, 9),
            Err(FillError::Conflict { x: 4, y: 8, digit: 9 })
        );
        // Rejected placements leave the board untouched.
        assert_eq!(board.filled_count(), 1);
        assert!(board.verify());
    }

    #[test]
    fn test_clear_cell_is_true_inverse() {
        let mut board = Board::new();
        board.fill_cell(0, 0, 1).unwrap();
        board.fill_cell(5, 3, 8).unwrap();
        let before = board.clone();

        board.fill_cell(4, 4, 9).unwrap();
        board.clear_cell(4, 4);

        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_cell_updates_rules() {
        let mut board = Board::new();
        board.fill_cell(4, 4, 9).unwrap();

        let block = board.rules().block(block_index(4, 4));
        assert!(block.contains(9));
        assert_eq!(block.cardinality(), 2);

        board.clear_cell(4, 4);
        let rules = board.rules();
        assert!(!rules.block(block_index(4, 4)).contains(9));
        assert!(rules.block(block_index(4, 4)).contains(0));
        assert!(!rules.row(4).contains(9));
        assert!(!rules.col(4).contains(9));
        assert!(board.row_population(4).none());
    }

    #[test]
    fn test_clear_empty_cell_is_noop() {
        let mut board = Board::new();
        board.fill_cell(1, 1, 2).unwrap();
        let before = board.clone();
        board.clear_cell(7, 7);
        assert_eq!(board, before);
    }

    #[test]
    fn test_population_consistency() {
        let mut board = Board::new();
        assert_eq!(board.filled_count(), 0);

        board.fill_cell(0, 0, 1).unwrap();
        board.fill_cell(1, 0, 2).unwrap();
        board.fill_cell(0, 1, 3).unwrap();
        assert_eq!(board.filled_count(), 3);
        assert!(board.is_populated(0, 0));
        assert!(board.is_populated(1, 0));
        assert!(!board.is_populated(2, 0));

        board.clear_cell(1, 0);
        assert_eq!(board.filled_count(), 2);
        assert!(!board.is_populated(1, 0));
        assert!(board.verify());
    }

    #[test]
    fn test_from_values_wrong_count() {
        let result = Board::from_values(&[0; 80]);
        assert!(matches!(result, Err(PuzzleError::CellCount(80))));
    }

    #[test]
    fn test_from_values_out_of_range() {
        let mut values = [0u8; 81];
        values[10] = 12;
        let result = Board::from_values(&values);
        assert!(matches!(
            result,
            Err(PuzzleError::BadDigit { index: 10, digit: 12 })
        ));
    }

    #[test]
    fn test_from_values_rejects_contradiction() {
        // Two 5s in row 0.
        let mut values = [0u8; 81];
        values[0] = 5;
        values[8] = 5;
        let result = Board::from_values(&values);
        assert!(matches!(
            result,
            Err(PuzzleError::Placement {
                index: 8,
                source: FillError::Conflict { x: 8, y: 0, digit: 5 },
            })
        ));
    }

    #[test]
    fn test_random_fill_only_places_legal_digits() {
        let mut board = Board::new();
        let mut rng = fastrand::Rng::with_seed(0xbeef);
        let mut placed = 0;
        for _ in 0..200 {
            if board.random_fill(&mut rng) {
                placed += 1;
            }
        }
        assert_eq!(board.filled_count(), placed);
        assert!(placed > 0);
        assert!(board.verify());
    }

    #[test]
    fn test_render_marks_blocks() {
        let mut board = Board::new();
        board.fill_cell(0, 0, 7).unwrap();
        let rendered = board.to_string();
        assert!(rendered.starts_with("   | 0 | 1 | 2 |"));
        assert!(rendered.contains(" 0 | 7 |   |   !"));
        // 9 grid rows, a header and 4 separators.
        assert_eq!(rendered.lines().count(), 14);
    }
}
