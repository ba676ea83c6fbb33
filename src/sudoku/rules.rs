#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The constraint index: per-row, per-column and per-block legality sets.
//!
//! For each of the 9 rows, 9 columns and 9 blocks the index keeps a
//! [`DigitSet`] of the digits already placed in that unit. A placement at
//! `(x, y)` is legal exactly when the digit is absent from the union of the
//! three sets covering that cell, so a legality check is three bit probes
//! instead of a rescan of 27 cells — which would dominate runtime in deep
//! backtracking trees.
//!
//! Every set also carries the sentinel digit 0 ("empty is always a valid
//! absence"). The sentinel makes the cardinality arithmetic of the search
//! heuristic uniform: a union of cardinality 10 covers the sentinel and all
//! nine digits, meaning the cell has no legal digit left.

use crate::sudoku::cells::{COLS, Cells, ROWS};
use bit_vec::BitVec;
use itertools::Itertools;
use std::fmt;

/// Side length of one block.
pub const BLOCK_STRIDE: usize = 3;

/// Number of blocks in the grid.
pub const BLOCK_COUNT: usize = 9;

/// Cardinality of a legality set covering the sentinel and all nine digits.
pub const FULL_CARDINALITY: usize = 10;

/// A set of digits 0 through 9, bit 0 being the always-present sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitSet(BitVec);

impl DigitSet {
    /// Creates a set containing only the sentinel digit 0.
    #[must_use]
    pub fn new() -> Self {
        let mut bits = BitVec::from_elem(FULL_CARDINALITY, false);
        bits.set(0, true);
        Self(bits)
    }

    /// Returns true if `digit` is in the set.
    #[must_use]
    pub fn contains(&self, digit: u8) -> bool {
        self.0.get(digit as usize).unwrap_or(false)
    }

    /// Adds `digit` to the set.
    pub fn insert(&mut self, digit: u8) {
        self.0.set(digit as usize, true);
    }

    /// Removes `digit` from the set. The sentinel 0 is never removed.
    pub fn remove(&mut self, digit: u8) {
        if digit != 0 {
            self.0.set(digit as usize, false);
        }
    }

    /// Number of digits in the set, sentinel included.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.0.iter().filter(|present| *present).count()
    }

    /// True if the set covers the sentinel and all nine digits.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cardinality() == FULL_CARDINALITY
    }

    /// Folds every digit of `other` into this set.
    pub fn union_with(&mut self, other: &Self) {
        for (index, present) in other.0.iter().enumerate() {
            if present {
                self.0.set(index, true);
            }
        }
    }

    /// The digits 1 through 9 absent from the set, in ascending order.
    pub fn absent_digits(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=9).filter(|&digit| !self.contains(digit))
    }
}

impl Default for DigitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<u8> for DigitSet {
    fn from_iter<T: IntoIterator<Item = u8>>(digits: T) -> Self {
        let mut set = Self::new();
        for digit in digits {
            set.insert(digit);
        }
        set
    }
}

impl fmt::Display for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = (0..FULL_CARDINALITY as u8)
            .filter(|&digit| self.contains(digit))
            .join(", ");
        write!(f, "{{{digits}}}")
    }
}

/// The 27 legality sets for a grid: one per row, column and block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    rows: [DigitSet; ROWS],
    cols: [DigitSet; COLS],
    blocks: [DigitSet; BLOCK_COUNT],
}

/// Index of the block covering `(x, y)`.
///
/// Blocks are numbered row-major: `(y / 3) * 3 + x / 3`.
#[must_use]
pub const fn block_index(x: usize, y: usize) -> usize {
    (y / BLOCK_STRIDE) * BLOCK_STRIDE + x / BLOCK_STRIDE
}

/// Derives the legality set of row `y` from the grid contents.
#[must_use]
pub fn row_set(cells: &Cells, y: usize) -> DigitSet {
    (0..COLS).map(|x| cells.get(x, y)).collect()
}

/// Derives the legality set of column `x` from the grid contents.
#[must_use]
pub fn col_set(cells: &Cells, x: usize) -> DigitSet {
    (0..ROWS).map(|y| cells.get(x, y)).collect()
}

/// Derives the legality set of block `index` from the grid contents.
#[must_use]
pub fn block_set(cells: &Cells, index: usize) -> DigitSet {
    let left = (index % BLOCK_STRIDE) * BLOCK_STRIDE;
    let top = (index / BLOCK_STRIDE) * BLOCK_STRIDE;
    let mut set = DigitSet::new();
    for y in top..top + BLOCK_STRIDE {
        for x in left..left + BLOCK_STRIDE {
            set.insert(cells.get(x, y));
        }
    }
    set
}

impl Rules {
    /// Creates the index for an empty grid: every set is sentinel-only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: core::array::from_fn(|_| DigitSet::new()),
            cols: core::array::from_fn(|_| DigitSet::new()),
            blocks: core::array::from_fn(|_| DigitSet::new()),
        }
    }

    /// Rebuilds all 27 sets from the grid contents.
    ///
    /// Used at initialisation and after bulk loading; during search the
    /// sets are maintained incrementally by [`record`](Self::record) and
    /// [`forget`](Self::forget).
    pub fn recompute(&mut self, cells: &Cells) {
        self.rows = core::array::from_fn(|y| row_set(cells, y));
        self.cols = core::array::from_fn(|x| col_set(cells, x));
        self.blocks = core::array::from_fn(|index| block_set(cells, index));
    }

    /// The legality set of row `y`.
    #[must_use]
    pub const fn row(&self, y: usize) -> &DigitSet {
        &self.rows[y]
    }

    /// The legality set of column `x`.
    #[must_use]
    pub const fn col(&self, x: usize) -> &DigitSet {
        &self.cols[x]
    }

    /// The legality set of block `index`.
    #[must_use]
    pub const fn block(&self, index: usize) -> &DigitSet {
        &self.blocks[index]
    }

    /// True if `digit` is present in any set covering `(x, y)`.
    #[must_use]
    pub fn digit_in_use(&self, x: usize, y: usize, digit: u8) -> bool {
        self.rows[y].contains(digit)
            || self.cols[x].contains(digit)
            || self.blocks[block_index(x, y)].contains(digit)
    }

    /// Union of the row, column and block sets covering `(x, y)`.
    ///
    /// The complement of the result within 1..=9 is exactly the set of
    /// digits legally placeable at the cell. Side-effect free.
    #[must_use]
    pub fn in_use_at(&self, x: usize, y: usize) -> DigitSet {
        let mut in_use = self.rows[y].clone();
        in_use.union_with(&self.cols[x]);
        in_use.union_with(&self.blocks[block_index(x, y)]);
        in_use
    }

    /// Adds `digit` to the three sets covering `(x, y)`.
    ///
    /// Must only be invoked after a successful placement.
    pub fn record(&mut self, x: usize, y: usize, digit: u8) {
        self.rows[y].insert(digit);
        self.cols[x].insert(digit);
        self.blocks[block_index(x, y)].insert(digit);
    }

    /// Removes `digit` from the three sets covering `(x, y)`.
    ///
    /// Must only be invoked as part of an undo, with the digit that was
    /// placed there. The sentinel 0 is never cleared.
    pub fn forget(&mut self, x: usize, y: usize, digit: u8) {
        self.rows[y].remove(digit);
        self.cols[x].remove(digit);
        self.blocks[block_index(x, y)].remove(digit);
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_index() {
        assert_eq!(block_index(0, 0), 0);
        assert_eq!(block_index(3, 0), 1);
        assert_eq!(block_index(3, 3), 4);
        assert_eq!(block_index(3, 8), 7);
        assert_eq!(block_index(6, 8), 8);
    }

    #[test]
    fn test_sentinel_is_structural() {
        let mut set = DigitSet::new();
        assert!(set.contains(0));
        assert_eq!(set.cardinality(), 1);

        set.remove(0);
        assert!(set.contains(0), "the sentinel must survive removal");

        set.insert(4);
        set.remove(4);
        assert_eq!(set, DigitSet::new());
    }

    #[test]
    fn test_cardinality_and_fullness() {
        let set: DigitSet = (1..=9).collect();
        assert_eq!(set.cardinality(), FULL_CARDINALITY);
        assert!(set.is_full());
        assert_eq!(set.absent_digits().count(), 0);

        let partial: DigitSet = [2, 5, 7].into_iter().collect();
        assert_eq!(partial.cardinality(), 4);
        assert!(!partial.is_full());
        assert_eq!(
            partial.absent_digits().collect::<Vec<_>>(),
            vec![1, 3, 4, 6, 8, 9]
        );
    }

    #[test]
    fn test_record_then_forget_is_inverse() {
        let mut rules = Rules::new();
        let fresh = rules.clone();

        rules.record(4, 7, 3);
        assert!(rules.row(7).contains(3));
        assert!(rules.col(4).contains(3));
        assert!(rules.block(block_index(4, 7)).contains(3));
        assert!(rules.digit_in_use(4, 7, 3));

        rules.forget(4, 7, 3);
        assert_eq!(rules, fresh);
    }

    #[test]
    fn test_in_use_union() {
        let mut rules = Rules::new();
        rules.record(0, 0, 1);
        rules.record(8, 8, 2);

        // (8, 0) shares a row with neither placement but a column with (8, 8)
        // and a row with (0, 0).
        let in_use = rules.in_use_at(8, 0);
        assert!(in_use.contains(0));
        assert!(in_use.contains(1));
        assert!(in_use.contains(2));
        assert_eq!(in_use.cardinality(), 3);

        // (4, 4) is unrelated to both placements.
        assert_eq!(rules.in_use_at(4, 4), DigitSet::new());
    }

    #[test]
    fn test_recompute_matches_incremental() {
        let mut cells = Cells::new();
        let mut incremental = Rules::new();
        for (x, y, digit) in [(0, 0, 5), (4, 4, 9), (8, 2, 1), (2, 8, 7)] {
            cells.set(x, y, digit);
            incremental.record(x, y, digit);
        }

        let mut recomputed = Rules::new();
        recomputed.recompute(&cells);
        assert_eq!(recomputed, incremental);
    }

    #[test]
    fn test_display_lists_digits() {
        let set: DigitSet = [5, 1].into_iter().collect();
        assert_eq!(set.to_string(), "{0, 1, 5}");
    }
}
