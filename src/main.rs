//! # `sudoku_solver`
//!
//! `sudoku_solver` is a command-line solver for standard 9x9 Sudoku puzzles,
//! built around a constraint-tracking backtracking search engine: a
//! bit-packed grid store, per-row/column/block legality bitsets, a
//! most-constrained-cell selection heuristic, and a recursive try/undo
//! search loop.
//!
//! ## Features
//!
//! -   **Puzzle input**: comma-separated files (81 values, row-major, 0 for
//!     an empty cell, `#` comments), inline text, random seeding, and whole
//!     directories of `.sudoku` files.
//! -   **Tracing**: option to print every decision and backtrack as the
//!     search runs.
//! -   **Verification**: option to re-check the legality invariant over the
//!     solved grid.
//! -   **Statistics**: parse time, solve time, decisions, backtracks,
//!     forced moves, and memory usage.
//! -   **Memory management**: uses `tikv-jemallocator` for memory
//!     allocation and provides memory usage statistics.
//!
//! ## Usage
//!
//! ```sh
//! # Solve a puzzle file
//! sudoku_solver puzzle.sudoku
//!
//! # Solve a puzzle file, printing every decision as the search runs
//! sudoku_solver file --path puzzle.sudoku --trace
//!
//! # Solve a puzzle provided as text
//! sudoku_solver text --input "0, 1, 6, ... (81 values)"
//!
//! # Seed 24 random givens and solve the result
//! sudoku_solver random --givens 24 --seed 42
//!
//! # Solve every .sudoku file under a directory
//! sudoku_solver dir --path puzzles/
//! ```
//!
//! This file contains the main entry point; CLI definitions and command
//! handlers live in the `command_line` module, the solver itself in the
//! `sudoku_solver` library crate.

use clap::Parser;

use command_line::cli::{self, Cli, Commands};

mod command_line;

/// Global allocator using `tikv-jemallocator`, matching the allocator the
/// memory statistics are read from.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Main entry point of the solver application.
///
/// Parses command-line arguments, dispatches to the appropriate command
/// handler, and manages the overall execution flow.
fn main() {
    let cli = Cli::parse();

    // Handle the case where a path is provided globally without a
    // subcommand. This defaults to solving a puzzle file.
    if let Some(path) = cli.path.clone() {
        if cli.command.is_none() {
            exit_on_error(cli::solve_file(&path, &cli.common));
            return;
        }
    }

    match cli.command {
        Some(Commands::File { path, common }) => {
            exit_on_error(cli::solve_file(&path, &common));
        }
        Some(Commands::Text { input, common }) => {
            exit_on_error(cli::solve_text(&input, &common));
        }
        Some(Commands::Random {
            givens,
            seed,
            common,
        }) => {
            cli::solve_random(givens, seed, &common);
        }
        Some(Commands::Dir { path, common }) => {
            exit_on_error(cli::solve_dir(&path, &common));
        }
        Some(Commands::Completions { shell }) => {
            cli::completions(shell);
        }
        None => {
            eprintln!("No command provided. Use --help for more information.");
            std::process::exit(1);
        }
    }
}

/// Reports a command failure on stderr and exits non-zero.
fn exit_on_error(result: Result<(), String>) {
    if let Err(message) = result {
        eprintln!("{message}");
        std::process::exit(1);
    }
}
