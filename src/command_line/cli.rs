#![allow(clippy::cast_precision_loss)]

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sudoku_solver::sudoku::board::Board;
use sudoku_solver::sudoku::cells::CELL_COUNT;
use sudoku_solver::sudoku::parse::{parse_board, parse_board_file};
use sudoku_solver::sudoku::search::{Backtracker, SearchStats};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the Sudoku solver application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "sudoku_solver", version, about = "A backtracking Sudoku solver")]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a puzzle file to solve.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `random`, `dir`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands for the Sudoku solver.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle file (81 comma-separated values, `#` comments allowed).
    File {
        /// Path to the .sudoku file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a puzzle provided as plain text.
    Text {
        /// Literal puzzle input as a string of 81 comma-separated values
        /// in row-major order, 0 meaning an empty cell.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Seed an empty board with random givens, then solve it.
    Random {
        /// Number of random givens to place before solving.
        #[arg(short, long, default_value_t = 24)]
        givens: usize,

        /// Seed for the random source; a fresh seed is drawn if omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every .sudoku file in a directory.
    Dir {
        /// Path to the directory containing .sudoku files.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable trace output, printing every decision and backtrack as the
    /// search runs.
    #[arg(short, long, default_value_t = false)]
    pub(crate) trace: bool,

    /// Enable verification of the found solution. If a solution is found,
    /// the legality invariant is checked over the whole grid.
    #[arg(short, long, default_value_t = true)]
    pub(crate) verify: bool,

    /// Enable printing of performance and problem statistics after solving.
    #[arg(short, long, default_value_t = true)]
    pub(crate) stats: bool,

    /// Enable printing of the parsed board before solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_board: bool,
}

/// Solves a puzzle file.
///
/// # Errors
///
/// If the file doesn't exist, cannot be read, or holds a malformed puzzle.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Puzzle file does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Provided path is not a file: {}", path.display()));
    }

    let time = std::time::Instant::now();
    let board =
        parse_board_file(path).map_err(|e| format!("Error parsing puzzle file: {e}"))?;
    let parse_time = time.elapsed();

    solve_and_report(board, common, Some(path), parse_time);
    Ok(())
}

/// Solves a puzzle provided as inline text.
///
/// # Errors
///
/// If the text is not a well-formed 81-value puzzle.
pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<(), String> {
    let time = std::time::Instant::now();
    let board = parse_board(input).map_err(|e| format!("Error parsing puzzle: {e}"))?;
    let parse_time = time.elapsed();

    solve_and_report(board, common, None, parse_time);
    Ok(())
}

/// Seeds an empty board with `givens` random placements and solves it.
///
/// Random seeding can produce a consistent but unsolvable board; that is
/// reported like any other exhausted search.
pub(crate) fn solve_random(givens: usize, seed: Option<u64>, common: &CommonOptions) {
    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

    let time = std::time::Instant::now();
    let mut board = Board::new();
    let mut placed = 0;
    let mut attempts = 0;
    while placed < givens && attempts < givens * 100 {
        if board.random_fill(&mut rng) {
            placed += 1;
        }
        attempts += 1;
    }
    if placed < givens {
        eprintln!("Placed {placed} of {givens} requested givens");
    }
    let seed_time = time.elapsed();

    solve_and_report(board, common, None, seed_time);
}

/// Solves a directory of puzzle files.
///
/// Walks the directory recursively and solves every `.sudoku` file found.
///
/// # Errors
///
/// If the provided path is not a directory, or any puzzle fails to parse.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    for entry in walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        if file_path.extension().is_none_or(|ext| ext != "sudoku") {
            eprintln!("Skipping non-puzzle file: {}", file_path.display());
            continue;
        }

        solve_file(file_path, common)?;
    }

    Ok(())
}

/// Prints a shell completion script for `shell` to stdout.
pub(crate) fn completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "sudoku_solver", &mut std::io::stdout());
}

/// Solves a parsed board and reports results including stats and verification.
fn solve_and_report(
    mut board: Board,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    if common.print_board {
        println!("Parsed board:\n{board}");
    }

    let givens = board.filled_count();

    epoch::advance().unwrap();

    let time = std::time::Instant::now();
    let mut solver = Backtracker::new(&mut board);
    let solved = solver.solve(common.trace);
    let elapsed = time.elapsed();
    let search_stats = solver.stats();

    epoch::advance().unwrap();

    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();

    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    if common.verify {
        if solved {
            let ok = board.verify();
            println!("Verified: {ok:?}");
            assert!(ok, "Solution failed verification!");
        } else {
            println!("Nothing to verify: search exhausted");
        }
    }

    if common.stats {
        print_stats(
            parse_time,
            elapsed,
            givens,
            &search_stats,
            allocated_mib,
            resident_mib,
            solved,
        );
    }

    if solved {
        println!("Solution:\n{board}");
    } else {
        println!("No solution found");
    }
}

/// Helper function to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    givens: usize,
    s: &SearchStats,
    allocated: f64,
    resident: f64,
    solved: bool,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Givens", givens);
    stat_line("Empty cells", CELL_COUNT - givens);

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    stat_line_with_rate("Forced moves", s.forced, elapsed_secs);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");

    if solved {
        println!("\nSOLVED");
    } else {
        println!("\nUNSOLVABLE");
    }
}
