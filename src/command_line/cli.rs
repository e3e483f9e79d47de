#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sudoku_actors::sudoku::{
    ClueOrder, EngineConfig, EngineStats, Puzzle, Resolution, Size, Solution, solve,
};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{debug, info};

/// Defines the command-line interface for the actor-network Sudoku solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sudoku_actors",
    version,
    about = "Solves Sudoku puzzles with a network of concurrent actors"
)]
pub(crate) struct Cli {
    /// The puzzle as a string: digits are clues, `0` or `.` are empty cells, anything
    /// else is ignored. Solved directly when no subcommand is given.
    pub puzzle: Option<String>,

    /// Specifies the subcommand to execute (e.g. `text`, `file`, `dir`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle given as a string.
    Text {
        /// The puzzle string, e.g. "..2.3...8.....8....31.2.....6..5.27..1.....5.2.4.6..31....8.6.5.......13..531.4..".
        #[arg(short, long)]
        input: String,
    },

    /// Solve a puzzle stored in a file. The whole file is scanned as one puzzle.
    File {
        /// Path to the puzzle file.
        #[arg(long)]
        path: PathBuf,
    },

    /// Solve every puzzle found under a directory.
    /// Files ending in `.sudoku` or `.txt` hold one puzzle per line; `#` starts a comment line.
    Dir {
        /// Path to the directory.
        #[arg(long)]
        path: PathBuf,
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
    /// Enable debug output, logging the actor network's progress to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check the solved cells against the clues and the row, column and box rules.
    #[arg(short, long, global = true, default_value_t = false)]
    pub(crate) verify: bool,

    /// Enable printing of network and timing statistics after solving.
    #[arg(short, long, global = true, default_value_t = false)]
    pub(crate) stats: bool,

    /// Side length of the puzzle: 4, 9, 16 or 25.
    #[arg(long, global = true, default_value = "9", value_parser = parse_size)]
    pub(crate) size: Size,

    /// Inject clues in a random order drawn from this seed instead of row-major order.
    #[arg(long, global = true)]
    pub(crate) seed: Option<u64>,
}

impl CommonOptions {
    pub(crate) fn engine_config(&self) -> EngineConfig {
        let order = self.seed.map_or(ClueOrder::Sequential, ClueOrder::Shuffled);
        EngineConfig::new(self.size).with_clue_order(order)
    }
}

fn parse_size(s: &str) -> Result<Size, String> {
    let side: usize = s.parse().map_err(|e| format!("{e}"))?;
    Size::try_from(side).map_err(|e| e.to_string())
}

/// Solves a single puzzle and prints the grid, followed by verification and statistics
/// when requested.
///
/// # Errors
///
/// If the engine fails or verification is requested and fails.
pub(crate) async fn solve_and_report(
    puzzle: &Puzzle,
    common: &CommonOptions,
    parse_time: Duration,
) -> anyhow::Result<()> {
    let config = common.engine_config();
    debug!(clues = puzzle.clues().count(), ?config.clue_order, "solving");

    let resolution = solve(puzzle, &config).await?;
    print!("{}", resolution.solution);

    if common.verify {
        verify_solution(puzzle, &resolution.solution)?;
    }

    if common.stats {
        print_stats(parse_time, &resolution);
    }
    Ok(())
}

/// Solves a puzzle given as text.
///
/// # Errors
///
/// If the text is not a puzzle of the configured size, or solving fails.
pub(crate) async fn solve_text(input: &str, common: &CommonOptions) -> anyhow::Result<()> {
    let time = Instant::now();
    let puzzle = Puzzle::parse(input, common.size)?;
    solve_and_report(&puzzle, common, time.elapsed()).await
}

/// Solves a puzzle stored in a file.
///
/// # Errors
///
/// If the file cannot be read or does not hold a puzzle of the configured size.
pub(crate) async fn solve_file(path: &Path, common: &CommonOptions) -> anyhow::Result<()> {
    if !path.is_file() {
        bail!("Provided path is not a file: {}", path.display());
    }
    let time = Instant::now();
    let puzzle = Puzzle::from_file(path, common.size)?;
    solve_and_report(&puzzle, common, time.elapsed()).await
}

/// Solves every puzzle in the `.sudoku` and `.txt` files under `path`.
///
/// Prints one line per puzzle, `<file>:<line> <grid> <status>`, and a summary. Lines
/// that are not puzzles are reported and skipped.
///
/// # Errors
///
/// If `path` is not a directory, a file cannot be read, or the engine fails.
pub(crate) async fn solve_dir(path: &Path, common: &CommonOptions) -> anyhow::Result<()> {
    if !path.is_dir() {
        bail!("Provided path is not a directory: {}", path.display());
    }

    let config = common.engine_config();
    let time = Instant::now();
    let (mut solved, mut partial, mut rejected, mut inconsistent) = (0usize, 0usize, 0usize, 0usize);

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path
            .extension()
            .is_none_or(|ext| ext != "sudoku" && ext != "txt")
        {
            debug!(path = %file_path.display(), "skipping non-puzzle file");
            continue;
        }

        let text = std::fs::read_to_string(file_path)
            .with_context(|| format!("failed to read {}", file_path.display()))?;
        for (line, parsed) in Puzzle::parse_collection(&text, common.size) {
            let puzzle = match parsed {
                Ok(puzzle) => puzzle,
                Err(e) => {
                    eprintln!("{}:{line}: {e}", file_path.display());
                    rejected += 1;
                    continue;
                }
            };
            let Resolution { solution, .. } = solve(&puzzle, &config).await?;
            let status = if solution.is_complete() {
                solved += 1;
                "solved".to_string()
            } else {
                partial += 1;
                format!("partial ({} unresolved)", solution.unresolved())
            };
            if common.verify && !solution.verify(&puzzle) {
                inconsistent += 1;
            }
            println!("{}:{line} {} {status}", file_path.display(), solution.to_line());
        }
    }

    let elapsed = time.elapsed();
    info!(solved, partial, rejected, ?elapsed, "directory finished");
    println!("\nPuzzles: {}", solved + partial + rejected);
    println!("Solved: {solved}");
    println!("Partially solved: {partial}");
    println!("Rejected: {rejected}");
    if common.verify {
        println!("Failed verification: {inconsistent}");
    }
    if common.stats {
        stat_line("Total time (s)", format!("{:.3}", elapsed.as_secs_f64()));
    }
    Ok(())
}

/// Verifies the read-back grid against the puzzle and prints the outcome.
///
/// # Errors
///
/// If a clue was lost or a digit repeats in a row, column or box.
pub(crate) fn verify_solution(puzzle: &Puzzle, solution: &Solution) -> anyhow::Result<()> {
    let ok = solution.verify(puzzle);
    println!("Verified: {ok:?}");
    if !ok {
        bail!("Solution failed verification!");
    }
    Ok(())
}

/// Reads jemalloc's allocated and resident byte counts, in MiB.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::mib().ok()?.read().ok()?;
    let resident = stats::resident::mib().ok()?.read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of the puzzle and of the network run.
pub(crate) fn print_stats(parse_time: Duration, resolution: &Resolution) {
    let EngineStats {
        actors,
        clues,
        messages,
        verdicts,
        elapsed,
    } = resolution.stats;
    let solution = &resolution.solution;
    let (settled_true, settled_false, undetermined) = solution.tally();
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Size", solution.size());
    stat_line("Clues", clues);
    stat_line("Unresolved cells", solution.unresolved());

    println!("=======================[ Network Statistics ]========================");
    stat_line("Actors", actors);
    stat_line_with_rate("Messages", messages, elapsed_secs);
    stat_line("Group verdicts", verdicts);
    stat_line("Hypotheses true", settled_true);
    stat_line("Hypotheses false", settled_false);
    stat_line("Hypotheses undetermined", undetermined);
    if let Some((allocated, resident)) = memory_usage() {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("Wall time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");

    if solution.is_complete() {
        println!("\nSOLVED");
    } else {
        println!("\nPARTIALLY SOLVED");
    }
}
