//! # sudoku_actors
//!
//! `sudoku_actors` solves Sudoku puzzles with a decentralized network of concurrent
//! actors. Every `(row, column, digit)` hypothesis and every constraint group (one digit
//! per cell, one cell per digit in each row, column and box) runs as its own task.
//! Clues are injected as messages, facts propagate between hypotheses and groups, and
//! the grid is read back once the network has gone quiet.
//!
//! Only direct inference is performed (naked and hidden singles). Puzzles that need
//! anything stronger come back partially solved, with `.` for unresolved cells.
//!
//! ## Usage
//!
//! ```sh
//! sudoku_actors [OPTIONS] [PUZZLE]
//! sudoku_actors [OPTIONS] <SUBCOMMAND>
//! ```
//!
//! The puzzle string holds `d²` cells in row-major order: `1`-`9` are clues (then `A`-`P`
//! for 16x16 and 25x25 puzzles), `0` or `.` are empty cells, and every other character is
//! ignored.
//!
//! ### Subcommands
//!
//! 1.  **`text`**: Solve a puzzle given as a string.
//!     ```sh
//!     sudoku_actors text --input "<puzzle>"
//!     ```
//!
//! 2.  **`file`**: Solve the puzzle stored in a file.
//!     ```sh
//!     sudoku_actors file --path <path_to_puzzle>
//!     ```
//!
//! 3.  **`dir`**: Solve every puzzle (one per line) in the `.sudoku`/`.txt` files of a directory.
//!     ```sh
//!     sudoku_actors dir --path <directory>
//!     ```
//!
//! 4.  **`completions`**: Print a shell completion script.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Log the network's progress to stderr (default: `false`).
//! -   `-v, --verify`: Check the result against the clues and the rules (default: `false`).
//! -   `-s, --stats`: Print network and timing statistics (default: `false`).
//! -   `--size <SIZE>`: Side of the puzzle, 4, 9, 16 or 25 (default: `9`).
//! -   `--seed <SEED>`: Inject clues in a seeded random order.
//!
//! ## Example Invocations
//!
//! ```sh
//! sudoku_actors "..2.3...8.....8....31.2.....6..5.27..1.....5.2.4.6..31....8.6.5.......13..531.4.."
//! sudoku_actors --size 4 "12.4 3.12 21.3 4.21" --stats
//! sudoku_actors dir --path puzzles/ --verify
//! ```

use clap::{CommandFactory, Parser};
use command_line::cli::{Cli, Commands, solve_dir, solve_file, solve_text};
use tracing_subscriber::EnvFilter;

mod command_line;

/// Global allocator using `tikv-jemallocator` for potentially better performance
/// and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Main entry point.
///
/// Parses command-line arguments, installs the log subscriber, and dispatches to the
/// appropriate command handler. Any error ends the process with a non-zero status.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.common.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match (cli.command, cli.puzzle) {
        (Some(Commands::Text { input }), _) | (None, Some(input)) => {
            solve_text(&input, &cli.common).await
        }
        (Some(Commands::File { path }), _) => solve_file(&path, &cli.common).await,
        (Some(Commands::Dir { path }), _) => solve_dir(&path, &cli.common).await,
        (Some(Commands::Completions { shell }), _) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
        (None, None) => {
            eprintln!("No puzzle provided. Use --help for more information.");
            std::process::exit(1);
        }
    }
}
