#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use std::io;
use std::path::PathBuf;

/// Errors raised while turning user input into a [`Puzzle`](crate::sudoku::puzzle::Puzzle).
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    /// The input did not scan to exactly `d²` recognized cells.
    #[error("invalid puzzle length: expected {expected} cells, found {found}")]
    InvalidLength {
        /// Number of cells required by the puzzle size.
        expected: usize,
        /// Number of recognized cells found in the input.
        found: usize,
    },
    /// A side length without a square box width.
    #[error("unsupported puzzle size {0}: expected one of 4, 9, 16 or 25")]
    UnsupportedSize(usize),
    /// A board value that does not fit the puzzle size.
    #[error("value {value} at row {row}, column {column} is out of range for a {side}x{side} puzzle")]
    ValueOutOfRange {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
        /// The offending value.
        value: usize,
        /// Side of the puzzle.
        side: usize,
    },
    /// The puzzle source could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the actor network itself.
///
/// Neither variant occurs for a correctly wired grid; both indicate a broken invariant.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A mailbox was full when an actor tried to deliver to it.
    #[error("mailbox of {actor} is full; its capacity does not cover all of its senders")]
    MailboxFull {
        /// The receiving actor.
        actor: String,
    },
    /// An actor task panicked or was aborted.
    #[error("actor task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
