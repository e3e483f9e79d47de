#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Sudoku solving by a network of concurrent actors.
//!
//! Each `(row, column, digit)` hypothesis and each constraint group runs as its own
//! task. Clues enter as `true` messages to hypotheses; hypotheses report to their groups,
//! and groups answer with verdicts, until nothing is left to say. Only direct inference
//! is performed (naked and hidden singles), so harder puzzles come back partially solved.

pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod group;
pub mod hypothesis;
pub mod message;
pub mod puzzle;
pub mod state;

pub use config::{ClueOrder, EngineConfig};
pub use error::{EngineError, PuzzleError};
pub use geometry::{GroupId, GroupKind, HypothesisId, Size};
pub use grid::{EngineStats, Grid, Resolution, solve};
pub use puzzle::{Board, Puzzle};
pub use state::{HypothesisState, Solution};
