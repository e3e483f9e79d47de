//! Command-line definitions and handlers for the `sudoku_actors` binary.

pub(crate) mod cli;
