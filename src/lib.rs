#![warn(missing_docs)]
//! This crate solves Sudoku puzzles with a decentralized network of concurrent actors
//! that perform local deduction and exchange facts until the grid is determined.

/// The `sudoku` module implements the actor network and the puzzle types around it.
pub mod sudoku;
