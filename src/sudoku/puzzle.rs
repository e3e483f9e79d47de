#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Puzzle input: scanning the text format, numeric boards, and puzzle files.
//!
//! The text format is a run of cell symbols in row-major order. The digits `1`-`9`,
//! followed by the letters `A`-`P` for the larger sizes, are clues; `0` and `.` are
//! empty cells. A symbol only counts when its value fits the puzzle size, and every
//! other character is ignored, so grids may be laid out with any separators.

use crate::sudoku::error::PuzzleError;
use crate::sudoku::geometry::{HypothesisId, Size};
use itertools::Itertools;
use std::fmt;
use std::path::Path;

/// Symbols for the values `1..=25`, indexed by `value - 1`.
const SYMBOLS: &[u8; 25] = b"123456789ABCDEFGHIJKLMNOP";

/// Placeholder rendered for a cell without a digit.
pub const EMPTY: char = '.';

/// Returns the symbol for a zero-based digit.
///
/// # Panics
///
/// Panics if `digit >= 25`; every supported size stays below that.
#[must_use]
pub const fn symbol(digit: usize) -> char {
    SYMBOLS[digit] as char
}

/// Classifies a character of the text format.
///
/// Returns `None` for characters that are ignored, `Some(None)` for an empty cell and
/// `Some(Some(digit))` for a clue with a zero-based digit.
fn scan(c: char, size: Size) -> Option<Option<usize>> {
    match c {
        '0' | '.' => Some(None),
        _ => {
            let upper = c.to_ascii_uppercase();
            SYMBOLS
                .iter()
                .take(size.side())
                .position(|&s| char::from(s) == upper)
                .map(Some)
        }
    }
}

/// A grid of numeric values, `0` for empty cells and `1..=d` for clues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board(Vec<Vec<usize>>);

impl Board {
    /// Wraps a grid of rows.
    #[must_use]
    pub const fn new(board: Vec<Vec<usize>>) -> Self {
        Self(board)
    }

    /// Iterates the rows of the board.
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.0.iter().map(Vec::as_slice)
    }
}

impl From<Vec<Vec<usize>>> for Board {
    fn from(board: Vec<Vec<usize>>) -> Self {
        Self::new(board)
    }
}

impl<const N: usize> From<&[[usize; N]; N]> for Board {
    fn from(board: &[[usize; N]; N]) -> Self {
        Self::new(board.iter().map(|r| r.to_vec()).collect())
    }
}

/// The Wikipedia example puzzle, solvable by singles alone.
pub const EXAMPLE_NINE: [[usize; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// A small 4x4 puzzle with one gap per row.
pub const EXAMPLE_FOUR: [[usize; 4]; 4] = [[1, 2, 0, 4], [3, 0, 1, 2], [2, 1, 0, 3], [4, 0, 2, 1]];

/// A puzzle: a size and, for every cell in row-major order, an optional zero-based clue digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    size: Size,
    cells: Vec<Option<usize>>,
}

impl Puzzle {
    /// Scans `input` in the text format.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::InvalidLength`] if `input` does not contain exactly `d²`
    /// recognized symbols.
    pub fn parse(input: &str, size: Size) -> Result<Self, PuzzleError> {
        let cells = input.chars().filter_map(|c| scan(c, size)).collect_vec();
        if cells.len() != size.cells() {
            return Err(PuzzleError::InvalidLength {
                expected: size.cells(),
                found: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Reads a whole file and scans it as a single puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Io`] if the file cannot be read, otherwise as [`Puzzle::parse`].
    pub fn from_file(path: &Path, size: Size) -> Result<Self, PuzzleError> {
        let text = std::fs::read_to_string(path).map_err(|source| PuzzleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, size)
    }

    /// Scans a collection where each line holds one puzzle.
    ///
    /// Blank lines and lines starting with `#` are skipped. Each entry carries its
    /// one-based line number.
    pub fn parse_collection(
        text: &str,
        size: Size,
    ) -> impl Iterator<Item = (usize, Result<Self, PuzzleError>)> + '_ {
        text.lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(move |(n, line)| (n, Self::parse(line, size)))
    }

    /// The puzzle size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// The zero-based clue digit at (`row`, `column`), if any.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<usize> {
        self.cells
            .get(row * self.size.side() + column)
            .copied()
            .flatten()
    }

    /// The clues as the hypotheses they assert, in row-major order.
    pub fn clues(&self) -> impl Iterator<Item = HypothesisId> + '_ {
        let d = self.size.side();
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.map(|digit| HypothesisId::new(i / d, i % d, digit)))
    }
}

impl TryFrom<&Board> for Puzzle {
    type Error = PuzzleError;

    fn try_from(board: &Board) -> Result<Self, Self::Error> {
        let size = Size::try_from(board.0.len())?;
        let d = size.side();
        let mut cells = Vec::with_capacity(size.cells());
        for (row, values) in board.rows().enumerate() {
            if values.len() != d {
                return Err(PuzzleError::InvalidLength {
                    expected: size.cells(),
                    found: row * d + values.len(),
                });
            }
            for (column, &value) in values.iter().enumerate() {
                if value > d {
                    return Err(PuzzleError::ValueOutOfRange {
                        row,
                        column,
                        value,
                        side: d,
                    });
                }
                cells.push(value.checked_sub(1));
            }
        }
        Ok(Self { size, cells })
    }
}

/// Writes `cells` as `d` lines of `d` symbols, using [`EMPTY`] for missing digits.
pub(crate) fn render(
    f: &mut fmt::Formatter<'_>,
    size: Size,
    cells: impl IntoIterator<Item = Option<usize>>,
) -> fmt::Result {
    for row in &cells.into_iter().chunks(size.side()) {
        let line: String = row.map(|cell| cell.map_or(EMPTY, symbol)).collect();
        writeln!(f, "{line}")?;
    }
    Ok(())
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, self.size, self.cells.iter().copied())
    }
}
