#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Coordinates of the actor network.
//!
//! A puzzle of side `d = m * m` has `d³` hypotheses, one per `(row, column, digit)`
//! triple, and `4 * d²` groups. Every hypothesis belongs to exactly one group of each
//! [`GroupKind`], and occupies a fixed slot inside each of them. All of the index
//! arithmetic used to wire the network lives here.

use crate::sudoku::error::PuzzleError;
use std::fmt;

/// The supported puzzle sizes, named after the side length `d`.
#[derive(Debug, Clone, PartialEq, Eq, Copy, PartialOrd, Ord, Hash, Default)]
pub enum Size {
    /// 4x4 grid of 2x2 boxes.
    Four = 4,
    /// The classic 9x9 grid of 3x3 boxes.
    #[default]
    Nine = 9,
    /// 16x16 grid of 4x4 boxes.
    Sixteen = 16,
    /// 25x25 grid of 5x5 boxes.
    TwentyFive = 25,
}

impl TryFrom<usize> for Size {
    type Error = PuzzleError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            9 => Ok(Self::Nine),
            16 => Ok(Self::Sixteen),
            25 => Ok(Self::TwentyFive),
            _ => Err(PuzzleError::UnsupportedSize(value)),
        }
    }
}

impl From<Size> for usize {
    fn from(size: Size) -> Self {
        size.side()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}

impl Size {
    /// Width of a box, `m`.
    #[must_use]
    pub const fn block_size(self) -> usize {
        match self {
            Self::Four => 2,
            Self::Nine => 3,
            Self::Sixteen => 4,
            Self::TwentyFive => 5,
        }
    }

    /// Side of the grid and number of digits, `d = m²`.
    #[must_use]
    pub const fn side(self) -> usize {
        self as usize
    }

    /// Number of cells, `d²`.
    #[must_use]
    pub const fn cells(self) -> usize {
        self.side() * self.side()
    }

    /// Number of hypothesis actors, `d³`.
    #[must_use]
    pub const fn hypotheses(self) -> usize {
        self.cells() * self.side()
    }

    /// Number of group actors, `4 * d²`.
    #[must_use]
    pub const fn groups(self) -> usize {
        GroupKind::ALL.len() * self.cells()
    }

    /// Index of the box containing `(row, column)`, numbered left to right, top to bottom.
    #[must_use]
    pub const fn box_of(self, row: usize, column: usize) -> usize {
        let m = self.block_size();
        (row / m) * m + column / m
    }

    /// Iterates every hypothesis of the grid in dense index order.
    pub fn all_hypotheses(self) -> impl Iterator<Item = HypothesisId> {
        let d = self.side();
        (0..self.hypotheses()).map(move |i| HypothesisId::new(i / (d * d), i / d % d, i % d))
    }
}

/// The candidate assertion "`digit` occupies the cell at (`row`, `column`)".
///
/// All three coordinates are zero based, so the digit `0` is rendered as the symbol `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HypothesisId {
    /// Row of the cell.
    pub row: usize,
    /// Column of the cell.
    pub column: usize,
    /// Zero-based digit.
    pub digit: usize,
}

impl HypothesisId {
    /// Creates a new identifier.
    #[must_use]
    pub const fn new(row: usize, column: usize, digit: usize) -> Self {
        Self { row, column, digit }
    }

    /// Dense index `row·d² + column·d + digit`.
    #[must_use]
    pub const fn index(&self, size: Size) -> usize {
        let d = size.side();
        self.row * d * d + self.column * d + self.digit
    }

    /// The four groups this hypothesis belongs to, each paired with the slot it occupies there.
    ///
    /// Within a cell group the slot is the digit, within a row-digit group the column,
    /// within a column-digit group the row, and within a box-digit group the position
    /// of the cell inside its box.
    #[must_use]
    pub const fn memberships(&self, size: Size) -> [(GroupId, usize); 4] {
        let m = size.block_size();
        let boxed = size.box_of(self.row, self.column);
        let within_box = (self.row % m) * m + self.column % m;
        [
            (GroupId::new(GroupKind::Cell, self.row * size.side() + self.column), self.digit),
            (GroupId::new(GroupKind::RowDigit, self.row * size.side() + self.digit), self.column),
            (GroupId::new(GroupKind::ColumnDigit, self.column * size.side() + self.digit), self.row),
            (GroupId::new(GroupKind::BoxDigit, boxed * size.side() + self.digit), within_box),
        ]
    }
}

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}#{}", self.row + 1, self.column + 1, self.digit + 1)
    }
}

/// The four mutually exclusive constraint families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKind {
    /// Exactly one digit per cell.
    Cell,
    /// Exactly one cell per digit per row.
    RowDigit,
    /// Exactly one cell per digit per column.
    ColumnDigit,
    /// Exactly one cell per digit per box.
    BoxDigit,
}

impl GroupKind {
    /// Every kind, in wiring order.
    pub const ALL: [Self; 4] = [Self::Cell, Self::RowDigit, Self::ColumnDigit, Self::BoxDigit];

    const fn offset(self) -> usize {
        match self {
            Self::Cell => 0,
            Self::RowDigit => 1,
            Self::ColumnDigit => 2,
            Self::BoxDigit => 3,
        }
    }
}

/// Identity of a group: its family and its index within that family, in `[0, d²)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId {
    /// Constraint family.
    pub kind: GroupKind,
    /// Index within the family.
    pub index: usize,
}

impl GroupId {
    /// Creates a new identifier.
    #[must_use]
    pub const fn new(kind: GroupKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Dense index across all four families.
    #[must_use]
    pub const fn dense(&self, size: Size) -> usize {
        self.kind.offset() * size.cells() + self.index
    }

    /// Iterates every group of the grid in dense index order.
    pub fn all(size: Size) -> impl Iterator<Item = Self> {
        GroupKind::ALL
            .into_iter()
            .flat_map(move |kind| (0..size.cells()).map(move |index| Self::new(kind, index)))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}]", self.kind, self.index)
    }
}
