#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sudoku::geometry::{GroupKind, HypothesisId, Size};
use crate::sudoku::puzzle::{self, Puzzle};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt;

/// What a hypothesis actor determined before the network went quiet.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum HypothesisState {
    /// No inference ever reached the hypothesis.
    #[default]
    Undetermined,
    /// The first message the hypothesis received.
    Settled(bool),
}

impl HypothesisState {
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Settled(_))
    }

    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Settled(true))
    }

    #[must_use]
    pub const fn is_false(&self) -> bool {
        matches!(self, Self::Settled(false))
    }
}

/// The grid read back from the hypothesis actors after quiescence.
///
/// A cell is solved when exactly one of its `d` hypotheses settled `true`. Any other
/// combination, including the impossible-for-valid-input case of several true
/// hypotheses, leaves the cell unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    size: Size,
    states: Vec<HypothesisState>,
}

impl Solution {
    /// Builds a solution from one state per hypothesis in dense index order.
    pub(crate) const fn new(size: Size, states: Vec<HypothesisState>) -> Self {
        Self { size, states }
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// The state of a single hypothesis.
    #[must_use]
    pub fn state(&self, id: HypothesisId) -> HypothesisState {
        self.states
            .get(id.index(self.size))
            .copied()
            .unwrap_or_default()
    }

    fn candidates(&self, row: usize, column: usize) -> &[HypothesisState] {
        let d = self.size.side();
        let start = (row * d + column) * d;
        self.states.get(start..start + d).unwrap_or_default()
    }

    /// The zero-based digit of a solved cell.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<usize> {
        self.candidates(row, column)
            .iter()
            .positions(HypothesisState::is_true)
            .exactly_one()
            .ok()
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        let d = self.size.side();
        (0..self.size.cells()).map(move |i| self.cell(i / d, i % d))
    }

    /// Number of cells left without a digit.
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.cells().filter(Option::is_none).count()
    }

    /// Whether every cell has a digit.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved() == 0
    }

    /// Number of cells with more than one true hypothesis, which only contradictory
    /// clues can produce.
    #[must_use]
    pub fn conflicts(&self) -> usize {
        let d = self.size.side();
        (0..self.size.cells())
            .filter(|i| {
                self.candidates(i / d, i % d)
                    .iter()
                    .filter(|s| s.is_true())
                    .count()
                    > 1
            })
            .count()
    }

    /// Counts of hypotheses settled true, settled false, and left undetermined.
    #[must_use]
    pub fn tally(&self) -> (usize, usize, usize) {
        self.states.iter().fold((0, 0, 0), |(t, f, u), s| match s {
            HypothesisState::Settled(true) => (t + 1, f, u),
            HypothesisState::Settled(false) => (t, f + 1, u),
            HypothesisState::Undetermined => (t, f, u + 1),
        })
    }

    /// Checks the solved cells against the rules and the clues of `puzzle`.
    ///
    /// Unresolved cells are not an error, but every clue must be read back as given and
    /// no digit may repeat in a row, column or box.
    #[must_use]
    pub fn verify(&self, puzzle: &Puzzle) -> bool {
        if puzzle.size() != self.size || self.conflicts() > 0 {
            return false;
        }
        let clues_kept = puzzle
            .clues()
            .all(|clue| self.cell(clue.row, clue.column) == Some(clue.digit));

        let d = self.size.side();
        let mut seen = FxHashSet::default();
        let unique = (0..self.size.cells())
            .filter_map(|i| self.cell(i / d, i % d).map(|digit| HypothesisId::new(i / d, i % d, digit)))
            .flat_map(|id| id.memberships(self.size))
            .filter(|(group, _)| group.kind != GroupKind::Cell)
            .all(|(group, _)| seen.insert(group));

        clues_kept && unique
    }

    /// The grid on a single line, as accepted by [`Puzzle::parse`].
    #[must_use]
    pub fn to_line(&self) -> String {
        self.cells()
            .map(|cell| cell.map_or(puzzle::EMPTY, puzzle::symbol))
            .collect()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        puzzle::render(f, self.size, self.cells())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution_from(size: Size, grid: &str) -> Solution {
        let puzzle = Puzzle::parse(grid, size).unwrap();
        let mut states = vec![HypothesisState::Undetermined; size.hypotheses()];
        for id in size.all_hypotheses() {
            if let Some(digit) = puzzle.cell(id.row, id.column) {
                states[id.index(size)] = HypothesisState::Settled(id.digit == digit);
            }
        }
        Solution::new(size, states)
    }

    #[test]
    fn test_state_predicates() {
        assert!(HypothesisState::Settled(true).is_true());
        assert!(HypothesisState::Settled(false).is_false());
        assert!(!HypothesisState::Undetermined.is_settled());
        assert!(!HypothesisState::Undetermined.is_false());
    }

    #[test]
    fn test_read_back_and_render() {
        let solution = solution_from(Size::Four, "1234341221434.21");
        assert_eq!(solution.cell(0, 3), Some(3));
        assert_eq!(solution.cell(3, 1), None);
        assert_eq!(solution.unresolved(), 1);
        assert_eq!(solution.to_string(), "1234\n3412\n2143\n4.21\n");
        assert_eq!(solution.to_line(), "1234341221434.21");
    }

    #[test]
    fn test_cell_with_two_true_is_unresolved() {
        let mut states = vec![HypothesisState::Undetermined; Size::Four.hypotheses()];
        states[0] = HypothesisState::Settled(true);
        states[1] = HypothesisState::Settled(true);
        let solution = Solution::new(Size::Four, states);
        assert_eq!(solution.cell(0, 0), None);
        assert_eq!(solution.conflicts(), 1);
        assert_eq!(solution.tally(), (2, 0, 62));
    }

    #[test]
    fn test_verify() {
        let puzzle = Puzzle::parse("12.43.1221.34.21", Size::Four).unwrap();
        let solved = solution_from(Size::Four, "1234341221434321");
        assert!(solved.verify(&puzzle));

        let partial = solution_from(Size::Four, "12.43.1221.34.21");
        assert!(partial.verify(&puzzle));

        let repeated = solution_from(Size::Four, "1231341221434321");
        assert!(!repeated.verify(&puzzle));

        let other = Puzzle::parse("4...............", Size::Four).unwrap();
        assert!(!solved.verify(&other));
    }
}
