#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The orchestrator: builds and wires the actor network, injects clues, waits for the
//! network to go quiet, and reads the grid back.
//!
//! Every actor is spawned before the first clue goes out, so no message is ever
//! addressed to an actor that does not exist yet. The grid holds one in-flight token of
//! its own from construction until [`Grid::join`], which keeps the network from being
//! considered quiet while clues are still being injected.

use crate::sudoku::config::EngineConfig;
use crate::sudoku::error::EngineError;
use crate::sudoku::geometry::{GroupId, HypothesisId, Size};
use crate::sudoku::group::{Group, Verdict};
use crate::sudoku::hypothesis::{self, Hypothesis};
use crate::sudoku::message::{InFlight, Mailbox, Quiescence, mailbox};
use crate::sudoku::puzzle::Puzzle;
use crate::sudoku::state::{HypothesisState, Solution};
use itertools::Itertools;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What a finished actor task hands back to the orchestrator.
#[derive(Debug)]
enum Outcome {
    Hypothesis(HypothesisId, HypothesisState),
    Group(Option<Verdict>),
}

/// Counters describing a single run of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    /// Tasks spawned, `d³ + 4d²`.
    pub actors: usize,
    /// Clues injected.
    pub clues: usize,
    /// Messages sent, including clues and messages discarded by settled receivers.
    pub messages: usize,
    /// Groups that reached a verdict.
    pub verdicts: usize,
    /// Time from wiring to the end of the read-back.
    pub elapsed: Duration,
}

/// The result of [`Grid::join`].
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The (possibly partial) grid.
    pub solution: Solution,
    /// Run statistics.
    pub stats: EngineStats,
}

/// A running actor network for one puzzle.
#[derive(Debug)]
pub struct Grid {
    size: Size,
    hypotheses: Vec<Mailbox<bool>>,
    tasks: JoinSet<Result<Outcome, EngineError>>,
    quiescence: Arc<Quiescence>,
    shutdown: CancellationToken,
    wiring: InFlight,
    clues: usize,
    started: Instant,
}

impl Grid {
    /// Spawns and wires `d³` hypothesis actors and `4d²` group actors.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn new(size: Size) -> Self {
        let started = Instant::now();
        let quiescence = Quiescence::new();
        let wiring = quiescence.token();
        let shutdown = CancellationToken::new();

        let (group_mailboxes, mut groups): (Vec<_>, Vec<_>) = GroupId::all(size)
            .map(|id| {
                let (mailbox, inbox) = mailbox(id, size.side(), &quiescence);
                (mailbox, Group::new(id, size, inbox, shutdown.clone()))
            })
            .unzip();

        let mut hypotheses = Vec::with_capacity(size.hypotheses());
        let mut actors = Vec::with_capacity(size.hypotheses());
        for id in size.all_hypotheses() {
            let (own, inbox) = mailbox(id, hypothesis::INBOX_CAPACITY, &quiescence);
            let mut actor = Hypothesis::new(id, inbox, shutdown.clone());
            for (group, slot) in id.memberships(size) {
                let dense = group.dense(size);
                actor.link(group, slot, group_mailboxes[dense].clone());
                groups[dense].admit(slot, own.clone());
            }
            hypotheses.push(own);
            actors.push(actor);
        }

        let mut tasks = JoinSet::new();
        for group in groups {
            tasks.spawn(async move { group.run().await.map(Outcome::Group) });
        }
        for actor in actors {
            let id = actor.id();
            tasks.spawn(async move { actor.run().await.map(|s| Outcome::Hypothesis(id, s)) });
        }
        debug!(%size, actors = tasks.len(), "actor network wired");

        Self {
            size,
            hypotheses,
            tasks,
            quiescence,
            shutdown,
            wiring,
            clues: 0,
            started,
        }
    }

    /// The puzzle size the network was built for.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Asserts that `clue` is part of the solution.
    ///
    /// # Errors
    ///
    /// [`EngineError::MailboxFull`] if the hypothesis has no room left, which takes more
    /// clues for the same cell than the inbox was sized for.
    pub fn clue(&mut self, clue: HypothesisId) -> Result<(), EngineError> {
        if let Some(mailbox) = self.hypotheses.get(clue.index(self.size)) {
            mailbox.deliver(true)?;
            self.clues += 1;
        }
        Ok(())
    }

    /// Waits until the network is quiet, stops the actors that never settled, joins
    /// every task and reads the grid back.
    ///
    /// # Errors
    ///
    /// The first error returned by an actor, or [`EngineError::Join`] if one panicked.
    pub async fn join(self) -> Result<Resolution, EngineError> {
        let Self {
            size,
            hypotheses,
            mut tasks,
            quiescence,
            shutdown,
            wiring,
            clues,
            started,
        } = self;
        drop(hypotheses);
        drop(wiring);

        quiescence.wait().await;
        debug!(messages = quiescence.minted(), "network quiescent");
        shutdown.cancel();

        let actors = tasks.len();
        let mut states = vec![HypothesisState::Undetermined; size.hypotheses()];
        let mut verdicts = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined?? {
                Outcome::Hypothesis(id, state) => {
                    if let Some(slot) = states.get_mut(id.index(size)) {
                        *slot = state;
                    }
                }
                Outcome::Group(verdict) => verdicts += usize::from(verdict.is_some()),
            }
        }

        let solution = Solution::new(size, states);
        let conflicts = solution.conflicts();
        if conflicts > 0 {
            warn!(conflicts, "cells with more than one true hypothesis; the clues contradict each other");
        }
        let stats = EngineStats {
            actors,
            clues,
            messages: quiescence.minted(),
            verdicts,
            elapsed: started.elapsed(),
        };
        debug!(
            unresolved = solution.unresolved(),
            verdicts, "grid read back"
        );
        Ok(Resolution { solution, stats })
    }
}

/// Solves `puzzle` on a fresh actor network.
///
/// # Errors
///
/// See [`Grid::join`].
pub async fn solve(puzzle: &Puzzle, config: &EngineConfig) -> Result<Resolution, EngineError> {
    let mut grid = Grid::new(puzzle.size());
    for clue in config.order(puzzle.clues().collect_vec()) {
        grid.clue(clue)?;
    }
    debug!(clues = grid.clues, in_flight = grid.quiescence.in_flight(), "clues injected");
    grid.join().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::puzzle::{Board, EXAMPLE_FOUR};

    #[tokio::test]
    async fn test_empty_grid_goes_quiet_untouched() {
        let resolution = Grid::new(Size::Four).join().await.unwrap();
        assert_eq!(resolution.solution.unresolved(), 16);
        assert_eq!(resolution.solution.tally(), (0, 0, 64));
        assert_eq!(resolution.stats.actors, 64 + 64);
        assert_eq!(resolution.stats.messages, 1);
        assert_eq!(resolution.stats.verdicts, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_four_by_four() {
        let puzzle = Puzzle::try_from(&Board::from(&EXAMPLE_FOUR)).unwrap();
        let resolution = solve(&puzzle, &EngineConfig::new(Size::Four)).await.unwrap();
        assert_eq!(resolution.solution.to_line(), "1234341221434321");
        assert_eq!(resolution.solution.tally(), (16, 48, 0));
        assert_eq!(resolution.stats.clues, 12);
        assert_eq!(resolution.stats.verdicts, 64);
    }

    #[tokio::test]
    async fn test_single_clue_settles_its_neighbourhood() {
        let mut grid = Grid::new(Size::Four);
        grid.clue(HypothesisId::new(0, 0, 0)).unwrap();
        let solution = grid.join().await.unwrap().solution;

        assert_eq!(solution.cell(0, 0), Some(0));
        assert_eq!(solution.unresolved(), 15);
        for column in 1..4 {
            let state = solution.state(HypothesisId::new(0, column, 0));
            assert_eq!(state, HypothesisState::Settled(false));
        }
        assert_eq!(
            solution.state(HypothesisId::new(2, 2, 0)),
            HypothesisState::Undetermined
        );
    }

    #[tokio::test]
    async fn test_repeated_clue_is_harmless() {
        let mut grid = Grid::new(Size::Four);
        let clue = HypothesisId::new(3, 3, 3);
        grid.clue(clue).unwrap();
        grid.clue(clue).unwrap();
        let solution = grid.join().await.unwrap().solution;
        assert_eq!(solution.cell(3, 3), Some(3));
    }
}
