#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The constraint actor: one per cell, and one per digit in every row, column and box.
//!
//! A group supervises `d` hypotheses of which exactly one is true. Each member reports
//! its value once. The group counts the members proven false and stops at the first of:
//!
//! - a `true` report, after which every other member still in play is told `false`;
//! - a single member left unfalsified, which is told `true`.

use crate::sudoku::error::EngineError;
use crate::sudoku::geometry::{GroupId, Size};
use crate::sudoku::message::{self, Envelope, Mailbox};
use bit_vec::BitVec;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// A member's one and only report to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// The member's position within the group.
    pub slot: usize,
    /// The value the member settled on.
    pub value: bool,
}

/// How a group reached its decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The member in this slot reported `true`.
    Asserted(usize),
    /// The member in this slot was the last one not proven false.
    Survivor(usize),
}

impl Verdict {
    /// The slot of the member that is true.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Asserted(slot) | Self::Survivor(slot) => slot,
        }
    }
}

/// The actor enforcing that exactly one of its members is true.
#[derive(Debug)]
pub struct Group {
    id: GroupId,
    inbox: mpsc::Receiver<Envelope<Report>>,
    members: Vec<Option<Mailbox<bool>>>,
    falsified: BitVec,
    remaining: usize,
    shutdown: CancellationToken,
}

impl Group {
    /// Creates a group of `d` empty slots reading from `inbox`.
    #[must_use]
    pub fn new(
        id: GroupId,
        size: Size,
        inbox: mpsc::Receiver<Envelope<Report>>,
        shutdown: CancellationToken,
    ) -> Self {
        let d = size.side();
        Self {
            id,
            inbox,
            members: vec![None; d],
            falsified: BitVec::from_elem(d, false),
            remaining: d,
            shutdown,
        }
    }

    /// Places a member's mailbox at `slot`.
    pub fn admit(&mut self, slot: usize, mailbox: Mailbox<bool>) {
        if let Some(member) = self.members.get_mut(slot) {
            *member = Some(mailbox);
        }
    }

    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Folds one report into the count and returns the verdict once there is one.
    fn record(&mut self, report: Report) -> Option<Verdict> {
        if report.value {
            return Some(Verdict::Asserted(report.slot));
        }
        if self.falsified.get(report.slot) == Some(false) {
            self.falsified.set(report.slot, true);
            self.remaining -= 1;
        }
        if self.remaining > 1 {
            return None;
        }
        self.falsified.iter().position(|f| !f).map(Verdict::Survivor)
    }

    fn announce(&self, verdict: Verdict) -> Result<(), EngineError> {
        let members = self
            .members
            .iter()
            .enumerate()
            .filter_map(|(slot, member)| member.as_ref().map(|m| (slot, m)));
        for (slot, member) in members {
            let value = match verdict {
                Verdict::Asserted(chosen) if slot != chosen && !self.falsified[slot] => false,
                Verdict::Survivor(chosen) if slot == chosen => true,
                _ => continue,
            };
            member.deliver(value)?;
        }
        Ok(())
    }

    /// Runs the actor until it reaches a verdict or the network is shut down.
    ///
    /// # Errors
    ///
    /// [`EngineError::MailboxFull`] if a member has no room for the verdict.
    pub async fn run(mut self) -> Result<Option<Verdict>, EngineError> {
        loop {
            let received = tokio::select! {
                biased;
                envelope = self.inbox.recv() => envelope,
                () = self.shutdown.cancelled() => None,
            };
            let Some(envelope) = received else {
                trace!(group = %self.id, remaining = self.remaining, "no verdict");
                return Ok(None);
            };

            let (report, token) = envelope.open();
            let Some(verdict) = self.record(report) else {
                continue;
            };
            debug!(group = %self.id, ?verdict, remaining = self.remaining, "verdict");
            self.announce(verdict)?;
            drop(token);

            message::drain(&mut self.inbox).await;
            return Ok(Some(verdict));
        }
    }
}
