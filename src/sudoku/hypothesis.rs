#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The leaf actor: one per `(row, column, digit)` triple.
//!
//! A hypothesis listens for the verdicts of its four groups and, for clued cells, the
//! clue itself. The first value it receives is final. It forwards that value to all
//! four groups, discards anything still arriving, and finishes.

use crate::sudoku::error::EngineError;
use crate::sudoku::geometry::{GroupId, GroupKind, HypothesisId};
use crate::sudoku::group::Report;
use crate::sudoku::message::{self, Envelope, Mailbox};
use crate::sudoku::state::HypothesisState;
use smallvec::SmallVec;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Inbox capacity of a hypothesis: one verdict per group plus one clue.
pub const INBOX_CAPACITY: usize = GroupKind::ALL.len() + 1;

#[derive(Debug)]
struct Link {
    group: GroupId,
    slot: usize,
    mailbox: Mailbox<Report>,
}

/// The actor deciding whether one digit goes in one cell.
#[derive(Debug)]
pub struct Hypothesis {
    id: HypothesisId,
    inbox: mpsc::Receiver<Envelope<bool>>,
    groups: SmallVec<[Link; 4]>,
    shutdown: CancellationToken,
}

impl Hypothesis {
    /// Creates an unlinked hypothesis reading from `inbox`.
    #[must_use]
    pub fn new(
        id: HypothesisId,
        inbox: mpsc::Receiver<Envelope<bool>>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            id,
            inbox,
            groups: SmallVec::new(),
            shutdown,
        }
    }

    /// Records that this hypothesis occupies `slot` in `group`.
    pub fn link(&mut self, group: GroupId, slot: usize, mailbox: Mailbox<Report>) {
        self.groups.push(Link {
            group,
            slot,
            mailbox,
        });
    }

    #[must_use]
    pub const fn id(&self) -> HypothesisId {
        self.id
    }

    /// Runs the actor until it settles or the network is shut down.
    ///
    /// # Errors
    ///
    /// [`EngineError::MailboxFull`] if one of its groups has no room for the report.
    pub async fn run(mut self) -> Result<HypothesisState, EngineError> {
        let received = tokio::select! {
            biased;
            envelope = self.inbox.recv() => envelope,
            () = self.shutdown.cancelled() => None,
        };
        let Some(envelope) = received else {
            return Ok(HypothesisState::Undetermined);
        };

        let (value, token) = envelope.open();
        trace!(hypothesis = %self.id, value, "settled");
        for link in &self.groups {
            let report = Report {
                slot: link.slot,
                value,
            };
            if !link.mailbox.deliver(report)? {
                trace!(hypothesis = %self.id, group = %link.group, "group already finished");
            }
        }
        drop(token);

        let discarded = message::drain(&mut self.inbox).await;
        if discarded > 0 {
            trace!(hypothesis = %self.id, discarded, "ignored late messages");
        }
        Ok(HypothesisState::Settled(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::geometry::Size;
    use crate::sudoku::message::{Quiescence, mailbox};
    use std::sync::Arc;

    type GroupInbox = mpsc::Receiver<Envelope<Report>>;

    fn wired(
        quiescence: &Arc<Quiescence>,
        shutdown: &CancellationToken,
    ) -> (Hypothesis, Mailbox<bool>, Vec<GroupInbox>) {
        let id = HypothesisId::new(1, 5, 3);
        let (own, inbox) = mailbox(id, INBOX_CAPACITY, quiescence);
        let mut hypothesis = Hypothesis::new(id, inbox, shutdown.clone());
        let mut inboxes = Vec::new();
        for (group, slot) in id.memberships(Size::Nine) {
            let (mailbox, inbox) = mailbox(group, 9, quiescence);
            hypothesis.link(group, slot, mailbox);
            inboxes.push(inbox);
        }
        (hypothesis, own, inboxes)
    }

    #[tokio::test]
    async fn test_settles_and_reports_to_every_group() {
        let quiescence = Quiescence::new();
        let shutdown = CancellationToken::new();
        let (hypothesis, own, mut inboxes) = wired(&quiescence, &shutdown);

        own.deliver(true).unwrap();
        let state = hypothesis.run().await.unwrap();
        assert_eq!(state, HypothesisState::Settled(true));

        let mut slots = Vec::new();
        for inbox in &mut inboxes {
            let (report, _token) = inbox.recv().await.unwrap().open();
            assert!(report.value);
            slots.push(report.slot);
        }
        assert_eq!(slots, vec![3, 5, 1, 5]);
    }

    #[tokio::test]
    async fn test_first_message_wins() {
        let quiescence = Quiescence::new();
        let shutdown = CancellationToken::new();
        let (hypothesis, own, mut inboxes) = wired(&quiescence, &shutdown);

        own.deliver(false).unwrap();
        own.deliver(true).unwrap();
        own.deliver(true).unwrap();
        assert_eq!(
            hypothesis.run().await.unwrap(),
            HypothesisState::Settled(false)
        );

        for inbox in &mut inboxes {
            let (report, _token) = inbox.recv().await.unwrap().open();
            assert!(!report.value);
            assert!(inbox.try_recv().is_err());
        }
        assert!(!own.deliver(true).unwrap());
    }

    #[tokio::test]
    async fn test_shutdown_leaves_undetermined() {
        let quiescence = Quiescence::new();
        let shutdown = CancellationToken::new();
        let (hypothesis, _own, mut inboxes) = wired(&quiescence, &shutdown);

        shutdown.cancel();
        assert_eq!(
            hypothesis.run().await.unwrap(),
            HypothesisState::Undetermined
        );
        assert!(inboxes.iter_mut().all(|inbox| inbox.try_recv().is_err()));
        assert_eq!(quiescence.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_full_group_mailbox_is_an_error() {
        let quiescence = Quiescence::new();
        let id = HypothesisId::new(0, 0, 0);
        let (own, inbox) = mailbox(id, INBOX_CAPACITY, &quiescence);
        let mut hypothesis = Hypothesis::new(id, inbox, CancellationToken::new());
        let (group, slot) = id.memberships(Size::Nine)[0];
        let (cramped, _group_inbox) = mailbox(group, 1, &quiescence);
        cramped.deliver(Report { slot: 1, value: false }).unwrap();
        hypothesis.link(group, slot, cramped);

        own.deliver(true).unwrap();
        assert!(matches!(
            hypothesis.run().await,
            Err(EngineError::MailboxFull { .. })
        ));
    }
}
