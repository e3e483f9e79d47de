#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Message plumbing shared by every actor.
//!
//! Actors talk only through bounded [`Mailbox`]es. Each mailbox is created with room
//! for exactly one message per distinct sender, and every sender delivers at most one
//! message, so a delivery never waits. Deliveries use `try_send`: a full mailbox means
//! the sizing is wrong and surfaces as [`EngineError::MailboxFull`], while a closed
//! mailbox means the receiver already settled and the message is simply discarded.
//!
//! Every message travels in an [`Envelope`] holding an [`InFlight`] token. Tokens are
//! counted by [`Quiescence`]; a receiver keeps the token of the message it is handling
//! until it has made all of its own deliveries, and a message that is never handled
//! drops its token when it is discarded (see [`drain`]). The count therefore reaches
//! zero exactly when no actor can send anything ever again.

use crate::sudoku::error::EngineError;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

/// Counts live [`InFlight`] tokens and wakes a waiter when the count drops to zero.
#[derive(Debug, Default)]
pub struct Quiescence {
    in_flight: AtomicUsize,
    minted: AtomicUsize,
    idle: Notify,
}

impl Quiescence {
    /// A counter with no tokens issued.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Issues a new token, keeping the network busy until it is dropped.
    #[must_use]
    pub fn token(self: &Arc<Self>) -> InFlight {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        self.minted.fetch_add(1, Ordering::Relaxed);
        InFlight(Arc::clone(self))
    }

    /// Number of tokens currently alive.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Number of tokens issued so far.
    #[must_use]
    pub fn minted(&self) -> usize {
        self.minted.load(Ordering::Relaxed)
    }

    /// Waits until no token is alive.
    ///
    /// New tokens are only ever issued by a holder of a live token, so once the count
    /// has reached zero it stays there.
    pub async fn wait(&self) {
        while self.in_flight() > 0 {
            self.idle.notified().await;
        }
    }
}

/// Proof that a message is still travelling or being handled.
#[derive(Debug)]
pub struct InFlight(Arc<Quiescence>);

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_one();
        }
    }
}

/// A payload together with the token that keeps the network from looking idle.
#[derive(Debug)]
pub struct Envelope<T> {
    payload: T,
    token: InFlight,
}

impl<T> Envelope<T> {
    /// Splits the envelope. The caller must hold on to the token until it has finished
    /// every delivery caused by the payload.
    pub fn open(self) -> (T, InFlight) {
        (self.payload, self.token)
    }
}

/// Sending half of an actor's inbox.
pub struct Mailbox<T> {
    owner: Arc<str>,
    sender: mpsc::Sender<Envelope<T>>,
    quiescence: Arc<Quiescence>,
}

// Derived `Clone` would require `T: Clone`.
impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            owner: Arc::clone(&self.owner),
            sender: self.sender.clone(),
            quiescence: Arc::clone(&self.quiescence),
        }
    }
}

impl<T> fmt::Debug for Mailbox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox")
            .field("owner", &self.owner)
            .field("capacity", &self.sender.max_capacity())
            .finish_non_exhaustive()
    }
}

/// Creates an inbox for the actor named `owner`, with room for one message from each
/// of `senders` distinct senders.
pub fn mailbox<T>(
    owner: impl fmt::Display,
    senders: usize,
    quiescence: &Arc<Quiescence>,
) -> (Mailbox<T>, mpsc::Receiver<Envelope<T>>) {
    let (sender, receiver) = mpsc::channel(senders);
    let mailbox = Mailbox {
        owner: Arc::from(owner.to_string()),
        sender,
        quiescence: Arc::clone(quiescence),
    };
    (mailbox, receiver)
}

impl<T> Mailbox<T> {
    /// Name of the receiving actor.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Delivers `payload` without waiting.
    ///
    /// Returns `Ok(true)` if the message was queued and `Ok(false)` if the receiver has
    /// already finished and the message was discarded.
    ///
    /// # Errors
    ///
    /// [`EngineError::MailboxFull`] if the mailbox has no room left.
    pub fn deliver(&self, payload: T) -> Result<bool, EngineError> {
        let envelope = Envelope {
            payload,
            token: self.quiescence.token(),
        };
        match self.sender.try_send(envelope) {
            Ok(()) => Ok(true),
            Err(TrySendError::Closed(_)) => {
                trace!(actor = %self.owner, "receiver already settled, message discarded");
                Ok(false)
            }
            Err(TrySendError::Full(_)) => Err(EngineError::MailboxFull {
                actor: self.owner.to_string(),
            }),
        }
    }
}

/// Closes an inbox and discards whatever is still queued or being delivered to it.
///
/// Returns the number of discarded messages.
pub async fn drain<T>(inbox: &mut mpsc::Receiver<Envelope<T>>) -> usize {
    inbox.close();
    let mut discarded = 0;
    while inbox.recv().await.is_some() {
        discarded += 1;
    }
    discarded
}
