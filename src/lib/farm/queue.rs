//! Bounded queues connecting pipeline stages.
//!
//! Each queue is a fixed-capacity crossbeam channel split into a [`QueueSender`] and a
//! [`QueueReceiver`], one per stage role. The sender blocks while the queue is full
//! (backpressure), the receiver blocks while it is empty, and closing the sender is the
//! end-of-stream signal: the receiver drains what is left and then reports `None`.
//!
//! # Key Types
//!
//! - [`QueueSender`] / [`QueueReceiver`]: the two ends of one point-to-point link
//! - [`TryRecv`] / [`TrySendError`]: outcomes of the non-blocking operations used by the
//!   fan-out and fan-in strategies
//! - [`QueueStats`]: per-queue counters collected after a run

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::errors::{HashfarmError, Result};
use crate::validation::validate_positive;

/// Statistics collected per queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Queue label (e.g. `worker-2.in`).
    pub label: String,
    /// Fixed capacity.
    pub capacity: usize,
    /// Items successfully sent.
    pub sent: u64,
    /// Sends that found the queue full (blocking sends and rejected `try_send`s).
    pub full_events: u64,
    /// Total time blocked in `send` waiting for room (milliseconds).
    pub time_blocked_ms: u64,
}

#[derive(Default)]
struct QueueCounters {
    sent: AtomicU64,
    full_events: AtomicU64,
    blocked_ns: AtomicU64,
}

/// Create a bounded queue holding at most `capacity` items.
///
/// # Errors
///
/// Returns an error if `capacity` is zero.
pub fn bounded_queue<T>(
    label: impl Into<String>,
    capacity: usize,
) -> Result<(QueueSender<T>, QueueReceiver<T>)> {
    validate_positive(capacity, "queue-capacity")?;

    let label: Arc<str> = Arc::from(label.into());
    let counters = Arc::new(QueueCounters::default());
    let (tx, rx) = bounded(capacity);

    let sender = QueueSender {
        tx: Some(tx),
        label: Arc::clone(&label),
        capacity,
        counters: Arc::clone(&counters),
    };
    let receiver = QueueReceiver { rx, label, capacity, counters };
    Ok((sender, receiver))
}

/// Error returned by [`QueueSender::try_send`]; always hands the item back.
#[derive(PartialEq, Eq)]
pub enum TrySendError<T> {
    /// The queue is at capacity.
    Full(T),
    /// The receiver has been dropped.
    Disconnected(T),
    /// This sender was already closed.
    Closed(T),
}

impl<T> TrySendError<T> {
    /// Recover the item that was not sent.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(item) | Self::Disconnected(item) | Self::Closed(item) => item,
        }
    }
}

impl<T> fmt::Debug for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
            Self::Disconnected(_) => f.write_str("Disconnected(..)"),
            Self::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

/// Outcome of a non-blocking receive.
#[derive(Debug, PartialEq, Eq)]
pub enum TryRecv<T> {
    /// An item was available.
    Item(T),
    /// Nothing queued right now, but the sender is still open.
    Empty,
    /// The sender closed and every item has been drained.
    Closed,
}

/// Producing end of a bounded queue.
pub struct QueueSender<T> {
    /// `None` once closed.
    tx: Option<Sender<T>>,
    label: Arc<str>,
    capacity: usize,
    counters: Arc<QueueCounters>,
}

impl<T> QueueSender<T> {
    /// Send an item, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`HashfarmError::SendAfterClose`] if this sender was closed, or
    /// [`HashfarmError::QueueDisconnected`] if the receiver is gone.
    pub fn send(&self, item: T) -> Result<()> {
        self.send_or_reclaim(item).map_err(|e| match e {
            TrySendError::Closed(_) => {
                HashfarmError::SendAfterClose { queue: self.label.to_string() }
            }
            TrySendError::Full(_) | TrySendError::Disconnected(_) => {
                HashfarmError::QueueDisconnected { queue: self.label.to_string() }
            }
        })
    }

    /// Blocking send that hands the item back when it cannot be delivered.
    ///
    /// Never returns [`TrySendError::Full`].
    pub(crate) fn send_or_reclaim(&self, item: T) -> std::result::Result<(), TrySendError<T>> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(TrySendError::Closed(item));
        };
        match tx.try_send(item) {
            Ok(()) => {
                self.record_sent();
                Ok(())
            }
            Err(crossbeam_channel::TrySendError::Full(item)) => {
                self.counters.full_events.fetch_add(1, Ordering::Relaxed);
                let start = Instant::now();
                let sent = tx.send(item);
                self.record_blocked(start);
                match sent {
                    Ok(()) => {
                        self.record_sent();
                        Ok(())
                    }
                    Err(crossbeam_channel::SendError(item)) => {
                        Err(TrySendError::Disconnected(item))
                    }
                }
            }
            Err(crossbeam_channel::TrySendError::Disconnected(item)) => {
                Err(TrySendError::Disconnected(item))
            }
        }
    }

    /// Send an item without blocking.
    ///
    /// # Errors
    ///
    /// Hands the item back if the queue is full, the receiver is gone, or this sender
    /// was closed.
    pub fn try_send(&self, item: T) -> std::result::Result<(), TrySendError<T>> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(TrySendError::Closed(item));
        };
        match tx.try_send(item) {
            Ok(()) => {
                self.record_sent();
                Ok(())
            }
            Err(crossbeam_channel::TrySendError::Full(item)) => {
                self.counters.full_events.fetch_add(1, Ordering::Relaxed);
                Err(TrySendError::Full(item))
            }
            Err(crossbeam_channel::TrySendError::Disconnected(item)) => {
                Err(TrySendError::Disconnected(item))
            }
        }
    }

    /// Signal that no further items will be sent. Idempotent.
    pub fn close(&mut self) {
        self.tx = None;
    }

    /// True once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }

    /// Items currently queued (0 once closed from this side).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.as_ref().map_or(0, Sender::len)
    }

    /// True if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queue label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Snapshot of this queue's counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        snapshot(&self.label, self.capacity, &self.counters)
    }

    /// Underlying channel, for blocking selection across several queues.
    pub(crate) fn channel(&self) -> Option<&Sender<T>> {
        self.tx.as_ref()
    }

    /// Account for an item delivered through [`channel`](Self::channel).
    pub(crate) fn record_sent(&self) {
        self.counters.sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Account for time spent waiting on a full queue outside of [`send`](Self::send).
    pub(crate) fn record_blocked(&self, start: Instant) {
        let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.counters.blocked_ns.fetch_add(elapsed, Ordering::Relaxed);
    }
}

impl<T> fmt::Debug for QueueSender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueSender")
            .field("label", &self.label)
            .field("capacity", &self.capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Consuming end of a bounded queue.
pub struct QueueReceiver<T> {
    rx: Receiver<T>,
    label: Arc<str>,
    capacity: usize,
    counters: Arc<QueueCounters>,
}

impl<T> QueueReceiver<T> {
    /// Receive the next item, blocking while the queue is empty.
    ///
    /// Returns `None` once the sender has closed and every item has been drained.
    #[must_use]
    pub fn recv(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Receive without blocking.
    #[must_use]
    pub fn try_recv(&self) -> TryRecv<T> {
        match self.rx.try_recv() {
            Ok(item) => TryRecv::Item(item),
            Err(TryRecvError::Empty) => TryRecv::Empty,
            Err(TryRecvError::Disconnected) => TryRecv::Closed,
        }
    }

    /// Items currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queue label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Snapshot of this queue's counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        snapshot(&self.label, self.capacity, &self.counters)
    }

    /// Underlying channel, for blocking selection across several queues.
    pub(crate) fn channel(&self) -> &Receiver<T> {
        &self.rx
    }
}

impl<T> Iterator for QueueReceiver<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.recv()
    }
}

impl<T> fmt::Debug for QueueReceiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueReceiver")
            .field("label", &self.label)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

fn snapshot(label: &str, capacity: usize, counters: &QueueCounters) -> QueueStats {
    QueueStats {
        label: label.to_string(),
        capacity,
        sent: counters.sent.load(Ordering::Relaxed),
        full_events: counters.full_events.load(Ordering::Relaxed),
        time_blocked_ms: counters.blocked_ns.load(Ordering::Relaxed) / 1_000_000,
    }
}
