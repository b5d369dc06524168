//! Metrics for vyukov-queues.
//!
//! Lightweight global counters for observability, in the teacher's
//! `AtomicU64`-counters-plus-snapshot style.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics counters.
pub struct Metrics {
    pub messages_sent: AtomicU64,
    pub messages_received: AtomicU64,
    pub send_refusals: AtomicU64,
    pub recv_refusals: AtomicU64,
    pub backoff_escalations: AtomicU64,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            messages_sent: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
            send_refusals: AtomicU64::new(0),
            recv_refusals: AtomicU64::new(0),
            backoff_escalations: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_send(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_receive(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// A `try_send` refused because the queue reported full.
    #[inline]
    pub fn record_send_refusal(&self) {
        self.send_refusals.fetch_add(1, Ordering::Relaxed);
    }

    /// A `try_recv` refused because the queue reported empty.
    #[inline]
    pub fn record_recv_refusal(&self) {
        self.recv_refusals.fetch_add(1, Ordering::Relaxed);
    }

    /// A [`crate::backoff::Backoff`] escalated past spinning into yielding
    /// or sleeping.
    #[inline]
    pub fn record_backoff_escalation(&self) {
        self.backoff_escalations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            send_refusals: self.send_refusals.load(Ordering::Relaxed),
            recv_refusals: self.recv_refusals.load(Ordering::Relaxed),
            backoff_escalations: self.backoff_escalations.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.messages_sent.store(0, Ordering::Relaxed);
        self.messages_received.store(0, Ordering::Relaxed);
        self.send_refusals.store(0, Ordering::Relaxed);
        self.recv_refusals.store(0, Ordering::Relaxed);
        self.backoff_escalations.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub send_refusals: u64,
    pub recv_refusals: u64,
    pub backoff_escalations: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tx={} rx={} send_refusals={} recv_refusals={} backoff_escalations={}",
            self.messages_sent,
            self.messages_received,
            self.send_refusals,
            self.recv_refusals,
            self.backoff_escalations
        )
    }
}

/// Global metrics instance, used by benches/demos that want a shared
/// counter without threading one through every call.
pub static METRICS: Metrics = Metrics::new();
