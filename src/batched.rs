//! MCRingBuffer-style batched SPSC/MPSC rings (§4.6), grounded on
//! `extqueue/mc_rSPSCs.go` and `extqueue/mc_rMPSCs.go`.
//!
//! Cross-thread publication only happens at a batch boundary or on an
//! explicit `flush_send`/`flush_recv` — callers that never reach either can
//! deadlock their peer; see the module-level warning repeated on each type.

use crate::atomics::{AtomicU64, Ordering};
use crate::backoff::Backoff;
use crate::capability::{Capability, Capable};
use crate::insights;
use crate::metrics::METRICS;
use std::cell::UnsafeCell;

/// Batched single-producer, single-consumer ring.
///
/// **Deadlock risk**: a receiver that never reaches a batch boundary and
/// never calls [`BatchedSpsc::flush_recv`] can starve the sender, and
/// symmetrically for the sender. Call both flush methods at the end of a
/// send/recv phase.
pub struct BatchedSpsc<T> {
    // shared
    read: AtomicU64,
    write: AtomicU64,
    // consumer-local
    local_write: UnsafeCell<u64>,
    next_read: UnsafeCell<u64>,
    read_batch: UnsafeCell<u64>,
    // producer-local
    local_read: UnsafeCell<u64>,
    next_write: UnsafeCell<u64>,
    write_batch: UnsafeCell<u64>,
    // constant
    batch_size: u64,
    buffer: Box<[UnsafeCell<Option<T>>]>,
}

impl<T> BatchedSpsc<T> {
    pub fn new(batch_size: usize, size: usize) -> Self {
        let batch_size = batch_size.max(1);
        let len = (size.max(batch_size) + 1).div_ceil(batch_size) * batch_size;
        let buffer = (0..len).map(|_| UnsafeCell::new(None)).collect();
        Self {
            read: AtomicU64::new(0),
            write: AtomicU64::new(0),
            local_write: UnsafeCell::new(0),
            next_read: UnsafeCell::new(0),
            read_batch: UnsafeCell::new(0),
            local_read: UnsafeCell::new(0),
            next_write: UnsafeCell::new(0),
            write_batch: UnsafeCell::new(0),
            batch_size: batch_size as u64,
            buffer,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len() - 1
    }

    fn next(&self, i: u64) -> u64 {
        let r = i + 1;
        if r as usize >= self.buffer.len() {
            0
        } else {
            r
        }
    }

    fn send_impl(&self, value: T, block: bool) -> bool {
        unsafe {
            let after_next_write = self.next(*self.next_write.get());
            if after_next_write == *self.local_read.get() {
                let mut backoff = Backoff::new();
                while after_next_write == self.read.load(Ordering::Acquire) {
                    if !block {
                        insights::record_refusal("batched_spsc", "try_send");
                        METRICS.record_send_refusal();
                        return false;
                    }
                    backoff.snooze();
                }
                *self.local_read.get() = self.read.load(Ordering::Acquire);
            }

            let idx = *self.next_write.get() as usize;
            *self.buffer[idx].get() = Some(value);
            *self.next_write.get() = after_next_write;
            *self.write_batch.get() += 1;
            if *self.write_batch.get() >= self.batch_size {
                self.flush_send();
            }
            insights::record_send("batched_spsc");
            METRICS.record_send();
            true
        }
    }

    pub fn try_send(&self, value: T) -> bool {
        self.send_impl(value, false)
    }

    pub fn send(&self, value: T) {
        self.send_impl(value, true);
    }

    /// Publish pending writes to the consumer.
    pub fn flush_send(&self) {
        unsafe {
            self.write.store(*self.next_write.get(), Ordering::Release);
            *self.write_batch.get() = 0;
        }
    }

    fn recv_impl(&self, block: bool) -> Option<T> {
        unsafe {
            if *self.next_read.get() == *self.local_write.get() {
                let mut backoff = Backoff::new();
                while *self.next_read.get() == self.write.load(Ordering::Acquire) {
                    if !block {
                        insights::record_refusal("batched_spsc", "try_recv");
                        METRICS.record_recv_refusal();
                        return None;
                    }
                    backoff.snooze();
                }
                *self.local_write.get() = self.write.load(Ordering::Acquire);
            }

            let idx = *self.next_read.get() as usize;
            let value = (*self.buffer[idx].get()).take();
            *self.next_read.get() = self.next(*self.next_read.get());
            *self.read_batch.get() += 1;
            if *self.read_batch.get() >= self.batch_size {
                self.flush_recv();
            }
            insights::record_receive("batched_spsc");
            METRICS.record_receive();
            value
        }
    }

    pub fn try_recv(&self) -> Option<T> {
        self.recv_impl(false)
    }

    pub fn recv(&self) -> T {
        loop {
            if let Some(v) = self.recv_impl(true) {
                return v;
            }
        }
    }

    /// Publish pending reads to the producer.
    pub fn flush_recv(&self) {
        unsafe {
            self.read.store(*self.next_read.get(), Ordering::Release);
            *self.read_batch.get() = 0;
        }
    }
}

unsafe impl<T: Send> Send for BatchedSpsc<T> {}
unsafe impl<T: Send> Sync for BatchedSpsc<T> {}

impl<T> Capable for BatchedSpsc<T> {
    const CAPABILITY: Capability = Capability::BLOCK_SPSC
        .union(Capability::NONBLOCK_SPSC)
        .union(Capability::BOUNDED)
        .union(Capability::FLUSHER);
}

/// Batched multi-producer, single-consumer ring: producers `fetch_add` a
/// unique write slot, then spin-wait on a global `unwritten` counter to
/// serialize publishing, giving MP semantics atop an otherwise SP cursor.
///
/// Same deadlock caveat as [`BatchedSpsc`] applies to the single consumer
/// side.
pub struct BatchedMpsc<T> {
    write_to: AtomicU64,
    next_read: AtomicU64,
    unwritten: AtomicU64,
    local_unwritten: UnsafeCell<u64>,
    local_next_read: UnsafeCell<u64>,
    local_read_batch: UnsafeCell<u64>,
    batch_size: u64,
    mask: u64,
    buffer: Box<[UnsafeCell<Option<T>>]>,
}

impl<T> BatchedMpsc<T> {
    pub fn new(batch_size: usize, size: usize) -> Self {
        let batch_size = batch_size.max(1);
        let len = size.max(batch_size).next_power_of_two();
        let buffer = (0..len).map(|_| UnsafeCell::new(None)).collect();
        Self {
            write_to: AtomicU64::new(0),
            next_read: AtomicU64::new(0),
            unwritten: AtomicU64::new(0),
            local_unwritten: UnsafeCell::new(0),
            local_next_read: UnsafeCell::new(0),
            local_read_batch: UnsafeCell::new(0),
            batch_size: batch_size as u64,
            mask: len as u64 - 1,
            buffer,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// §4.6 `Send`: always succeeds, blocking until there is room and until
    /// this producer's turn to publish arrives.
    pub fn send(&self, value: T) {
        let write_to = self.write_to.fetch_add(1, Ordering::Relaxed);
        let mut backoff = Backoff::new();
        while self.next_read.load(Ordering::Acquire) + self.mask < write_to {
            backoff.snooze();
        }

        unsafe { *self.buffer[(write_to & self.mask) as usize].get() = Some(value) };

        let mut backoff = Backoff::new();
        while write_to != self.unwritten.load(Ordering::Acquire) {
            backoff.snooze();
        }
        self.unwritten.store(write_to + 1, Ordering::Release);
        insights::record_send("batched_mpsc");
        METRICS.record_send();
    }

    pub fn flush_send(&self) {}

    fn recv_impl(&self, block: bool) -> Option<T> {
        unsafe {
            let mut local_unwritten = *self.local_unwritten.get();
            if *self.local_next_read.get() >= local_unwritten {
                let mut backoff = Backoff::new();
                loop {
                    local_unwritten = self.unwritten.load(Ordering::Acquire);
                    if *self.local_next_read.get() < local_unwritten {
                        break;
                    }
                    if !block {
                        insights::record_refusal("batched_mpsc", "try_recv");
                        METRICS.record_recv_refusal();
                        return None;
                    }
                    backoff.snooze();
                }
            }
            *self.local_unwritten.get() = local_unwritten;

            let idx = (*self.local_next_read.get() & self.mask) as usize;
            let value = (*self.buffer[idx].get()).take();
            *self.local_next_read.get() += 1;
            *self.local_read_batch.get() += 1;
            if *self.local_read_batch.get() >= self.batch_size {
                self.flush_recv();
            }
            insights::record_receive("batched_mpsc");
            METRICS.record_receive();
            value
        }
    }

    pub fn try_recv(&self) -> Option<T> {
        self.recv_impl(false)
    }

    pub fn recv(&self) -> T {
        loop {
            if let Some(v) = self.recv_impl(true) {
                return v;
            }
        }
    }

    pub fn flush_recv(&self) {
        unsafe {
            self.next_read
                .store(*self.local_next_read.get(), Ordering::Release);
            *self.local_read_batch.get() = 0;
        }
    }
}

unsafe impl<T: Send> Send for BatchedMpsc<T> {}
unsafe impl<T: Send> Sync for BatchedMpsc<T> {}

impl<T> Capable for BatchedMpsc<T> {
    const CAPABILITY: Capability = Capability::BLOCK_MPSC
        .union(Capability::BOUNDED)
        .union(Capability::FLUSHER);
}
