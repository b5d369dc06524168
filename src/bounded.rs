//! Bounded sequence-number ring (§4.2): the Vyukov MPMC ring and its
//! SPSC/SPMC/MPSC/padded specializations.
//!
//! One generic algorithm, `Ring<T, S, SP, SC>`, monomorphized over whether
//! the producer side (`SP`) and consumer side (`SC`) are single-threaded —
//! this is the Rust equivalent of the source's several hand-duplicated
//! `dv_q*.go` files (Design Notes §9's "several snapshot variants" budget
//! note), and of `dv_qMPMCsp.go` vs `dv_qMPMCs.go` for the padded/unpadded
//! split. `S` selects [`Slot`] or [`PaddedSlot`].

use crate::atomics::Ordering;
use crate::backoff::Backoff;
use crate::capability::{Capability, Capable};
use crate::insights;
use crate::metrics::METRICS;
use crate::slot::{PaddedSlot, Slot, SlotCell};
use crossbeam_utils::CachePadded;

pub struct Ring<T, S: SlotCell<T>, const SP: bool, const SC: bool> {
    buffer: Box<[S]>,
    mask: u64,
    sendx: CachePadded<crate::atomics::AtomicU64>,
    recvx: CachePadded<crate::atomics::AtomicU64>,
    _marker: std::marker::PhantomData<T>,
}

impl<T, S: SlotCell<T>, const SP: bool, const SC: bool> Ring<T, S, SP, SC> {
    /// Round `requested` up to the next power of two `>= 2` and build a ring
    /// of that capacity (§4.2, "Sizing").
    pub fn new(requested: usize) -> Self {
        let size = requested.max(2).next_power_of_two();
        let buffer: Box<[S]> = (0..size as u64).map(S::new_at).collect();
        Self {
            buffer,
            mask: size as u64 - 1,
            sendx: CachePadded::new(crate::atomics::AtomicU64::new(0)),
            recvx: CachePadded::new(crate::atomics::AtomicU64::new(0)),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    fn cell(&self, pos: u64) -> &Slot<T> {
        self.buffer[(pos & self.mask) as usize].inner()
    }

    /// The arity label this instantiation logs under, matching the
    /// `Spsc`/`Mpsc`/`Spmc`/`Mpmc` aliases below.
    const KIND: &'static str = match (SP, SC) {
        (true, true) => "spsc",
        (false, true) => "mpsc",
        (true, false) => "spmc",
        (false, false) => "mpmc",
    };

    /// §4.2 `TrySend`.
    pub fn try_send(&self, value: T) -> bool {
        let mut pos = self.sendx.load(Ordering::Relaxed);
        loop {
            let cell = self.cell(pos);
            let seq = cell.sequence_load(Ordering::Acquire);
            let df = seq as i64 - pos as i64;

            if df == 0 {
                if SP {
                    self.sendx.store(pos + 1, Ordering::Relaxed);
                } else if self
                    .sendx
                    .compare_exchange_weak(pos, pos + 1, Ordering::Relaxed, Ordering::Relaxed)
                    .is_err()
                {
                    pos = self.sendx.load(Ordering::Relaxed);
                    continue;
                }
                insights::record_slot_claim(Self::KIND, pos);
                unsafe { cell.write(value) };
                cell.sequence_store(pos + 1, Ordering::Release);
                insights::record_slot_publish(Self::KIND, pos);
                insights::record_send(Self::KIND);
                METRICS.record_send();
                return true;
            } else if df < 0 {
                insights::record_refusal(Self::KIND, "try_send");
                METRICS.record_send_refusal();
                return false; // full
            } else {
                pos = self.sendx.load(Ordering::Relaxed);
            }
        }
    }

    /// §4.2 `TryRecv`.
    pub fn try_recv(&self) -> Option<T> {
        let mut pos = self.recvx.load(Ordering::Relaxed);
        loop {
            let cell = self.cell(pos);
            let seq = cell.sequence_load(Ordering::Acquire);
            let df = seq as i64 - (pos as i64 + 1);

            if df == 0 {
                if SC {
                    self.recvx.store(pos + 1, Ordering::Relaxed);
                } else if self
                    .recvx
                    .compare_exchange_weak(pos, pos + 1, Ordering::Relaxed, Ordering::Relaxed)
                    .is_err()
                {
                    pos = self.recvx.load(Ordering::Relaxed);
                    continue;
                }
                insights::record_slot_claim(Self::KIND, pos);
                let value = unsafe { cell.read() };
                cell.sequence_store(pos + self.mask + 1, Ordering::Release);
                insights::record_slot_publish(Self::KIND, pos);
                insights::record_receive(Self::KIND);
                METRICS.record_receive();
                return Some(value);
            } else if df < 0 {
                insights::record_refusal(Self::KIND, "try_recv");
                METRICS.record_recv_refusal();
                return None; // empty
            } else {
                pos = self.recvx.load(Ordering::Relaxed);
            }
        }
    }

    /// Blocking `send`: spin `try_send` with graduated backoff (§4.1).
    ///
    /// Requires `T: Copy`, matching the data model's "opaque, copyable"
    /// element type — a failed `try_send` otherwise has nowhere to return
    /// the value it was given.
    pub fn send(&self, value: T)
    where
        T: Copy,
    {
        let mut backoff = Backoff::new();
        while !self.try_send(value) {
            backoff.snooze();
        }
    }

    pub fn recv(&self) -> T {
        let mut backoff = Backoff::new();
        loop {
            if let Some(v) = self.try_recv() {
                return v;
            }
            backoff.snooze();
        }
    }
}

unsafe impl<T: Send, S: SlotCell<T> + Send, const SP: bool, const SC: bool> Send
    for Ring<T, S, SP, SC>
{
}
unsafe impl<T: Send, S: SlotCell<T> + Sync, const SP: bool, const SC: bool> Sync
    for Ring<T, S, SP, SC>
{
}

impl<T, S: SlotCell<T>> Capable for Ring<T, S, true, true> {
    const CAPABILITY: Capability = Capability::BLOCK_SPSC
        .union(Capability::NONBLOCK_SPSC)
        .union(Capability::BOUNDED);
}
impl<T, S: SlotCell<T>> Capable for Ring<T, S, false, true> {
    const CAPABILITY: Capability = Capability::BLOCK_MPSC
        .union(Capability::NONBLOCK_MPSC)
        .union(Capability::BOUNDED);
}
impl<T, S: SlotCell<T>> Capable for Ring<T, S, true, false> {
    const CAPABILITY: Capability = Capability::BLOCK_SPMC
        .union(Capability::NONBLOCK_SPMC)
        .union(Capability::BOUNDED);
}
impl<T, S: SlotCell<T>> Capable for Ring<T, S, false, false> {
    const CAPABILITY: Capability = Capability::BLOCK_MPMC
        .union(Capability::NONBLOCK_MPMC)
        .union(Capability::BOUNDED);
}

pub type Spsc<T> = Ring<T, Slot<T>, true, true>;
pub type Mpsc<T> = Ring<T, Slot<T>, false, true>;
pub type Spmc<T> = Ring<T, Slot<T>, true, false>;
pub type Mpmc<T> = Ring<T, Slot<T>, false, false>;

pub type PaddedSpsc<T> = Ring<T, PaddedSlot<T>, true, true>;
pub type PaddedMpsc<T> = Ring<T, PaddedSlot<T>, false, true>;
pub type PaddedSpmc<T> = Ring<T, PaddedSlot<T>, true, false>;
pub type PaddedMpmc<T> = Ring<T, PaddedSlot<T>, false, false>;
