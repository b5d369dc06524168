//! Slot primitives for the bounded rings (§3, §4.2).

use crate::atomics::{AtomicU64, Ordering};
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;

use crossbeam_utils::CachePadded;

/// One ring slot: a sequence-number ticket plus the value it guards.
///
/// `sequence` is the cross-thread publication point — every read of
/// `value` is paired acquire-with-release against it (§5).
pub struct Slot<T> {
    sequence: AtomicU64,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn new(sequence: u64) -> Self {
        Self {
            sequence: AtomicU64::new(sequence),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    pub fn sequence_load(&self, order: Ordering) -> u64 {
        self.sequence.load(order)
    }

    pub fn sequence_store(&self, value: u64, order: Ordering) {
        self.sequence.store(value, order);
    }

    pub fn sequence_cell(&self) -> &AtomicU64 {
        &self.sequence
    }

    /// # Safety
    /// The caller must hold exclusive producer access to this slot (won the
    /// claim CAS/store) before calling.
    pub unsafe fn write(&self, value: T) {
        (*self.value.get()).write(value);
    }

    /// # Safety
    /// The caller must have observed this slot's `sequence` published by the
    /// writing producer (acquire) before calling, and must not call this
    /// twice for the same publication.
    pub unsafe fn read(&self) -> T {
        (*self.value.get()).assume_init_read()
    }
}

unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

/// Trait implemented by both the plain and cache-line-padded slot
/// containers, so the bounded ring can be generic over padding without
/// duplicating its algorithm (§4.2, "padded variants").
pub trait SlotCell<T> {
    fn new_at(index: u64) -> Self;
    fn inner(&self) -> &Slot<T>;
}

impl<T> SlotCell<T> for Slot<T> {
    fn new_at(index: u64) -> Self {
        Slot::new(index)
    }
    fn inner(&self) -> &Slot<T> {
        self
    }
}

/// Cache-line padded slot: isolates each slot onto its own cache line to
/// eliminate false sharing between neighboring producers/consumers, in
/// exchange for per-slot memory bloat. `CachePadded` is the idiomatic
/// equivalent of the source's anonymous `[8]int64` filler fields.
pub type PaddedSlot<T> = CachePadded<Slot<T>>;

impl<T> SlotCell<T> for PaddedSlot<T> {
    fn new_at(index: u64) -> Self {
        CachePadded::new(Slot::new(index))
    }
    fn inner(&self) -> &Slot<T> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_slot_is_cache_line_sized_or_larger() {
        assert!(std::mem::size_of::<PaddedSlot<u64>>() >= 64);
    }

    #[test]
    fn slot_round_trips_a_value() {
        let slot: Slot<u64> = Slot::new(0);
        unsafe {
            slot.write(42);
            assert_eq!(slot.read(), 42);
        }
    }
}
