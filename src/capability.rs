//! Capability bitset and detector (§3, §4.1, §4.9).
//!
//! Per Design Notes §9, the source's runtime type-assertion probing and its
//! empty `MultipleProducers()`/`MultipleConsumers()` marker methods both
//! fold into one piece of data: a bitmask plus a `Capable` trait whose
//! associated constant a concrete queue type fills in once. `detect()` then
//! just reads that constant back — no reflection involved.

use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capability(u32);

impl Capability {
    pub const NONE: Capability = Capability(0);

    pub const BLOCK_SPSC: Capability = Capability(1 << 0);
    pub const BLOCK_MPSC: Capability = Capability(1 << 1);
    pub const BLOCK_SPMC: Capability = Capability(1 << 2);
    pub const NONBLOCK_SPSC: Capability = Capability(1 << 3);
    pub const NONBLOCK_MPSC: Capability = Capability(1 << 4);
    pub const NONBLOCK_SPMC: Capability = Capability(1 << 5);
    pub const BOUNDED: Capability = Capability(1 << 6);
    pub const FLUSHER: Capability = Capability(1 << 7);

    pub const BLOCK_MPMC: Capability = Capability(Self::BLOCK_MPSC.0 | Self::BLOCK_SPMC.0);
    pub const NONBLOCK_MPMC: Capability =
        Capability(Self::NONBLOCK_MPSC.0 | Self::NONBLOCK_SPMC.0);

    pub const fn empty() -> Self {
        Self::NONE
    }

    pub const fn contains(self, other: Capability) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Capability) -> Self {
        Capability(self.0 | other.0)
    }
}

impl BitOr for Capability {
    type Output = Capability;
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for Capability {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// Implemented by every queue type; the associated constant is its fixed,
/// compile-time-known contract set. `detect()` is a thin wrapper around it
/// so call sites read like the source's runtime probe without paying for
/// one.
pub trait Capable {
    const CAPABILITY: Capability;

    fn capability(&self) -> Capability {
        Self::CAPABILITY
    }
}

/// Probe `q`'s capability set. Named to match §4.9's `Detect(q)`.
pub fn detect<Q: Capable>(q: &Q) -> Capability {
    q.capability()
}
