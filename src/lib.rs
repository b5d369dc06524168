//! A matrix of lock-free and blocking concurrent queues — bounded Vyukov
//! rings, unbounded linked-list queues, MCRingBuffer-style batched rings,
//! and mutex-based references — probed through one capability-typed
//! interface instead of one API per producer/consumer arity.
//!
//! Start at [`bounded::Ring`] for the core bounded algorithm, or
//! [`descriptor`] to build any registered algorithm by name.

pub mod atomics;
pub mod backoff;
pub mod batched;
pub mod blocking_ring;
pub mod bounded;
pub mod capability;
pub mod channel_mpmc;
pub mod constants;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod slot;
pub mod timed;
pub mod unbounded_mpsc;
pub mod unbounded_mpsc_intrusive;
pub mod unbounded_spsc;

pub use capability::{detect, Capability, Capable};
pub use error::{QueueError, Result};
