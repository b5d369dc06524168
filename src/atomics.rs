//! Atomic-type shim so the algorithms can be model-checked under `loom`.
//!
//! Every queue module imports its atomics from here instead of
//! `std::sync::atomic` directly, following the pattern `ringmpsc-rs` uses to
//! keep the production and loom-model code paths textually identical. Under
//! `--cfg loom` this re-exports `loom`'s shadow atomics and `loom::thread`;
//! otherwise it re-exports the real `std` types.

#[cfg(not(loom))]
pub use std::sync::atomic::{fence, AtomicBool, AtomicPtr, AtomicU64, AtomicUsize, Ordering};
#[cfg(not(loom))]
pub use std::thread;

#[cfg(loom)]
pub use loom::sync::atomic::{fence, AtomicBool, AtomicPtr, AtomicU64, AtomicUsize, Ordering};
#[cfg(loom)]
pub use loom::thread;

#[cfg(not(loom))]
pub use std::sync::Arc;
#[cfg(loom)]
pub use loom::sync::Arc;
