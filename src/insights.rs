//! Observability for vyukov-queues.
//!
//! Unified tracing and profiling, zero-cost when disabled.
//!
//! # Usage
//!
//! ## Basic tracing (console output)
//! ```toml
//! vyukov-queues = { version = "0.1", features = ["tracing"] }
//! ```
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! ## Tracy profiler (real-time visualization)
//! ```toml
//! vyukov-queues = { version = "0.1", features = ["tracy"] }
//! ```
//! ```rust,ignore
//! vyukov_queues::insights::init_tracy();
//! ```
//! Then run Tracy profiler: https://github.com/wolfpld/tracy

/// Initialize Tracy profiler (call once at startup).
#[cfg(feature = "tracy")]
pub fn init_tracy() {
    use tracing_subscriber::layer::SubscriberExt;
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(tracing_tracy::TracyLayer::default()),
    )
    .expect("setup tracy layer");
}

#[cfg(not(feature = "tracy"))]
pub fn init_tracy() {}

/// Record a send onto a named queue (creates a span visible in Tracy).
#[cfg(feature = "tracing")]
#[inline]
pub fn record_send(queue: &str) {
    let _span = tracing::trace_span!("send", queue).entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_send(_queue: &str) {}

/// Record a receive from a named queue (creates a span visible in Tracy).
#[cfg(feature = "tracing")]
#[inline]
pub fn record_receive(queue: &str) {
    let _span = tracing::trace_span!("recv", queue).entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_receive(_queue: &str) {}

/// Record a slot claimed by a producer in the bounded ring's hot path,
/// before the value is written (§4.2).
#[cfg(feature = "tracing")]
#[inline]
pub fn record_slot_claim(kind: &str, pos: u64) {
    tracing::trace!(kind, pos, "slot claimed");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_slot_claim(_kind: &str, _pos: u64) {}

/// Record a slot published back to the other side of the bounded ring,
/// after the sequence number is stored (§4.2).
#[cfg(feature = "tracing")]
#[inline]
pub fn record_slot_publish(kind: &str, pos: u64) {
    tracing::trace!(kind, pos, "slot published");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_slot_publish(_kind: &str, _pos: u64) {}

/// Record a `try_send`/`try_recv` refusal (ring full or empty).
#[cfg(feature = "tracing")]
#[inline]
pub fn record_refusal(queue: &str, op: &str) {
    let _span = tracing::debug_span!("refusal", queue, op).entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_refusal(_queue: &str, _op: &str) {}

/// Record a [`crate::backoff::Backoff`] escalating past spinning.
#[cfg(feature = "tracing")]
#[inline]
pub fn record_backoff_escalation(queue: &str) {
    let _span = tracing::warn_span!("backoff_escalation", queue).entered();
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub fn record_backoff_escalation(_queue: &str) {}

/// Create a span for one algorithm's test/bench run.
#[cfg(feature = "tracing")]
#[macro_export]
macro_rules! span_algorithm {
    ($name:expr) => {
        tracing::info_span!("algorithm", name = %$name)
    };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! span_algorithm {
    ($name:expr) => {
        ()
    };
}

/// Enter a span (no-op when tracing is disabled).
#[cfg(feature = "tracing")]
#[macro_export]
macro_rules! enter_span {
    ($span:expr) => {
        let _guard = $span.enter();
    };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! enter_span {
    ($span:expr) => {};
}
