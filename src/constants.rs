//! Test/benchmark matrix constants (§6).
//!
//! The source repository keeps these as package-level `var`s; here they are
//! const slices on a zero-sized `TestMatrix` type, per the Design Notes'
//! guidance to turn process-global mutable configuration into plain
//! constants.

use std::time::Duration;

/// Default bounded-ring capacity used where a test doesn't pick its own.
pub const DEFAULT_RING_BUFFER_SIZE: usize = 1024;

/// Number of spin iterations before `spin()` yields the scheduler.
pub const SPIN_YIELD_THRESHOLD: u32 = 256;

pub struct TestMatrix;

impl TestMatrix {
    /// Batch sizes exercised by the batched-ring tests.
    pub const BATCH_SIZES: &'static [usize] = &[1, 4, 8, 16];
    /// Batch sizes exercised by the batched-ring benchmarks.
    pub const BENCH_BATCH_SIZES: &'static [usize] = &[32, 256];

    /// Ring/queue sizes exercised by tests.
    pub const TEST_SIZES: &'static [usize] = &[
        1, 2, 3, 7, 8, 9, 127, 128, 129, 1023, 1024, 1025,
    ];
    /// Ring/queue sizes exercised by benchmarks.
    pub const BENCH_SIZES: &'static [usize] = &[256, 8192];

    /// Elements-per-test-case counts, same shape as `TEST_SIZES`.
    pub const TEST_COUNTS: &'static [usize] = Self::TEST_SIZES;

    /// Concurrent producer/consumer participants in the stress tests.
    pub const TEST_PROCS: usize = 16;

    /// Deadline for `must_send_in` / `must_recv_in` (§4.10).
    pub const NONBLOCK_THRESHOLD: Duration = Duration::from_millis(125);
}
