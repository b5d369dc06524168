//! Busy-wait backoff (§4.8).
//!
//! Every busy-wait loop in this crate drives itself through one of the two
//! helpers here, grounded on `extqueue/spin.go`'s `spin`/`backoff` pair from
//! the source repository and on the teacher's `std::hint::spin_loop` usage
//! in its wait strategies.

use crate::atomics::thread;
use crate::constants::SPIN_YIELD_THRESHOLD;
use std::time::Duration;

/// Cheap busy-wait counter: spins on the CPU pause instruction, yielding the
/// scheduler once every [`SPIN_YIELD_THRESHOLD`] calls.
#[derive(Default)]
pub struct Spin {
    count: u32,
}

impl Spin {
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Advance the spin counter by one tick, possibly yielding.
    pub fn tick(&mut self) {
        std::hint::spin_loop();
        self.count += 1;
        if self.count > SPIN_YIELD_THRESHOLD {
            thread::yield_now();
            self.count = 0;
        }
    }
}

/// Graduated backoff: a few pause-spins, then a yield, then a zero-duration
/// sleep, then a short microsecond sleep. Used by the blocking `send`/`recv`
/// contract (§4.1) layered atop `try_send`/`try_recv`.
#[derive(Default)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    pub const fn new() -> Self {
        Self { step: 0 }
    }

    pub fn snooze(&mut self) {
        let step = self.step;
        self.step = self.step.saturating_add(1);

        if step < 3 {
            std::hint::spin_loop();
        } else if step < 10 {
            thread::yield_now();
        } else if step < 12 {
            thread::sleep(Duration::from_micros(0));
        } else {
            #[cfg(feature = "tracing")]
            if step == 12 {
                tracing::warn!(step, "backoff escalated to sleep tier");
            }
            thread::sleep(Duration::from_micros(10));
        }
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }
}

/// Spin-call `f` until it returns `Some`, driving a [`Backoff`] between
/// attempts. Used to build the blocking contract on top of a `try_*`.
pub fn spin_until<T>(mut f: impl FnMut() -> Option<T>) -> T {
    let mut backoff = Backoff::new();
    loop {
        if let Some(v) = f() {
            return v;
        }
        backoff.snooze();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_until_returns_first_success() {
        let mut n = 0;
        let result = spin_until(|| {
            n += 1;
            if n >= 5 {
                Some(n)
            } else {
                None
            }
        });
        assert_eq!(result, 5);
    }

    #[test]
    fn spin_tick_yields_past_threshold() {
        let mut spin = Spin::new();
        for _ in 0..(SPIN_YIELD_THRESHOLD + 2) {
            spin.tick();
        }
        assert!(spin.count <= SPIN_YIELD_THRESHOLD);
    }
}
