//! Deadline-bounded send/recv helpers (§4.10), for harness code that needs
//! to assert a nonblocking-capable queue doesn't quietly degrade into an
//! unbounded spin.

use crate::backoff::Backoff;
use crate::constants::TestMatrix;
use crate::error::{QueueError, Result};
use std::time::Instant;

/// Retry `try_send` with graduated backoff until it succeeds or
/// [`TestMatrix::NONBLOCK_THRESHOLD`] elapses.
pub fn must_send_in<F>(mut try_send: F) -> Result<()>
where
    F: FnMut() -> bool,
{
    must_send_in_deadline(&mut try_send, TestMatrix::NONBLOCK_THRESHOLD)
}

/// Retry `try_recv` with graduated backoff until it yields a value or
/// [`TestMatrix::NONBLOCK_THRESHOLD`] elapses.
pub fn must_recv_in<T, F>(mut try_recv: F) -> Result<T>
where
    F: FnMut() -> Option<T>,
{
    must_recv_in_deadline(&mut try_recv, TestMatrix::NONBLOCK_THRESHOLD)
}

fn must_send_in_deadline<F>(try_send: &mut F, threshold: std::time::Duration) -> Result<()>
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    let mut backoff = Backoff::new();
    loop {
        if try_send() {
            return Ok(());
        }
        if start.elapsed() >= threshold {
            return Err(QueueError::capability(
                "try_send did not succeed within the nonblocking threshold",
            ));
        }
        backoff.snooze();
    }
}

fn must_recv_in_deadline<T, F>(try_recv: &mut F, threshold: std::time::Duration) -> Result<T>
where
    F: FnMut() -> Option<T>,
{
    let start = Instant::now();
    let mut backoff = Backoff::new();
    loop {
        if let Some(v) = try_recv() {
            return Ok(v);
        }
        if start.elapsed() >= threshold {
            return Err(QueueError::capability(
                "try_recv did not yield a value within the nonblocking threshold",
            ));
        }
        backoff.snooze();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounded::Spsc;
    use std::cell::Cell;

    #[test]
    fn must_send_in_succeeds_when_room_exists() {
        let ring: Spsc<i64> = Spsc::new(4);
        assert!(must_send_in(|| ring.try_send(1)).is_ok());
        assert_eq!(ring.try_recv(), Some(1));
    }

    #[test]
    fn must_send_in_times_out_on_a_full_queue() {
        let ring: Spsc<i64> = Spsc::new(2);
        while ring.try_send(0) {}
        let result = must_send_in(|| ring.try_send(0));
        assert!(result.is_err());
    }

    #[test]
    fn must_recv_in_succeeds_once_available() {
        let calls = Cell::new(0);
        let result = must_recv_in(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                None
            } else {
                Some(42i64)
            }
        });
        assert_eq!(result.unwrap(), 42);
    }
}
