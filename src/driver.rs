//! `ProducerConsumer` test driver (§4.9, §6): spawns a fixed number of
//! producer and consumer threads, waits for them all, and surfaces the
//! first panic as a [`QueueError::TaskPanic`] rather than letting it
//! silently unwind past the harness.

use crate::error::{QueueError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// Runs `producer` on `producers` threads (each given its own index) and
/// `consumer` on `consumers` threads, joins everything, and returns the
/// first panic message encountered, if any.
pub fn producer_consumer<P, C>(producers: usize, consumers: usize, producer: P, consumer: C) -> Result<()>
where
    P: Fn(usize) + Send + Sync,
    C: Fn(usize) + Send + Sync,
{
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(producers + consumers);

        for p in 0..producers {
            let producer = &producer;
            handles.push(scope.spawn(move || run_guarded(|| producer(p))));
        }
        for c in 0..consumers {
            let consumer = &consumer;
            handles.push(scope.spawn(move || run_guarded(|| consumer(c))));
        }

        let mut first_error = None;
        for handle in handles {
            if let Err(message) = handle.join().unwrap_or_else(|_| {
                Err("task thread panicked outside the guarded closure".to_string())
            }) {
                first_error.get_or_insert(message);
            }
        }

        match first_error {
            Some(message) => Err(QueueError::task_panic(message)),
            None => Ok(()),
        }
    })
}

fn run_guarded<F: FnOnce()>(f: F) -> std::result::Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "task panicked with a non-string payload".to_string())
    })
}
