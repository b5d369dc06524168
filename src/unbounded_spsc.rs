//! Unbounded SPSC linked list with a producer-side node cache (§4.5),
//! grounded on `extqueue/dv_nSPSCs.go`.

use crate::atomics::{AtomicPtr, Ordering};
use crate::backoff::Backoff;
use crate::capability::{Capability, Capable};
use crate::insights;
use crate::metrics::METRICS;
use std::cell::UnsafeCell;
use std::ptr;

struct Node<T> {
    next: AtomicPtr<Node<T>>,
    value: Option<T>,
}

/// Single-producer, single-consumer unbounded queue. The producer recycles
/// nodes the consumer has already passed rather than freeing and
/// reallocating on every send.
pub struct UnboundedSpsc<T> {
    // producer-only
    head: UnsafeCell<*mut Node<T>>,
    first: UnsafeCell<*mut Node<T>>,
    tail_copy: UnsafeCell<*mut Node<T>>,
    // consumer-only
    tail: UnsafeCell<*mut Node<T>>,
}

impl<T> UnboundedSpsc<T> {
    pub fn new() -> Self {
        let stub = Box::into_raw(Box::new(Node {
            next: AtomicPtr::new(ptr::null_mut()),
            value: None,
        }));
        Self {
            head: UnsafeCell::new(stub),
            first: UnsafeCell::new(stub),
            tail_copy: UnsafeCell::new(stub),
            tail: UnsafeCell::new(stub),
        }
    }

    /// Recycle a node from `[first, tail_copy)`, reloading `tail_copy` from
    /// the consumer's `tail` if the producer-local cache is exhausted, and
    /// only allocating fresh as a last resort.
    fn alloc(&self) -> *mut Node<T> {
        unsafe {
            let first = *self.first.get();
            if first != *self.tail_copy.get() {
                *self.first.get() = (*first).next.load(Ordering::Relaxed);
                return first;
            }

            *self.tail_copy.get() = *self.tail.get();
            let first = *self.first.get();
            if first != *self.tail_copy.get() {
                *self.first.get() = (*first).next.load(Ordering::Relaxed);
                return first;
            }

            Box::into_raw(Box::new(Node {
                next: AtomicPtr::new(ptr::null_mut()),
                value: None,
            }))
        }
    }

    /// §4.5 `Send`: always succeeds.
    pub fn send(&self, value: T) {
        unsafe {
            let node = self.alloc();
            (*node).value = Some(value);
            (*node).next.store(ptr::null_mut(), Ordering::Relaxed);
            let head = *self.head.get();
            (*head).next.store(node, Ordering::Release);
            *self.head.get() = node;
        }
        insights::record_send("unbounded_spsc");
        METRICS.record_send();
    }

    /// §4.3-style `TryRecv`.
    pub fn try_recv(&self) -> Option<T> {
        unsafe {
            let tail = *self.tail.get();
            let next = (*tail).next.load(Ordering::Acquire);
            if next.is_null() {
                insights::record_refusal("unbounded_spsc", "try_recv");
                METRICS.record_recv_refusal();
                return None;
            }
            *self.tail.get() = next;
            let value = (*next).value.take();
            insights::record_receive("unbounded_spsc");
            METRICS.record_receive();
            value
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

impl<T> Default for UnboundedSpsc<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for UnboundedSpsc<T> {
    fn drop(&mut self) {
        // Everything from `first` onward (producer's free list plus
        // whatever the consumer hasn't reached) is owned by this queue.
        unsafe {
            let mut cur = *self.first.get();
            while !cur.is_null() {
                let next = (*cur).next.load(Ordering::Relaxed);
                drop(Box::from_raw(cur));
                cur = next;
            }
        }
    }
}

unsafe impl<T: Send> Send for UnboundedSpsc<T> {}
unsafe impl<T: Send> Sync for UnboundedSpsc<T> {}

impl<T> Capable for UnboundedSpsc<T> {
    const CAPABILITY: Capability = Capability::BLOCK_SPSC.union(Capability::NONBLOCK_SPSC);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn echo_with_recycling() {
        let q: UnboundedSpsc<i64> = UnboundedSpsc::new();
        for round in 0..4 {
            for i in 0..100 {
                q.send(round * 100 + i);
            }
            for i in 0..100 {
                assert_eq!(q.try_recv(), Some(round * 100 + i));
            }
        }
    }

    #[test]
    fn cross_thread_spsc() {
        let q = Arc::new(UnboundedSpsc::<i64>::new());
        let n = 20_000i64;
        let producer = {
            let q = q.clone();
            thread::spawn(move || {
                for i in 0..n {
                    q.send(i);
                }
            })
        };
        let mut next = 0i64;
        while next < n {
            if let Some(v) = q.try_recv() {
                assert_eq!(v, next);
                next += 1;
            } else {
                std::hint::spin_loop();
            }
        }
        producer.join().unwrap();
    }
}
