//! Unbounded MPSC linked list, non-intrusive (§4.3), grounded on
//! `extqueue/dv_nMPSCs.go`.

use crate::atomics::{AtomicPtr, Ordering};
use crate::backoff::Backoff;
use crate::capability::{Capability, Capable};
use crate::insights;
use crate::metrics::METRICS;
use std::ptr;

struct Node<T> {
    next: AtomicPtr<Node<T>>,
    value: Option<T>,
}

impl<T> Node<T> {
    fn boxed(value: Option<T>) -> *mut Node<T> {
        Box::into_raw(Box::new(Node {
            next: AtomicPtr::new(ptr::null_mut()),
            value,
        }))
    }
}

/// Multi-producer, single-consumer unbounded queue. `head` is the
/// atomic-swap insertion point shared by all producers; `tail` is owned
/// solely by the one consumer.
pub struct UnboundedMpsc<T> {
    head: AtomicPtr<Node<T>>,
    tail: std::cell::UnsafeCell<*mut Node<T>>,
}

impl<T> UnboundedMpsc<T> {
    pub fn new() -> Self {
        let stub = Node::boxed(None);
        Self {
            head: AtomicPtr::new(stub),
            tail: std::cell::UnsafeCell::new(stub),
        }
    }

    /// §4.3 `Send`: always succeeds (allocation failure aborts, per §7).
    pub fn send(&self, value: T) {
        let node = Node::boxed(Some(value));
        // SAFETY: swap serializes link formation across producers; the
        // publishing store below makes the link visible to the consumer.
        let prev = self.head.swap(node, Ordering::AcqRel);
        unsafe { (*prev).next.store(node, Ordering::Release) };
        insights::record_send("unbounded_mpsc");
        METRICS.record_send();
    }

    /// §4.3 `TryRecv`. The gap between a producer's swap and its publishing
    /// store is transient empty, indistinguishable here from true empty;
    /// callers retry.
    pub fn try_recv(&self) -> Option<T> {
        unsafe {
            let tail = *self.tail.get();
            let next = (*tail).next.load(Ordering::Acquire);
            if next.is_null() {
                insights::record_refusal("unbounded_mpsc", "try_recv");
                METRICS.record_recv_refusal();
                return None;
            }
            *self.tail.get() = next;
            let value = (*next).value.take();
            drop(Box::from_raw(tail));
            insights::record_receive("unbounded_mpsc");
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

impl<T> Default for UnboundedMpsc<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for UnboundedMpsc<T> {
    fn drop(&mut self) {
        unsafe {
            let mut cur = *self.tail.get();
            while !cur.is_null() {
                let next = (*cur).next.load(Ordering::Relaxed);
                drop(Box::from_raw(cur));
                cur = next;
            }
        }
    }
}

unsafe impl<T: Send> Send for UnboundedMpsc<T> {}
unsafe impl<T: Send> Sync for UnboundedMpsc<T> {}

impl<T> Capable for UnboundedMpsc<T> {
    const CAPABILITY: Capability = Capability::BLOCK_MPSC.union(Capability::NONBLOCK_MPSC);
}
