//! Unbounded MPSC linked list, intrusive (§4.4), grounded on
//! `extqueue/dv_nMPSCsi.go`.
//!
//! The caller owns the node; the queue only links it in and hands it back
//! on receive. The permanently-resident `stub` disambiguates "transiently
//! empty" from "truly empty" without an extra flag.

use crate::atomics::{AtomicPtr, Ordering};
use crate::backoff::Backoff;
use crate::capability::{Capability, Capable};
use crate::insights;
use crate::metrics::METRICS;
use std::ptr;

/// A node the caller provides and reclaims; `IntrusiveMpsc` never
/// allocates or frees one itself.
pub struct Node<T> {
    next: AtomicPtr<Node<T>>,
    pub value: T,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Self {
            next: AtomicPtr::new(ptr::null_mut()),
            value,
        }
    }
}

pub struct IntrusiveMpsc<T> {
    stub: Box<Node<T>>,
    head: AtomicPtr<Node<T>>,
    tail: std::cell::UnsafeCell<*mut Node<T>>,
}

impl<T> IntrusiveMpsc<T> {
    fn stub_ptr(&self) -> *mut Node<T> {
        &*self.stub as *const Node<T> as *mut Node<T>
    }
}

impl<T: Default> IntrusiveMpsc<T> {
    pub fn new() -> Self {
        let mut stub = Box::new(Node::new(T::default()));
        let stub_ptr: *mut Node<T> = &mut *stub;
        Self {
            stub,
            head: AtomicPtr::new(stub_ptr),
            tail: std::cell::UnsafeCell::new(stub_ptr),
        }
    }

    /// §4.4 `SendNode`: links `node` in, always succeeds.
    pub fn send_node(&self, node: Box<Node<T>>) {
        let raw = Box::into_raw(node);
        unsafe { (*raw).next.store(ptr::null_mut(), Ordering::Relaxed) };
        let prev = self.head.swap(raw, Ordering::AcqRel);
        unsafe { (*prev).next.store(raw, Ordering::Release) };
    }

    /// §4.4 `RecvNode`, non-blocking: skip the stub, or enqueue it to unjam
    /// a list that looks empty but isn't (producer mid-publish).
    pub fn try_recv_node(&self) -> Option<Box<Node<T>>> {
        unsafe {
            let mut tail = *self.tail.get();
            let stub = self.stub_ptr();
            let mut next = (*tail).next.load(Ordering::Acquire);

            if tail == stub {
                let next_node = match next.is_null() {
                    true => return None,
                    false => next,
                };
                *self.tail.get() = next_node;
                tail = next_node;
                next = (*tail).next.load(Ordering::Acquire);
            }

            if !next.is_null() {
                *self.tail.get() = next;
                return Some(Box::from_raw(tail));
            }

            let head = self.head.load(Ordering::Acquire);
            if tail as *const _ != head as *const _ {
                return None; // transient gap mid-publish
            }

            self.send_node(Box::from_raw(stub));
            next = (*tail).next.load(Ordering::Acquire);
            if !next.is_null() {
                *self.tail.get() = next;
                return Some(Box::from_raw(tail));
            }
            None
        }
    }

    pub fn recv_node(&self) -> Box<Node<T>> {
        let mut backoff = Backoff::new();
        loop {
            if let Some(node) = self.try_recv_node() {
                return node;
            }
            backoff.snooze();
        }
    }

    pub fn send(&self, value: T) {
        self.send_node(Box::new(Node::new(value)));
        insights::record_send("unbounded_mpsc_intrusive");
        METRICS.record_send();
    }

    pub fn try_recv(&self) -> Option<T> {
        match self.try_recv_node() {
            Some(node) => {
                insights::record_receive("unbounded_mpsc_intrusive");
                METRICS.record_receive();
                Some(node.value)
            }
            None => {
                insights::record_refusal("unbounded_mpsc_intrusive", "try_recv");
                METRICS.record_recv_refusal();
                None
            }
        }
    }

    pub fn recv(&self) -> T {
        self.recv_node().value
    }
}

impl<T> Drop for IntrusiveMpsc<T> {
    fn drop(&mut self) {
        let stub = self.stub_ptr();
        unsafe {
            let mut cur = *self.tail.get();
            while !cur.is_null() {
                let next = (*cur).next.load(Ordering::Relaxed);
                if cur != stub {
                    drop(Box::from_raw(cur));
                }
                cur = next;
            }
        }
    }
}

unsafe impl<T: Send> Send for IntrusiveMpsc<T> {}
unsafe impl<T: Send> Sync for IntrusiveMpsc<T> {}

impl<T: Default> Capable for IntrusiveMpsc<T> {
    const CAPABILITY: Capability = Capability::BLOCK_MPSC.union(Capability::NONBLOCK_MPSC);
}
