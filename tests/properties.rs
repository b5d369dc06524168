//! Property-based tests for §8's quantified invariants, run across several
//! capacities and producer/consumer counts rather than the single seed
//! values the inline unit tests in each module use.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use vyukov_queues::batched::BatchedSpsc;
use vyukov_queues::bounded::{Mpmc, Mpsc, Spmc, Spsc};
use vyukov_queues::unbounded_mpsc::UnboundedMpsc;

proptest! {
    /// Property 1: echo. An SPSC ring started at any power-of-two capacity
    /// returns whatever sequence was sent, in order.
    #[test]
    fn spsc_echoes_arbitrary_sequences(values in prop::collection::vec(any::<i64>(), 0..200), capacity in 2usize..64) {
        let ring: Spsc<i64> = Spsc::new(capacity);
        let mut out = Vec::with_capacity(values.len());
        for &v in &values {
            while !ring.try_send(v) {
                if let Some(received) = ring.try_recv() {
                    out.push(received);
                }
            }
        }
        while let Some(v) = ring.try_recv() {
            out.push(v);
        }
        prop_assert_eq!(out, values);
    }

    /// Property 2: no duplication / no loss across an MPSC queue, for a
    /// range of producer counts and per-producer send counts.
    #[test]
    fn mpsc_preserves_per_producer_order(producers in 1usize..6, per_producer in 1i64..400) {
        let queue = Arc::new(UnboundedMpsc::<i64>::new());
        let handles: Vec<_> = (0..producers)
            .map(|p| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for i in 0..per_producer {
                        queue.send(((p as i64) << 32) | i);
                    }
                })
            })
            .collect();

        let mut last_seen = vec![-1i64; producers];
        let mut total = 0i64;
        while total < producers as i64 * per_producer {
            if let Some(v) = queue.try_recv() {
                let p = (v >> 32) as usize;
                let i = v & 0xffff_ffff;
                prop_assert_eq!(i, last_seen[p] + 1);
                last_seen[p] = i;
                total += 1;
            } else {
                std::hint::spin_loop();
            }
        }
        for h in handles {
            h.join().unwrap();
        }
    }

    /// Property 4: per-producer order across a bounded MPMC ring survives
    /// arbitrary producer/consumer counts, not just the S3 seed values.
    #[test]
    fn mpmc_per_producer_order_holds(
        producers in 1usize..5,
        consumers in 1usize..5,
        per_producer in 1i64..150,
        capacity in 2usize..32,
    ) {
        let ring: Arc<Mpmc<i64>> = Arc::new(Mpmc::new(capacity));
        let total = producers as i64 * per_producer;
        let delivered = Arc::new(std::sync::atomic::AtomicI64::new(0));

        let producer_handles: Vec<_> = (0..producers)
            .map(|p| {
                let ring = ring.clone();
                thread::spawn(move || {
                    for i in 0..per_producer {
                        let v = ((p as i64) << 32) | i;
                        while !ring.try_send(v) {
                            std::hint::spin_loop();
                        }
                    }
                })
            })
            .collect();

        let consumer_handles: Vec<_> = (0..consumers)
            .map(|_| {
                let ring = ring.clone();
                let delivered = delivered.clone();
                thread::spawn(move || {
                    let mut seen: HashMap<i64, Vec<i64>> = HashMap::new();
                    while delivered.load(std::sync::atomic::Ordering::Relaxed) < total {
                        if let Some(v) = ring.try_recv() {
                            seen.entry(v >> 32).or_default().push(v & 0xffff_ffff);
                            delivered.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        } else {
                            std::hint::spin_loop();
                        }
                    }
                    seen
                })
            })
            .collect();

        for h in producer_handles {
            h.join().unwrap();
        }
        let mut merged: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut grand_total = 0usize;
        for h in consumer_handles {
            for (p, seqs) in h.join().unwrap() {
                grand_total += seqs.len();
                merged.entry(p).or_default().extend(seqs);
            }
        }

        for seqs in merged.values_mut() {
            let mut sorted = seqs.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&sorted, &*seqs);
            let dedup: HashSet<_> = seqs.iter().collect();
            prop_assert_eq!(dedup.len(), seqs.len());
        }
        prop_assert_eq!(grand_total as i64, total);
    }

    /// Property 7: flushing twice in a row is the same as flushing once.
    #[test]
    fn flush_send_is_idempotent(values in prop::collection::vec(any::<i64>(), 1..50)) {
        let q: BatchedSpsc<i64> = BatchedSpsc::new(8, 64);
        for &v in &values {
            prop_assert!(q.try_send(v));
        }
        q.flush_send();
        q.flush_send();

        let mut out = Vec::with_capacity(values.len());
        while out.len() < values.len() {
            if let Some(v) = q.try_recv() {
                out.push(v);
            }
        }
        q.flush_recv();
        q.flush_recv();
        prop_assert_eq!(out, values);
    }

    /// Property 3: a single producer feeding an SPMC ring is received by
    /// several consumers with no duplicate and no loss.
    #[test]
    fn spmc_no_loss_no_duplication(consumers in 1usize..5, count in 1i64..300, capacity in 2usize..32) {
        let ring: Arc<Spmc<i64>> = Arc::new(Spmc::new(capacity));
        let delivered = Arc::new(std::sync::atomic::AtomicI64::new(0));
        let consumer_handles: Vec<_> = (0..consumers)
            .map(|_| {
                let ring = ring.clone();
                let delivered = delivered.clone();
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while delivered.load(std::sync::atomic::Ordering::Relaxed) < count {
                        if let Some(v) = ring.try_recv() {
                            seen.push(v);
                            delivered.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        } else {
                            std::hint::spin_loop();
                        }
                    }
                    seen
                })
            })
            .collect();

        for i in 1..=count {
            while !ring.try_send(i) {
                std::hint::spin_loop();
            }
        }

        let mut all = HashSet::new();
        for h in consumer_handles {
            for v in h.join().unwrap() {
                prop_assert!(all.insert(v));
            }
        }
        prop_assert_eq!(all.len() as i64, count);
    }

    /// Property 2 variant exercised against the bounded MPSC ring rather
    /// than the unbounded linked list.
    #[test]
    fn bounded_mpsc_preserves_per_producer_order(producers in 1usize..5, per_producer in 1i64..200) {
        let ring: Arc<Mpsc<i64>> = Arc::new(Mpsc::new(64));
        let handles: Vec<_> = (0..producers)
            .map(|p| {
                let ring = ring.clone();
                thread::spawn(move || {
                    for i in 0..per_producer {
                        let v = ((p as i64) << 32) | i;
                        while !ring.try_send(v) {
                            std::hint::spin_loop();
                        }
                    }
                })
            })
            .collect();

        let mut last_seen = vec![-1i64; producers];
        let mut total = 0i64;
        while total < producers as i64 * per_producer {
            if let Some(v) = ring.try_recv() {
                let p = (v >> 32) as usize;
                let i = v & 0xffff_ffff;
                prop_assert_eq!(i, last_seen[p] + 1);
                last_seen[p] = i;
                total += 1;
            } else {
                std::hint::spin_loop();
            }
        }
        for h in handles {
            h.join().unwrap();
        }
    }
}
