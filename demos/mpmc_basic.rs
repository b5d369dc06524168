//! MPMC basic demo: several producers and several consumers share one
//! bounded Vyukov ring, verified for no loss and no duplication.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use vyukov_queues::bounded::Mpmc;

const RING_SIZE: usize = 2048;
const PRODUCERS: u64 = 4;
const CONSUMERS: u64 = 4;
const PER_PRODUCER: u64 = 500_000;

fn main() {
    let total = PRODUCERS * PER_PRODUCER;
    println!("mpmc_basic: {PRODUCERS} producers, {CONSUMERS} consumers, {total} items");

    let ring: Arc<Mpmc<u64>> = Arc::new(Mpmc::new(RING_SIZE));
    let start = Instant::now();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let ring = ring.clone();
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    let value = (p << 32) | i;
                    ring.send(value);
                }
            })
        })
        .collect();

    let received = Arc::new(AtomicU64::new(0));
    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let ring = ring.clone();
            let received = received.clone();
            thread::spawn(move || {
                let mut seen = HashSet::new();
                while received.load(Ordering::Relaxed) < total {
                    if let Some(v) = ring.try_recv() {
                        assert!(seen.insert(v), "duplicate delivery of {v}");
                        received.fetch_add(1, Ordering::Relaxed);
                    } else {
                        std::hint::spin_loop();
                    }
                }
                seen
            })
        })
        .collect();

    for h in producers {
        h.join().unwrap();
    }
    let mut all_seen = HashSet::new();
    for h in consumers {
        for v in h.join().unwrap() {
            assert!(all_seen.insert(v), "duplicate delivery of {v} across consumers");
        }
    }
    assert_eq!(all_seen.len() as u64, total);

    let elapsed = start.elapsed();
    println!("received {} items in {:.3}s", all_seen.len(), elapsed.as_secs_f64());
    println!(
        "throughput: {:.2}M items/sec",
        all_seen.len() as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}
