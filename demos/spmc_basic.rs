//! SPMC basic demo: one producer feeds a bounded ring drained by several
//! competing consumers; the sum of what they receive must match what was
//! sent, with no duplicate delivery.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use vyukov_queues::bounded::Spmc;

const RING_SIZE: usize = 1024;
const CONSUMERS: usize = 4;
const COUNT: u64 = 2_000_000;

fn main() {
    println!("spmc_basic: {COUNT} items across {CONSUMERS} consumers");

    let ring: Arc<Spmc<u64>> = Arc::new(Spmc::new(RING_SIZE));
    let start = Instant::now();

    let producer = {
        let ring = ring.clone();
        thread::spawn(move || {
            for i in 0..COUNT {
                ring.send(i);
            }
        })
    };

    let received = Arc::new(AtomicU64::new(0));
    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let ring = ring.clone();
            let received = received.clone();
            thread::spawn(move || {
                let mut seen = HashSet::new();
                while received.load(Ordering::Relaxed) < COUNT {
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

    producer.join().unwrap();
    let mut all_seen = HashSet::new();
    for h in consumers {
        for v in h.join().unwrap() {
            assert!(all_seen.insert(v), "duplicate delivery of {v} across consumers");
        }
    }

    let elapsed = start.elapsed();
    println!("received {} items in {:.3}s", all_seen.len(), elapsed.as_secs_f64());
    println!(
        "throughput: {:.2}M items/sec",
        all_seen.len() as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}
