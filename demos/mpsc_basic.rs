//! MPSC basic demo: several producers converge on one consumer via the
//! unbounded non-intrusive queue, each producer sending a disjoint range
//! so the consumer can verify per-producer order on the way out.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use vyukov_queues::unbounded_mpsc::UnboundedMpsc;

const PRODUCERS: u64 = 4;
const PER_PRODUCER: u64 = 250_000;

fn main() {
    println!("mpsc_basic: {PRODUCERS} producers x {PER_PRODUCER} items");

    let queue = Arc::new(UnboundedMpsc::<(u64, u64)>::new());
    let start = Instant::now();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = queue.clone();
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.send((p, i));
                }
            })
        })
        .collect();

    let mut last_seen: HashMap<u64, i64> = HashMap::new();
    let mut total = 0u64;
    while total < PRODUCERS * PER_PRODUCER {
        if let Some((p, i)) = queue.try_recv() {
            let last = last_seen.entry(p).or_insert(-1);
            assert_eq!(i as i64, *last + 1, "producer {p} delivered out of order");
            *last = i as i64;
            total += 1;
        } else {
            std::hint::spin_loop();
        }
    }
    for h in producers {
        h.join().unwrap();
    }

    let elapsed = start.elapsed();
    println!("received {total} items in {:.3}s", elapsed.as_secs_f64());
    println!(
        "throughput: {:.2}M items/sec",
        total as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}
