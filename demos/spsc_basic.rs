//! SPSC basic demo: one producer, one consumer, a bounded Vyukov ring.

use std::thread;
use std::time::Instant;
use vyukov_queues::bounded::Spsc;

const RING_SIZE: usize = 1024;
const COUNT: u64 = 5_000_000;

fn main() {
    println!("spsc_basic: {COUNT} items through a ring of size {RING_SIZE}");

    let ring: Spsc<u64> = Spsc::new(RING_SIZE);
    let ring = std::sync::Arc::new(ring);

    let start = Instant::now();

    let producer = {
        let ring = ring.clone();
        thread::spawn(move || {
            for i in 0..COUNT {
                ring.send(i);
            }
        })
    };

    let mut sum = 0u128;
    let mut received = 0u64;
    while received < COUNT {
        sum += ring.recv() as u128;
        received += 1;
    }
    producer.join().unwrap();

    let elapsed = start.elapsed();
    let expected_sum: u128 = (0..COUNT).map(|i| i as u128).sum();
    assert_eq!(sum, expected_sum, "sum mismatch");

    println!("received {received} items, sum={sum} in {:.3}s", elapsed.as_secs_f64());
    println!(
        "throughput: {:.2}M items/sec",
        received as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}
