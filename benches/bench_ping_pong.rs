//! Round-trip latency benchmark: two SPSC rings wired back-to-back so a
//! "ping" thread and a "pong" thread hand a token back and forth,
//! isolating per-message latency from the throughput-oriented benches.
//!
//! Run: cargo bench --bench bench_ping_pong

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::thread;
use vyukov_queues::bounded::Spsc;

const ROUNDS: u64 = 100_000;

fn ping_pong(ring_size: usize, rounds: u64) {
    let to_pong: Arc<Spsc<u64>> = Arc::new(Spsc::new(ring_size));
    let to_ping: Arc<Spsc<u64>> = Arc::new(Spsc::new(ring_size));

    let pong_to_ping = to_ping.clone();
    let pong_from_ping = to_pong.clone();
    let pong = thread::spawn(move || {
        for _ in 0..rounds {
            let token = pong_from_ping.recv();
            pong_to_ping.send(token + 1);
        }
    });

    let mut token = 0u64;
    to_pong.send(token);
    for _ in 0..rounds {
        token = to_ping.recv();
        if token < rounds {
            to_pong.send(token);
        }
    }
    pong.join().unwrap();
}

fn benchmark_ping_pong(c: &mut Criterion) {
    let mut group = c.benchmark_group("ping_pong_latency");
    group.sample_size(20);

    for &size in &[16usize, 256] {
        group.bench_function(BenchmarkId::new("ring_size", size), |b| {
            b.iter(|| ping_pong(size, ROUNDS))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_ping_pong);
criterion_main!(benches);
