//! Cross-algorithm pattern benchmarks: batched rings, unbounded queues,
//! the blocking reference, and the channel reference, all driven through
//! the same producer/consumer shape so their throughput is comparable.
//!
//! Run: cargo bench --bench bench_patterns

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use vyukov_queues::batched::{BatchedMpsc, BatchedSpsc};
use vyukov_queues::blocking_ring::BlockingMpmc;
use vyukov_queues::channel_mpmc::ChannelMpmc;
use vyukov_queues::constants::TestMatrix;
use vyukov_queues::unbounded_mpsc::UnboundedMpsc;
use vyukov_queues::unbounded_spsc::UnboundedSpsc;

const TOTAL_EVENTS: u64 = 1_000_000;

fn bench_batched_spsc(batch_size: usize, size: usize, events: u64) -> u64 {
    let ring = Arc::new(BatchedSpsc::<u64>::new(batch_size, size));
    let ring_cons = ring.clone();

    let consumer = thread::spawn(move || {
        let mut count = 0u64;
        while count < events {
            if ring_cons.try_recv().is_some() {
                count += 1;
            }
        }
        ring_cons.flush_recv();
    });

    for i in 0..events {
        ring.send(i);
    }
    ring.flush_send();
    consumer.join().unwrap();
    events
}

fn bench_unbounded_spsc(events: u64) -> u64 {
    let ring = Arc::new(UnboundedSpsc::<u64>::new());
    let ring_cons = ring.clone();

    let consumer = thread::spawn(move || {
        let mut count = 0u64;
        while count < events {
            if ring_cons.try_recv().is_some() {
                count += 1;
            }
        }
    });

    for i in 0..events {
        ring.send(i);
    }
    consumer.join().unwrap();
    events
}

fn bench_unbounded_mpsc(events: u64, producers: u64) -> u64 {
    let ring = Arc::new(UnboundedMpsc::<u64>::new());
    let per_producer = events / producers;

    let handles: Vec<_> = (0..producers)
        .map(|_| {
            let ring = ring.clone();
            thread::spawn(move || {
                for i in 0..per_producer {
                    ring.send(i);
                }
            })
        })
        .collect();

    let mut received = 0u64;
    while received < per_producer * producers {
        received += ring.try_recv().is_some() as u64;
    }
    for h in handles {
        h.join().unwrap();
    }
    received
}

fn bench_blocking_mpmc(events: u64, producers: u64) -> u64 {
    let ring = Arc::new(BlockingMpmc::<u64>::new(1024));
    let per_producer = events / producers;

    let handles: Vec<_> = (0..producers)
        .map(|_| {
            let ring = ring.clone();
            thread::spawn(move || {
                for i in 0..per_producer {
                    ring.send(i);
                }
            })
        })
        .collect();

    let mut received = 0u64;
    while received < per_producer * producers {
        ring.recv();
        received += 1;
    }
    for h in handles {
        h.join().unwrap();
    }
    received
}

fn bench_channel_mpmc(events: u64, producers: u64) -> u64 {
    let ring = ChannelMpmc::<u64>::new(1024);
    let per_producer = events / producers;

    let handles: Vec<_> = (0..producers)
        .map(|_| {
            let ring = ring.clone();
            thread::spawn(move || {
                for i in 0..per_producer {
                    ring.send(i);
                }
            })
        })
        .collect();

    let mut received = 0u64;
    while received < per_producer * producers {
        if ring.recv().is_some() {
            received += 1;
        }
    }
    for h in handles {
        h.join().unwrap();
    }
    received
}

fn benchmark_batched(c: &mut Criterion) {
    let mut group = c.benchmark_group("batched_spsc");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(15);

    for &batch in TestMatrix::BENCH_BATCH_SIZES {
        group.bench_function(BenchmarkId::new("batch", batch), |b| {
            b.iter(|| bench_batched_spsc(batch, TestMatrix::BENCH_SIZES[0], TOTAL_EVENTS))
        });
    }

    group.finish();
}

fn benchmark_unbounded(c: &mut Criterion) {
    let mut group = c.benchmark_group("unbounded");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(15);

    group.bench_function("spsc", |b| b.iter(|| bench_unbounded_spsc(TOTAL_EVENTS)));
    group.bench_function(BenchmarkId::new("mpsc", "4p"), |b| {
        b.iter(|| bench_unbounded_mpsc(TOTAL_EVENTS, 4))
    });

    group.finish();
}

fn benchmark_reference_queues(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_mpmc");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(10);

    group.bench_function("blocking_mpmc_4p", |b| {
        b.iter(|| bench_blocking_mpmc(TOTAL_EVENTS, 4))
    });
    group.bench_function("channel_mpmc_4p", |b| {
        b.iter(|| bench_channel_mpmc(TOTAL_EVENTS, 4))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_batched,
    benchmark_unbounded,
    benchmark_reference_queues
);
criterion_main!(benches);
