use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ttreplay::{buffer::ReplayBuffer, sync_buffer::SyncReplayBuffer};
use ttreplay_benches::{sample_event, EXPIRY};

// Configure Criterion for reliable benchmarks
fn configure_criterion() -> Criterion {
  Criterion::default()
    .sample_size(30)
    .measurement_time(Duration::from_secs(5))
    .warm_up_time(Duration::from_secs(2))
}

fn bench_add(c: &mut Criterion) {
  let mut group = c.benchmark_group("add");
  group.throughput(Throughput::Elements(10_000));

  for capacity in [64usize, 1024, 16384].iter() {
    group.bench_with_input(
      BenchmarkId::new("plain", capacity),
      capacity,
      |b, &capacity| {
        let mut buffer = ReplayBuffer::new(capacity, EXPIRY).unwrap();
        b.iter(|| {
          for i in 0..10_000u64 {
            buffer.add(black_box(i));
          }
        });
      },
    );

    group.bench_with_input(
      BenchmarkId::new("sync", capacity),
      capacity,
      |b, &capacity| {
        let buffer = SyncReplayBuffer::new(capacity, EXPIRY).unwrap();
        b.iter(|| {
          for i in 0..10_000u64 {
            buffer.add(black_box(i));
          }
        });
      },
    );

    group.bench_with_input(
      BenchmarkId::new("sync_batch", capacity),
      capacity,
      |b, &capacity| {
        let buffer = SyncReplayBuffer::new(capacity, EXPIRY).unwrap();
        b.iter(|| buffer.add_all((0..10_000u64).map(black_box)));
      },
    );
  }

  group.finish();
}

fn bench_replay(c: &mut Criterion) {
  let mut group = c.benchmark_group("replay");

  // Full ring vs. mostly vacant ring: both scan every slot
  for (capacity, filled) in [(1024usize, 1024u64), (1024, 16), (16384, 16384)].iter() {
    let id = format!("{}_of_{}", filled, capacity);

    let mut plain = ReplayBuffer::new(*capacity, EXPIRY).unwrap();
    plain.add_all((0..*filled).map(sample_event));
    group.bench_function(BenchmarkId::new("plain_iter", &id), |b| {
      b.iter(|| black_box(plain.iter().count()))
    });

    let shared = SyncReplayBuffer::new(*capacity, EXPIRY).unwrap();
    shared.add_all((0..*filled).map(sample_event));
    group.bench_function(BenchmarkId::new("sync_iter", &id), |b| {
      b.iter(|| black_box(shared.iter().count()))
    });
    group.bench_function(BenchmarkId::new("sync_snapshot", &id), |b| {
      b.iter(|| black_box(shared.snapshot().len()))
    });
  }

  group.finish();
}

fn bench_contended(c: &mut Criterion) {
  let mut group = c.benchmark_group("contended");

  for readers in [1usize, 4, 8].iter() {
    group.bench_with_input(
      BenchmarkId::new("readers", readers),
      readers,
      |b, &readers| {
        b.iter(|| {
          let buffer = SyncReplayBuffer::new_shared(1024, EXPIRY).unwrap();

          let writer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
              for i in 0..5_000u64 {
                buffer.add(sample_event(i));
              }
            })
          };

          let handles: Vec<_> = (0..readers)
            .map(|_| {
              let buffer = Arc::clone(&buffer);
              thread::spawn(move || {
                let mut seen = 0usize;
                for _ in 0..50 {
                  seen += buffer.iter().count();
                }
                seen
              })
            })
            .collect();

          writer.join().unwrap();
          handles.into_iter().map(|h| h.join().unwrap()).sum::<usize>()
        });
      },
    );
  }

  group.finish();
}

criterion_group! {
  name = benches;
  config = configure_criterion();
  targets =
    bench_add,
    bench_replay,
    bench_contended,
}

criterion_main!(benches);
