use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::time::Duration;
use tokenbucket::{Bucket, ManualClock, Refill};

fn uncontended(c: &mut Criterion) {
  for refill in [Refill::Lossy, Refill::Exact] {
    c.bench_with_input(
      BenchmarkId::new("try_acquire", format!("{refill:?}")),
      &refill,
      |b, &refill| {
        let clock = ManualClock::new();
        let bucket = Bucket::builder(Duration::from_millis(1), 1000)
          .refill(refill)
          .clock(clock.clone())
          .build()
          .expect("invalid config");
        b.iter(|| {
          clock.advance(Duration::from_micros(300));
          black_box(bucket.try_acquire())
        });
      },
    );
  }
}

fn contended(c: &mut Criterion) {
  const THREADS: usize = 4;
  const CALLS: usize = 1000;

  c.bench_function("try_acquire (4 threads)", |b| {
    b.iter_with_setup(
      || Arc::new(Bucket::new(Duration::from_micros(10), 100).expect("invalid config")),
      |bucket| {
        std::thread::scope(|s| {
          for _ in 0..THREADS {
            s.spawn(|| {
              for _ in 0..CALLS {
                black_box(bucket.try_acquire());
              }
            });
          }
        });
      },
    );
  });
}

criterion_group!(benches, uncontended, contended);
criterion_main!(benches);
