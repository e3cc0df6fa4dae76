//! Hammers a bucket from a few tasks and reports how many attempts got through.
//!
//! ```text,ignore
//! $ cargo run --example burst -- \
//!   --period-ms 100 \
//!   --capacity 5 \
//!   --workers 4 \
//!   --attempt-every-ms 20
//! ```

use anyhow::Result;
use clap::Parser;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokenbucket::{Bucket, Refill};

#[derive(Parser)]
#[command(author, version)]
struct Args {
  /// Milliseconds per refill
  #[arg(long, default_value_t = 100)]
  period_ms: u64,

  /// Maximum burst
  #[arg(long, default_value_t = 5)]
  capacity: u64,

  /// Tokens added per refill
  #[arg(long, default_value_t = 1)]
  quantum: u64,

  /// Carry partial periods over to the next refill
  #[arg(long)]
  exact: bool,

  /// Number of concurrent tasks
  #[arg(long, default_value_t = 4)]
  workers: usize,

  /// How often each task tries to acquire a token
  #[arg(long, default_value_t = 20)]
  attempt_every_ms: u64,

  /// How long to run for
  #[arg(long, default_value_t = 2)]
  seconds: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();
  let bucket = Arc::new(
    Bucket::builder(Duration::from_millis(args.period_ms), args.capacity)
      .quantum(args.quantum)
      .refill(if args.exact {
        Refill::Exact
      } else {
        Refill::Lossy
      })
      .build()?,
  );

  let admitted = Arc::new(AtomicU64::new(0));
  let denied = Arc::new(AtomicU64::new(0));

  let mut tasks = Vec::with_capacity(args.workers);
  for _ in 0..args.workers {
    let bucket = bucket.clone();
    let admitted = admitted.clone();
    let denied = denied.clone();
    let every = Duration::from_millis(args.attempt_every_ms.max(1));
    tasks.push(tokio::spawn(async move {
      let mut interval = tokio::time::interval(every);
      loop {
        interval.tick().await;
        if bucket.try_acquire() {
          admitted.fetch_add(1, Ordering::Relaxed);
        } else {
          denied.fetch_add(1, Ordering::Relaxed);
        }
      }
    }));
  }

  tokio::time::sleep(Duration::from_secs(args.seconds)).await;
  for task in tasks {
    task.abort();
  }

  let admitted = admitted.load(Ordering::Relaxed);
  let denied = denied.load(Ordering::Relaxed);
  let expected = args.capacity + args.seconds * 1000 / args.period_ms.max(1) * args.quantum;
  println!("{bucket:?}");
  println!("admitted: {admitted} (at most ~{expected})");
  println!("denied:   {denied}");

  Ok(())
}
