use std::sync::Arc;
use std::time::Duration;
use tokenbucket::{Bucket, Clock, ManualClock, Refill};

async fn race<C: Clock + 'static>(bucket: Arc<Bucket<C>>, callers: usize) -> (usize, usize) {
  let barrier = Arc::new(tokio::sync::Barrier::new(callers));
  let tasks = (0..callers)
    .map(|_| {
      let bucket = bucket.clone();
      let barrier = barrier.clone();
      tokio::spawn(async move {
        barrier.wait().await;
        bucket.try_acquire()
      })
    })
    .collect::<Vec<_>>();

  let mut admitted = 0;
  let mut denied = 0;
  for task in tasks {
    if task.await.unwrap() {
      admitted += 1;
    } else {
      denied += 1;
    }
  }
  (admitted, denied)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tasks_share_capacity() {
  let clock = ManualClock::new();
  let bucket = Arc::new(
    Bucket::builder(Duration::from_millis(100), 10)
      .clock(clock.clone())
      .build()
      .unwrap(),
  );

  assert_eq!(race(bucket.clone(), 100).await, (10, 90));

  clock.advance(Duration::from_millis(250));
  assert_eq!(race(bucket, 100).await, (2, 98));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tasks_share_quantum_refill() {
  let clock = ManualClock::new();
  let bucket = Arc::new(
    Bucket::builder(Duration::from_millis(100), 10)
      .quantum(3)
      .refill(Refill::Exact)
      .clock(clock.clone())
      .build()
      .unwrap(),
  );

  assert_eq!(race(bucket.clone(), 32).await, (10, 22));

  clock.advance(Duration::from_millis(100));
  assert_eq!(race(bucket.clone(), 32).await, (3, 29));

  clock.advance(Duration::from_secs(10));
  assert_eq!(race(bucket, 32).await, (10, 22));
}

#[test]
fn system_clock_burst() {
  // long enough that nothing refills mid-test
  let bucket = Bucket::new(Duration::from_secs(3600), 5).unwrap();
  let results = (0..6).map(|_| bucket.try_acquire()).collect::<Vec<_>>();
  assert_eq!(results, [true, true, true, true, true, false]);
}
