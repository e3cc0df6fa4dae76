//! Time sources for [`Bucket`][crate::Bucket].
//!
//! Buckets only ever ask for the current [`Instant`], so anything
//! that can produce one can drive refills. [`SystemClock`] is the
//! default, [`ManualClock`] lets you step time forward by hand.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A monotonic source of "now".
pub trait Clock: Send + Sync {
  fn now(&self) -> Instant;
}

/// Reads [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  #[inline]
  fn now(&self) -> Instant {
    Instant::now()
  }
}

/// A clock which only moves when told to.
///
/// Clones share the same underlying time, so you can hand one clone
/// to a bucket and keep another around to advance it:
///
/// ```rust
/// use std::time::Duration;
/// use tokenbucket::{Bucket, ManualClock};
///
/// let clock = ManualClock::new();
/// let bucket = Bucket::builder(Duration::from_millis(100), 1)
///   .clock(clock.clone())
///   .build()
///   .unwrap();
///
/// assert!(bucket.try_acquire());
/// assert!(!bucket.try_acquire());
///
/// clock.advance(Duration::from_millis(100));
/// assert!(bucket.try_acquire());
/// ```
#[derive(Clone, Debug)]
pub struct ManualClock {
  now: Arc<Mutex<Instant>>,
}

impl ManualClock {
  /// Start at the current system time.
  pub fn new() -> Self {
    Self::starting_at(Instant::now())
  }

  pub fn starting_at(now: Instant) -> Self {
    Self {
      now: Arc::new(Mutex::new(now)),
    }
  }

  /// Move time forward by `by`.
  pub fn advance(&self, by: Duration) {
    let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
    *now += by;
  }

  /// Jump to `to`.
  ///
  /// This may move the clock backwards. Buckets treat a clock reading
  /// earlier than their last refill as "no time has passed".
  pub fn set(&self, to: Instant) {
    *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
  }
}

impl Default for ManualClock {
  fn default() -> Self {
    Self::new()
  }
}

impl Clock for ManualClock {
  fn now(&self) -> Instant {
    *self.now.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
  #[inline]
  fn now(&self) -> Instant {
    (**self).now()
  }
}

impl<C: Clock + ?Sized> Clock for &C {
  #[inline]
  fn now(&self) -> Instant {
    (**self).now()
  }
}

static_assert_send!(ManualClock);
static_assert_sync!(ManualClock);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn manual_clock_clones_share_time() {
    let a = ManualClock::new();
    let b = a.clone();
    let start = a.now();

    b.advance(Duration::from_millis(250));
    assert_eq!(a.now() - start, Duration::from_millis(250));

    a.set(start);
    assert_eq!(b.now(), start);
  }

  #[test]
  fn system_clock_is_monotonic() {
    let clock = SystemClock;
    let first = clock.now();
    let second = clock.now();
    assert!(second >= first);
  }

  #[test]
  fn shared_clock_forwards() {
    let clock = Arc::new(ManualClock::new());
    let start = clock.now();
    clock.advance(Duration::from_secs(1));
    assert_eq!(Clock::now(&clock) - start, Duration::from_secs(1));
    assert_eq!(Clock::now(&&*clock) - start, Duration::from_secs(1));
  }
}
