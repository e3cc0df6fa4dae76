//! ## Token bucket
//!
//! A [`Bucket`] holds up to `capacity` tokens and starts out full.
//! Every [`Bucket::try_acquire`] takes one token if there is one,
//! and every elapsed `period` puts `quantum` tokens back.
//!
//! Refills are computed lazily: there is no timer or background task,
//! the bucket looks at the clock when it is asked for a token and adds
//! whatever accrued since the last refill.
//!
//! The bucket is internally synchronized, so it can be shared between
//! threads (or tasks) behind an [`Arc`][std::sync::Arc]:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokenbucket::Bucket;
//!
//! let bucket = Arc::new(Bucket::new(Duration::from_millis(100), 5).unwrap());
//!
//! let handles = (0..10)
//!   .map(|_| {
//!     let bucket = bucket.clone();
//!     std::thread::spawn(move || bucket.try_acquire())
//!   })
//!   .collect::<Vec<_>>();
//!
//! let admitted = handles
//!   .into_iter()
//!   .map(|h| h.join().unwrap())
//!   .filter(|ok| *ok)
//!   .count();
//! assert!(admitted >= 5);
//! ```
//!
//! One bucket limits one thing. If you need a limit per client or per
//! endpoint, keep a bucket for each of them.

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, ConfigError, Refill};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Builder for a [`Bucket`].
pub struct Builder<C = SystemClock> {
  config: Config,
  clock: C,
}

impl<C: Clock> Builder<C> {
  /// Set how many tokens are added per period.
  pub fn quantum(mut self, quantum: u64) -> Self {
    self.config.quantum = quantum;
    self
  }

  /// Set the [`Refill`] policy.
  pub fn refill(mut self, refill: Refill) -> Self {
    self.config.refill = refill;
    self
  }

  /// Use a different time source.
  pub fn clock<T: Clock>(self, clock: T) -> Builder<T> {
    Builder {
      config: self.config,
      clock,
    }
  }

  pub fn build(self) -> Result<Bucket<C>, ConfigError> {
    Bucket::from_config_with_clock(self.config, self.clock)
  }
}

/// A lazily refilled token bucket.
///
/// See the [module docs][self] for an overview.
pub struct Bucket<C = SystemClock> {
  config: Config,
  clock: C,
  state: Mutex<State>,
}

static_assert_send!(Bucket);
static_assert_sync!(Bucket);

struct State {
  tokens: u64,
  last_refill: Instant,
}

impl Bucket {
  /// A bucket which gains one token per `period`, up to `capacity`.
  pub fn new(period: Duration, capacity: u64) -> Result<Self, ConfigError> {
    Self::from_config(Config::new(period, capacity))
  }

  /// A bucket which gains `quantum` tokens per `period`, up to `capacity`.
  pub fn with_quantum(period: Duration, capacity: u64, quantum: u64) -> Result<Self, ConfigError> {
    Self::from_config(Config {
      quantum,
      ..Config::new(period, capacity)
    })
  }

  pub fn from_config(config: Config) -> Result<Self, ConfigError> {
    Self::from_config_with_clock(config, SystemClock)
  }

  /// The [`Builder`] provides a way to set the quantum, refill policy,
  /// and clock before constructing the bucket.
  pub fn builder(period: Duration, capacity: u64) -> Builder {
    Builder {
      config: Config::new(period, capacity),
      clock: SystemClock,
    }
  }
}

impl<C: Clock> Bucket<C> {
  /// Construct a bucket which reads time from `clock`.
  ///
  /// The bucket starts full.
  pub fn from_config_with_clock(config: Config, clock: C) -> Result<Self, ConfigError> {
    config.validate()?;
    debug!(
      period = ?config.period,
      capacity = config.capacity,
      quantum = config.quantum,
      refill = ?config.refill,
      "creating bucket"
    );
    let last_refill = clock.now();
    Ok(Self {
      config,
      clock,
      state: Mutex::new(State {
        tokens: config.capacity,
        last_refill,
      }),
    })
  }

  /// Attempt to take one token.
  ///
  /// Returns `true` if a token was available. This never waits for a
  /// token to become available, only for other callers to finish
  /// their own check.
  pub fn try_acquire(&self) -> bool {
    let mut state = self.lock();
    state.refill(&self.config, self.clock.now());
    if state.tokens > 0 {
      state.tokens -= 1;
      true
    } else {
      trace!("bucket is empty");
      false
    }
  }

  /// The number of tokens which could be acquired right now.
  ///
  /// This applies any pending refill, but doesn't take a token.
  /// By the time you act on it, another caller may have taken some.
  pub fn available(&self) -> u64 {
    let mut state = self.lock();
    state.refill(&self.config, self.clock.now());
    state.tokens
  }

  pub fn capacity(&self) -> u64 {
    self.config.capacity
  }

  pub fn quantum(&self) -> u64 {
    self.config.quantum
  }

  pub fn period(&self) -> Duration {
    self.config.period
  }

  pub fn refill(&self) -> Refill {
    self.config.refill
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  fn lock(&self) -> MutexGuard<'_, State> {
    // `State` is never left half-updated, a poisoned lock is still usable
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl State {
  fn refill(&mut self, config: &Config, now: Instant) {
    let elapsed = now.saturating_duration_since(self.last_refill).as_nanos();
    let period = config.period.as_nanos();
    let periods = u64::try_from(elapsed / period).unwrap_or(u64::MAX);
    let added = periods.saturating_mul(config.quantum);
    if added == 0 {
      return;
    }

    self.tokens = self.tokens.saturating_add(added).min(config.capacity);
    self.last_refill = match config.refill {
      Refill::Lossy => now,
      // a full bucket can't bank time
      Refill::Exact if self.tokens == config.capacity => now,
      Refill::Exact => now - nanos(elapsed % period),
    };
    trace!(periods, added, tokens = self.tokens, "refilled bucket");
  }
}

fn nanos(n: u128) -> Duration {
  const NANOS_PER_SEC: u128 = 1_000_000_000;
  Duration::new((n / NANOS_PER_SEC) as u64, (n % NANOS_PER_SEC) as u32)
}

impl<C> std::fmt::Debug for Bucket<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Bucket")
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}
