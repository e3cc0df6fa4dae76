//! Bucket configuration.

use std::fmt::Display;
use std::time::Duration;

/// What happens to the part of the elapsed time which doesn't add up
/// to a whole period when a bucket refills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Refill {
  /// The refill timestamp is reset to "now", and the remainder is dropped.
  ///
  /// Callers which poll at intervals that are not a multiple of the period
  /// will observe slightly fewer tokens than the configured rate, at most
  /// one period's worth per refill.
  #[default]
  Lossy,

  /// The refill timestamp only advances by the whole periods which were
  /// turned into tokens, so the remainder counts towards the next one.
  Exact,
}

/// Bucket configuration.
///
/// ```rust
/// use std::time::Duration;
/// use tokenbucket::{Bucket, Config};
///
/// let config = Config {
///   quantum: 3,
///   ..Config::new(Duration::from_millis(100), 10)
/// };
/// let bucket = Bucket::from_config(config).unwrap();
/// assert_eq!(bucket.available(), 10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
  /// How long it takes for one `quantum` of tokens to be added.
  pub period: Duration,

  /// The maximum number of tokens the bucket holds.
  ///
  /// This is also the largest burst it will ever admit.
  pub capacity: u64,

  /// How many tokens are added per `period`.
  #[cfg_attr(feature = "serde", serde(default = "default_quantum"))]
  pub quantum: u64,

  #[cfg_attr(feature = "serde", serde(default))]
  pub refill: Refill,
}

pub const DEFAULT_QUANTUM: u64 = 1;

#[cfg(feature = "serde")]
fn default_quantum() -> u64 {
  DEFAULT_QUANTUM
}

impl Config {
  /// One token per `period`, up to `capacity`.
  pub fn new(period: Duration, capacity: u64) -> Self {
    Self {
      period,
      capacity,
      quantum: DEFAULT_QUANTUM,
      refill: Refill::default(),
    }
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.period.is_zero() {
      return Err(ConfigError::ZeroPeriod);
    }
    if self.quantum == 0 {
      return Err(ConfigError::ZeroQuantum);
    }
    Ok(())
  }
}

/// The bucket could not be constructed from the given configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
  /// The replenish period was zero.
  ZeroPeriod,

  /// The quantum was zero, so the bucket would never refill.
  ZeroQuantum,
}

impl Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ConfigError::ZeroPeriod => write!(f, "invalid bucket config: period must be non-zero"),
      ConfigError::ZeroQuantum => write!(f, "invalid bucket config: quantum must be at least 1"),
    }
  }
}

impl std::error::Error for ConfigError {}
