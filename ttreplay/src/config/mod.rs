//! Declarative construction of replay buffers.
//!
//! ```rust
//! use ttreplay::config::ReplayConfig;
//!
//! let config = ReplayConfig::from_json(r#"{ "capacity": 64, "expiry_ms": 128000 }"#).unwrap();
//! let buffer = config.build_sync::<String>().unwrap();
//! assert_eq!(buffer.capacity(), 64);
//! ```


use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::buffer::ReplayBuffer;
use crate::clock::{Clock, SystemClock};
use crate::error::{ReplayError, Result};
use crate::sync_buffer::SyncReplayBuffer;

pub const DEFAULT_CAPACITY: usize = 2048;
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(256);

/// Construction parameters shared by both buffer kinds.
///
/// Missing fields fall back to [`ReplayConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
  /// Number of slots in the ring
  pub capacity: usize,
  /// How long each value stays live, in milliseconds
  pub expiry_ms: u64,
}

impl ReplayConfig {
  pub fn new(capacity: usize, expiry: Duration) -> Self {
    Self {
      capacity,
      expiry_ms: expiry.as_millis().min(u64::MAX as u128) as u64,
    }
  }

  /// Parses a JSON document and validates it.
  pub fn from_json(json: &str) -> Result<Self> {
    let config: Self =
      serde_json::from_str(json).map_err(|e| ReplayError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn to_json(&self) -> Result<String> {
    serde_json::to_string(self).map_err(|e| ReplayError::Config(e.to_string()))
  }

  #[inline]
  pub fn expiry(&self) -> Duration {
    Duration::from_millis(self.expiry_ms)
  }

  /// Rejects configurations no buffer could be built from.
  pub fn validate(&self) -> Result<()> {
    if self.capacity == 0 {
      return Err(ReplayError::ZeroCapacity);
    }
    if chrono::TimeDelta::from_std(self.expiry()).is_err() {
      return Err(ReplayError::ExpiryOutOfRange(self.expiry()));
    }
    Ok(())
  }

  pub fn build<T>(&self) -> Result<ReplayBuffer<T, SystemClock>> {
    self.build_with_clock(SystemClock)
  }

  pub fn build_with_clock<T, C: Clock>(&self, clock: C) -> Result<ReplayBuffer<T, C>> {
    ReplayBuffer::with_clock(self.capacity, self.expiry(), clock)
  }

  pub fn build_sync<T>(&self) -> Result<SyncReplayBuffer<T, SystemClock>> {
    self.build_sync_with_clock(SystemClock)
  }

  pub fn build_sync_with_clock<T, C: Clock>(&self, clock: C) -> Result<SyncReplayBuffer<T, C>> {
    SyncReplayBuffer::with_clock(self.capacity, self.expiry(), clock)
  }
}

impl Default for ReplayConfig {
  fn default() -> Self {
    Self::new(DEFAULT_CAPACITY, DEFAULT_EXPIRY)
  }
}
