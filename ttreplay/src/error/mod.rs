
use std::time::Duration;

use thiserror::Error;

/// Errors raised while building a replay buffer.
///
/// Once a buffer exists, inserting, replaying and clearing cannot fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
  #[error("Replay buffer capacity must be greater than 0")]
  ZeroCapacity,

  #[error("Expiry {0:?} is too large to be represented")]
  ExpiryOutOfRange(Duration),

  #[error("Invalid replay configuration: {0}")]
  Config(String),
}

pub type Result<T> = std::result::Result<T, ReplayError>;
