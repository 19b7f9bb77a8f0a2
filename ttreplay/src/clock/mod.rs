//! # Clock
//!
//! Time sources for replay buffers. Every buffer asks its clock for the
//! current instant when a value is added (to stamp its expiry) and once at
//! the start of each replay (to decide which values are still live).
//!
//! Production code uses [`SystemClock`]. Tests use [`ManualClock`], a shared
//! handle whose time only moves when told to, so expiry boundaries can be
//! exercised exactly and independently in parallel tests.
//!
//! ```rust
//! use std::time::Duration;
//! use chrono::{TimeZone, Utc};
//! use ttreplay::clock::{Clock, ManualClock};
//!
//! let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap());
//! let handle = clock.clone();
//!
//! handle.advance(Duration::from_secs(10));
//! assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 10).unwrap());
//! ```

mod __test__;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// A source of the current instant.
///
/// Implementations must be cheap to call and should never go backwards by
/// more than the platform clock itself does.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// The wall clock. Zero-sized; the default clock of every buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
  #[inline]
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// A controllable clock.
///
/// Clones share the same instant: advancing one handle is observed by every
/// buffer holding another.
#[derive(Debug, Clone)]
pub struct ManualClock {
  current: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
  pub fn new(start: DateTime<Utc>) -> Self {
    Self {
      current: Arc::new(RwLock::new(start)),
    }
  }

  /// Jumps to `instant`. Moving backwards is allowed.
  pub fn set(&self, instant: DateTime<Utc>) {
    *self.current.write() = instant;
  }

  /// Moves the clock forward, saturating at the latest representable instant.
  pub fn advance(&self, by: Duration) {
    let mut current = self.current.write();
    *current = saturating_add(*current, by);
  }
}

impl Default for ManualClock {
  /// Starts at the Unix epoch.
  fn default() -> Self {
    Self::new(DateTime::<Utc>::default())
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.current.read()
  }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
  #[inline]
  fn now(&self) -> DateTime<Utc> {
    (**self).now()
  }
}

impl<C: Clock + ?Sized> Clock for &C {
  #[inline]
  fn now(&self) -> DateTime<Utc> {
    (**self).now()
  }
}

/// `instant + by`, clamped to [`DateTime::<Utc>::MAX_UTC`].
pub(crate) fn saturating_add(instant: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
  chrono::Duration::from_std(by)
    .ok()
    .and_then(|by| instant.checked_add_signed(by))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
