//! # Replay Buffer
//!
//! A fixed-capacity ring that remembers the most recent values for a fixed
//! time-to-live and replays the ones still live, oldest first.
//!
//! ## Storage
//!
//! Every slot carries the instant its value stops being live. Slots that were
//! never written (or were cleared) carry [`DateTime::<Utc>::MIN_UTC`], which no
//! real clock reading is ever before, so they fall out of a replay exactly like
//! expired values do. There is no separate occupancy count to keep in step
//! with the write cursor.
//!
//! The write cursor always points at the slot the next `add` overwrites. Once
//! the ring has wrapped, that slot also holds the oldest value, so a replay
//! starts at the cursor and walks the whole ring once.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use ttreplay::buffer::ReplayBuffer;
//!
//! let mut buffer = ReplayBuffer::new(64, Duration::from_secs(128)).unwrap();
//! buffer.add("Event 1");
//! buffer.add_all(["Event 2", "Event 3"]);
//!
//! let replayed: Vec<_> = buffer.iter().copied().collect();
//! assert_eq!(replayed, ["Event 1", "Event 2", "Event 3"]);
//! ```
//!
//! `ReplayBuffer` has no internal locking. Share it between threads through
//! [`SyncReplayBuffer`](crate::sync_buffer::SyncReplayBuffer).

mod __test__;

use std::iter::FusedIterator;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::clock::{Clock, SystemClock};
use crate::error::{ReplayError, Result};

/// Target of every log line the buffers emit. These are written while the
/// synchronized buffer holds its lock.
pub(crate) const LOG_TARGET: &str = "ttreplay::buffer";

/// One position of the ring.
#[derive(Debug, Clone)]
pub(crate) struct Slot<T> {
  value: Option<T>,
  expires_at: DateTime<Utc>,
}

impl<T> Slot<T> {
  fn vacant() -> Self {
    Self {
      value: None,
      expires_at: DateTime::<Utc>::MIN_UTC,
    }
  }

  /// The stored value if it is still live at `now`.
  #[inline]
  fn live_at(&self, now: DateTime<Utc>) -> Option<&T> {
    if self.expires_at > now {
      self.value.as_ref()
    } else {
      None
    }
  }
}

/// Position of an in-progress replay: where it started, how far it has
/// walked and the instant it judges liveness against.
///
/// Shared by [`Iter`] and the guarded iterator of the synchronized buffer so
/// both walk the ring identically.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Walk {
  start: usize,
  step: usize,
  now: DateTime<Utc>,
}

impl Walk {
  pub(crate) fn new(start: usize, now: DateTime<Utc>) -> Self {
    Self {
      start,
      step: 0,
      now,
    }
  }

  /// Advances to the next live slot and returns its value.
  pub(crate) fn next_live<'s, T>(&mut self, slots: &'s [Slot<T>]) -> Option<&'s T> {
    let len = slots.len();
    while self.step < len {
      let slot = &slots[(self.start + self.step) % len];
      self.step += 1;
      if let Some(value) = slot.live_at(self.now) {
        return Some(value);
      }
    }
    None
  }

  #[inline]
  pub(crate) fn remaining(&self, len: usize) -> usize {
    len.saturating_sub(self.step)
  }
}

/// A fixed-capacity, time-windowed replay buffer.
///
/// # Type Parameters
/// * `T` - The stored value type. No bounds are required to store values;
///   cloning replays additionally need `T: Clone`.
/// * `C` - The [`Clock`] used to stamp and judge expiry.
#[derive(Debug, Clone)]
pub struct ReplayBuffer<T, C = SystemClock> {
  slots: Box<[Slot<T>]>,
  /// Slot overwritten by the next `add`
  cursor: usize,
  expiry: Duration,
  /// `expiry` converted once for calendar arithmetic
  ttl: TimeDelta,
  clock: C,
}

impl<T> ReplayBuffer<T, SystemClock> {
  /// Creates an empty buffer on the wall clock.
  ///
  /// # Errors
  /// * [`ReplayError::ZeroCapacity`] when `capacity` is 0.
  /// * [`ReplayError::ExpiryOutOfRange`] when `expiry` cannot be added to an
  ///   instant.
  pub fn new(capacity: usize, expiry: Duration) -> Result<Self> {
    Self::with_clock(capacity, expiry, SystemClock)
  }
}

impl<T, C: Clock> ReplayBuffer<T, C> {
  /// Creates an empty buffer that reads time from `clock`.
  ///
  /// ```rust
  /// use std::time::Duration;
  /// use ttreplay::buffer::ReplayBuffer;
  /// use ttreplay::clock::ManualClock;
  /// use ttreplay::error::ReplayError;
  ///
  /// let clock = ManualClock::default();
  /// let err = ReplayBuffer::<u8, _>::with_clock(0, Duration::from_secs(1), clock).unwrap_err();
  /// assert_eq!(err, ReplayError::ZeroCapacity);
  /// ```
  pub fn with_clock(capacity: usize, expiry: Duration, clock: C) -> Result<Self> {
    if capacity == 0 {
      return Err(ReplayError::ZeroCapacity);
    }
    let ttl = TimeDelta::from_std(expiry).map_err(|_| ReplayError::ExpiryOutOfRange(expiry))?;

    tracing::debug!(
      target: LOG_TARGET,
      capacity,
      expiry_ms = expiry.as_millis() as u64,
      "replay buffer created"
    );

    Ok(Self {
      slots: (0..capacity).map(|_| Slot::vacant()).collect(),
      cursor: 0,
      expiry,
      ttl,
      clock,
    })
  }

  /// Adds a value, overwriting the oldest slot once the ring is full.
  ///
  /// The value stays live for [`expiry`](Self::expiry) from now.
  pub fn add(&mut self, value: T) {
    let now = self.clock.now();
    self.put(value, now);
  }

  /// Adds every value in order, as repeated [`add`](Self::add) calls would.
  ///
  /// Each value is stamped with the clock reading taken when it is written.
  pub fn add_all<I>(&mut self, values: I)
  where
    I: IntoIterator<Item = T>,
  {
    let mut count = 0usize;
    for value in values {
      self.add(value);
      count += 1;
    }
    tracing::trace!(target: LOG_TARGET, count, cursor = self.cursor, "replay batch added");
  }

  fn put(&mut self, value: T, now: DateTime<Utc>) {
    let expires_at = now
      .checked_add_signed(self.ttl)
      .unwrap_or(DateTime::<Utc>::MAX_UTC);

    self.slots[self.cursor] = Slot {
      value: Some(value),
      expires_at,
    };
    self.cursor = (self.cursor + 1) % self.slots.len();
  }

  /// Returns a lazy iterator over the live values, oldest to newest.
  ///
  /// The clock is read once, here; every slot is judged against that single
  /// instant no matter how slowly the iterator is consumed.
  pub fn iter(&self) -> Iter<'_, T> {
    Iter {
      slots: &self.slots,
      walk: self.walk(),
    }
  }

  pub(crate) fn walk(&self) -> Walk {
    Walk::new(self.cursor, self.clock.now())
  }

  pub(crate) fn slots(&self) -> &[Slot<T>] {
    &self.slots
  }

  /// Forgets every value and rewinds the cursor.
  pub fn clear(&mut self) {
    self.slots.iter_mut().for_each(|slot| *slot = Slot::vacant());
    self.cursor = 0;
    tracing::debug!(target: LOG_TARGET, capacity = self.slots.len(), "replay buffer cleared");
  }

  /// Number of values live right now. Walks the whole ring.
  pub fn live_len(&self) -> usize {
    self.iter().count()
  }

  /// `true` when nothing is live right now.
  pub fn is_empty(&self) -> bool {
    self.iter().next().is_none()
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  #[inline]
  pub fn expiry(&self) -> Duration {
    self.expiry
  }

  #[inline]
  pub fn clock(&self) -> &C {
    &self.clock
  }
}

impl<T: Clone, C: Clock> ReplayBuffer<T, C> {
  /// Copies the live values into an owned `Vec`, oldest to newest.
  pub fn snapshot(&self) -> Vec<T> {
    self.iter().cloned().collect()
  }
}

impl<'a, T, C: Clock> IntoIterator for &'a ReplayBuffer<T, C> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// Borrowing replay over a [`ReplayBuffer`], created by
/// [`ReplayBuffer::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
  slots: &'a [Slot<T>],
  walk: Walk,
}

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  #[inline]
  fn next(&mut self) -> Option<&'a T> {
    self.walk.next_live(self.slots)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (0, Some(self.walk.remaining(self.slots.len())))
  }
}

impl<T> FusedIterator for Iter<'_, T> {}
