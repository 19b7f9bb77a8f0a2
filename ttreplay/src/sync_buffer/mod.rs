//! # Synchronized Replay Buffer
//!
//! [`SyncReplayBuffer`] puts a [`ReplayBuffer`] behind a single
//! reader/writer lock so producers and any number of late consumers can share
//! it across threads.
//!
//! ## Locking
//!
//! - `add`, `add_all` and `clear` take the lock exclusively. A batch passed to
//!   `add_all` is written under one acquisition and is never interleaved with
//!   another writer.
//! - `iter` takes the lock shared and the returned [`SyncIter`] **keeps it**
//!   until it is exhausted or dropped. Readers never block each other, but a
//!   slow consumer holds producers off for as long as it keeps the iterator
//!   alive. Values are cloned out one at a time; nothing is materialized up
//!   front.
//! - `snapshot` takes the lock shared only long enough to copy the live values,
//!   then returns them. The copy is a frozen view: values added afterwards are
//!   not in it.
//!
//! Pick `iter` when the consumer is quick, `snapshot` when it is not.
//!
//! ## Usage
//!
//! ```rust
//! use std::thread;
//! use std::time::Duration;
//! use ttreplay::sync_buffer::SyncReplayBuffer;
//!
//! let buffer = SyncReplayBuffer::<i32>::new_shared(64, Duration::from_secs(256)).unwrap();
//!
//! let producer = {
//!   let buffer = buffer.clone();
//!   thread::spawn(move || {
//!     for id in 0..10 {
//!       buffer.add(id);
//!     }
//!   })
//! };
//! producer.join().unwrap();
//!
//! let replayed: Vec<i32> = buffer.iter().collect();
//! assert_eq!(replayed, (0..10).collect::<Vec<_>>());
//! ```


use std::iter::FusedIterator;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockReadGuard};

use crate::buffer::{ReplayBuffer, Walk};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

/// A thread-safe [`ReplayBuffer`].
#[derive(Debug)]
pub struct SyncReplayBuffer<T, C = SystemClock> {
  inner: RwLock<ReplayBuffer<T, C>>,
}

impl<T> SyncReplayBuffer<T, SystemClock> {
  /// Creates an empty buffer on the wall clock.
  ///
  /// Fails under the same conditions as [`ReplayBuffer::new`].
  pub fn new(capacity: usize, expiry: Duration) -> Result<Self> {
    Self::with_clock(capacity, expiry, SystemClock)
  }

  /// Like [`new`](Self::new), already wrapped in an [`Arc`] for sharing.
  pub fn new_shared(capacity: usize, expiry: Duration) -> Result<Arc<Self>> {
    Self::new(capacity, expiry).map(Arc::new)
  }
}

impl<T, C: Clock> SyncReplayBuffer<T, C> {
  pub fn with_clock(capacity: usize, expiry: Duration, clock: C) -> Result<Self> {
    ReplayBuffer::with_clock(capacity, expiry, clock).map(Self::from)
  }

  pub fn into_shared(self) -> Arc<Self> {
    Arc::new(self)
  }

  pub fn add(&self, value: T) {
    self.inner.write().add(value);
  }

  /// Adds every value under a single exclusive acquisition.
  pub fn add_all<I>(&self, values: I)
  where
    I: IntoIterator<Item = T>,
  {
    self.inner.write().add_all(values);
  }

  pub fn clear(&self) {
    self.inner.write().clear();
  }

  pub fn live_len(&self) -> usize {
    self.inner.read().live_len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.read().is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.inner.read().capacity()
  }

  pub fn expiry(&self) -> Duration {
    self.inner.read().expiry()
  }

  /// Reads the buffer's clock, the same one used to stamp expiry.
  pub fn now(&self) -> DateTime<Utc> {
    self.inner.read().clock().now()
  }

  /// Unwraps the inner buffer.
  pub fn into_inner(self) -> ReplayBuffer<T, C> {
    self.inner.into_inner()
  }
}

impl<T: Clone, C: Clock> SyncReplayBuffer<T, C> {
  /// Returns a lazy replay of the live values, oldest to newest.
  ///
  /// The iterator holds the shared lock until it is dropped; writers wait
  /// for it. Drop it (or let it run out) promptly.
  ///
  /// Read locks are not recursive. While the iterator is alive, calling any
  /// other method of this buffer from the same thread (`live_len`,
  /// `snapshot`, `is_empty`, a second `iter`, ...) can deadlock as soon as a
  /// writer is queued, and `add`/`clear` deadlock unconditionally. Collect or
  /// drop the iterator first, or use [`snapshot`](Self::snapshot).
  pub fn iter(&self) -> SyncIter<'_, T, C> {
    let guard = self.inner.read();
    let walk = guard.walk();
    SyncIter { guard, walk }
  }

  /// Copies the live values out under a short shared lock.
  pub fn snapshot(&self) -> Vec<T> {
    self.inner.read().snapshot()
  }
}

impl<T, C: Clock> From<ReplayBuffer<T, C>> for SyncReplayBuffer<T, C> {
  fn from(buffer: ReplayBuffer<T, C>) -> Self {
    Self {
      inner: RwLock::new(buffer),
    }
  }
}

/// Replay over a [`SyncReplayBuffer`] that owns the shared read guard.
///
/// Created by [`SyncReplayBuffer::iter`]. Dropping it releases the lock.
pub struct SyncIter<'a, T, C> {
  guard: RwLockReadGuard<'a, ReplayBuffer<T, C>>,
  walk: Walk,
}

impl<T: Clone, C: Clock> Iterator for SyncIter<'_, T, C> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    self.walk.next_live(self.guard.slots()).cloned()
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (0, Some(self.walk.remaining(self.guard.capacity())))
  }
}

impl<T: Clone, C: Clock> FusedIterator for SyncIter<'_, T, C> {}
