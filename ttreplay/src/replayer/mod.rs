//! The capability shared by [`ReplayBuffer`] and [`SyncReplayBuffer`], so
//! generic code can replay events without choosing a locking strategy.
//!
//! ```rust
//! use std::time::Duration;
//! use ttreplay::prelude::*;
//!
//! fn catch_up<R: Replayer<String>>(replayer: &R) -> Vec<String> {
//!   replayer.replay().collect()
//! }
//!
//! let mut plain = ReplayBuffer::new(8, Duration::from_secs(30)).unwrap();
//! let mut shared = SyncReplayBuffer::new(8, Duration::from_secs(30)).unwrap();
//! Replayer::add(&mut plain, "connected".to_string());
//! Replayer::add(&mut shared, "connected".to_string());
//!
//! assert_eq!(catch_up(&plain), catch_up(&shared));
//! ```


use std::iter::Cloned;
use std::sync::Arc;

use crate::buffer::{Iter, ReplayBuffer};
use crate::clock::Clock;
use crate::sync_buffer::{SyncIter, SyncReplayBuffer};

/// Something that can record events and replay the live ones.
pub trait Replayer<T: Clone> {
  /// Lazy replay, oldest to newest.
  type Replay<'a>: Iterator<Item = T>
  where
    Self: 'a;

  /// Adds one event. Once full, the oldest event is overwritten.
  fn add(&mut self, value: T);

  /// Adds events in order.
  fn add_all<I>(&mut self, values: I)
  where
    I: IntoIterator<Item = T>,
  {
    for value in values {
      self.add(value);
    }
  }

  /// Replays every event that has not expired.
  fn replay(&self) -> Self::Replay<'_>;

  /// Forgets every event.
  fn clear(&mut self);

  /// Collects a replay into an owned `Vec`.
  fn snapshot(&self) -> Vec<T> {
    self.replay().collect()
  }
}

impl<T: Clone, C: Clock> Replayer<T> for ReplayBuffer<T, C> {
  type Replay<'a>
    = Cloned<Iter<'a, T>>
  where
    Self: 'a;

  fn add(&mut self, value: T) {
    ReplayBuffer::add(self, value);
  }

  fn add_all<I>(&mut self, values: I)
  where
    I: IntoIterator<Item = T>,
  {
    ReplayBuffer::add_all(self, values);
  }

  fn replay(&self) -> Self::Replay<'_> {
    self.iter().cloned()
  }

  fn clear(&mut self) {
    ReplayBuffer::clear(self);
  }
}

impl<T: Clone, C: Clock> Replayer<T> for SyncReplayBuffer<T, C> {
  type Replay<'a>
    = SyncIter<'a, T, C>
  where
    Self: 'a;

  fn add(&mut self, value: T) {
    SyncReplayBuffer::add(self, value);
  }

  fn add_all<I>(&mut self, values: I)
  where
    I: IntoIterator<Item = T>,
  {
    SyncReplayBuffer::add_all(self, values);
  }

  fn replay(&self) -> Self::Replay<'_> {
    self.iter()
  }

  fn clear(&mut self) {
    SyncReplayBuffer::clear(self);
  }

  fn snapshot(&self) -> Vec<T> {
    SyncReplayBuffer::snapshot(self)
  }
}

/// A shared handle writes through the lock, so every clone of the `Arc` can
/// be handed to generic code as its own `Replayer`.
///
/// With `Replayer` in scope, `add` and `clear` called on an `Arc` resolve
/// here and need a `mut` binding.
impl<T: Clone, C: Clock> Replayer<T> for Arc<SyncReplayBuffer<T, C>> {
  type Replay<'a>
    = SyncIter<'a, T, C>
  where
    Self: 'a;

  fn add(&mut self, value: T) {
    SyncReplayBuffer::<T, C>::add(self, value);
  }

  fn add_all<I>(&mut self, values: I)
  where
    I: IntoIterator<Item = T>,
  {
    SyncReplayBuffer::<T, C>::add_all(self, values);
  }

  fn replay(&self) -> Self::Replay<'_> {
    SyncReplayBuffer::<T, C>::iter(self)
  }

  fn clear(&mut self) {
    SyncReplayBuffer::<T, C>::clear(self);
  }

  fn snapshot(&self) -> Vec<T> {
    SyncReplayBuffer::<T, C>::snapshot(self)
  }
}
