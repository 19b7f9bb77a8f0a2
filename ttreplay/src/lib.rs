//! # ttreplay
//!
//! Bounded, time-windowed replay buffers. A producer adds events as they
//! happen; any consumer that shows up later replays the most recent events
//! that are still within their time-to-live, oldest first, without the
//! producer tracking who is listening.
//!
//! - [`buffer::ReplayBuffer`]: the ring itself, no locking.
//! - [`sync_buffer::SyncReplayBuffer`]: the ring behind a reader/writer lock.
//! - [`replayer::Replayer`]: the capability both implement.
//! - [`replay_layer::ReplayLayer`]: a `tracing` layer that feeds a shared buffer.

pub mod buffer;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod replay_layer;
pub mod replayer;
pub mod sync_buffer;

pub mod prelude {
  pub use crate::buffer::ReplayBuffer;
  pub use crate::clock::{Clock, ManualClock, SystemClock};
  pub use crate::config::ReplayConfig;
  pub use crate::error::{ReplayError, Result};
  pub use crate::replayer::Replayer;
  pub use crate::sync_buffer::SyncReplayBuffer;
}
