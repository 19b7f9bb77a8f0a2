//! Shared fixtures for the replay benchmarks.

use std::time::Duration;

use ttreplay::event::Event;

/// Long enough that nothing expires during a measurement.
pub const EXPIRY: Duration = Duration::from_secs(300);

pub fn sample_event(i: u64) -> Event {
  Event::new(
    1_727_740_800_000 + i,
    "INFO".to_string(),
    format!("Replay bench event {}", i),
    "bench".to_string(),
  )
}
