//! A `tracing` layer that keeps recent log events for late subscribers.
//!
//! Every event that reaches [`ReplayLayer`] is converted into an [`Event`] and
//! added to a shared [`SyncReplayBuffer`]. Anything holding the same buffer
//! (a status endpoint, a debug console that attaches later) can replay the
//! last N events of the last few minutes without the application tracking
//! who is listening.
//!
//! ```rust
//! use std::time::Duration;
//! use tracing_subscriber::{layer::SubscriberExt, Registry};
//! use ttreplay::replay_layer::ReplayLayer;
//! use ttreplay::sync_buffer::SyncReplayBuffer;
//!
//! let buffer = SyncReplayBuffer::new_shared(128, Duration::from_secs(60)).unwrap();
//! let subscriber = Registry::default().with(ReplayLayer::new(buffer.clone()));
//!
//! tracing::subscriber::with_default(subscriber, || {
//!   tracing::info!("service started");
//! });
//!
//! let recent: Vec<_> = buffer.iter().map(|event| event.message).collect();
//! assert_eq!(recent, ["service started"]);
//! ```


use std::fmt;
use std::sync::Arc;

use tracing::{field::Field, Event as TracingEvent, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

use crate::buffer::LOG_TARGET;
use crate::clock::{Clock, SystemClock};
use crate::event::Event;
use crate::sync_buffer::SyncReplayBuffer;

#[derive(Debug)]
pub struct ReplayLayer<C = SystemClock> {
  buffer: Arc<SyncReplayBuffer<Event, C>>,
}

impl<C: Clock> ReplayLayer<C> {
  pub fn new(buffer: Arc<SyncReplayBuffer<Event, C>>) -> Self {
    Self { buffer }
  }

  /// The buffer this layer writes into.
  pub fn buffer(&self) -> &Arc<SyncReplayBuffer<Event, C>> {
    &self.buffer
  }
}

impl<C> Clone for ReplayLayer<C> {
  fn clone(&self) -> Self {
    Self {
      buffer: Arc::clone(&self.buffer),
    }
  }
}

impl<S, C> Layer<S> for ReplayLayer<C>
where
  S: Subscriber + for<'a> LookupSpan<'a>,
  C: Clock + 'static,
{
  fn on_event(&self, event: &TracingEvent<'_>, _ctx: Context<'_, S>) {
    let metadata = event.metadata();
    // Buffer log lines are emitted under the buffer lock; recording them
    // would re-enter it.
    if is_buffer_target(metadata.target()) {
      return;
    }

    let mut visitor = EventVisitor::default();
    event.record(&mut visitor);

    let mut recorded = Event::new(
      self.buffer.now().timestamp_millis().max(0) as u64,
      metadata.level().to_string(),
      visitor.message.unwrap_or_default(),
      metadata.target().to_string(),
    );
    recorded.fields = visitor.fields;

    self.buffer.add(recorded);
  }
}

fn is_buffer_target(target: &str) -> bool {
  target == LOG_TARGET
}

/// Splits an event's fields into the message and everything else.
#[derive(Default)]
struct EventVisitor {
  message: Option<String>,
  fields: Vec<(String, String)>,
}

impl EventVisitor {
  fn record(&mut self, field: &Field, value: String) {
    if field.name() == "message" {
      self.message = Some(value);
    } else {
      self.fields.push((field.name().to_string(), value));
    }
  }
}

impl tracing::field::Visit for EventVisitor {
  fn record_str(&mut self, field: &Field, value: &str) {
    self.record(field, value.to_string());
  }

  fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
    self.record(field, format!("{:?}", value));
  }
}
