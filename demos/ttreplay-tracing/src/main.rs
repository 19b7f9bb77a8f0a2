use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};
use ttreplay::{replay_layer::ReplayLayer, sync_buffer::SyncReplayBuffer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  println!("TTReplay Tracing Example");

  // Keep the last 8 log lines for 2 seconds
  let buffer = SyncReplayBuffer::new_shared(8, Duration::from_secs(2))?;

  tracing_subscriber::registry()
    .with(ReplayLayer::new(buffer.clone()).with_filter(LevelFilter::INFO))
    .with(tracing_subscriber::fmt::layer().with_filter(LevelFilter::WARN))
    .try_init()?;

  info!("Application started successfully");
  debug!("Not kept: below the replay filter");
  warn!(attempt = 1, "Upstream slow to respond");

  thread::sleep(Duration::from_millis(2500));

  for i in 0..10 {
    info!(request_id = i, "Handled request");
  }
  error!(user_id = 42, username = "alice", "Login failed");

  // A console attaching now only sees what is still in the window
  println!("\n--- late console replay ---");
  for event in buffer.iter() {
    println!("{}", event);
  }

  Ok(())
}
