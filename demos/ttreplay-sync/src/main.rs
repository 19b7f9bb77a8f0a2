use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver};
use serde::Serialize;
use tracing::info;
use ttreplay::{config::ReplayConfig, sync_buffer::SyncReplayBuffer};

#[derive(Debug, Clone, Serialize)]
struct Tick {
  id: u64,
}

type Shared = Arc<SyncReplayBuffer<Tick>>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .init();

  // TTREPLAY_CONFIG='{"capacity":16,"expiry_ms":4000}' shrinks the window
  let config = match std::env::var("TTREPLAY_CONFIG") {
    Ok(json) => ReplayConfig::from_json(&json)?,
    Err(_) => ReplayConfig::new(64, Duration::from_secs(256)),
  };
  let buffer: Shared = config.build_sync()?.into_shared();

  let (stop_tx, stop_rx) = bounded::<()>(0);
  let producer = spawn_producer(Arc::clone(&buffer), stop_rx);

  info!("waiting 5s for the replay buffer to fill");
  thread::sleep(Duration::from_secs(5));
  let first = spawn_worker(1, Arc::clone(&buffer));

  info!("waiting 3s for more events");
  thread::sleep(Duration::from_secs(3));
  let second = spawn_worker(2, Arc::clone(&buffer));

  let first_seen = first.join().map_err(|_| "worker 1 panicked")?;
  let second_seen = second.join().map_err(|_| "worker 2 panicked")?;

  drop(stop_tx);
  producer.join().map_err(|_| "producer panicked")?;

  info!(
    first_seen,
    second_seen, "done; the second worker replayed more events than the first"
  );
  Ok(())
}

/// Adds a new tick every 256ms until `stop` disconnects.
fn spawn_producer(buffer: Shared, stop: Receiver<()>) -> thread::JoinHandle<()> {
  thread::spawn(move || {
    let ticker = tick(Duration::from_millis(256));
    let mut id = 0u64;
    loop {
      select! {
        recv(ticker) -> _ => {
          buffer.add(Tick { id });
          id += 1;
        },
        recv(stop) -> _ => break,
      }
    }
    info!(produced = id, "producer stopped");
  })
}

/// Replays everything currently live, then returns how many events it saw.
///
/// Worker 1 walks the buffer under the read lock; the others copy a
/// snapshot first so printing never holds the producer off.
fn spawn_worker(worker_id: u32, buffer: Shared) -> thread::JoinHandle<usize> {
  thread::spawn(move || {
    let events: Vec<Tick> = if worker_id == 1 {
      buffer.iter().collect()
    } else {
      buffer.snapshot()
    };

    for event in &events {
      match serde_json::to_string(event) {
        Ok(json) => println!("worker {}: {}", worker_id, json),
        Err(e) => eprintln!("worker {}: unable to encode event: {}", worker_id, e),
      }
    }
    events.len()
  })
}
