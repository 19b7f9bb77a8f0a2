#[cfg(test)]
mod __test__ {
  use std::time::Duration;

  use chrono::{DateTime, TimeZone, Utc};

  use crate::buffer::ReplayBuffer;
  use crate::clock::ManualClock;
  use crate::error::ReplayError;

  fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, h, m, s).unwrap()
  }

  fn buffer_at(capacity: usize, expiry_secs: u64) -> (ReplayBuffer<String, ManualClock>, ManualClock) {
    let clock = ManualClock::new(at(0, 0, 0));
    let buffer =
      ReplayBuffer::with_clock(capacity, Duration::from_secs(expiry_secs), clock.clone()).unwrap();
    (buffer, clock)
  }

  fn replayed<C: crate::clock::Clock>(buffer: &ReplayBuffer<String, C>) -> Vec<&str> {
    buffer.iter().map(String::as_str).collect()
  }

  #[test]
  fn test_new_buffer_is_empty() {
    let (buffer, _clock) = buffer_at(5, 5);
    assert_eq!(buffer.capacity(), 5);
    assert_eq!(buffer.expiry(), Duration::from_secs(5));
    assert_eq!(buffer.live_len(), 0);
    assert!(buffer.is_empty());
    assert_eq!(buffer.iter().next(), None);
  }

  #[test]
  fn test_zero_capacity_is_rejected() {
    let err = ReplayBuffer::<String>::new(0, Duration::from_secs(1)).unwrap_err();
    assert_eq!(err, ReplayError::ZeroCapacity);
  }

  #[test]
  fn test_unrepresentable_expiry_is_rejected() {
    let err = ReplayBuffer::<String>::new(4, Duration::MAX).unwrap_err();
    assert_eq!(err, ReplayError::ExpiryOutOfRange(Duration::MAX));
  }

  #[test]
  fn test_replay_scenario() {
    let (mut buffer, clock) = buffer_at(5, 5);

    buffer.add("Event1".to_string());
    buffer.add("Event2".to_string());
    assert_eq!(replayed(&buffer), ["Event1", "Event2"]);

    // 10s later the first two have expired
    clock.set(at(0, 0, 10));
    buffer.add("Event3".to_string());
    buffer.add("Event4".to_string());
    assert_eq!(replayed(&buffer), ["Event3", "Event4"]);

    clock.set(at(0, 0, 11));
    buffer.add("Event5".to_string());
    buffer.add_all(["Event6".to_string(), "Event7".to_string()]);
    assert_eq!(
      replayed(&buffer),
      ["Event3", "Event4", "Event5", "Event6", "Event7"]
    );

    buffer.clear();
    assert!(replayed(&buffer).is_empty());
  }

  #[test]
  fn test_keeps_only_last_capacity_values_in_order() {
    let capacity = 10;
    let (mut buffer, _clock) = buffer_at(capacity, 60);

    buffer.add_all((0..capacity + 3).map(|i| format!("Event number {}", i)));

    let items = buffer.snapshot();
    assert_eq!(items.len(), capacity);
    assert_eq!(items.first().unwrap(), "Event number 3");
    assert_eq!(items.last().unwrap(), "Event number 12");
    for (offset, item) in items.iter().enumerate() {
      assert_eq!(*item, format!("Event number {}", offset + 3));
    }
  }

  #[test]
  fn test_one_past_capacity_drops_only_the_oldest() {
    let (mut buffer, _clock) = buffer_at(3, 60);
    buffer.add_all(["a", "b", "c"].map(String::from));
    assert_eq!(replayed(&buffer), ["a", "b", "c"]);

    buffer.add("d".to_string());
    assert_eq!(replayed(&buffer), ["b", "c", "d"]);
  }

  #[test]
  fn test_capacity_of_one() {
    let (mut buffer, _clock) = buffer_at(1, 60);
    buffer.add("first".to_string());
    buffer.add("second".to_string());
    assert_eq!(replayed(&buffer), ["second"]);
  }

  #[test]
  fn test_expiry_boundary_is_exclusive() {
    let (mut buffer, clock) = buffer_at(4, 5);
    buffer.add("x".to_string());

    clock.set(at(0, 0, 4));
    assert_eq!(replayed(&buffer), ["x"]);

    // Live for [t, t + expiry): gone exactly at t + expiry
    clock.set(at(0, 0, 5));
    assert!(replayed(&buffer).is_empty());
  }

  #[test]
  fn test_partial_expiry_keeps_order() {
    let (mut buffer, clock) = buffer_at(4, 5);
    buffer.add("old".to_string());
    clock.advance(Duration::from_secs(3));
    buffer.add("mid".to_string());
    clock.advance(Duration::from_secs(3));
    buffer.add("new".to_string());

    // "old" was stamped at 0s and expired at 5s; now is 6s
    assert_eq!(replayed(&buffer), ["mid", "new"]);
    assert_eq!(buffer.live_len(), 2);
  }

  #[test]
  fn test_time_snapshot_taken_once_per_replay() {
    let (mut buffer, clock) = buffer_at(4, 5);
    buffer.add_all(["a", "b"].map(String::from));

    let mut iter = buffer.iter();
    assert_eq!(iter.next().map(String::as_str), Some("a"));

    // Moving time mid-replay does not change what this replay yields
    clock.advance(Duration::from_secs(60));
    assert_eq!(iter.next().map(String::as_str), Some("b"));
    assert_eq!(iter.next(), None);

    // A fresh replay sees the new time
    assert!(buffer.iter().next().is_none());
  }

  #[test]
  fn test_replay_is_repeatable_and_stops_early() {
    let (mut buffer, _clock) = buffer_at(8, 60);
    buffer.add_all((0..6).map(|i| i.to_string()));

    let first_two: Vec<_> = buffer.iter().take(2).cloned().collect();
    assert_eq!(first_two, ["0", "1"]);

    assert_eq!(buffer.snapshot(), buffer.snapshot());
    assert_eq!(buffer.live_len(), 6);
  }

  #[test]
  fn test_iterator_is_fused_and_bounded() {
    let (mut buffer, _clock) = buffer_at(4, 60);
    buffer.add("only".to_string());

    let mut iter = buffer.iter();
    assert_eq!(iter.size_hint(), (0, Some(4)));
    assert!(iter.next().is_some());
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
    assert_eq!(iter.size_hint(), (0, Some(0)));
  }

  #[test]
  fn test_clear_is_idempotent_and_rewinds() {
    let (mut buffer, _clock) = buffer_at(3, 60);
    buffer.add_all(["a", "b", "c", "d"].map(String::from));

    buffer.clear();
    assert!(buffer.is_empty());
    buffer.clear();
    assert!(buffer.is_empty());

    buffer.add_all(["e", "f"].map(String::from));
    assert_eq!(replayed(&buffer), ["e", "f"]);
  }

  #[test]
  fn test_into_iterator_for_reference() {
    let (mut buffer, _clock) = buffer_at(3, 60);
    buffer.add_all(["a", "b"].map(String::from));

    let mut seen = Vec::new();
    for value in &buffer {
      seen.push(value.clone());
    }
    assert_eq!(seen, ["a", "b"]);
  }

  #[test]
  fn test_huge_expiry_saturates_instead_of_overflowing() {
    let clock = ManualClock::new(DateTime::<Utc>::MAX_UTC - chrono::Duration::seconds(1));
    let mut buffer =
      ReplayBuffer::with_clock(2, Duration::from_secs(3600), clock.clone()).unwrap();
    buffer.add(1u32);

    // Stamped at MAX_UTC, which is still after the current reading
    assert_eq!(buffer.snapshot(), [1]);
  }

  #[test]
  fn test_values_without_clone_can_be_stored() {
    #[derive(Debug, PartialEq)]
    struct Opaque(u8);

    let (_, clock) = buffer_at(1, 1);
    let mut buffer = ReplayBuffer::with_clock(2, Duration::from_secs(60), clock).unwrap();
    buffer.add(Opaque(7));
    assert_eq!(buffer.iter().collect::<Vec<_>>(), [&Opaque(7)]);
  }
}
