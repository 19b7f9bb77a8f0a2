#[cfg(test)]
mod __test__ {
  use std::sync::Arc;
  use std::time::Duration;

  use chrono::{DateTime, TimeZone, Utc};

  use crate::clock::{saturating_add, Clock, ManualClock, SystemClock};

  fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, h, m, s).unwrap()
  }

  #[test]
  fn test_manual_clock_starts_where_told() {
    let clock = ManualClock::new(at(0, 0, 0));
    assert_eq!(clock.now(), at(0, 0, 0));
  }

  #[test]
  fn test_manual_clock_default_is_epoch() {
    let clock = ManualClock::default();
    assert_eq!(clock.now().timestamp(), 0);
  }

  #[test]
  fn test_manual_clock_set_and_advance() {
    let clock = ManualClock::new(at(0, 0, 0));

    clock.advance(Duration::from_secs(10));
    assert_eq!(clock.now(), at(0, 0, 10));

    clock.set(at(1, 0, 0));
    assert_eq!(clock.now(), at(1, 0, 0));

    // Going backwards is allowed
    clock.set(at(0, 30, 0));
    assert_eq!(clock.now(), at(0, 30, 0));
  }

  #[test]
  fn test_manual_clock_clones_share_time() {
    let clock = ManualClock::new(at(0, 0, 0));
    let handle = clock.clone();

    handle.advance(Duration::from_secs(11));
    assert_eq!(clock.now(), at(0, 0, 11));
  }

  #[test]
  fn test_manual_clock_advance_saturates() {
    let clock = ManualClock::new(DateTime::<Utc>::MAX_UTC);
    clock.advance(Duration::from_secs(1));
    assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC);
  }

  #[test]
  fn test_forwarding_impls() {
    let clock = Arc::new(ManualClock::new(at(2, 0, 0)));
    assert_eq!(Clock::now(&clock), at(2, 0, 0));

    let borrowed: &ManualClock = &clock;
    assert_eq!(Clock::now(&borrowed), at(2, 0, 0));
  }

  #[test]
  fn test_system_clock_is_recent() {
    let before = Utc::now();
    let now = SystemClock.now();
    let after = Utc::now();
    assert!(before <= now && now <= after);
  }

  #[test]
  fn test_saturating_add() {
    assert_eq!(saturating_add(at(0, 0, 0), Duration::from_secs(5)), at(0, 0, 5));
    assert_eq!(
      saturating_add(at(0, 0, 0), Duration::MAX),
      DateTime::<Utc>::MAX_UTC
    );
    assert_eq!(
      saturating_add(DateTime::<Utc>::MAX_UTC, Duration::from_secs(1)),
      DateTime::<Utc>::MAX_UTC
    );
  }
}
