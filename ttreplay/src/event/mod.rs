
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A log record as kept by the replay layer.
///
/// `Event` carries the data a late subscriber needs to render a recent log
/// line: when it happened, how severe it was, what it said and where it came
/// from. It serializes to flat JSON for shipping to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  /// Milliseconds since the Unix epoch.
  pub timestamp: u64,

  /// Severity as reported by `tracing` (`"INFO"`, `"WARN"`, ...).
  pub level: String,

  /// The formatted message, or an empty string when the event had none.
  pub message: String,

  /// Module path or explicit target of the event.
  pub target: String,

  /// Structured fields other than the message, in recording order.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub fields: Vec<(String, String)>,
}

impl Event {
  /// Creates an event without structured fields.
  ///
  /// # Example
  ///
  /// ```rust
  /// use ttreplay::event::Event;
  /// let event = Event::new(
  ///     1_692_105_600_000u64,
  ///     "INFO".to_string(),
  ///     "User logged in".to_string(),
  ///     "auth_module".to_string(),
  /// );
  /// assert_eq!(event.level, "INFO");
  /// ```
  pub fn new(timestamp: u64, level: String, message: String, target: String) -> Self {
    Self {
      timestamp,
      level,
      message,
      target,
      fields: Vec::new(),
    }
  }

  /// Appends a structured field.
  pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.fields.push((name.into(), value.into()));
    self
  }

  /// The timestamp as a calendar instant, if it is in range.
  pub fn time(&self) -> Option<DateTime<Utc>> {
    i64::try_from(self.timestamp)
      .ok()
      .and_then(DateTime::<Utc>::from_timestamp_millis)
  }

  /// Serializes the event into a JSON string.
  ///
  /// ```rust
  /// use ttreplay::event::Event;
  /// let event = Event::new(123, "INFO".to_string(), "Hello".to_string(), "main".to_string());
  /// let json = event.to_json().unwrap();
  /// assert!(json.contains("\"timestamp\":123"));
  /// ```
  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string(self)
  }

  /// Parses an event from JSON produced by [`to_json`](Self::to_json).
  pub fn from_json(json: &str) -> serde_json::Result<Self> {
    serde_json::from_str(json)
  }
}

impl Default for Event {
  fn default() -> Self {
    Self::new(0, String::new(), String::new(), String::new())
  }
}

impl std::fmt::Display for Event {
  /// Formats as a single log line: `<timestamp> <LEVEL> <target>: <message> k=v ...`.
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.time() {
      Some(time) => write!(f, "{}", time.format("%Y-%m-%dT%H:%M:%S%.3fZ"))?,
      None => write!(f, "{}", self.timestamp)?,
    }
    write!(f, " {} {}: {}", self.level, self.target, self.message)?;
    for (name, value) in &self.fields {
      write!(f, " {}={}", name, value)?;
    }
    Ok(())
  }
}
