//! Observation types: what a rank check produces and what history holds.
//!
//! A [`RankObservation`] is written once and never updated. Reading the log
//! back yields [`HistoryEntry`] rows, which only ever carry numeric ranks.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp layout used when writing observations.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── Region ──────────────────────────────────────────────────────────────────

/// A human-readable search region. Each maps to a provider-side search scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Region {
  #[default]
  Global,
  Singapore,
  Thailand,
  Malaysia,
  Indonesia,
  /// Any other region name found in history or given by the user.
  Custom(String),
}

impl Region {
  /// The regions offered for new checks.
  pub const KNOWN: [Region; 5] = [
    Region::Global,
    Region::Singapore,
    Region::Thailand,
    Region::Malaysia,
    Region::Indonesia,
  ];

  pub fn as_str(&self) -> &str {
    match self {
      Self::Global => "Global",
      Self::Singapore => "Singapore",
      Self::Thailand => "Thailand",
      Self::Malaysia => "Malaysia",
      Self::Indonesia => "Indonesia",
      Self::Custom(name) => name,
    }
  }
}

impl fmt::Display for Region {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Region {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    let known = Self::KNOWN
      .iter()
      .find(|r| r.as_str().eq_ignore_ascii_case(s))
      .cloned();
    Ok(known.unwrap_or_else(|| {
      if s.is_empty() {
        Self::Global
      } else {
        Self::Custom(s.to_owned())
      }
    }))
  }
}

impl From<String> for Region {
  fn from(s: String) -> Self {
    match s.parse() {
      Ok(region) => region,
      Err(never) => match never {},
    }
  }
}

impl From<Region> for String {
  fn from(r: Region) -> Self {
    r.as_str().to_owned()
  }
}

// ─── Rank ────────────────────────────────────────────────────────────────────

/// Outcome of a rank lookup for one keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Rank {
  /// 1-based position of the first matching result.
  Position(u32),
  /// The domain did not appear within the scanned window.
  NotInTop(u32),
}

impl Rank {
  pub fn position(self) -> Option<u32> {
    match self {
      Self::Position(p) => Some(p),
      Self::NotInTop(_) => None,
    }
  }

  /// Parse a stored rank field as a positive integer.
  ///
  /// Integral float text (`"3.0"`) is accepted because older writers emitted
  /// ranks that way. Sentinels, blanks and non-positive values yield `None`.
  pub fn parse_numeric(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u32>() {
      return (n > 0).then_some(n);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f >= 1.0 && f <= f64::from(u32::MAX))
      .then_some(f as u32)
  }
}

impl fmt::Display for Rank {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Position(p) => write!(f, "{p}"),
      Self::NotInTop(n) => write!(f, "Not in Top {n}"),
    }
  }
}

// ─── RankObservation ─────────────────────────────────────────────────────────

/// Input to [`crate::history::HistoryStore::append`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankObservation {
  pub recorded_at: NaiveDateTime,
  pub keyword:     String,
  pub website:     String,
  pub region:      Region,
  pub rank:        Rank,
}

impl RankObservation {
  /// The timestamp as written to the log, truncated to whole seconds.
  pub fn timestamp(&self) -> String {
    self.recorded_at.format(TIMESTAMP_FORMAT).to_string()
  }
}

// ─── HistoryEntry ────────────────────────────────────────────────────────────

/// A row loaded back from the history log. Only numeric ranks survive loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  /// Timestamp text exactly as stored; see [`HistoryEntry::recorded_at`].
  pub timestamp: String,
  pub keyword:   String,
  pub website:   String,
  pub region:    Region,
  pub rank:      u32,
}

impl HistoryEntry {
  /// Parse the stored timestamp. Returns `None` when it cannot be understood.
  pub fn recorded_at(&self) -> Option<NaiveDateTime> {
    parse_timestamp(&self.timestamp)
  }

  pub fn date(&self) -> Option<NaiveDate> {
    self.recorded_at().map(|ts| ts.date())
  }
}

/// Lenient timestamp parsing for history rows written by different tools.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
  const LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
  ];

  let s = s.trim();
  if let Some(ts) = LAYOUTS
    .iter()
    .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
  {
    return Some(ts);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.naive_local());
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
}
