//! Conversions between history rows and CSV records.
//!
//! Timestamps are written as `%Y-%m-%d %H:%M:%S`. Ranks are written as their
//! display text, so sentinels land in the file as `Not in Top N`.

use rankwatch_core::observation::{HistoryEntry, Rank, RankObservation, Region};

use crate::schema::Layout;

// ─── Write side ──────────────────────────────────────────────────────────────

/// Fields of `obs` in [`crate::schema::CURRENT`] column order.
pub fn encode_observation(obs: &RankObservation) -> [String; 5] {
  [
    obs.timestamp(),
    obs.keyword.clone(),
    obs.website.clone(),
    obs.region.to_string(),
    obs.rank.to_string(),
  ]
}

// ─── Read side ───────────────────────────────────────────────────────────────

/// Decode a data record of the given layout.
///
/// Returns `None` when the rank is not a positive integer; such rows are
/// dropped from loaded history.
pub fn decode_record(layout: Layout, record: &csv::StringRecord) -> Option<HistoryEntry> {
  let field = |i: usize| record.get(i).unwrap_or_default().to_owned();

  let (region, rank_text) = match layout {
    Layout::Legacy => (Region::default(), record.get(3)),
    Layout::Current => (Region::from(field(3)), record.get(4)),
  };
  let rank = Rank::parse_numeric(rank_text?)?;

  Some(HistoryEntry {
    timestamp: field(0),
    keyword: field(1),
    website: field(2),
    region,
    rank,
  })
}
