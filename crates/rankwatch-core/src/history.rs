//! The `HistoryStore` trait and read-side helpers over loaded history.
//!
//! The trait is implemented by storage backends (e.g. `rankwatch-store-csv`).
//! The CLI and report builder depend on this abstraction, not on any concrete
//! file format.

use std::{collections::BTreeSet, future::Future};

use chrono::NaiveDateTime;

use crate::observation::{HistoryEntry, RankObservation};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// An append-only log of rank observations.
///
/// Writes never rewrite or reorder existing rows. Reads return only rows with
/// a numeric rank; "Not in Top N" observations are persisted but invisible to
/// history views.
pub trait HistoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append `observations` in order. Returns the number of rows written.
  fn append(
    &self,
    observations: Vec<RankObservation>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Load every numeric-rank row in file order. A store that has never been
  /// written to yields an empty list.
  fn load_all(
    &self,
  ) -> impl Future<Output = Result<Vec<HistoryEntry>, Self::Error>> + Send + '_;
}

// ─── Query helpers ───────────────────────────────────────────────────────────

/// Exact-match filter over loaded history. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
  pub keyword: Option<String>,
  pub website: Option<String>,
}

impl HistoryFilter {
  pub fn matches(&self, entry: &HistoryEntry) -> bool {
    self.keyword.as_deref().is_none_or(|k| entry.keyword == k)
      && self.website.as_deref().is_none_or(|w| entry.website == w)
  }

  pub fn is_empty(&self) -> bool {
    self.keyword.is_none() && self.website.is_none()
  }
}

/// Rows of `entries` accepted by `filter`, in their original order.
pub fn filter<'a>(
  entries: &'a [HistoryEntry],
  filter: &HistoryFilter,
) -> Vec<&'a HistoryEntry> {
  entries.iter().filter(|e| filter.matches(e)).collect()
}

/// Rank-over-time points for one keyword on one website, oldest first.
/// Rows whose timestamp cannot be parsed are skipped.
pub fn rank_series(
  entries: &[HistoryEntry],
  keyword: &str,
  website: &str,
) -> Vec<(NaiveDateTime, u32)> {
  let mut points: Vec<(NaiveDateTime, u32)> = entries
    .iter()
    .filter(|e| e.keyword == keyword && e.website == website)
    .filter_map(|e| e.recorded_at().map(|ts| (ts, e.rank)))
    .collect();
  points.sort_by_key(|(ts, _)| *ts);
  points
}

/// Distinct keywords recorded for `website` (all websites when `None`),
/// sorted.
pub fn keywords_for(entries: &[HistoryEntry], website: Option<&str>) -> Vec<String> {
  entries
    .iter()
    .filter(|e| website.is_none_or(|w| e.website == w))
    .map(|e| e.keyword.clone())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}
