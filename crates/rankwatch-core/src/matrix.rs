//! The keyword × date rank matrix behind every report.
//!
//! Never stored; rebuilt from the current history on each request.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Error, Result, observation::HistoryEntry};

/// Default number of most-recent observation dates in a report.
pub const DEFAULT_RECENT_DATES: usize = 5;

/// One keyword's ranks, aligned with [`RankMatrix::dates`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
  pub keyword: String,
  pub ranks:   Vec<Option<u32>>,
}

/// Ranks for one website pivoted into keyword rows and date columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankMatrix {
  pub website: String,
  /// Distinct regions present in the selected rows, sorted.
  pub regions: Vec<String>,
  /// Selected dates, oldest first.
  pub dates:   Vec<NaiveDate>,
  /// Rows sorted by keyword.
  pub rows:    Vec<MatrixRow>,
}

impl RankMatrix {
  /// Pivot `entries` for `website` over its `recent_dates` most recent
  /// observation dates.
  ///
  /// When a keyword has several rows on the same date, the first row in
  /// `entries` order wins.
  pub fn build(
    entries: &[HistoryEntry],
    website: &str,
    recent_dates: usize,
  ) -> Result<Self> {
    let for_site: Vec<&HistoryEntry> =
      entries.iter().filter(|e| e.website == website).collect();
    if for_site.is_empty() {
      return Err(Error::NoHistory { website: website.to_owned() });
    }

    let dated: Vec<(NaiveDate, &HistoryEntry)> = for_site
      .into_iter()
      .filter_map(|e| e.date().map(|d| (d, e)))
      .collect();

    let all_dates: BTreeSet<NaiveDate> = dated.iter().map(|(d, _)| *d).collect();
    let selected: BTreeSet<NaiveDate> =
      all_dates.into_iter().rev().take(recent_dates).collect();
    if selected.is_empty() {
      return Err(Error::NoDatedRows { website: website.to_owned() });
    }

    let mut regions = BTreeSet::new();
    let mut cells: BTreeMap<&str, BTreeMap<NaiveDate, u32>> = BTreeMap::new();
    for (date, entry) in dated.iter().filter(|(d, _)| selected.contains(d)) {
      regions.insert(entry.region.to_string());
      cells
        .entry(entry.keyword.as_str())
        .or_default()
        .entry(*date)
        .or_insert(entry.rank);
    }

    let dates: Vec<NaiveDate> = selected.into_iter().collect();
    let rows = cells
      .into_iter()
      .map(|(keyword, by_date)| MatrixRow {
        keyword: keyword.to_owned(),
        ranks:   dates.iter().map(|d| by_date.get(d).copied()).collect(),
      })
      .collect();

    Ok(Self {
      website: website.to_owned(),
      regions: regions.into_iter().collect(),
      dates,
      rows,
    })
  }

  /// The regions as shown in the report summary line.
  pub fn region_summary(&self) -> String { self.regions.join(", ") }

  /// Table header: `Keyword` followed by the formatted dates.
  pub fn header(&self) -> Vec<String> {
    std::iter::once("Keyword".to_owned())
      .chain(self.dates.iter().map(|d| d.format("%Y-%m-%d").to_string()))
      .collect()
  }

  /// Table body; missing cells render as `-`.
  pub fn body(&self) -> Vec<Vec<String>> {
    self
      .rows
      .iter()
      .map(|row| {
        std::iter::once(row.keyword.clone())
          .chain(row.ranks.iter().map(|r| match r {
            Some(rank) => rank.to_string(),
            None => "-".to_owned(),
          }))
          .collect()
      })
      .collect()
  }
}
