//! History browser state and key handling.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use rankwatch_core::{history::rank_series, observation::HistoryEntry};

/// One keyword tracked for one website; each track has its own chart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Track {
  pub keyword: String,
  pub website: String,
}

impl Track {
  pub fn label(&self, show_website: bool) -> String {
    if show_website {
      format!("{}  ({})", self.keyword, self.website)
    } else {
      self.keyword.clone()
    }
  }
}

/// Top-level browser state.
pub struct App {
  /// Loaded numeric-rank history.
  pub entries: Vec<HistoryEntry>,

  /// Website the browser was opened for, if any.
  pub website: Option<String>,

  /// Distinct (keyword, website) pairs, sorted.
  pub tracks: Vec<Track>,

  /// Current fuzzy-filter string.
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* track list.
  pub list_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(entries: Vec<HistoryEntry>, website: Option<String>) -> Self {
    let tracks: Vec<Track> = entries
      .iter()
      .filter(|e| website.as_deref().is_none_or(|w| e.website == w))
      .map(|e| Track { keyword: e.keyword.clone(), website: e.website.clone() })
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();

    let status_msg = if tracks.is_empty() {
      match &website {
        Some(w) => format!("No history for {w}."),
        None => "No history data found.".into(),
      }
    } else {
      String::new()
    };

    Self {
      entries,
      website,
      tracks,
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      status_msg,
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Tracks that match the current filter query.
  pub fn filtered_tracks(&self) -> Vec<&Track> {
    if self.filter.is_empty() {
      return self.tracks.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .tracks
      .iter()
      .filter(|t| {
        matcher.fuzzy_match(&t.keyword, &self.filter).is_some()
          || (self.website.is_none()
            && matcher.fuzzy_match(&t.website, &self.filter).is_some())
      })
      .collect()
  }

  /// The track under the list cursor in the filtered view, if any.
  pub fn cursor_track(&self) -> Option<&Track> {
    self.filtered_tracks().get(self.list_cursor).copied()
  }

  /// Rank-over-time points for the track under the cursor, oldest first.
  pub fn selected_series(&self) -> Vec<(NaiveDateTime, u32)> {
    self
      .cursor_track()
      .map(|t| rank_series(&self.entries, &t.keyword, &t.website))
      .unwrap_or_default()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_tracks().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }
      KeyCode::Home | KeyCode::Char('g') => self.list_cursor = 0,
      KeyCode::End | KeyCode::Char('G') => {
        self.list_cursor = self.filtered_tracks().len().saturating_sub(1);
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Esc => {
        self.filter.clear();
        self.list_cursor = 0;
        self.status_msg.clear();
      }

      _ => {}
    }
    true
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
        self.status_msg.clear();
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
        if self.filtered_tracks().is_empty() {
          self.status_msg = "No data matching filters.".into();
        } else {
          self.status_msg.clear();
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }
}

// ─── Chart geometry ───────────────────────────────────────────────────────────

/// Plot-ready points and bounds for a rank series.
///
/// The y value is `worst + 1 - rank`, so rank 1 sits at the top of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
  pub points:   Vec<(f64, f64)>,
  pub x_bounds: [f64; 2],
  pub y_bounds: [f64; 2],
  /// Worst (largest) rank in the series.
  pub worst:    u32,
}

impl ChartData {
  pub fn from_series(series: &[(NaiveDateTime, u32)]) -> Option<Self> {
    let worst = series.iter().map(|(_, r)| *r).max()?;
    let points: Vec<(f64, f64)> = series
      .iter()
      .map(|(ts, rank)| {
        (ts.and_utc().timestamp() as f64, f64::from(worst) + 1.0 - f64::from(*rank))
      })
      .collect();

    let first = points.first()?.0;
    let last = points.last()?.0;
    let x_bounds = if last > first {
      [first, last]
    } else {
      // A single instant still needs a visible range.
      [first - 43_200.0, first + 43_200.0]
    };

    Some(Self { points, x_bounds, y_bounds: [0.0, f64::from(worst) + 1.0], worst })
  }

  /// Rank shown at a plotted y value.
  pub fn rank_at(&self, y: f64) -> f64 { f64::from(self.worst) + 1.0 - y }
}
