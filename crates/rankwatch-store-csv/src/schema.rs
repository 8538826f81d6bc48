//! Column layouts of the history file.
//!
//! New files always use [`CURRENT`]. Files written before regions were
//! tracked use [`LEGACY`]; their rows are read with the default region.

/// Current five-column layout, also the header row written to new files.
pub const CURRENT: [&str; 5] = ["timestamp", "keyword", "website", "region", "rank"];

/// Legacy four-column layout (no region).
pub const LEGACY: [&str; 4] = ["timestamp", "keyword", "website", "rank"];

/// The layout a record was written with, detected from its field count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
  Legacy,
  Current,
}

impl Layout {
  pub fn detect(columns: usize) -> Option<Self> {
    match columns {
      4 => Some(Self::Legacy),
      5 => Some(Self::Current),
      _ => None,
    }
  }

  fn names(self) -> &'static [&'static str] {
    match self {
      Self::Legacy => &LEGACY,
      Self::Current => &CURRENT,
    }
  }

  /// Whether `record` is this layout's header row rather than data.
  pub fn is_header(self, record: &csv::StringRecord) -> bool {
    record.len() == self.names().len()
      && record
        .iter()
        .zip(self.names())
        .all(|(field, name)| field.trim().eq_ignore_ascii_case(name))
  }
}
