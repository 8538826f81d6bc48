//! Error types for `rankwatch-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no keywords given")]
  NoKeywords,

  #[error("no website given")]
  MissingWebsite,

  #[error("keyword must not be blank")]
  BlankKeyword,

  #[error("search provider error: {0}")]
  Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("no history found for website: {website}")]
  NoHistory { website: String },

  #[error("no dated history rows to export for website: {website}")]
  NoDatedRows { website: String },
}

impl Error {
  /// True for the empty-result conditions that mean "nothing to export".
  pub fn is_nothing_to_export(&self) -> bool {
    matches!(self, Self::NoHistory { .. } | Self::NoDatedRows { .. })
  }

  /// True for errors raised before any external call was made.
  pub fn is_input_error(&self) -> bool {
    matches!(self, Self::NoKeywords | Self::MissingWebsite | Self::BlankKeyword)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
