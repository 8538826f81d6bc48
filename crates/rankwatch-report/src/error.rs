//! Error type for `rankwatch-report`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] rankwatch_core::Error),

  #[error("pdf error: {0}")]
  Pdf(String),
}

impl Error {
  /// True when there was no history to put in the report.
  pub fn is_nothing_to_export(&self) -> bool {
    matches!(self, Self::Core(e) if e.is_nothing_to_export())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
