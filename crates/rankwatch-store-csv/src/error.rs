//! Error type for `rankwatch-store-csv`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  /// A row whose column count matches neither known layout. Fatal: the
  /// history file is not read at all.
  #[error("unexpected number of columns in history file at line {line}: {columns}")]
  Schema { line: u64, columns: usize },

  #[error("background task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
