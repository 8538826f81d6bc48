//! Error type for `rankwatch-search`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("search api key is not configured")]
  MissingApiKey,

  #[error("no search engine id configured for the global scope")]
  MissingScope,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("search api returned {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },

  #[error("malformed search response: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
