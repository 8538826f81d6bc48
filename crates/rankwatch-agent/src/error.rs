//! Error type for `rankwatch-agent`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("gemini api key is not configured")]
  MissingApiKey,

  #[error("question must not be empty")]
  EmptyQuestion,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("gemini api returned {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },

  #[error("malformed gemini response: {0}")]
  Json(#[from] serde_json::Error),

  #[error("gemini returned no candidates")]
  NoCandidates,

  #[error("model produced no answer")]
  EmptyAnswer,

  #[error("model did not answer within {0} steps")]
  StepLimit(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
