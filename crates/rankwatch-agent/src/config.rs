//! Model backend configuration.

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Settings for the hosted chat model, deserialised from the `[agent]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
  #[serde(default)]
  pub api_key:      String,
  /// Model name, e.g. `gemini-1.5-pro` or `gemini-1.5-flash`.
  #[serde(default = "default_model")]
  pub model:        String,
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  /// Upper bound on model round-trips for one question.
  #[serde(default = "default_max_steps")]
  pub max_steps:    usize,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_model() -> String { DEFAULT_MODEL.to_owned() }

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

fn default_max_steps() -> usize { 5 }

fn default_timeout_secs() -> u64 { 120 }

impl Default for GeminiConfig {
  fn default() -> Self {
    Self {
      api_key:      String::new(),
      model:        default_model(),
      base_url:     default_base_url(),
      max_steps:    default_max_steps(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl GeminiConfig {
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = api_key.into();
    self
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = model.into();
    self
  }

  pub fn with_max_steps(mut self, max_steps: usize) -> Self {
    self.max_steps = max_steps;
    self
  }

  /// `POST` target for `generateContent`.
  pub fn generate_url(&self) -> String {
    format!(
      "{}/v1beta/models/{}:generateContent",
      self.base_url.trim_end_matches('/'),
      self.model
    )
  }
}
