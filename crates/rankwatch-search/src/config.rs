//! Search backend configuration.

use std::collections::BTreeMap;

use rankwatch_core::{observation::Region, resolver::DEFAULT_MAX_RESULTS};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Connection settings for the Custom Search JSON API, deserialised from the
/// `[search]` table of the settings file.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
  #[serde(default)]
  pub api_key:       String,
  #[serde(default = "default_endpoint")]
  pub endpoint:      String,
  /// Search engine id used for `Global` and for any region without its own.
  #[serde(default)]
  pub default_scope: String,
  /// Region name → search engine id. Keys are matched case-insensitively.
  #[serde(default)]
  pub scopes:        BTreeMap<String, String>,
  #[serde(default = "default_max_results")]
  pub max_results:   u32,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:  u64,
}

fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_owned() }

fn default_max_results() -> u32 { DEFAULT_MAX_RESULTS }

fn default_timeout_secs() -> u64 { 30 }

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      api_key:       String::new(),
      endpoint:      default_endpoint(),
      default_scope: String::new(),
      scopes:        BTreeMap::new(),
      max_results:   default_max_results(),
      timeout_secs:  default_timeout_secs(),
    }
  }
}

impl SearchConfig {
  /// The search engine id for `region`, falling back to the global scope.
  pub fn scope_for(&self, region: &Region) -> &str {
    self
      .scopes
      .iter()
      .find(|(name, _)| name.eq_ignore_ascii_case(region.as_str()))
      .map(|(_, cx)| cx.as_str())
      .filter(|cx| !cx.is_empty())
      .unwrap_or(&self.default_scope)
  }
}
