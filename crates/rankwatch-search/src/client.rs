//! Async HTTP client for the Custom Search JSON API.

use std::time::Duration;

use rankwatch_core::search::{PageRequest, SearchPage, SearchProvider};
use reqwest::Client;
use tracing::debug;

use crate::{Error, Result, config::SearchConfig};

/// Custom Search client. Cheap to clone: the inner [`reqwest::Client`] is
/// `Arc`-based.
#[derive(Debug, Clone)]
pub struct CustomSearchClient {
  client: Client,
  config: SearchConfig,
}

impl CustomSearchClient {
  /// Build a client. Fails early when the key or global scope is missing so
  /// no request is ever sent without credentials.
  pub fn new(config: SearchConfig) -> Result<Self> {
    if config.api_key.trim().is_empty() {
      return Err(Error::MissingApiKey);
    }
    if config.default_scope.trim().is_empty() {
      return Err(Error::MissingScope);
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &SearchConfig { &self.config }

  /// `GET {endpoint}?q=..&key=..&cx=..&num=..&start=..`
  pub async fn search(&self, request: &PageRequest) -> Result<SearchPage> {
    let cx = self.config.scope_for(&request.region);
    debug!(
      keyword = %request.keyword,
      region = %request.region,
      start = request.start,
      "custom search request"
    );

    let num = request.num.to_string();
    let start = request.start.to_string();
    let resp = self
      .client
      .get(&self.config.endpoint)
      .query(&[
        ("q", request.keyword.as_str()),
        ("key", self.config.api_key.as_str()),
        ("cx", cx),
        ("num", num.as_str()),
        ("start", start.as_str()),
      ])
      .send()
      .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
      return Err(Error::Status { status, body });
    }
    Ok(serde_json::from_str(&body)?)
  }
}

impl SearchProvider for CustomSearchClient {
  type Error = Error;

  async fn fetch_page(&self, request: PageRequest) -> Result<SearchPage> {
    self.search(&request).await
  }
}
