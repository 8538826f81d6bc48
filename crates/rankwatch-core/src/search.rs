//! The `SearchProvider` trait and its page types.
//!
//! Implemented by search backends (e.g. `rankwatch-search`). The
//! [`RankResolver`](crate::resolver::RankResolver) depends on this
//! abstraction, never on a concrete HTTP client.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::observation::Region;

/// Fixed page size for every provider request.
pub const PAGE_SIZE: u32 = 10;

/// One page request against a search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
  pub keyword: String,
  pub region:  Region,
  /// 1-based offset of the first result on the page.
  pub start:   u32,
  pub num:     u32,
}

/// A single organic search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
  pub link:  String,
  #[serde(default)]
  pub title: Option<String>,
}

/// One page of results. An empty `items` list means the provider has nothing
/// further for this query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
  #[serde(default)]
  pub items: Vec<SearchItem>,
}

/// Abstraction over a paginated web search backend.
pub trait SearchProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one page of results for `request`.
  fn fetch_page(
    &self,
    request: PageRequest,
  ) -> impl Future<Output = Result<SearchPage, Self::Error>> + Send + '_;
}
