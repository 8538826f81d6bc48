//! [`RankResolver`]: finds where a domain ranks for a keyword.
//!
//! The scan walks result pages of [`PAGE_SIZE`] in order and stops at the
//! first result whose URL contains the target domain as a substring. Matching
//! is lenient on purpose: `example.com` also matches `blog.example.com` and
//! `notexample.com`.

use tracing::{debug, warn};

use crate::{
  Error, Result,
  observation::{Rank, Region},
  search::{PAGE_SIZE, PageRequest, SearchProvider},
};

/// Default scan window.
pub const DEFAULT_MAX_RESULTS: u32 = 100;

/// The result of resolving one keyword inside a batch.
#[derive(Debug)]
pub struct KeywordRank {
  pub keyword: String,
  pub outcome: Result<Rank>,
}

/// Resolves keyword ranks against any [`SearchProvider`].
#[derive(Debug, Clone)]
pub struct RankResolver<P> {
  provider:    P,
  max_results: u32,
}

impl<P: SearchProvider> RankResolver<P> {
  pub fn new(provider: P) -> Self {
    Self { provider, max_results: DEFAULT_MAX_RESULTS }
  }

  /// Scan at most `max_results` results per keyword.
  pub fn with_max_results(mut self, max_results: u32) -> Self {
    self.max_results = max_results;
    self
  }

  pub fn max_results(&self) -> u32 { self.max_results }

  pub fn provider(&self) -> &P { &self.provider }

  /// Return the 1-based rank of the first result containing `domain`, or
  /// [`Rank::NotInTop`] when it does not appear within the scan window.
  ///
  /// Any provider failure aborts the scan for this keyword.
  pub async fn resolve(
    &self,
    keyword: &str,
    domain: &str,
    region: &Region,
  ) -> Result<Rank> {
    let keyword = keyword.trim();
    let domain = domain.trim();
    if keyword.is_empty() {
      return Err(Error::BlankKeyword);
    }
    if domain.is_empty() {
      return Err(Error::MissingWebsite);
    }

    let mut start = 1;
    while start < self.max_results {
      debug!(keyword, domain, %region, start, "fetching result page");
      let page = self
        .provider
        .fetch_page(PageRequest {
          keyword: keyword.to_owned(),
          region:  region.clone(),
          start,
          num:     PAGE_SIZE,
        })
        .await
        .map_err(|e| Error::Provider(Box::new(e)))?;

      if page.items.is_empty() {
        debug!(keyword, start, "provider returned no further results");
        break;
      }

      for (position, item) in (start..).zip(&page.items) {
        if position > self.max_results {
          break;
        }
        if item.link.contains(domain) {
          return Ok(Rank::Position(position));
        }
      }

      start += PAGE_SIZE;
    }

    Ok(Rank::NotInTop(self.max_results))
  }

  /// Resolve each keyword independently and sequentially.
  ///
  /// Keywords are trimmed; blanks and duplicates are dropped while keeping
  /// first-seen order. One keyword's failure is recorded in its
  /// [`KeywordRank::outcome`] and does not stop the others.
  pub async fn resolve_many<I, S>(
    &self,
    keywords: I,
    domain: &str,
    region: &Region,
  ) -> Result<Vec<KeywordRank>>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let keywords = normalize_keywords(keywords);
    if keywords.is_empty() {
      return Err(Error::NoKeywords);
    }
    if domain.trim().is_empty() {
      return Err(Error::MissingWebsite);
    }

    let mut results = Vec::with_capacity(keywords.len());
    for keyword in keywords {
      let outcome = self.resolve(&keyword, domain, region).await;
      if let Err(e) = &outcome {
        warn!(%keyword, error = %e, "rank lookup failed");
      }
      results.push(KeywordRank { keyword, outcome });
    }
    Ok(results)
  }
}

/// Trim, drop blanks, and de-duplicate while keeping first-seen order.
pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut out: Vec<String> = Vec::new();
  for kw in keywords {
    let kw = kw.as_ref().trim();
    if !kw.is_empty() && !out.iter().any(|seen| seen == kw) {
      out.push(kw.to_owned());
    }
  }
  out
}

/// Split a comma-separated keyword list as typed by a user.
pub fn split_keywords(input: &str) -> Vec<String> {
  normalize_keywords(input.split(','))
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicU32, Ordering},
  };

  use super::*;
  use crate::search::{SearchItem, SearchPage};

  #[derive(Debug, thiserror::Error)]
  #[error("fake provider failure")]
  struct FakeError;

  /// Serves a fixed result list, paginated by `start`/`num`.
  struct FakeProvider {
    links:    Vec<String>,
    fail_on:  Option<(String, u32)>,
    calls:    AtomicU32,
    requests: Mutex<Vec<PageRequest>>,
  }

  impl FakeProvider {
    fn new(links: &[&str]) -> Self {
      Self {
        links:    links.iter().map(|s| s.to_string()).collect(),
        fail_on:  None,
        calls:    AtomicU32::new(0),
        requests: Mutex::new(Vec::new()),
      }
    }

    fn with_domain_at(domain: &str, position: u32, total: u32) -> Self {
      let links: Vec<String> = (1..=total)
        .map(|i| {
          if i == position {
            format!("https://www.{domain}/page")
          } else {
            format!("https://other{i}.org/")
          }
        })
        .collect();
      let refs: Vec<&str> = links.iter().map(String::as_str).collect();
      Self::new(&refs)
    }

    fn failing_on(mut self, keyword: &str, start: u32) -> Self {
      self.fail_on = Some((keyword.to_owned(), start));
      self
    }
  }

  impl SearchProvider for FakeProvider {
    type Error = FakeError;

    async fn fetch_page(&self, request: PageRequest) -> Result<SearchPage, FakeError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.requests.lock().unwrap().push(request.clone());
      if let Some((kw, start)) = &self.fail_on
        && *kw == request.keyword
        && *start == request.start
      {
        return Err(FakeError);
      }
      let from = (request.start - 1) as usize;
      let items = self
        .links
        .iter()
        .skip(from)
        .take(request.num as usize)
        .map(|link| SearchItem { link: link.clone(), title: None })
        .collect();
      Ok(SearchPage { items })
    }
  }

  #[tokio::test]
  async fn finds_exact_position_on_first_page() {
    let resolver = RankResolver::new(FakeProvider::with_domain_at("example.com", 4, 100));
    let rank = resolver
      .resolve("seo tools", "example.com", &Region::Global)
      .await
      .unwrap();
    assert_eq!(rank, Rank::Position(4));
    assert_eq!(resolver.provider().calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn finds_position_on_later_page() {
    for position in [10, 11, 37, 100] {
      let resolver =
        RankResolver::new(FakeProvider::with_domain_at("example.com", position, 100));
      let rank = resolver
        .resolve("seo tools", "example.com", &Region::Global)
        .await
        .unwrap();
      assert_eq!(rank, Rank::Position(position), "position {position}");
    }
  }

  #[tokio::test]
  async fn first_match_wins() {
    let provider = FakeProvider::new(&[
      "https://a.org/",
      "https://example.com/one",
      "https://example.com/two",
    ]);
    let rank = RankResolver::new(provider)
      .resolve("kw", "example.com", &Region::Global)
      .await
      .unwrap();
    assert_eq!(rank, Rank::Position(2));
  }

  #[tokio::test]
  async fn match_is_substring_not_host_equality() {
    let provider = FakeProvider::new(&["https://blog.example.com/post"]);
    let rank = RankResolver::new(provider)
      .resolve("kw", "example.com", &Region::Global)
      .await
      .unwrap();
    assert_eq!(rank, Rank::Position(1));
  }

  #[tokio::test]
  async fn absent_domain_yields_sentinel_after_full_window() {
    let resolver = RankResolver::new(FakeProvider::with_domain_at("example.com", 150, 200));
    let rank = resolver
      .resolve("kw", "example.com", &Region::Global)
      .await
      .unwrap();
    assert_eq!(rank, Rank::NotInTop(100));
    assert_eq!(rank.position(), None);

    let starts: Vec<u32> = resolver
      .provider()
      .requests
      .lock()
      .unwrap()
      .iter()
      .map(|r| r.start)
      .collect();
    assert_eq!(starts, vec![1, 11, 21, 31, 41, 51, 61, 71, 81, 91]);
  }

  #[tokio::test]
  async fn window_is_respected_for_odd_limits() {
    let resolver = RankResolver::new(FakeProvider::with_domain_at("example.com", 28, 100))
      .with_max_results(25);
    let rank = resolver
      .resolve("kw", "example.com", &Region::Global)
      .await
      .unwrap();
    assert_eq!(rank, Rank::NotInTop(25));
  }

  #[tokio::test]
  async fn empty_page_ends_scan_early() {
    let resolver = RankResolver::new(FakeProvider::new(&["https://a.org/", "https://b.org/"]));
    let rank = resolver
      .resolve("kw", "example.com", &Region::Global)
      .await
      .unwrap();
    assert_eq!(rank, Rank::NotInTop(100));
    assert_eq!(resolver.provider().calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn provider_failure_aborts_the_keyword() {
    let provider =
      FakeProvider::with_domain_at("example.com", 50, 100).failing_on("kw", 21);
    let resolver = RankResolver::new(provider);
    let err = resolver
      .resolve("kw", "example.com", &Region::Global)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Provider(_)));
    assert_eq!(resolver.provider().calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn region_is_forwarded_to_provider() {
    let resolver = RankResolver::new(FakeProvider::with_domain_at("example.com", 1, 10));
    resolver
      .resolve("kw", "example.com", &Region::Thailand)
      .await
      .unwrap();
    let requests = resolver.provider().requests.lock().unwrap();
    assert_eq!(requests[0].region, Region::Thailand);
    assert_eq!(requests[0].num, PAGE_SIZE);
  }

  #[tokio::test]
  async fn batch_isolates_failures() {
    let provider =
      FakeProvider::with_domain_at("example.com", 3, 100).failing_on("broken", 1);
    let resolver = RankResolver::new(provider);
    let results = resolver
      .resolve_many(["alpha", "broken", "beta"], "example.com", &Region::Global)
      .await
      .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].keyword, "alpha");
    assert_eq!(results[0].outcome.as_ref().unwrap(), &Rank::Position(3));
    assert!(results[1].outcome.is_err());
    assert_eq!(results[2].outcome.as_ref().unwrap(), &Rank::Position(3));
  }

  #[tokio::test]
  async fn input_errors_make_no_calls() {
    let resolver = RankResolver::new(FakeProvider::new(&[]));

    let err = resolver
      .resolve_many(Vec::<String>::new(), "example.com", &Region::Global)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::NoKeywords));

    let err = resolver
      .resolve_many([" ", ""], "example.com", &Region::Global)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::NoKeywords));

    let err = resolver
      .resolve_many(["kw"], "  ", &Region::Global)
      .await
      .unwrap_err();
    assert!(err.is_input_error());

    assert_eq!(resolver.provider().calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn split_keywords_trims_and_dedupes() {
    assert_eq!(
      split_keywords(" seo tools, rank tracker ,, seo tools"),
      vec!["seo tools".to_string(), "rank tracker".to_string()]
    );
  }
}
