//! Contract tests for the Custom Search client against a mock HTTP server.
//!
//! These check the query parameters sent per page, region scope selection,
//! response parsing, and that HTTP/JSON failures abort a keyword's scan.

use std::collections::BTreeMap;

use rankwatch_core::{
  Error as CoreError,
  observation::{Rank, Region},
  resolver::RankResolver,
  search::{PAGE_SIZE, PageRequest, SearchProvider},
};
use rankwatch_search::{CustomSearchClient, Error, SearchConfig};
use serde_json::json;
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{method, path, query_param},
};

fn config(server: &MockServer) -> SearchConfig {
  SearchConfig {
    api_key: "test-key".into(),
    endpoint: format!("{}/customsearch/v1", server.uri()),
    default_scope: "cx-global".into(),
    scopes: BTreeMap::from([("singapore".to_string(), "cx-sg".to_string())]),
    ..SearchConfig::default()
  }
}

fn page(links: &[&str]) -> serde_json::Value {
  let items: Vec<_> = links
    .iter()
    .map(|l| json!({"title": "result", "link": l, "snippet": "..."}))
    .collect();
  json!({"kind": "customsearch#search", "items": items})
}

fn request(keyword: &str, region: Region, start: u32) -> PageRequest {
  PageRequest { keyword: keyword.into(), region, start, num: PAGE_SIZE }
}

// ────────────────────────────────────────────────────────────────────────────
// Request format
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sends_all_query_parameters() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/customsearch/v1"))
    .and(query_param("q", "seo tools"))
    .and(query_param("key", "test-key"))
    .and(query_param("cx", "cx-global"))
    .and(query_param("num", "10"))
    .and(query_param("start", "11"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page(&["https://a.org/"])))
    .expect(1)
    .mount(&server)
    .await;

  let client = CustomSearchClient::new(config(&server)).unwrap();
  let result = client
    .fetch_page(request("seo tools", Region::Global, 11))
    .await
    .unwrap();
  assert_eq!(result.items.len(), 1);
  assert_eq!(result.items[0].link, "https://a.org/");
}

#[tokio::test]
async fn region_selects_its_scope() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(query_param("cx", "cx-sg"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page(&[])))
    .expect(1)
    .mount(&server)
    .await;

  let client = CustomSearchClient::new(config(&server)).unwrap();
  client
    .fetch_page(request("kw", Region::Singapore, 1))
    .await
    .unwrap();
}

#[tokio::test]
async fn unmapped_region_uses_global_scope() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(query_param("cx", "cx-global"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page(&[])))
    .expect(1)
    .mount(&server)
    .await;

  let client = CustomSearchClient::new(config(&server)).unwrap();
  client
    .fetch_page(request("kw", Region::Indonesia, 1))
    .await
    .unwrap();
}

// ────────────────────────────────────────────────────────────────────────────
// Response handling
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_items_is_an_empty_page() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_json(json!({"kind": "customsearch#search", "searchInformation": {}})),
    )
    .mount(&server)
    .await;

  let client = CustomSearchClient::new(config(&server)).unwrap();
  let result = client.fetch_page(request("kw", Region::Global, 1)).await.unwrap();
  assert!(result.items.is_empty());
}

#[tokio::test]
async fn http_error_status_is_reported() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .respond_with(
      ResponseTemplate::new(403)
        .set_body_json(json!({"error": {"code": 403, "message": "quota exceeded"}})),
    )
    .mount(&server)
    .await;

  let client = CustomSearchClient::new(config(&server)).unwrap();
  let err = client
    .fetch_page(request("kw", Region::Global, 1))
    .await
    .unwrap_err();
  match err {
    Error::Status { status, body } => {
      assert_eq!(status.as_u16(), 403);
      assert!(body.contains("quota exceeded"));
    }
    other => panic!("expected status error, got {other:?}"),
  }
}

#[tokio::test]
async fn malformed_json_is_reported() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
    .mount(&server)
    .await;

  let client = CustomSearchClient::new(config(&server)).unwrap();
  let err = client
    .fetch_page(request("kw", Region::Global, 1))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Json(_)));
}

#[test]
fn missing_credentials_are_rejected_up_front() {
  let err = CustomSearchClient::new(SearchConfig::default()).unwrap_err();
  assert!(matches!(err, Error::MissingApiKey));

  let err = CustomSearchClient::new(SearchConfig {
    api_key: "k".into(),
    ..SearchConfig::default()
  })
  .unwrap_err();
  assert!(matches!(err, Error::MissingScope));
}

// ────────────────────────────────────────────────────────────────────────────
// End to end through the resolver
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolver_reports_rank_across_pages() {
  let server = MockServer::start().await;

  let first: Vec<String> = (1..=10).map(|i| format!("https://other{i}.org/")).collect();
  let first: Vec<&str> = first.iter().map(String::as_str).collect();

  Mock::given(method("GET"))
    .and(query_param("start", "1"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page(&first)))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(query_param("start", "11"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page(&[
      "https://x.org/",
      "https://y.org/",
      "https://www.example.com/pricing",
    ])))
    .expect(1)
    .mount(&server)
    .await;

  let resolver = RankResolver::new(CustomSearchClient::new(config(&server)).unwrap());
  let rank = resolver
    .resolve("seo tools", "example.com", &Region::Global)
    .await
    .unwrap();
  assert_eq!(rank, Rank::Position(13));
}

#[tokio::test]
async fn failing_page_aborts_only_that_keyword() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(query_param("q", "broken"))
    .respond_with(ResponseTemplate::new(500))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(query_param("q", "fine"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(page(&["https://example.com/"])),
    )
    .expect(1)
    .mount(&server)
    .await;

  let resolver = RankResolver::new(CustomSearchClient::new(config(&server)).unwrap());
  let results = resolver
    .resolve_many(["broken", "fine"], "example.com", &Region::Global)
    .await
    .unwrap();

  assert!(matches!(results[0].outcome, Err(CoreError::Provider(_))));
  assert_eq!(results[1].outcome.as_ref().unwrap(), &Rank::Position(1));
}
