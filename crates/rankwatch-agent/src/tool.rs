//! The typed rank-check tool exposed to the model.

use std::future::Future;

use rankwatch_core::{
  observation::{Rank, Region},
  resolver::RankResolver,
  search::SearchProvider,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::gemini::FunctionDeclaration;

/// Function name advertised to the model.
pub const TOOL_NAME: &str = "check_website_rank";

/// Arguments the model supplies when it calls the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankQuery {
  pub keyword: String,
  pub domain:  String,
}

/// What the tool reports back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAnswer {
  pub keyword: String,
  pub domain:  String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rank:    Option<Rank>,
  /// One-line human-readable result for the model to quote.
  pub summary: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
}

impl RankAnswer {
  pub fn found(query: RankQuery, rank: Rank) -> Self {
    let summary = format!(
      "The rank of {} for '{}' is: {rank}",
      query.domain, query.keyword
    );
    Self {
      keyword: query.keyword,
      domain: query.domain,
      rank: Some(rank),
      summary,
      error: None,
    }
  }

  pub fn failed(query: RankQuery, error: impl ToString) -> Self {
    let error = error.to_string();
    Self {
      summary: format!("Could not check the rank of {}: {error}", query.domain),
      keyword: query.keyword,
      domain: query.domain,
      rank: None,
      error: Some(error),
    }
  }
}

/// The JSON schema declaration for [`TOOL_NAME`].
pub fn declaration() -> FunctionDeclaration {
  FunctionDeclaration {
    name:        TOOL_NAME.to_owned(),
    description: "Check where a website ranks in web search results for a keyword. \
                  Returns the 1-based position or a 'Not in Top N' result."
      .to_owned(),
    parameters:  json!({
      "type": "OBJECT",
      "properties": {
        "keyword": {"type": "STRING", "description": "The search phrase to check."},
        "domain":  {"type": "STRING", "description": "The website domain, e.g. example.com."}
      },
      "required": ["keyword", "domain"]
    }),
  }
}

// ─── Lookup seam ─────────────────────────────────────────────────────────────

/// Anything that can answer a [`RankQuery`]. Failures are reported inside the
/// answer so the model can explain them.
pub trait RankLookup: Send + Sync {
  fn lookup(&self, query: RankQuery) -> impl Future<Output = RankAnswer> + Send + '_;
}

/// Adapts a [`RankResolver`] to [`RankLookup`] for a fixed region.
#[derive(Debug, Clone)]
pub struct ResolverLookup<P> {
  resolver: RankResolver<P>,
  region:   Region,
}

impl<P: SearchProvider> ResolverLookup<P> {
  pub fn new(resolver: RankResolver<P>, region: Region) -> Self {
    Self { resolver, region }
  }
}

impl<P: SearchProvider> RankLookup for ResolverLookup<P> {
  async fn lookup(&self, query: RankQuery) -> RankAnswer {
    match self
      .resolver
      .resolve(&query.keyword, &query.domain, &self.region)
      .await
    {
      Ok(rank) => RankAnswer::found(query, rank),
      Err(e) => RankAnswer::failed(query, e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn query() -> RankQuery {
    RankQuery { keyword: "seo tools".into(), domain: "example.com".into() }
  }

  #[test]
  fn found_answer_summarises_rank() {
    let answer = RankAnswer::found(query(), Rank::Position(4));
    assert_eq!(answer.summary, "The rank of example.com for 'seo tools' is: 4");
    assert!(answer.error.is_none());
  }

  #[test]
  fn sentinel_answer_keeps_descriptive_text() {
    let answer = RankAnswer::found(query(), Rank::NotInTop(100));
    assert!(answer.summary.ends_with("Not in Top 100"));
  }

  #[test]
  fn failed_answer_omits_rank_in_json() {
    let answer = RankAnswer::failed(query(), "quota exceeded");
    let value = serde_json::to_value(&answer).unwrap();
    assert!(value.get("rank").is_none());
    assert_eq!(value["error"], "quota exceeded");
  }

  #[test]
  fn query_deserializes_from_model_args() {
    let q: RankQuery =
      serde_json::from_value(json!({"keyword": "ai tools", "domain": "openai.com"})).unwrap();
    assert_eq!(q.domain, "openai.com");
  }
}
