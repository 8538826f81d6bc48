//! [`RankAgent`]: question, tool calls, answer.

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  config::GeminiConfig,
  gemini::{Content, FunctionCall, GeminiClient, Part},
  tool::{self, RankLookup, RankQuery, TOOL_NAME},
};

const SYSTEM_PROMPT: &str = "You answer questions about where websites rank in web search \
  results. When the user asks about a website's position for a keyword, call \
  check_website_rank with the keyword and the bare domain (for example example.com). \
  Report the rank exactly as the tool returns it, including 'Not in Top N' results.";

/// Answers free-text rank questions using a Gemini model and a [`RankLookup`].
pub struct RankAgent<L> {
  client: GeminiClient,
  lookup: L,
}

impl<L: RankLookup> RankAgent<L> {
  pub fn new(config: GeminiConfig, lookup: L) -> Result<Self> {
    Ok(Self { client: GeminiClient::new(config)?, lookup })
  }

  pub fn lookup(&self) -> &L { &self.lookup }

  /// Ask one question and return the model's final text answer.
  pub async fn ask(&self, question: &str) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
      return Err(Error::EmptyQuestion);
    }

    let functions = [tool::declaration()];
    let max_steps = self.client.config().max_steps;
    let mut contents = vec![Content::user_text(question)];

    for step in 0..max_steps {
      let reply = self
        .client
        .generate(SYSTEM_PROMPT, &contents, &functions)
        .await?;

      let calls: Vec<FunctionCall> = reply.function_calls().cloned().collect();
      if calls.is_empty() {
        let text = reply.text();
        if text.trim().is_empty() {
          return Err(Error::EmptyAnswer);
        }
        info!(steps = step + 1, "agent answered");
        return Ok(text);
      }

      contents.push(reply);
      let mut responses = Vec::with_capacity(calls.len());
      for call in calls {
        let response = self.dispatch(&call).await;
        responses.push(Part::function_response(call.name, response));
      }
      contents.push(Content::user(responses));
    }

    Err(Error::StepLimit(max_steps))
  }

  /// Run one function call. Problems are reported back to the model as an
  /// `error` payload instead of aborting the conversation.
  async fn dispatch(&self, call: &FunctionCall) -> Value {
    if call.name != TOOL_NAME {
      warn!(name = %call.name, "model called an unknown function");
      return json!({"error": format!("unknown function: {}", call.name)});
    }

    let query: RankQuery = match serde_json::from_value(call.args.clone()) {
      Ok(q) => q,
      Err(e) => {
        warn!(error = %e, "invalid rank tool arguments");
        return json!({"error": format!("invalid arguments: {e}")});
      }
    };

    debug!(keyword = %query.keyword, domain = %query.domain, "rank tool call");
    let answer = self.lookup.lookup(query).await;
    serde_json::to_value(&answer)
      .unwrap_or_else(|e| json!({"error": format!("could not encode answer: {e}")}))
  }
}
