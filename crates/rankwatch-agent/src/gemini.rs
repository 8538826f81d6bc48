//! Wire types and HTTP client for Gemini `generateContent`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{Error, Result, config::GeminiConfig};

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
  contents:           &'a [Content],
  tools:              Vec<ToolSet<'a>>,
  system_instruction: Content,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSet<'a> {
  function_declarations: &'a [FunctionDeclaration],
}

/// A function the model may call. `parameters` is an OpenAPI-style schema.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
  pub name:        String,
  pub description: String,
  pub parameters:  Value,
}

/// One conversation turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role:  Option<String>,
  #[serde(default)]
  pub parts: Vec<Part>,
}

impl Content {
  pub fn user(parts: Vec<Part>) -> Self {
    Self { role: Some("user".into()), parts }
  }

  pub fn user_text(text: impl Into<String>) -> Self {
    Self::user(vec![Part::text(text)])
  }

  /// Concatenated text parts.
  pub fn text(&self) -> String {
    self
      .parts
      .iter()
      .filter_map(|p| p.text.as_deref())
      .collect::<Vec<_>>()
      .join("")
  }

  pub fn function_calls(&self) -> impl Iterator<Item = &FunctionCall> {
    self.parts.iter().filter_map(|p| p.function_call.as_ref())
  }
}

/// A content part; exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text:              Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub function_call:     Option<FunctionCall>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub function_response: Option<FunctionResponse>,
}

impl Part {
  pub fn text(text: impl Into<String>) -> Self {
    Self { text: Some(text.into()), ..Self::default() }
  }

  pub fn function_response(name: impl Into<String>, response: Value) -> Self {
    Self {
      function_response: Some(FunctionResponse { name: name.into(), response }),
      ..Self::default()
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
  pub name: String,
  #[serde(default)]
  pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
  pub name:     String,
  pub response: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Content,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for one Gemini model. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GeminiClient {
  client: Client,
  config: GeminiConfig,
}

impl GeminiClient {
  pub fn new(config: GeminiConfig) -> Result<Self> {
    if config.api_key.trim().is_empty() {
      return Err(Error::MissingApiKey);
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &GeminiConfig { &self.config }

  /// Send the conversation so far and return the first candidate's content.
  pub async fn generate(
    &self,
    system: &str,
    contents: &[Content],
    functions: &[FunctionDeclaration],
  ) -> Result<Content> {
    let request = GenerateRequest {
      contents,
      tools: vec![ToolSet { function_declarations: functions }],
      system_instruction: Content { role: None, parts: vec![Part::text(system)] },
    };

    debug!(model = %self.config.model, turns = contents.len(), "gemini request");
    let resp = self
      .client
      .post(self.config.generate_url())
      .header("x-goog-api-key", &self.config.api_key)
      .json(&request)
      .send()
      .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
      return Err(Error::Status { status, body });
    }

    let parsed: GenerateResponse = serde_json::from_str(&body)?;
    let mut content = parsed
      .candidates
      .into_iter()
      .next()
      .map(|c| c.content)
      .ok_or(Error::NoCandidates)?;
    if content.role.is_none() {
      content.role = Some("model".into());
    }
    Ok(content)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn parts_serialize_in_camel_case() {
    let part = Part::function_response("check_website_rank", json!({"rank": 3}));
    assert_eq!(
      serde_json::to_value(&part).unwrap(),
      json!({"functionResponse": {"name": "check_website_rank", "response": {"rank": 3}}})
    );
    assert_eq!(serde_json::to_value(Part::text("hi")).unwrap(), json!({"text": "hi"}));
  }

  #[test]
  fn function_call_parts_deserialize() {
    let content: Content = serde_json::from_value(json!({
      "role": "model",
      "parts": [{"functionCall": {"name": "f", "args": {"keyword": "k"}}}]
    }))
    .unwrap();
    let calls: Vec<_> = content.function_calls().collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args["keyword"], "k");
    assert_eq!(content.text(), "");
  }

  #[test]
  fn missing_key_is_rejected() {
    assert!(matches!(
      GeminiClient::new(GeminiConfig::default()),
      Err(Error::MissingApiKey)
    ));
  }
}
