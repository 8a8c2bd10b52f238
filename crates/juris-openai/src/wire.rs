//! Request and response bodies of the OpenAI HTTP API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
  pub model:           &'a str,
  pub messages:        [ChatMessage<'a>; 2],
  pub temperature:     f32,
  pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
  pub role:    &'static str,
  pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
  #[serde(rename = "type")]
  pub kind: &'static str,
}

impl ResponseFormat {
  pub const JSON_OBJECT: Self = Self { kind: "json_object" };
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
  #[serde(default)]
  pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
  pub message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
  #[serde(default)]
  pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmbeddingRequest<'a> {
  pub model: &'a str,
  pub input: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingResponse {
  #[serde(default)]
  pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingData {
  pub embedding: Vec<f32>,
}
