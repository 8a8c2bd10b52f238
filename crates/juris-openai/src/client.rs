//! Async HTTP client for the OpenAI chat and embedding endpoints.

use juris_core::{
  GenerationError,
  collab::{Embedder, Prompt, TextGenerator},
};
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
  Error, OpenAiConfig, Result,
  wire::{
    ChatMessage, ChatRequest, ChatResponse, EmbeddingRequest, EmbeddingResponse,
    ResponseFormat,
  },
};

/// Client for an OpenAI-compatible API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenAiClient {
  client: Client,
  config: OpenAiConfig,
}

impl OpenAiClient {
  pub fn new(config: OpenAiConfig) -> Result<Self> {
    if config.api_key.trim().is_empty() {
      return Err(Error::MissingApiKey);
    }
    let client = Client::builder()
      .timeout(config.request_timeout())
      .build()
      .map_err(Error::Client)?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &OpenAiConfig { &self.config }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  // ── Endpoints ─────────────────────────────────────────────────────────────

  /// `POST /chat/completions` in JSON mode; returns the first choice's text.
  pub async fn chat(&self, prompt: &Prompt) -> Result<String> {
    let request = ChatRequest {
      model:           &self.config.chat_model,
      messages:        [
        ChatMessage { role: "system", content: &prompt.system },
        ChatMessage { role: "user", content: &prompt.user },
      ],
      temperature:     self.config.temperature,
      response_format: ResponseFormat::JSON_OBJECT,
    };
    let response: ChatResponse = self.post_json("/chat/completions", &request).await?;

    response
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .filter(|content| !content.trim().is_empty())
      .ok_or_else(|| Error::Malformed("completion has no message content".into()))
  }

  /// `POST /embeddings` for a single input.
  pub async fn embedding(&self, text: &str) -> Result<Vec<f32>> {
    let request = EmbeddingRequest { model: &self.config.embedding_model, input: text };
    let response: EmbeddingResponse = self.post_json("/embeddings", &request).await?;

    response
      .data
      .into_iter()
      .next()
      .map(|d| d.embedding)
      .filter(|v| !v.is_empty())
      .ok_or_else(|| Error::Malformed("embedding response has no vector".into()))
  }

  // ── Transport ─────────────────────────────────────────────────────────────

  /// POST `body` as JSON, retrying transient failures with exponential
  /// backoff.
  async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
  where
    B: Serialize + Sync,
    T: DeserializeOwned,
  {
    let mut attempt = 0u32;
    loop {
      match self.post_once(path, body).await {
        Err(e) if e.is_transient() && attempt < self.config.max_retries => {
          let delay = self.config.retry_backoff() * 2u32.saturating_pow(attempt);
          attempt += 1;
          tracing::warn!(path, attempt, ?delay, "retrying after transient failure: {e}");
          tokio::time::sleep(delay).await;
        }
        other => return other,
      }
    }
  }

  async fn post_once<B, T>(&self, path: &str, body: &B) -> Result<T>
  where
    B: Serialize + Sync,
    T: DeserializeOwned,
  {
    let resp = self
      .client
      .post(self.url(path))
      .bearer_auth(&self.config.api_key)
      .json(body)
      .send()
      .await
      .map_err(Error::from_reqwest)?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(if status == StatusCode::TOO_MANY_REQUESTS {
        Error::RateLimited(body)
      } else {
        Error::Status { status: status.as_u16(), body }
      });
    }

    let bytes = resp.bytes().await.map_err(Error::from_reqwest)?;
    serde_json::from_slice(&bytes).map_err(|e| Error::Malformed(e.to_string()))
  }
}

impl std::fmt::Debug for OpenAiClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OpenAiClient").field("config", &self.config).finish()
  }
}

// ─── Collaborator impls ──────────────────────────────────────────────────────

impl TextGenerator for OpenAiClient {
  async fn complete(&self, prompt: &Prompt) -> Result<String, GenerationError> {
    Ok(self.chat(prompt).await?)
  }
}

impl Embedder for OpenAiClient {
  type Error = Error;

  async fn embed(&self, text: &str) -> Result<Vec<f32>> { self.embedding(text).await }
}
