//! Connection settings for the OpenAI-compatible service.

use std::{fmt, time::Duration};

use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
  pub api_key:              String,
  #[serde(default = "default_base_url")]
  pub base_url:             String,
  #[serde(default = "default_chat_model")]
  pub chat_model:           String,
  #[serde(default = "default_embedding_model")]
  pub embedding_model:      String,
  #[serde(default = "default_temperature")]
  pub temperature:          f32,
  /// Transport-level timeout for a single HTTP request.
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  /// Extra attempts after a transient failure (5xx or connection error).
  #[serde(default = "default_max_retries")]
  pub max_retries:          u32,
  #[serde(default = "default_retry_backoff_ms")]
  pub retry_backoff_ms:     u64,
}

fn default_base_url() -> String { "https://api.openai.com/v1".into() }
fn default_chat_model() -> String { "gpt-4-turbo-preview".into() }
fn default_embedding_model() -> String { "text-embedding-3-small".into() }
fn default_temperature() -> f32 { 0.3 }
fn default_request_timeout_secs() -> u64 { 60 }
fn default_max_retries() -> u32 { 2 }
fn default_retry_backoff_ms() -> u64 { 500 }

impl OpenAiConfig {
  /// Settings with every default and the given key.
  pub fn with_api_key(api_key: impl Into<String>) -> Self {
    Self {
      api_key:              api_key.into(),
      base_url:             default_base_url(),
      chat_model:           default_chat_model(),
      embedding_model:      default_embedding_model(),
      temperature:          default_temperature(),
      request_timeout_secs: default_request_timeout_secs(),
      max_retries:          default_max_retries(),
      retry_backoff_ms:     default_retry_backoff_ms(),
    }
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn retry_backoff(&self) -> Duration {
    Duration::from_millis(self.retry_backoff_ms)
  }
}

impl fmt::Debug for OpenAiConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OpenAiConfig")
      .field("api_key", &"<redacted>")
      .field("base_url", &self.base_url)
      .field("chat_model", &self.chat_model)
      .field("embedding_model", &self.embedding_model)
      .field("temperature", &self.temperature)
      .field("request_timeout_secs", &self.request_timeout_secs)
      .field("max_retries", &self.max_retries)
      .finish()
  }
}
