//! Collaborator traits: retrieval, embedding, and text generation.
//!
//! Backends (`juris-store-sqlite`, `juris-openai`) implement these; the
//! detection pipeline depends only on the traits, so tests substitute
//! deterministic fakes.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{GenerationError, case::Case, court::CourtFilter};

// ─── Retrieval ───────────────────────────────────────────────────────────────

/// Semantic search over the case corpus.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait CaseRetriever: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return at most `top_k` cases relevant to `query`, in no required order.
  /// When `courts` is given, only cases from those courts are returned.
  fn retrieve<'a>(
    &'a self,
    query: &'a str,
    top_k: usize,
    courts: Option<&'a CourtFilter>,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + 'a;
}

// ─── Embedding ───────────────────────────────────────────────────────────────

/// Turns text into a fixed-dimension vector.
pub trait Embedder: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>, Self::Error>> + Send + 'a;
}

// ─── Generation ──────────────────────────────────────────────────────────────

/// A chat-style prompt: a system instruction and a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
  pub system: String,
  pub user:   String,
}

/// A text-generation service that answers with a JSON document.
pub trait TextGenerator: Send + Sync {
  /// Return the raw response body the model produced for `prompt`.
  fn complete<'a>(
    &'a self,
    prompt: &'a Prompt,
  ) -> impl Future<Output = Result<String, GenerationError>> + Send + 'a;
}
