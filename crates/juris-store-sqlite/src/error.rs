//! Error type for `juris-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] juris_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Stored or supplied vectors must be non-empty and finite.
  #[error("invalid embedding for case {id}: {reason}")]
  InvalidEmbedding { id: String, reason: String },

  #[error("embedding service error: {0}")]
  Embedder(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
