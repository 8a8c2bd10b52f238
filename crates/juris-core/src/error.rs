//! Error types for `juris-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The retrieval collaborator returned nothing for the query. This is the
  /// only error that aborts a detection run.
  #[error("no cases retrieved for query {query:?}")]
  EmptyRetrieval { query: String },

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("generation error: {0}")]
  Generation(#[from] GenerationError),

  #[error("retrieval error: {0}")]
  Retrieval(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// Failure of a single call to the text-generation collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
  #[error("generation call timed out")]
  Timeout,

  #[error("generation quota exhausted: {0}")]
  Quota(String),

  #[error("transport error: {0}")]
  Transport(String),

  #[error("service rejected request with status {status}: {body}")]
  Rejected { status: u16, body: String },

  #[error("malformed response: {0}")]
  Malformed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
