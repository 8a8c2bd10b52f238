//! Error type for `juris-openai`.

use juris_core::GenerationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("OpenAI API key is not configured")]
  MissingApiKey,

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request timed out")]
  Timeout,

  #[error("http error: {0}")]
  Http(#[source] reqwest::Error),

  #[error("rate limited: {0}")]
  RateLimited(String),

  #[error("service returned status {status}: {body}")]
  Status { status: u16, body: String },

  #[error("malformed response: {0}")]
  Malformed(String),
}

impl Error {
  pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
    if e.is_timeout() { Self::Timeout } else { Self::Http(e) }
  }

  /// Worth another attempt: connection trouble or a server-side failure.
  pub(crate) fn is_transient(&self) -> bool {
    match self {
      Self::Http(_) => true,
      Self::Status { status, .. } => *status >= 500,
      _ => false,
    }
  }
}

impl From<Error> for GenerationError {
  fn from(e: Error) -> Self {
    match e {
      Error::Timeout => GenerationError::Timeout,
      Error::RateLimited(body) => GenerationError::Quota(body),
      Error::Status { status, body } => GenerationError::Rejected { status, body },
      Error::Malformed(msg) => GenerationError::Malformed(msg),
      other => GenerationError::Transport(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
