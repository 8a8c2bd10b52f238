//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The retrieval backend failed while serving a detection run.
  #[error("upstream error: {0}")]
  Upstream(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<juris_core::Error> for ApiError {
  fn from(e: juris_core::Error) -> Self {
    use juris_core::Error;
    match e {
      Error::EmptyRetrieval { .. } => ApiError::NotFound(e.to_string()),
      Error::InvalidInput(m) => ApiError::BadRequest(m),
      Error::Retrieval(_) | Error::Generation(_) => ApiError::Upstream(e.to_string()),
      Error::Serialization(_) => ApiError::Store(Box::new(e)),
    }
  }
}

impl From<juris_store_sqlite::Error> for ApiError {
  fn from(e: juris_store_sqlite::Error) -> Self { ApiError::Store(Box::new(e)) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Upstream(m) => (StatusCode::BAD_GATEWAY, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    if status.is_server_error() {
      tracing::error!(%status, "request failed: {message}");
    }
    (status, Json(json!({ "error": message }))).into_response()
  }
}
