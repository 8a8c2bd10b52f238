//! JSON HTTP API for juris.
//!
//! Exposes an axum [`Router`] over a [`ContradictionDetector`] and the
//! [`SqliteCaseStore`] corpus. TLS and auth are the caller's responsibility.

pub mod corpus;
pub mod detect;
pub mod error;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use juris_core::collab::{CaseRetriever, TextGenerator};
use juris_detect::{ContradictionDetector, DetectOptions};
use juris_store_sqlite::SqliteCaseStore;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<R, G> {
  pub detector: Arc<ContradictionDetector<R, G>>,
  pub store:    SqliteCaseStore,
  /// Options used for any field a request leaves unset.
  pub defaults: Arc<DetectOptions>,
}

impl<R, G> Clone for AppState<R, G> {
  fn clone(&self) -> Self {
    Self {
      detector: Arc::clone(&self.detector),
      store:    self.store.clone(),
      defaults: Arc::clone(&self.defaults),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<R, G>(state: AppState<R, G>) -> Router
where
  R: CaseRetriever + 'static,
  G: TextGenerator + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route("/detect", post(detect::handler::<R, G>))
    .route("/corpus/stats", get(corpus::stats::<R, G>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /health`
async fn health() -> Json<Value> {
  Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
