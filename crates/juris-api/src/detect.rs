//! Handler for `POST /detect`.
//!
//! Request fields override the server's default [`DetectOptions`].

use std::time::Duration;

use axum::{Json, extract::State};
use juris_core::{
  collab::{CaseRetriever, TextGenerator},
  contradiction::Severity,
  court::{Court, CourtFilter},
  report::{Alert, DetectionReport},
};
use juris_detect::{DetectOptions, report::alerts};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
  pub query:                String,
  pub similarity_threshold: Option<f32>,
  /// Capped at the server's configured `max_cases`.
  pub max_cases:            Option<usize>,
  /// Restrict retrieval to these courts; empty means no restriction.
  #[serde(default)]
  pub courts:               Vec<Court>,
  pub deadline_secs:        Option<u64>,
  /// Alerts are produced for contradictions at or above this severity.
  #[serde(default = "default_alert_severity")]
  pub alert_severity:       Severity,
}

fn default_alert_severity() -> Severity { Severity::High }

#[derive(Debug, Serialize)]
pub struct DetectResponse {
  #[serde(flatten)]
  pub report: DetectionReport,
  pub alerts: Vec<Alert>,
}

impl DetectRequest {
  fn options(&self, defaults: &DetectOptions) -> DetectOptions {
    DetectOptions {
      similarity_threshold: self
        .similarity_threshold
        .unwrap_or(defaults.similarity_threshold),
      // A request may lower the server's case limit but never raise it.
      max_cases:            self
        .max_cases
        .map_or(defaults.max_cases, |n| n.min(defaults.max_cases)),
      courts:               if self.courts.is_empty() {
        defaults.courts.clone()
      } else {
        Some(self.courts.iter().cloned().collect::<CourtFilter>())
      },
      deadline:             self
        .deadline_secs
        .map(Duration::from_secs)
        .or(defaults.deadline),
      analysis_budget:      defaults.analysis_budget,
    }
  }
}

/// `POST /detect`
pub async fn handler<R, G>(
  State(state): State<AppState<R, G>>,
  Json(req): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, ApiError>
where
  R: CaseRetriever + 'static,
  G: TextGenerator + 'static,
{
  if req.query.trim().is_empty() {
    return Err(ApiError::BadRequest("query must not be blank".into()));
  }
  let options = req.options(&state.defaults);
  let report = state.detector.detect(&req.query, &options).await?;
  let alerts = alerts(&report.contradictions, req.alert_severity);
  Ok(Json(DetectResponse { report, alerts }))
}
