//! Handler for `GET /corpus/stats`.

use axum::{Json, extract::State};
use juris_core::collab::{CaseRetriever, TextGenerator};
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct CorpusStats {
  pub total_cases: usize,
  pub courts:      Vec<CourtEntry>,
}

#[derive(Debug, Serialize)]
pub struct CourtEntry {
  pub code:  String,
  /// Display name, for known courts.
  pub name:  Option<&'static str>,
  pub cases: usize,
}

/// `GET /corpus/stats`
pub async fn stats<R, G>(
  State(state): State<AppState<R, G>>,
) -> Result<Json<CorpusStats>, ApiError>
where
  R: CaseRetriever + 'static,
  G: TextGenerator + 'static,
{
  let total_cases = state.store.count().await?;
  let courts = state
    .store
    .courts()
    .await?
    .into_iter()
    .map(|c| CourtEntry {
      name:  c.court.name(),
      code:  c.court.code().to_owned(),
      cases: c.cases,
    })
    .collect();
  Ok(Json(CorpusStats { total_cases, courts }))
}
