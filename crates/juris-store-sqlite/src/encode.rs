//! Encoding and decoding helpers between juris domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are written as RFC 3339 strings. Embeddings are compact JSON arrays.

use chrono::{DateTime, Utc};
use juris_core::{case::Case, court::Court};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Embedding ───────────────────────────────────────────────────────────────

/// Reject vectors that cosine similarity cannot use.
pub fn check_embedding(id: &str, v: &[f32]) -> Result<()> {
  let reason = if v.is_empty() {
    "vector is empty"
  } else if v.iter().any(|x| !x.is_finite()) {
    "vector contains non-finite values"
  } else if v.iter().all(|x| *x == 0.0) {
    "vector has zero norm"
  } else {
    return Ok(());
  };
  Err(Error::InvalidEmbedding { id: id.to_string(), reason: reason.into() })
}

pub fn encode_embedding(v: &[f32]) -> Result<String> {
  Ok(serde_json::to_string(v)?)
}

pub fn decode_embedding(s: &str) -> Result<Vec<f32>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCase::from_row`].
pub const CASE_COLUMNS: &str =
  "case_id, court, title, body, theme, number, year, embedding";

/// Raw values read directly from a `cases` row.
pub struct RawCase {
  pub case_id:     String,
  pub court:       String,
  pub title:       String,
  pub body:        String,
  pub theme:       Option<String>,
  pub number:      Option<String>,
  pub year:        Option<i32>,
  pub embedding:   String,
}

impl RawCase {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      case_id:     row.get(0)?,
      court:       row.get(1)?,
      title:       row.get(2)?,
      body:        row.get(3)?,
      theme:       row.get(4)?,
      number:      row.get(5)?,
      year:        row.get(6)?,
      embedding:   row.get(7)?,
    })
  }

  pub fn into_case(self, retrieval_score: f32) -> Result<Case> {
    Ok(Case {
      court: Court::new(&self.court)?,
      embedding: Some(decode_embedding(&self.embedding)?),
      id: self.case_id,
      title: self.title,
      text: self.body,
      theme: self.theme,
      number: self.number,
      year: self.year,
      retrieval_score,
    })
  }
}
