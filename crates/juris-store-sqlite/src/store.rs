//! [`SqliteCaseStore`]: the SQLite case corpus with vector search.

use std::{cmp::Ordering, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use juris_core::{
  case::{Case, NewCase},
  court::{Court, CourtFilter},
  vector::cosine,
};

use crate::{
  Result,
  encode::{CASE_COLUMNS, RawCase, check_embedding, encode_dt, encode_embedding},
  schema::SCHEMA,
};

/// Number of stored cases for one court.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourtCount {
  pub court: Court,
  pub cases: usize,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A case corpus backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteCaseStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteCaseStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Store `case` with its embedding, replacing any case with the same id.
  pub async fn insert_case(&self, case: &NewCase, embedding: &[f32]) -> Result<Case> {
    if case.id.trim().is_empty() {
      return Err(juris_core::Error::InvalidInput("case id is blank".into()).into());
    }
    check_embedding(&case.id, embedding)?;

    let id            = case.id.clone();
    let court         = case.court.code().to_owned();
    let title         = case.title.clone();
    let body          = case.text.clone();
    let theme         = case.theme.clone();
    let number        = case.number.clone();
    let year          = case.year;
    let embedding_str = encode_embedding(embedding)?;
    let ingested_at   = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO cases (
             case_id, court, title, body, theme, number, year,
             embedding, ingested_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id,
            court,
            title,
            body,
            theme,
            number,
            year,
            embedding_str,
            ingested_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(Case {
      id:              case.id.clone(),
      court:           case.court.clone(),
      title:           case.title.clone(),
      text:            case.text.clone(),
      theme:           case.theme.clone(),
      number:          case.number.clone(),
      year:            case.year,
      embedding:       Some(embedding.to_vec()),
      retrieval_score: 0.0,
    })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn get_case(&self, id: &str) -> Result<Option<Case>> {
    let id = id.to_owned();
    let raw: Option<RawCase> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawCase::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(|r| r.into_case(0.0)).transpose()
  }

  /// Total number of stored cases.
  pub async fn count(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM cases", [], |r| r.get(0))?)
      })
      .await?;
    Ok(usize::try_from(n).unwrap_or_default())
  }

  /// Case counts per court, ordered by court code.
  pub async fn courts(&self) -> Result<Vec<CourtCount>> {
    let rows: Vec<(String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT court, COUNT(*) FROM cases GROUP BY court ORDER BY court",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(code, n)| -> Result<CourtCount> {
        Ok(CourtCount {
          court: Court::new(code)?,
          cases: usize::try_from(n).unwrap_or_default(),
        })
      })
      .collect()
  }

  // ── Search ────────────────────────────────────────────────────────────────

  /// The `top_k` cases most similar to `query`, best first.
  ///
  /// Scores are cosine similarity clamped to `[0, 1]` and are written to
  /// each case's `retrieval_score`. Equal scores are ordered by case id.
  /// Stored vectors whose dimension differs from `query`, and rows that fail
  /// to decode, are skipped. When
  /// `courts` is given, only cases from those courts are considered.
  pub async fn search(
    &self,
    query: &[f32],
    top_k: usize,
    courts: Option<&CourtFilter>,
  ) -> Result<Vec<Case>> {
    check_embedding("<query>", query)?;
    if top_k == 0 {
      return Ok(Vec::new());
    }

    let codes: Option<Vec<String>> =
      courts.map(|f| f.iter().map(|c| c.code().to_owned()).collect());
    if codes.as_ref().is_some_and(Vec::is_empty) {
      return Ok(Vec::new());
    }

    let raw: Vec<RawCase> = self
      .conn
      .call(move |conn| {
        let rows = match codes {
          Some(codes) => {
            let placeholders = vec!["?"; codes.len()].join(", ");
            let sql = format!(
              "SELECT {CASE_COLUMNS} FROM cases WHERE court IN ({placeholders})"
            );
            let mut stmt = conn.prepare(&sql)?;
            stmt
              .query_map(rusqlite::params_from_iter(codes), RawCase::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
          None => {
            let sql = format!("SELECT {CASE_COLUMNS} FROM cases");
            let mut stmt = conn.prepare(&sql)?;
            stmt
              .query_map([], RawCase::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
        };
        Ok(rows)
      })
      .await?;

    let mut scored = Vec::with_capacity(raw.len());
    for row in raw {
      let id = row.case_id.clone();
      let mut case = match row.into_case(0.0) {
        Ok(case) => case,
        Err(e) => {
          tracing::warn!(case = %id, "skipping unreadable case row: {e}");
          continue;
        }
      };
      let Some(score) = case.embedding.as_deref().and_then(|e| cosine(query, e))
      else {
        continue;
      };
      case.retrieval_score = score;
      scored.push(case);
    }

    scored.sort_by(|a, b| {
      b.retrieval_score
        .partial_cmp(&a.retrieval_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.id.cmp(&b.id))
    });
    scored.truncate(top_k);
    Ok(scored)
  }
}
