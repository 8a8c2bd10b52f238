//! Integration tests for `SqliteCaseStore` against an in-memory database.

use std::convert::Infallible;

use juris_core::{
  case::NewCase,
  collab::{CaseRetriever, Embedder},
  court::{Court, CourtFilter},
};

use crate::{CourtCount, Error, SemanticRetriever, SqliteCaseStore};

async fn store() -> SqliteCaseStore {
  SqliteCaseStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_case(id: &str, court: &str, text: &str) -> NewCase {
  NewCase {
    id:     id.into(),
    court:  Court::new(court).unwrap(),
    title:  format!("Acórdão {id}"),
    text:   text.into(),
    theme:  Some("registro de candidatura".into()),
    number: Some(format!("0600{id}")),
    year:   Some(2022),
  }
}

/// Counts occurrences of a few fixed keywords, plus a constant component so
/// no text embeds to the zero vector.
struct KeywordEmbedder;

const VOCABULARY: [&str; 3] = ["registro", "propaganda", "recurso"];

impl Embedder for KeywordEmbedder {
  type Error = Infallible;

  async fn embed(&self, text: &str) -> Result<Vec<f32>, Infallible> {
    let text = text.to_lowercase();
    let mut v = vec![0.01];
    v.extend(VOCABULARY.iter().map(|w| text.matches(w).count() as f32));
    Ok(v)
  }
}

struct OfflineEmbedder;

impl Embedder for OfflineEmbedder {
  type Error = std::io::Error;

  async fn embed(&self, _text: &str) -> Result<Vec<f32>, std::io::Error> {
    Err(std::io::Error::other("embedding service offline"))
  }
}

// ─── Cases ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_case() {
  let s = store().await;
  let stored = s
    .insert_case(&new_case("a", "TRE-MG", "registro deferido"), &[1.0, 0.0])
    .await
    .unwrap();
  assert_eq!(stored.embedding.as_deref(), Some(&[1.0, 0.0][..]));

  let fetched = s.get_case("a").await.unwrap().unwrap();
  assert_eq!(fetched.court.code(), "TRE-MG");
  assert_eq!(fetched.text, "registro deferido");
  assert_eq!(fetched.theme.as_deref(), Some("registro de candidatura"));
  assert_eq!(fetched.number.as_deref(), Some("0600a"));
  assert_eq!(fetched.year, Some(2022));
  assert_eq!(fetched.embedding, Some(vec![1.0, 0.0]));
}

#[tokio::test]
async fn get_case_missing_returns_none() {
  let s = store().await;
  assert!(s.get_case("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn insert_replaces_case_with_same_id() {
  let s = store().await;
  s.insert_case(&new_case("a", "TRE-MG", "old text"), &[1.0, 0.0])
    .await
    .unwrap();
  s.insert_case(&new_case("a", "TRE-SP", "new text"), &[0.0, 1.0])
    .await
    .unwrap();

  assert_eq!(s.count().await.unwrap(), 1);
  let fetched = s.get_case("a").await.unwrap().unwrap();
  assert_eq!(fetched.court.code(), "TRE-SP");
  assert_eq!(fetched.text, "new text");
}

#[tokio::test]
async fn degenerate_embeddings_are_rejected_on_insert() {
  let s = store().await;
  let err = s
    .insert_case(&new_case("a", "TSE", "text"), &[0.0, 0.0])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidEmbedding { ref id, .. } if id == "a"));
  assert_eq!(s.count().await.unwrap(), 0);
}

#[tokio::test]
async fn court_counts_are_grouped_and_sorted() {
  let s = store().await;
  for (id, court) in [("a", "TRE-SP"), ("b", "TSE"), ("c", "TRE-SP"), ("d", "TRE-MG")] {
    s.insert_case(&new_case(id, court, "text"), &[1.0]).await.unwrap();
  }

  let counts = s.courts().await.unwrap();
  let expected = [("TRE-MG", 1), ("TRE-SP", 2), ("TSE", 1)]
    .map(|(code, cases)| CourtCount { court: Court::new(code).unwrap(), cases });
  assert_eq!(counts, expected);
  assert_eq!(s.count().await.unwrap(), 4);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_orders_by_score_then_id() {
  let s = store().await;
  s.insert_case(&new_case("far", "TSE", "t"), &[0.0, 1.0]).await.unwrap();
  s.insert_case(&new_case("b", "TRE-MG", "t"), &[1.0, 0.0]).await.unwrap();
  s.insert_case(&new_case("a", "TRE-SP", "t"), &[2.0, 0.0]).await.unwrap();
  s.insert_case(&new_case("mid", "TRE-RJ", "t"), &[1.0, 1.0]).await.unwrap();

  let hits = s.search(&[1.0, 0.0], 3, None).await.unwrap();
  let ids: Vec<&str> = hits.iter().map(|c| c.id.as_str()).collect();
  assert_eq!(ids, ["a", "b", "mid"]);
  assert!((hits[0].retrieval_score - 1.0).abs() < 1e-6);
  assert!((hits[2].retrieval_score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-4);
}

#[tokio::test]
async fn search_respects_court_filter() {
  let s = store().await;
  s.insert_case(&new_case("a", "TRE-MG", "t"), &[1.0, 0.0]).await.unwrap();
  s.insert_case(&new_case("b", "TRE-SP", "t"), &[1.0, 0.0]).await.unwrap();
  s.insert_case(&new_case("c", "TSE", "t"), &[1.0, 0.0]).await.unwrap();

  let filter: CourtFilter =
    [Court::new("TSE").unwrap(), Court::new("TRE-MG").unwrap()].into();
  let hits = s.search(&[1.0, 0.0], 10, Some(&filter)).await.unwrap();
  let ids: Vec<&str> = hits.iter().map(|c| c.id.as_str()).collect();
  assert_eq!(ids, ["a", "c"]);

  let none = s.search(&[1.0, 0.0], 10, Some(&CourtFilter::new())).await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn search_skips_vectors_of_other_dimensions() {
  let s = store().await;
  s.insert_case(&new_case("two", "TSE", "t"), &[1.0, 0.0]).await.unwrap();
  s.insert_case(&new_case("three", "TSE", "t"), &[1.0, 0.0, 0.0]).await.unwrap();

  let hits = s.search(&[1.0, 0.0], 10, None).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].id, "two");
}

#[tokio::test]
async fn search_skips_rows_that_fail_to_decode() {
  let s = store().await;
  s.insert_case(&new_case("good", "TSE", "t"), &[1.0, 0.0]).await.unwrap();
  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO cases (case_id, court, title, body, embedding, ingested_at)
         VALUES ('bad', 'TRE-MG', 'corrupt', 't', 'not json', '2024-01-01T00:00:00Z')",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let hits = s.search(&[1.0, 0.0], 10, None).await.unwrap();
  let ids: Vec<&str> = hits.iter().map(|c| c.id.as_str()).collect();
  assert_eq!(ids, ["good"]);
}

#[tokio::test]
async fn search_rejects_unusable_query_vector() {
  let s = store().await;
  assert!(s.search(&[], 5, None).await.is_err());
  assert!(s.search(&[1.0], 0, None).await.unwrap().is_empty());
}

// ─── SemanticRetriever ───────────────────────────────────────────────────────

#[tokio::test]
async fn retriever_ingests_and_finds_related_cases() {
  let r = SemanticRetriever::new(store().await, KeywordEmbedder);
  r.ingest(&new_case("reg", "TRE-MG", "registro de candidatura indeferido"))
    .await
    .unwrap();
  r.ingest(&new_case("prop", "TRE-SP", "propaganda irregular"))
    .await
    .unwrap();
  r.ingest(&new_case("rec", "TSE", "recurso sobre registro"))
    .await
    .unwrap();

  let hits = r.retrieve("registro", 2, None).await.unwrap();
  let ids: Vec<&str> = hits.iter().map(|c| c.id.as_str()).collect();
  assert_eq!(ids, ["reg", "rec"]);
  assert!(hits.iter().all(|c| c.embedding.is_some()));
  assert_eq!(r.store().count().await.unwrap(), 3);
}

#[tokio::test]
async fn embedder_failure_is_reported() {
  let r = SemanticRetriever::new(store().await, OfflineEmbedder);
  let err = r.retrieve("registro", 5, None).await.unwrap_err();
  assert!(matches!(err, Error::Embedder(_)));
  let err = r.ingest(&new_case("a", "TSE", "text")).await.unwrap_err();
  assert!(matches!(err, Error::Embedder(_)));
}
