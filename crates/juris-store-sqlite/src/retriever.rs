//! [`SemanticRetriever`]: embeds queries and searches the corpus.

use juris_core::{
  case::{Case, NewCase},
  collab::{CaseRetriever, Embedder},
  court::CourtFilter,
};

use crate::{Error, Result, SqliteCaseStore};

/// A [`CaseRetriever`] over a [`SqliteCaseStore`], using `E` to embed both
/// queries and ingested case text.
pub struct SemanticRetriever<E> {
  store:    SqliteCaseStore,
  embedder: E,
}

impl<E: Embedder> SemanticRetriever<E> {
  pub fn new(store: SqliteCaseStore, embedder: E) -> Self { Self { store, embedder } }

  pub fn store(&self) -> &SqliteCaseStore { &self.store }

  pub fn embedder(&self) -> &E { &self.embedder }

  /// Embed `case.text` and store the case, replacing any previous version.
  pub async fn ingest(&self, case: &NewCase) -> Result<Case> {
    let embedding = self.embed(&case.text).await?;
    self.store.insert_case(case, &embedding).await
  }

  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    self
      .embedder
      .embed(text)
      .await
      .map_err(|e| Error::Embedder(Box::new(e)))
  }
}

impl<E: Embedder> CaseRetriever for SemanticRetriever<E> {
  type Error = Error;

  async fn retrieve(
    &self,
    query: &str,
    top_k: usize,
    courts: Option<&CourtFilter>,
  ) -> Result<Vec<Case>> {
    let vector = self.embed(query).await?;
    self.store.search(&vector, top_k, courts).await
  }
}
