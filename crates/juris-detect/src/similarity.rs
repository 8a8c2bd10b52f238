//! Pairwise case similarity.
//!
//! Cosine similarity over embedding vectors is the primary measure. When
//! either case lacks an embedding the scorer falls back to Jaccard overlap of
//! lower-cased token sets, and says so in [`Similarity::method`]: lexical
//! scores are not comparable with cosine scores.

use std::collections::HashSet;

use juris_core::{Error, Result, case::{Case, SimilarityMethod}, vector};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
  /// In `[0, 1]`.
  pub score:  f32,
  pub method: SimilarityMethod,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
  /// Score `a` against `b`. Symmetric.
  ///
  /// Fails with [`Error::InvalidInput`] when embeddings are present but
  /// unusable (dimension mismatch, zero norm), or when the lexical fallback
  /// is needed and a case has empty text.
  pub fn score(&self, a: &Case, b: &Case) -> Result<Similarity> {
    if let (Some(va), Some(vb)) = (&a.embedding, &b.embedding) {
      let score = vector::cosine(va, vb).ok_or_else(|| {
        Error::InvalidInput(format!(
          "embeddings of {} ({} dims) and {} ({} dims) cannot be compared",
          a.id,
          va.len(),
          b.id,
          vb.len()
        ))
      })?;
      return Ok(Similarity { score, method: SimilarityMethod::Cosine });
    }

    for case in [a, b] {
      if case.text.trim().is_empty() {
        return Err(Error::InvalidInput(format!(
          "case {} has neither text nor a usable embedding",
          case.id
        )));
      }
    }

    tracing::debug!(a = %a.id, b = %b.id, "no embedding pair; using lexical similarity");
    Ok(Similarity {
      score:  jaccard(&tokens(&a.text), &tokens(&b.text)),
      method: SimilarityMethod::LexicalJaccard,
    })
  }
}

fn tokens(text: &str) -> HashSet<String> {
  text
    .split(|c: char| !c.is_alphanumeric())
    .filter(|t| !t.is_empty())
    .map(str::to_lowercase)
    .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
  let union = a.union(b).count();
  if union == 0 {
    return 0.0;
  }
  a.intersection(b).count() as f32 / union as f32
}
