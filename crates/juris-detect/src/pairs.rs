//! Candidate pair enumeration.
//!
//! All `i < j` pairs of the retrieved set are considered; the cost is
//! quadratic in the number of cases, which retrieval caps at `max_cases`.
//! Same-court pairs are dropped before scoring and pairs below the threshold
//! are never materialised.

use std::sync::Arc;

use juris_core::{
  case::{Case, CasePair, pair_id},
  report::{FailureKind, PairFailure},
};

use crate::similarity::SimilarityScorer;

/// The output of [`PairGenerator::generate`].
#[derive(Debug, Default)]
pub struct PairSet {
  /// Pairs at or above the threshold, most similar first. Ties keep
  /// enumeration order, so the output is stable for a fixed input.
  pub pairs:    Vec<CasePair>,
  /// Cross-court pairs that were scored (successfully or not).
  pub compared: usize,
  /// Pairs whose scoring failed on malformed case data.
  pub failures: Vec<PairFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct PairGenerator {
  scorer: SimilarityScorer,
}

impl PairGenerator {
  pub fn new(scorer: SimilarityScorer) -> Self { Self { scorer } }

  pub fn generate(&self, cases: &[Arc<Case>], threshold: f32) -> PairSet {
    let mut set = PairSet::default();

    for (i, a) in cases.iter().enumerate() {
      for b in &cases[i + 1..] {
        if a.court == b.court || a.id == b.id {
          continue;
        }
        set.compared += 1;

        let similarity = match self.scorer.score(a, b) {
          Ok(s) => s,
          Err(e) => {
            set.failures.push(PairFailure {
              pair_id: pair_id(a, b),
              kind:    FailureKind::InvalidInput,
              message: e.to_string(),
            });
            continue;
          }
        };
        if similarity.score < threshold {
          continue;
        }

        // Court and id were checked above, so construction cannot fail.
        if let Ok(pair) = CasePair::new(
          Arc::clone(a),
          Arc::clone(b),
          similarity.score,
          similarity.method,
        ) {
          set.pairs.push(pair);
        }
      }
    }

    set
      .pairs
      .sort_by(|x, y| y.similarity.total_cmp(&x.similarity));
    set
  }
}
