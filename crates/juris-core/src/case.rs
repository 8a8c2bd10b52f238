//! Case types: the retrieved decisions the detector compares.
//!
//! A case is created by the retrieval collaborator for a single detection run
//! and never mutated afterwards. Pairs and contradictions share cases through
//! [`Arc`] rather than copying decision text.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize, Serializer};

use crate::{Error, Result, court::Court};

// ─── Case ────────────────────────────────────────────────────────────────────

/// A retrieved jurisprudence document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
  pub id:              String,
  pub court:           Court,
  pub title:           String,
  /// Full decision text.
  pub text:            String,
  /// Topical tag, e.g. "registro de candidatura".
  #[serde(default)]
  pub theme:           Option<String>,
  /// Case number as printed in the official gazette.
  #[serde(default)]
  pub number:          Option<String>,
  #[serde(default)]
  pub year:            Option<i32>,
  /// Embedding vector from the retrieval index, when it exposes one.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub embedding:       Option<Vec<f32>>,
  /// Similarity of this case to the query that retrieved it, in `[0, 1]`.
  #[serde(default)]
  pub retrieval_score: f32,
}

impl Case {
  /// The theme, if present and not blank.
  pub fn theme(&self) -> Option<&str> {
    self.theme.as_deref().map(str::trim).filter(|t| !t.is_empty())
  }

  pub fn summary(&self) -> CaseSummary {
    CaseSummary {
      id:         self.id.clone(),
      court:      self.court.clone(),
      court_name: self.court.name().map(str::to_owned),
      title:      self.title.clone(),
      theme:      self.theme().map(str::to_owned),
    }
  }
}

/// The export view of a case: identity and labels, never the full text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
  pub id:         String,
  pub court:      Court,
  pub court_name: Option<String>,
  pub title:      String,
  pub theme:      Option<String>,
}

/// Serialise a shared case as its [`CaseSummary`].
pub fn serialize_summary<S>(case: &Arc<Case>, s: S) -> Result<S::Ok, S::Error>
where
  S: Serializer,
{
  case.summary().serialize(s)
}

// ─── NewCase ─────────────────────────────────────────────────────────────────

/// Input to corpus ingestion. The embedding is computed at ingest time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCase {
  pub id:     String,
  pub court:  Court,
  pub title:  String,
  pub text:   String,
  #[serde(default)]
  pub theme:  Option<String>,
  #[serde(default)]
  pub number: Option<String>,
  #[serde(default)]
  pub year:   Option<i32>,
}

// ─── Pairs ───────────────────────────────────────────────────────────────────

/// Which scorer produced a pair's similarity. Scores from different methods
/// are not comparable with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
  /// Cosine similarity over embedding vectors.
  Cosine,
  /// Jaccard overlap of token sets; used when a case has no embedding.
  LexicalJaccard,
}

/// Two distinct cases from different courts, with their pairwise similarity.
#[derive(Debug, Clone)]
pub struct CasePair {
  pub case_a:     Arc<Case>,
  pub case_b:     Arc<Case>,
  pub similarity: f32,
  pub method:     SimilarityMethod,
}

impl CasePair {
  /// Build a pair, enforcing the cross-court and distinct-id invariants.
  pub fn new(
    case_a: Arc<Case>,
    case_b: Arc<Case>,
    similarity: f32,
    method: SimilarityMethod,
  ) -> Result<Self> {
    if case_a.id == case_b.id {
      return Err(Error::InvalidInput(format!(
        "case {} cannot be paired with itself",
        case_a.id
      )));
    }
    if case_a.court == case_b.court {
      return Err(Error::InvalidInput(format!(
        "cases {} and {} share court {}",
        case_a.id, case_b.id, case_a.court
      )));
    }
    Ok(Self { case_a, case_b, similarity, method })
  }

  /// Stable identifier used when reporting per-pair failures.
  pub fn pair_id(&self) -> String { pair_id(&self.case_a, &self.case_b) }

  /// The same pair with its cases swapped.
  pub fn reversed(&self) -> Self {
    Self {
      case_a:     Arc::clone(&self.case_b),
      case_b:     Arc::clone(&self.case_a),
      similarity: self.similarity,
      method:     self.method,
    }
  }
}

impl fmt::Display for CasePair {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} ({}) ↔ {} ({})",
      self.case_a.id, self.case_a.court, self.case_b.id, self.case_b.court
    )
  }
}

/// Identifier for a (possibly never materialised) pair of cases.
pub fn pair_id(a: &Case, b: &Case) -> String { format!("{}::{}", a.id, b.id) }

#[cfg(test)]
mod tests {
  use super::*;

  fn case(id: &str, court: &str) -> Arc<Case> {
    Arc::new(Case {
      id:              id.into(),
      court:           Court::new(court).unwrap(),
      title:           format!("Acórdão {id}"),
      text:            "recurso provido".into(),
      theme:           Some("  ".into()),
      number:          None,
      year:            None,
      embedding:       None,
      retrieval_score: 0.5,
    })
  }

  #[test]
  fn same_court_pair_is_rejected() {
    let err = CasePair::new(
      case("a", "TRE-MG"),
      case("b", "tre-mg"),
      0.9,
      SimilarityMethod::Cosine,
    );
    assert!(matches!(err, Err(Error::InvalidInput(_))));
  }

  #[test]
  fn self_pair_is_rejected() {
    let a = case("a", "TRE-MG");
    let mut other = (*a).clone();
    other.court = Court::new("TRE-SP").unwrap();
    let err =
      CasePair::new(a, Arc::new(other), 0.9, SimilarityMethod::Cosine);
    assert!(matches!(err, Err(Error::InvalidInput(_))));
  }

  #[test]
  fn reversed_swaps_cases_and_keeps_score() {
    let pair = CasePair::new(
      case("a", "TRE-MG"),
      case("b", "TRE-SP"),
      0.8,
      SimilarityMethod::Cosine,
    )
    .unwrap();
    let rev = pair.reversed();
    assert_eq!(rev.case_a.id, "b");
    assert_eq!(rev.case_b.id, "a");
    assert_eq!(rev.similarity, 0.8);
    assert_eq!(pair.pair_id(), "a::b");
  }

  #[test]
  fn blank_theme_is_absent_and_summary_drops_text() {
    let c = case("a", "TSE");
    assert_eq!(c.theme(), None);
    let json = serde_json::to_value(c.summary()).unwrap();
    assert!(json.get("text").is_none());
    assert_eq!(json["court_name"], "Tribunal Superior Eleitoral");
  }
}
