//! The cheap stage of the funnel: polarity opposition.
//!
//! Deep analysis cost scales with the pairs that pass this check, not with
//! every similar pair. Any `Unknown` side means the pair is not escalated.

use juris_core::{case::CasePair, contradiction::Polarity};

use crate::classify::DecisionClassifier;

#[derive(Debug, Clone, Default)]
pub struct ContradictionChecker {
  classifier: DecisionClassifier,
}

impl ContradictionChecker {
  pub fn new(classifier: DecisionClassifier) -> Self { Self { classifier } }

  pub fn classifier(&self) -> &DecisionClassifier { &self.classifier }

  /// Polarities of `(case_a, case_b)`.
  pub fn polarities(&self, pair: &CasePair) -> (Polarity, Polarity) {
    (
      self.classifier.classify(&pair.case_a.text),
      self.classifier.classify(&pair.case_b.text),
    )
  }

  /// `true` iff one case is granted and the other denied. Symmetric.
  pub fn is_opposed(&self, pair: &CasePair) -> bool {
    let (a, b) = self.polarities(pair);
    a.opposes(b)
  }
}
