//! Outcome polarity, confirmed contradictions, and themed clusters.

use std::{
  collections::{BTreeMap, BTreeSet, HashSet},
  sync::Arc,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  case::{Case, serialize_summary},
  court::Court,
};

// ─── Polarity ────────────────────────────────────────────────────────────────

/// The reduced outcome of a decision. Recomputed from the text on demand;
/// never stored.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Polarity {
  Granted,
  Denied,
  /// No marker found, or markers of both outcomes found.
  Unknown,
}

impl Polarity {
  /// `true` iff one side is granted and the other denied.
  pub fn opposes(self, other: Self) -> bool {
    matches!(
      (self, other),
      (Self::Granted, Self::Denied) | (Self::Denied, Self::Granted)
    )
  }
}

// ─── Classification ──────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContradictionType {
  /// Opposite outcomes on comparable facts.
  #[serde(alias = "decisao_oposta")]
  OppositeDecision,
  /// Same outcome reached through contradictory grounds.
  #[serde(alias = "fundamento_diverso")]
  DivergentGrounds,
  /// Different readings of the same statute.
  #[serde(alias = "interpretacao_divergente")]
  DivergentInterpretation,
  /// Conflicting criteria applied when judging.
  #[serde(alias = "criterio_conflitante")]
  ConflictingCriteria,
}

/// How serious a contradiction is. Totally ordered from `Low` to `Critical`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
  #[serde(alias = "baixa")]
  Low,
  #[serde(alias = "média", alias = "media")]
  Medium,
  #[serde(alias = "alta")]
  High,
  #[serde(alias = "crítica", alias = "critica")]
  Critical,
}

// ─── Contradiction ───────────────────────────────────────────────────────────

/// A pair of decisions confirmed as contradictory by deep analysis.
///
/// Only ever created for a confirmed pair; rejected pairs leave no record.
#[derive(Debug, Clone, Serialize)]
pub struct Contradiction {
  pub id:                 Uuid,
  #[serde(serialize_with = "serialize_summary")]
  pub case1:              Arc<Case>,
  #[serde(serialize_with = "serialize_summary")]
  pub case2:              Arc<Case>,
  /// Copied from the source pair.
  pub similarity_score:   f32,
  #[serde(rename = "type")]
  pub kind:               ContradictionType,
  pub severity:           Severity,
  pub explanation:        String,
  pub legal_impact:       String,
  pub recommended_action: String,
  pub detected_at:        DateTime<Utc>,
}

impl Contradiction {
  /// Theme of the contradiction: case1's theme wins, then case2's.
  pub fn theme(&self) -> Option<&str> {
    self.case1.theme().or_else(|| self.case2.theme())
  }

  pub fn courts(&self) -> [&Court; 2] { [&self.case1.court, &self.case2.court] }

  pub fn involves(&self, court: &Court) -> bool {
    self.courts().contains(&court)
  }
}

// ─── Cluster ─────────────────────────────────────────────────────────────────

/// Contradictions sharing a theme, in detection order.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
  pub theme:                 String,
  #[serde(serialize_with = "serialize_member_ids")]
  pub members:               Vec<Contradiction>,
  /// Distinct courts across all members, sorted.
  pub affected_courts:       Vec<Court>,
  /// Distinct cases across all members.
  pub case_count:            usize,
  pub severity_distribution: BTreeMap<Severity, usize>,
}

impl Cluster {
  pub fn new(theme: String, members: Vec<Contradiction>) -> Self {
    let affected_courts: BTreeSet<Court> = members
      .iter()
      .flat_map(|c| c.courts().map(|court| court.clone()))
      .collect();

    let case_count = members
      .iter()
      .flat_map(|c| [c.case1.id.as_str(), c.case2.id.as_str()])
      .collect::<HashSet<_>>()
      .len();

    let mut severity_distribution = BTreeMap::new();
    for c in &members {
      *severity_distribution.entry(c.severity).or_insert(0) += 1;
    }

    Self {
      theme,
      members,
      affected_courts: affected_courts.into_iter().collect(),
      case_count,
      severity_distribution,
    }
  }

  pub fn len(&self) -> usize { self.members.len() }

  pub fn is_empty(&self) -> bool { self.members.is_empty() }

  /// Severity of the most serious member; `None` for an empty cluster.
  pub fn max_severity(&self) -> Option<Severity> {
    self.members.iter().map(|c| c.severity).max()
  }
}

fn serialize_member_ids<S>(
  members: &[Contradiction],
  s: S,
) -> Result<S::Ok, S::Error>
where
  S: Serializer,
{
  s.collect_seq(members.iter().map(|c| c.id))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_granted_and_denied_oppose() {
    use Polarity::*;
    assert!(Granted.opposes(Denied));
    assert!(Denied.opposes(Granted));
    assert!(!Granted.opposes(Granted));
    assert!(!Unknown.opposes(Denied));
    assert!(!Granted.opposes(Unknown));
  }

  #[test]
  fn severity_is_totally_ordered() {
    assert!(Severity::Low < Severity::Medium);
    assert!(Severity::Medium < Severity::High);
    assert!(Severity::High < Severity::Critical);
  }

  #[test]
  fn portuguese_labels_are_accepted() {
    let s: Severity = serde_json::from_str("\"crítica\"").unwrap();
    assert_eq!(s, Severity::Critical);
    let s: Severity = serde_json::from_str("\"media\"").unwrap();
    assert_eq!(s, Severity::Medium);
    let t: ContradictionType =
      serde_json::from_str("\"interpretacao_divergente\"").unwrap();
    assert_eq!(t, ContradictionType::DivergentInterpretation);
  }

  #[test]
  fn strum_and_serde_spellings_agree() {
    assert_eq!(ContradictionType::OppositeDecision.to_string(), "opposite_decision");
    assert_eq!("high".parse::<Severity>().unwrap(), Severity::High);
    assert_eq!(
      serde_json::to_string(&Severity::High).unwrap(),
      format!("\"{}\"", Severity::High)
    );
  }
}
