//! The structured result of a detection run.
//!
//! This is the sole contract surface for downstream rendering. Nothing here
//! formats text for humans beyond short alert messages.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  contradiction::{Cluster, Contradiction, Severity},
  court::Court,
};

// ─── Failures ────────────────────────────────────────────────────────────────

/// Why a pair was skipped.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
  /// Malformed case data reached the similarity scorer.
  InvalidInput,
  /// The text-generation call failed or returned an unusable response.
  Generation,
  /// The text-generation call exceeded its per-call timeout.
  Timeout,
  /// The pair was opposed but the analysis budget was already spent.
  BudgetExceeded,
  /// The run deadline passed before the pair's analysis completed.
  DeadlineExceeded,
}

/// A pair that produced neither a contradiction nor a clean rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFailure {
  pub pair_id: String,
  pub kind:    FailureKind,
  pub message: String,
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Funnel counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
  pub cases_retrieved:          usize,
  /// Cross-court pairs whose similarity was computed (or attempted).
  pub pairs_compared:           usize,
  /// Pairs at or above the similarity threshold.
  pub pairs_generated:          usize,
  pub pairs_opposed:            usize,
  /// Opposed pairs whose deep analysis completed.
  pub pairs_analyzed:           usize,
  pub pairs_skipped:            usize,
  pub contradictions_confirmed: usize,
}

/// Per-court involvement in the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourtStats {
  pub total_cases:             usize,
  pub contradictions_involved: usize,
  /// `contradictions_involved / total_cases`.
  pub contradiction_rate:      f64,
  pub severity_distribution:   BTreeMap<Severity, usize>,
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
  pub query:          String,
  pub generated_at:   DateTime<Utc>,
  /// Confirmed contradictions in pair order.
  pub contradictions: Vec<Contradiction>,
  /// Every contradiction appears in exactly one cluster.
  pub clusters:       Vec<Cluster>,
  pub stats:          DetectionStats,
  pub failures:       Vec<PairFailure>,
  pub court_stats:    BTreeMap<Court, CourtStats>,
}

impl DetectionReport {
  /// Contradictions of [`Severity::Critical`].
  pub fn critical(&self) -> impl Iterator<Item = &Contradiction> {
    self
      .contradictions
      .iter()
      .filter(|c| c.severity == Severity::Critical)
  }

  /// Contradictions in which `court` is one of the two sides.
  pub fn involving<'a>(
    &'a self,
    court: &'a Court,
  ) -> impl Iterator<Item = &'a Contradiction> + 'a {
    self.contradictions.iter().filter(move |c| c.involves(court))
  }
}

// ─── Alerts ──────────────────────────────────────────────────────────────────

/// Notification priority, derived from severity.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
  Low,
  Medium,
  High,
  Urgent,
}

impl From<Severity> for Priority {
  fn from(severity: Severity) -> Self {
    match severity {
      Severity::Low => Self::Low,
      Severity::Medium => Self::Medium,
      Severity::High => Self::High,
      Severity::Critical => Self::Urgent,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
  pub contradiction_id: Uuid,
  pub priority:         Priority,
  /// High and critical contradictions warrant action before filing.
  pub actionable:       bool,
  pub courts:           Vec<Court>,
  pub message:          String,
}
