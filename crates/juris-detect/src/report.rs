//! Report enrichment: per-court statistics and alerts.

use std::{collections::BTreeMap, sync::Arc};

use juris_core::{
  case::Case,
  contradiction::{Contradiction, Severity},
  court::Court,
  report::{Alert, CourtStats, Priority},
};

/// Per-court case counts and contradiction involvement.
pub fn court_stats(
  cases: &[Arc<Case>],
  contradictions: &[Contradiction],
) -> BTreeMap<Court, CourtStats> {
  let mut stats: BTreeMap<Court, CourtStats> = BTreeMap::new();

  for case in cases {
    stats.entry(case.court.clone()).or_default().total_cases += 1;
  }
  for c in contradictions {
    for court in c.courts() {
      let entry = stats.entry(court.clone()).or_default();
      entry.contradictions_involved += 1;
      *entry.severity_distribution.entry(c.severity).or_insert(0) += 1;
    }
  }
  for entry in stats.values_mut() {
    if entry.total_cases > 0 {
      entry.contradiction_rate =
        entry.contradictions_involved as f64 / entry.total_cases as f64;
    }
  }
  stats
}

/// Alerts for contradictions at or above `min_severity`, most urgent first.
/// Contradictions of equal priority keep their input order.
pub fn alerts(contradictions: &[Contradiction], min_severity: Severity) -> Vec<Alert> {
  let mut alerts: Vec<Alert> = contradictions
    .iter()
    .filter(|c| c.severity >= min_severity)
    .map(alert)
    .collect();
  alerts.sort_by(|a, b| b.priority.cmp(&a.priority));
  alerts
}

fn alert(c: &Contradiction) -> Alert {
  let message = format!(
    "Contradiction between {} and {}: {} Impact: {}",
    c.case1.court, c.case2.court, c.explanation, c.legal_impact
  );
  Alert {
    contradiction_id: c.id,
    priority: Priority::from(c.severity),
    actionable: c.severity >= Severity::High,
    courts: c.courts().map(|court| court.clone()).to_vec(),
    message,
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use juris_core::contradiction::ContradictionType;
  use uuid::Uuid;

  use super::*;

  fn case(id: &str, court: &str) -> Arc<Case> {
    Arc::new(Case {
      id:              id.into(),
      court:           Court::new(court).unwrap(),
      title:           id.into(),
      text:            String::new(),
      theme:           None,
      number:          None,
      year:            None,
      embedding:       None,
      retrieval_score: 0.0,
    })
  }

  fn contradiction(a: &Arc<Case>, b: &Arc<Case>, severity: Severity) -> Contradiction {
    Contradiction {
      id: Uuid::new_v4(),
      case1: a.clone(),
      case2: b.clone(),
      similarity_score: 0.9,
      kind: ContradictionType::OppositeDecision,
      severity,
      explanation: "Opposite outcomes.".into(),
      legal_impact: "Uncertainty.".into(),
      recommended_action: String::new(),
      detected_at: Utc::now(),
    }
  }

  #[test]
  fn court_stats_count_cases_and_involvement() {
    let cases = vec![case("a", "TRE-MG"), case("b", "TRE-MG"), case("c", "TRE-SP")];
    let found = vec![
      contradiction(&cases[0], &cases[2], Severity::High),
      contradiction(&cases[1], &cases[2], Severity::Low),
    ];
    let stats = court_stats(&cases, &found);

    let mg = &stats[&Court::new("TRE-MG").unwrap()];
    assert_eq!(mg.total_cases, 2);
    assert_eq!(mg.contradictions_involved, 2);
    assert!((mg.contradiction_rate - 1.0).abs() < f64::EPSILON);

    let sp = &stats[&Court::new("TRE-SP").unwrap()];
    assert_eq!(sp.total_cases, 1);
    assert_eq!(sp.contradictions_involved, 2);
    assert_eq!(sp.severity_distribution.get(&Severity::Low), Some(&1));
  }

  #[test]
  fn alerts_filter_and_sort_by_priority() {
    let (a, b) = (case("a", "TRE-MG"), case("b", "TSE"));
    let found = vec![
      contradiction(&a, &b, Severity::Medium),
      contradiction(&a, &b, Severity::Low),
      contradiction(&a, &b, Severity::Critical),
      contradiction(&a, &b, Severity::High),
    ];
    let alerts = alerts(&found, Severity::Medium);
    let priorities: Vec<Priority> = alerts.iter().map(|a| a.priority).collect();
    assert_eq!(priorities, [Priority::Urgent, Priority::High, Priority::Medium]);
    assert!(alerts[0].actionable && alerts[1].actionable && !alerts[2].actionable);
    assert!(alerts[0].message.contains("TRE-MG and TSE"));
  }
}
