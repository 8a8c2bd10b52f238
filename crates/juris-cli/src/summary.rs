//! Plain-text rendering of a [`DetectionReport`] for the terminal.

use std::fmt::Write as _;

use juris_core::report::DetectionReport;

/// Render `report` as a human-readable summary.
///
/// The funnel counts are always printed, even when nothing was found.
pub fn render(report: &DetectionReport) -> String {
  let s = &report.stats;
  let mut out = String::new();

  let _ = writeln!(out, "Query: {}", report.query);
  let _ = writeln!(out, "Cases analysed: {}", s.cases_retrieved);
  let _ = writeln!(
    out,
    "Pairs compared: {} ({} above threshold, {} with opposing outcomes)",
    s.pairs_compared, s.pairs_generated, s.pairs_opposed
  );
  let _ = writeln!(out, "Pairs skipped: {}", s.pairs_skipped);
  let _ = writeln!(
    out,
    "Contradictions confirmed: {} in {} cluster(s)",
    s.contradictions_confirmed,
    report.clusters.len()
  );

  for cluster in &report.clusters {
    let courts: Vec<&str> = cluster.affected_courts.iter().map(|c| c.code()).collect();
    let _ = writeln!(
      out,
      "\n## {} ({} contradiction(s); courts: {})",
      cluster.theme,
      cluster.len(),
      courts.join(", ")
    );
    for c in &cluster.members {
      let _ = writeln!(
        out,
        "- [{}] {} ({}) vs {} ({}): {}",
        c.severity.to_string().to_uppercase(),
        c.case1.id,
        c.case1.court,
        c.case2.id,
        c.case2.court,
        c.explanation
      );
    }
  }

  if !report.failures.is_empty() {
    let _ = writeln!(out, "\nSkipped pairs:");
    for f in &report.failures {
      let _ = writeln!(out, "- {} [{}]: {}", f.pair_id, f.kind, f.message);
    }
  }
  out
}
