//! Thematic grouping of confirmed contradictions.
//!
//! Grouping is a stable partition on a theme key: case1's theme, else case2's,
//! else a label derived from the query. Clusters are then ordered by their
//! most severe member, then by size, so the most actionable ones come first.

use std::collections::HashMap;

use juris_core::contradiction::{Cluster, Contradiction};

/// Label of the cluster that catches contradictions with no resolvable theme.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Fallback theme for contradictions whose cases carry none.
pub fn fallback_theme(query: &str) -> String {
  let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
  if query.is_empty() { UNCATEGORIZED.to_string() } else { query }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterEngine;

impl ClusterEngine {
  /// Partition `contradictions` into clusters. Every input lands in exactly
  /// one cluster; members keep their input order.
  pub fn cluster(
    &self,
    contradictions: Vec<Contradiction>,
    fallback: &str,
  ) -> Vec<Cluster> {
    let mut groups: Vec<(String, Vec<Contradiction>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for c in contradictions {
      let label = c.theme().unwrap_or(fallback).to_string();
      let key = label.to_lowercase();
      let slot = *index.entry(key).or_insert_with(|| {
        groups.push((label, Vec::new()));
        groups.len() - 1
      });
      groups[slot].1.push(c);
    }

    let mut clusters: Vec<Cluster> = groups
      .into_iter()
      .map(|(theme, members)| Cluster::new(theme, members))
      .collect();

    // Stable: equal clusters keep first-detection order.
    clusters.sort_by(|a, b| {
      b.max_severity()
        .cmp(&a.max_severity())
        .then_with(|| b.len().cmp(&a.len()))
    });
    clusters
  }
}
