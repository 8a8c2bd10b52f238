//! Vector math shared by the similarity scorer and the corpus store.

/// Cosine similarity of two vectors, clamped to `[0, 1]`.
///
/// Returns `None` when the dimensions differ, a vector is empty, or either
/// vector has zero norm.
pub fn cosine(a: &[f32], b: &[f32]) -> Option<f32> {
  if a.is_empty() || a.len() != b.len() {
    return None;
  }
  let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
  for (x, y) in a.iter().zip(b) {
    let (x, y) = (f64::from(*x), f64::from(*y));
    dot += x * y;
    norm_a += x * x;
    norm_b += y * y;
  }
  if norm_a == 0.0 || norm_b == 0.0 {
    return None;
  }
  let sim = dot / (norm_a.sqrt() * norm_b.sqrt());
  Some(sim.clamp(0.0, 1.0) as f32)
}
