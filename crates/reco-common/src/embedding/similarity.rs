/// Cosine similarity clamped to 0.0〜1.0.
///
/// Returns 0.0 on a zero-norm vector, a non-finite component or a dimension
/// mismatch; negative
/// similarity is treated as "unrelated" rather than rescaled.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cosine = dot / (norm_a * norm_b);
    if !cosine.is_finite() {
        return 0.0;
    }
    cosine.clamp(0.0, 1.0)
}
