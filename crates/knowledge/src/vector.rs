//! Similarity math over dense embedding vectors.

/// Cosine similarity between two vectors of equal dimension.
///
/// Returns 0.0 for mismatched lengths, empty inputs, or zero-magnitude
/// vectors rather than dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for i in 0..a.len() {
        dot += (a[i] as f64) * (b[i] as f64);
        norm_a += (a[i] as f64) * (a[i] as f64);
        norm_b += (b[i] as f64) * (b[i] as f64);
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Rank the rows of a flat row-major matrix by cosine similarity to `query`.
///
/// Returns at most `k` `(row_index, score)` pairs, best first. Rows whose
/// dimension does not match the query score 0.0 like any other degenerate
/// comparison.
pub fn nearest(vectors: &[f32], dim: usize, query: &[f32], k: usize) -> Vec<(usize, f32)> {
    if dim == 0 || k == 0 || vectors.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f32)> = vectors
        .chunks_exact(dim)
        .enumerate()
        .map(|(row, vector)| (row, cosine_similarity(query, vector)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_known_angle() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 1.0];
        assert!((cosine_similarity(&a, &b) - 0.7071).abs() < 1e-3);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_similarity_empty() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_nearest_orders_by_score() {
        // Three rows of dimension 2: aligned, orthogonal, opposite.
        let vectors = vec![1.0, 0.0, 0.0, 1.0, -1.0, 0.0];
        let hits = nearest(&vectors, 2, &[1.0, 0.0], 3);

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].0, 0);
        assert_eq!(hits[1].0, 1);
        assert_eq!(hits[2].0, 2);
        assert!(hits[0].1 > hits[1].1);
        assert!(hits[1].1 > hits[2].1);
    }

    #[test]
    fn test_nearest_truncates_to_k() {
        let vectors = vec![1.0, 0.0, 0.0, 1.0, -1.0, 0.0];
        let hits = nearest(&vectors, 2, &[1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, 0);
    }

    #[test]
    fn test_nearest_empty_matrix() {
        assert!(nearest(&[], 2, &[1.0, 0.0], 3).is_empty());
    }
}
