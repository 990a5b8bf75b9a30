//! Cosine similarity over fixed-width vectors.
//!
//! Accumulation happens in `f64`. The denominator is computed as
//! `sqrt(‖a‖² · ‖b‖²)` rather than `‖a‖ · ‖b‖`, so a vector compared with
//! itself scores exactly `1.0` instead of drifting by one ulp.

/// Calculate cosine similarity between two vectors.
///
/// Returns exactly `0.0` when either vector has zero norm. The result is
/// clamped to `[-1.0, 1.0]`.
///
/// Both slices must have the same length; callers validate widths before
/// scoring.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    ((dot / (norm_a * norm_b).sqrt()) as f32).clamp(-1.0, 1.0)
}

/// Euclidean norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt() as f32
}
