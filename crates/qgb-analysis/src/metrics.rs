//! Distances between two sets of measurement counts.
//!
//! Both metrics take the union of outcome keys, zero-fill missing keys and
//! normalize by the shot count before comparing.

use std::collections::BTreeSet;

use qgb_hal::Counts;

use crate::error::{AnalysisError, AnalysisResult};

/// Total variation distance, `½ Σ |a_k − b_k|` over shot-normalized counts.
pub fn total_variation_distance(a: &Counts, b: &Counts, shots: u64) -> AnalysisResult<f64> {
    let (p, q) = aligned(a, b, shots)?;
    Ok(0.5 * p.iter().zip(&q).map(|(x, y)| (x - y).abs()).sum::<f64>())
}

/// Squared Jensen-Shannon distance in bits, bounded by `[0, 1]`.
///
/// Each vector is renormalized to sum to one after the shot normalization.
/// Two all-zero vectors are identical (0); one all-zero vector against a
/// non-empty one is maximally distant (1).
pub fn js_divergence(a: &Counts, b: &Counts, shots: u64) -> AnalysisResult<f64> {
    let (p, q) = aligned(a, b, shots)?;
    let (sp, sq) = (p.iter().sum::<f64>(), q.iter().sum::<f64>());
    match (sp > 0.0, sq > 0.0) {
        (false, false) => return Ok(0.0),
        (true, false) | (false, true) => return Ok(1.0),
        (true, true) => {}
    }

    let mut js = 0.0;
    for (x, y) in p.iter().zip(&q) {
        let (x, y) = (x / sp, y / sq);
        let m = 0.5 * (x + y);
        js += 0.5 * kl_term(x, m) + 0.5 * kl_term(y, m);
    }
    Ok(js.clamp(0.0, 1.0))
}

fn kl_term(x: f64, m: f64) -> f64 {
    if x > 0.0 { x * (x / m).log2() } else { 0.0 }
}

fn aligned(a: &Counts, b: &Counts, shots: u64) -> AnalysisResult<(Vec<f64>, Vec<f64>)> {
    if shots == 0 {
        return Err(AnalysisError::ZeroShots);
    }
    let keys: BTreeSet<&String> = a
        .iter()
        .map(|(k, _)| k)
        .chain(b.iter().map(|(k, _)| k))
        .collect();
    let norm = shots as f64;
    let p = keys.iter().map(|k| a.get(k) as f64 / norm).collect();
    let q = keys.iter().map(|k| b.get(k) as f64 / norm).collect();
    Ok((p, q))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Counts {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn test_identical_counts() {
        let a = counts(&[("0001", 30), ("0010", 70)]);
        assert_eq!(total_variation_distance(&a, &a, 100).unwrap(), 0.0);
        assert!(js_divergence(&a, &a, 100).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_counts() {
        let a = counts(&[("01", 100)]);
        let b = counts(&[("10", 100)]);
        assert!((total_variation_distance(&a, &b, 100).unwrap() - 1.0).abs() < 1e-12);
        assert!((js_divergence(&a, &b, 100).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_tvd() {
        let a = counts(&[("0", 50), ("1", 50)]);
        let b = counts(&[("0", 80), ("1", 20)]);
        assert!((total_variation_distance(&a, &b, 100).unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_known_js() {
        // p = (1, 0), q = (½, ½): m = (¾, ¼).
        let a = counts(&[("0", 100)]);
        let b = counts(&[("0", 50), ("1", 50)]);
        let expected = 0.5 * (1.0f64 / 0.75).log2()
            + 0.5 * (0.5 * (0.5f64 / 0.75).log2() + 0.5 * (0.5f64 / 0.25).log2());
        assert!((js_divergence(&a, &b, 100).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero() {
        let empty = Counts::new();
        assert_eq!(js_divergence(&empty, &empty, 10).unwrap(), 0.0);
        assert_eq!(total_variation_distance(&empty, &empty, 10).unwrap(), 0.0);
        let a = counts(&[("1", 10)]);
        assert_eq!(js_divergence(&a, &empty, 10).unwrap(), 1.0);
    }

    #[test]
    fn test_zero_shots_rejected() {
        let a = counts(&[("1", 10)]);
        assert!(matches!(
            total_variation_distance(&a, &a, 0),
            Err(AnalysisError::ZeroShots)
        ));
        assert!(matches!(js_divergence(&a, &a, 0), Err(AnalysisError::ZeroShots)));
    }

    #[test]
    fn test_js_ignores_shot_scaling() {
        let a = counts(&[("0", 30), ("1", 10)]);
        let b = counts(&[("0", 10), ("1", 30)]);
        let d1 = js_divergence(&a, &b, 40).unwrap();
        let d2 = js_divergence(&a, &b, 4000).unwrap();
        assert!((d1 - d2).abs() < 1e-12);
    }
}
