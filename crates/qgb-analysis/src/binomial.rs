//! Analytical reference distributions.

/// Probability that a peg sends the ball towards the higher bin index:
/// `sin²(θ/2)` for an `Rx(θ)` control, one half for a Hadamard.
pub fn bias_probability(angle: Option<f64>) -> f64 {
    angle.map_or(0.5, |theta| (theta / 2.0).sin().powi(2))
}

/// Binomial coefficient `C(n, k)` as a float.
pub fn binomial_coefficient(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// The `Binomial(n, p)` pmf over `0..=n`.
pub fn analytical_distribution(n: usize, p: f64) -> Vec<f64> {
    (0..=n)
        .map(|k| binomial_coefficient(n, k) * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32))
        .collect()
}

/// Mean of `Binomial(n, p)`.
pub fn theoretical_mean(n: usize, p: f64) -> f64 {
    n as f64 * p
}

/// Variance of `Binomial(n, p)`.
pub fn theoretical_variance(n: usize, p: f64) -> f64 {
    n as f64 * p * (1.0 - p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_bias_probability() {
        assert_eq!(bias_probability(None), 0.5);
        assert!((bias_probability(Some(PI / 2.0)) - 0.5).abs() < 1e-12);
        assert!((bias_probability(Some(2.0 * PI / 3.0)) - 0.75).abs() < 1e-12);
        assert!(bias_probability(Some(0.0)).abs() < 1e-12);
    }

    #[test]
    fn test_binomial_coefficient() {
        assert_eq!(binomial_coefficient(6, 0), 1.0);
        assert_eq!(binomial_coefficient(6, 3), 20.0);
        assert_eq!(binomial_coefficient(6, 6), 1.0);
        assert_eq!(binomial_coefficient(3, 4), 0.0);
    }

    #[test]
    fn test_unbiased_three_layers() {
        let pmf = analytical_distribution(3, 0.5);
        assert_eq!(pmf, vec![0.125, 0.375, 0.375, 0.125]);
    }

    #[test]
    fn test_skewed_pmf_sums_to_one() {
        let pmf = analytical_distribution(6, 0.75);
        assert!((pmf.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((pmf[6] - 0.75f64.powi(6)).abs() < 1e-12);
    }

    #[test]
    fn test_moments() {
        assert_eq!(theoretical_variance(4, 0.5), 1.0);
        assert_eq!(theoretical_mean(6, 0.5), 3.0);
    }
}
