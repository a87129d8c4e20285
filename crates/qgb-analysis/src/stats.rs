//! Sample statistics over measured outcomes.

use qgb_hal::Counts;
use serde::{Deserialize, Serialize};

use crate::bins::bin_index;
use crate::error::{AnalysisError, AnalysisResult};

/// Population variance of the bin index over every binned shot.
///
/// Shots without a bin are ignored; no binned shots gives 0.
pub fn bin_variance(counts: &Counts) -> f64 {
    let samples = counts
        .iter()
        .filter_map(|(bits, &c)| bin_index(bits).map(|k| (k as f64, c as f64)));
    weighted_moments(samples).map_or(0.0, |(_, var)| var)
}

/// A normal distribution fitted by maximum likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianFit {
    /// Sample mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
}

impl GaussianFit {
    /// Density at `x`. A zero-width fit is a spike at the mean.
    pub fn pdf(&self, x: f64) -> f64 {
        if self.std == 0.0 {
            return if x == self.mean { f64::INFINITY } else { 0.0 };
        }
        let z = (x - self.mean) / self.std;
        (-0.5 * z * z).exp() / (self.std * (2.0 * std::f64::consts::PI).sqrt())
    }

    /// `points` evenly spaced `(x, pdf(x))` samples over `[min, max]`.
    pub fn curve(&self, points: usize) -> Vec<(f64, f64)> {
        let span = self.max - self.min;
        let steps = points.saturating_sub(1).max(1) as f64;
        (0..points)
            .map(|i| {
                let x = self.min + span * i as f64 / steps;
                (x, self.pdf(x))
            })
            .collect()
    }
}

/// Fit a normal distribution to the integer value of each outcome.
///
/// Bitstrings are read as base-2 integers and weighted by their counts.
pub fn fit_gaussian(counts: &Counts) -> AnalysisResult<GaussianFit> {
    let values: Vec<(f64, f64)> = counts
        .iter()
        .filter_map(|(bits, &c)| u64::from_str_radix(bits, 2).ok().map(|v| (v as f64, c as f64)))
        .filter(|&(_, c)| c > 0.0)
        .collect();

    let (mean, var) = weighted_moments(values.iter().copied())
        .ok_or_else(|| AnalysisError::NoData("no decodable outcomes to fit".into()))?;
    let min = values.iter().map(|&(v, _)| v).fold(f64::INFINITY, f64::min);
    let max = values.iter().map(|&(v, _)| v).fold(f64::NEG_INFINITY, f64::max);

    Ok(GaussianFit {
        mean,
        std: var.sqrt(),
        min,
        max,
    })
}

fn weighted_moments(samples: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    let samples: Vec<_> = samples.collect();
    let weight: f64 = samples.iter().map(|&(_, w)| w).sum();
    if weight <= 0.0 {
        return None;
    }
    let mean = samples.iter().map(|&(x, w)| x * w).sum::<f64>() / weight;
    let var = samples
        .iter()
        .map(|&(x, w)| w * (x - mean).powi(2))
        .sum::<f64>()
        / weight;
    Some((mean, var))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_variance() {
        // Bins 0 and 2 equally often: mean 1, variance 1.
        let counts: Counts = [("100", 10), ("001", 10)].into_iter().collect();
        assert!((bin_variance(&counts) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bin_variance_ignores_lost_balls() {
        let counts: Counts = [("010", 10), ("000", 500)].into_iter().collect();
        assert_eq!(bin_variance(&counts), 0.0);
        assert_eq!(bin_variance(&Counts::new()), 0.0);
    }

    #[test]
    fn test_fit_gaussian() {
        // Values 1 and 3 equally weighted.
        let counts: Counts = [("01", 5), ("11", 5)].into_iter().collect();
        let fit = fit_gaussian(&counts).unwrap();
        assert!((fit.mean - 2.0).abs() < 1e-12);
        assert!((fit.std - 1.0).abs() < 1e-12);
        assert_eq!((fit.min, fit.max), (1.0, 3.0));
    }

    #[test]
    fn test_fit_gaussian_requires_data() {
        assert!(matches!(
            fit_gaussian(&Counts::new()),
            Err(AnalysisError::NoData(_))
        ));
    }

    #[test]
    fn test_pdf_peak() {
        let fit = GaussianFit {
            mean: 0.0,
            std: 1.0,
            min: -1.0,
            max: 1.0,
        };
        assert!((fit.pdf(0.0) - 0.398_942_280_4).abs() < 1e-9);
        let curve = fit.curve(3);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0].0, -1.0);
        assert_eq!(curve[2].0, 1.0);
    }
}
