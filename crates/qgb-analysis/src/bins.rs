//! Mapping measured bitstrings back to Galton board bins.
//!
//! A clean shot has exactly one `'1'`. The bin is the position of the last
//! `'1'` counted from the left of the bitstring, so with classical bit 0 as
//! the rightmost character the bin of classical bit `k` is `n − k`.

use qgb_hal::Counts;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Bin index of one outcome.
///
/// `None` if the string contains anything but `'0'`/`'1'` or has no `'1'`
/// at all (the ball was lost, which only happens under noise).
pub fn bin_index(bitstring: &str) -> Option<usize> {
    if !bitstring.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    bitstring.rfind('1')
}

/// Probability of each bin `0..=n_layers` estimated from counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinDistribution {
    /// Number of peg layers the bins belong to.
    pub n_layers: usize,
    /// Shots that landed in each bin.
    pub counts: Vec<u64>,
    /// `counts[k]` divided by all recorded shots, skipped ones included.
    pub probabilities: Vec<f64>,
    /// Shots whose outcome could not be assigned to a bin.
    pub skipped: u64,
    /// Every recorded shot.
    pub total: u64,
}

impl BinDistribution {
    /// Histogram `counts` into `n_layers + 1` bins.
    ///
    /// Outcomes that fail [`bin_index`] or fall past the last bin are
    /// tallied in `skipped` instead of aborting the analysis.
    pub fn from_counts(counts: &Counts, n_layers: usize) -> Self {
        let mut bins = vec![0u64; n_layers + 1];
        let mut skipped = 0;
        let mut malformed = 0usize;

        for (bitstring, &count) in counts.iter() {
            match bin_index(bitstring) {
                Some(k) if k <= n_layers => bins[k] += count,
                _ => {
                    skipped += count;
                    malformed += 1;
                }
            }
        }
        if malformed > 0 {
            warn!(outcomes = malformed, shots = skipped, "outcomes without a bin skipped");
        }

        let total = counts.total_shots();
        let probabilities = bins
            .iter()
            .map(|&c| if total == 0 { 0.0 } else { c as f64 / total as f64 })
            .collect();

        Self {
            n_layers,
            counts: bins,
            probabilities,
            skipped,
            total,
        }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// True if there are no bins.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Probability of bin `k` (zero outside the range).
    pub fn get(&self, k: usize) -> f64 {
        self.probabilities.get(k).copied().unwrap_or(0.0)
    }

    /// Shots that were assigned a bin.
    pub fn binned(&self) -> u64 {
        self.total - self.skipped
    }

    /// Mean bin over binned shots.
    pub fn mean(&self) -> Option<f64> {
        let n = self.binned();
        (n > 0).then(|| {
            self.counts
                .iter()
                .enumerate()
                .map(|(k, &c)| k as f64 * c as f64)
                .sum::<f64>()
                / n as f64
        })
    }

    /// Total variation distance to a reference pmf, `½ Σ |p_k − q_k|`.
    pub fn total_variation(&self, reference: &[f64]) -> f64 {
        0.5 * (0..self.len().max(reference.len()))
            .map(|k| (self.get(k) - reference.get(k).copied().unwrap_or(0.0)).abs())
            .sum::<f64>()
    }

    /// Largest absolute per-bin difference against a reference pmf.
    pub fn max_deviation(&self, reference: &[f64]) -> f64 {
        (0..self.len().max(reference.len()))
            .map(|k| (self.get(k) - reference.get(k).copied().unwrap_or(0.0)).abs())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_index() {
        assert_eq!(bin_index("0001"), Some(3));
        assert_eq!(bin_index("1000"), Some(0));
        assert_eq!(bin_index("0110"), Some(2));
        assert_eq!(bin_index("0000"), None);
        assert_eq!(bin_index(""), None);
        assert_eq!(bin_index("01x1"), None);
        assert_eq!(bin_index("01 1"), None);
    }

    #[test]
    fn test_distribution_zero_fills() {
        let counts: Counts = [("0001", 25), ("0100", 75)].into_iter().collect();
        let dist = BinDistribution::from_counts(&counts, 3);

        assert_eq!(dist.counts, vec![0, 75, 0, 25]);
        assert_eq!(dist.probabilities, vec![0.0, 0.75, 0.0, 0.25]);
        assert_eq!(dist.skipped, 0);
        assert_eq!(dist.mean(), Some(1.5));
    }

    #[test]
    fn test_distribution_skips_malformed() {
        let counts: Counts = [("0010", 50), ("0000", 30), ("00001", 20)]
            .into_iter()
            .collect();
        let dist = BinDistribution::from_counts(&counts, 3);

        assert_eq!(dist.counts, vec![0, 0, 50, 0]);
        assert_eq!(dist.skipped, 50);
        assert_eq!(dist.total, 100);
        assert_eq!(dist.binned(), 50);
        assert!((dist.get(2) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_counts() {
        let dist = BinDistribution::from_counts(&Counts::new(), 2);
        assert_eq!(dist.probabilities, vec![0.0; 3]);
        assert_eq!(dist.mean(), None);
    }

    #[test]
    fn test_max_deviation() {
        let counts: Counts = [("01", 60), ("10", 40)].into_iter().collect();
        let dist = BinDistribution::from_counts(&counts, 1);
        assert!((dist.max_deviation(&[0.5, 0.5]) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_total_variation() {
        let counts: Counts = [("01", 60), ("10", 40)].into_iter().collect();
        let dist = BinDistribution::from_counts(&counts, 1);
        assert!((dist.total_variation(&[0.5, 0.5]) - 0.1).abs() < 1e-12);
        assert_eq!(dist.total_variation(&dist.probabilities.clone()), 0.0);
    }
}
