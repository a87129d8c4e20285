//! Execution results.
//!
//! Bitstrings are classical-register strings with classical bit 0 as the
//! rightmost character.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Measurement counts keyed by bitstring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Number of times `bitstring` was observed.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate outcomes in lexicographic bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Outcomes sorted by descending count, ties broken lexicographically.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut v: Vec<_> = self.counts.iter().collect();
        v.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        v
    }

    /// The most frequently observed outcome.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.sorted().into_iter().next()
    }

    /// Relative frequencies. Empty if there are no counts.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total_shots();
        if total == 0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total as f64))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }
}

/// Result of a completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts.
    pub counts: Counts,
    /// Number of shots executed.
    pub shots: u32,
    /// Wall-clock execution time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result from counts.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}

/// A quasi-probability distribution over bitstrings.
///
/// Values sum to one but may be negative, as produced by inverting a
/// readout assignment matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuasiDistribution {
    probs: BTreeMap<String, f64>,
}

impl QuasiDistribution {
    /// Wrap a bitstring → quasi-probability map.
    pub fn new(probs: BTreeMap<String, f64>) -> Self {
        Self { probs }
    }

    /// Quasi-probability of `bitstring` (zero if absent).
    pub fn get(&self, bitstring: &str) -> f64 {
        self.probs.get(bitstring).copied().unwrap_or(0.0)
    }

    /// Iterate in lexicographic bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.probs.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Sum of all quasi-probabilities.
    pub fn total(&self) -> f64 {
        self.probs.values().sum()
    }

    /// True if every entry is non-negative.
    pub fn is_probability(&self) -> bool {
        self.probs.values().all(|&p| p >= 0.0)
    }

    /// The closest probability distribution in the Euclidean norm.
    ///
    /// Negative mass is removed smallest-first and spread evenly over the
    /// remaining entries (Smolin, Gambetta and Smith, PRL 108, 070502).
    /// Entries driven to zero are dropped.
    pub fn nearest_probability_distribution(&self) -> QuasiDistribution {
        let total = self.total();
        let scale = if total > 0.0 { total } else { 1.0 };

        let mut sorted: Vec<(&String, f64)> =
            self.probs.iter().map(|(k, &v)| (k, v / scale)).collect();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut remaining = sorted.len();
        let mut beta = 0.0;
        let mut out = BTreeMap::new();
        for (key, value) in sorted {
            let shifted = value + beta / remaining as f64;
            if shifted < 0.0 {
                beta += value;
                remaining -= 1;
            } else {
                out.insert(key.clone(), shifted);
            }
        }
        QuasiDistribution::new(out)
    }
}

impl FromIterator<(String, f64)> for QuasiDistribution {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
