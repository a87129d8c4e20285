//! Property-based tests for counts and quasi-distributions.

use std::collections::BTreeMap;

use proptest::prelude::*;
use qgb_hal::{Counts, QuasiDistribution};

fn arb_bitstring() -> impl Strategy<Value = String> {
    "[01]{3}"
}

proptest! {
    #[test]
    fn counts_total_matches_inserts(
        inserts in prop::collection::vec((arb_bitstring(), 0u64..1000), 0..40),
    ) {
        let mut counts = Counts::new();
        let mut expected: BTreeMap<String, u64> = BTreeMap::new();
        for (bits, n) in &inserts {
            counts.insert(bits.clone(), *n);
            *expected.entry(bits.clone()).or_default() += n;
        }

        prop_assert_eq!(counts.total_shots(), inserts.iter().map(|(_, n)| n).sum::<u64>());
        prop_assert_eq!(counts.len(), expected.len());
        for (bits, n) in &expected {
            prop_assert_eq!(counts.get(bits), *n);
        }
        if counts.total_shots() > 0 {
            let total: f64 = counts.probabilities().values().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn nearest_distribution_is_a_probability(
        values in prop::collection::btree_map(arb_bitstring(), -0.5f64..1.0, 1..8),
    ) {
        let raw_total: f64 = values.values().sum();
        prop_assume!(raw_total > 0.1);

        let quasi = QuasiDistribution::new(values);
        let nearest = quasi.nearest_probability_distribution();

        prop_assert!(nearest.is_probability());
        prop_assert!((nearest.total() - 1.0).abs() < 1e-9, "total {}", nearest.total());
        prop_assert!(nearest.len() <= quasi.len());
    }
}
