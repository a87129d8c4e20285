//! The set of board positions carrying a ball at a given layer.

use std::collections::BTreeSet;

use qgb_ir::QubitId;
use serde::{Deserialize, Serialize};

/// Board positions reachable after some number of layers, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveBalls(BTreeSet<u32>);

impl ActiveBalls {
    /// A single ball at `position`.
    pub fn single(position: QubitId) -> Self {
        Self(BTreeSet::from([position.0]))
    }

    /// Positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.0.iter().map(|&p| QubitId(p))
    }

    /// Number of distinct positions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no position is active.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `position` is active.
    pub fn contains(&self, position: QubitId) -> bool {
        self.0.contains(&position.0)
    }

    /// The positions after one more layer: `{b - 1, b + 1}` for every `b`.
    ///
    /// Positions are board qubits and therefore never 0, so `b - 1` cannot
    /// underflow.
    pub fn advance(&self) -> Self {
        Self(
            self.0
                .iter()
                .flat_map(|&b| [b.saturating_sub(1), b + 1])
                .collect(),
        )
    }

    /// Raw positions, ascending.
    pub fn positions(&self) -> Vec<u32> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<u32> for ActiveBalls {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_deduplicates() {
        let balls: ActiveBalls = [3, 5].into_iter().collect();
        assert_eq!(balls.advance().positions(), vec![2, 4, 6]);
    }

    #[test]
    fn test_single() {
        let balls = ActiveBalls::single(QubitId(4));
        assert_eq!(balls.len(), 1);
        assert!(balls.contains(QubitId(4)));
        assert_eq!(balls.advance().positions(), vec![3, 5]);
    }
}
