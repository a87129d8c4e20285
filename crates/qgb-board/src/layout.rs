//! Register layout of an `n`-layer board.
//!
//! ```text
//!   q0        control (reset and reused every layer)
//!   q1 .. q2n+1  board positions; the ball starts at q(n+1)
//!   odd q(2k+1)  final bin positions, measured into c(k)
//! ```

use qgb_ir::{ClbitId, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, BoardResult};

/// Largest layer count whose `2n + 2` qubits still fit a `u32` index.
pub const MAX_LAYERS: u32 = (u32::MAX - 2) / 2;

/// Qubit and classical-bit assignment for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    n_layers: u32,
}

impl BoardLayout {
    /// Layout for `n_layers` rows of pegs.
    pub fn new(n_layers: u32) -> BoardResult<Self> {
        if n_layers == 0 {
            return Err(BoardError::ZeroLayers);
        }
        if n_layers > MAX_LAYERS {
            return Err(BoardError::TooManyLayers {
                n_layers,
                max: MAX_LAYERS,
            });
        }
        Ok(Self { n_layers })
    }

    /// Number of peg layers.
    pub fn n_layers(&self) -> u32 {
        self.n_layers
    }

    /// `2n + 2`: one control qubit plus `2n + 1` board positions.
    pub fn num_qubits(&self) -> u32 {
        2 * self.n_layers + 2
    }

    /// `n + 1`: one classical bit per bin.
    pub fn num_clbits(&self) -> u32 {
        self.n_layers + 1
    }

    /// Number of output bins, equal to `num_clbits`.
    pub fn num_bins(&self) -> usize {
        self.n_layers as usize + 1
    }

    /// The routing qubit shared by every peg.
    pub fn control(&self) -> QubitId {
        QubitId(0)
    }

    /// Position the ball is injected at.
    pub fn start(&self) -> QubitId {
        QubitId(self.n_layers + 1)
    }

    /// Board qubit measured into classical bit `k`.
    pub fn bin_qubit(&self, k: u32) -> Option<QubitId> {
        (k <= self.n_layers).then(|| QubitId(2 * k + 1))
    }

    /// `(qubit, clbit)` pairs for the final measurement, ascending.
    pub fn bin_map(&self) -> Vec<(QubitId, ClbitId)> {
        (0..=self.n_layers)
            .map(|k| (QubitId(2 * k + 1), ClbitId(k)))
            .collect()
    }

    /// The measured board qubits in classical-bit order.
    pub fn output_qubits(&self) -> Vec<QubitId> {
        self.bin_map().into_iter().map(|(q, _)| q).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        let layout = BoardLayout::new(3).unwrap();
        assert_eq!(layout.num_qubits(), 8);
        assert_eq!(layout.num_clbits(), 4);
        assert_eq!(layout.num_bins(), 4);
        assert_eq!(layout.start(), QubitId(4));
        assert_eq!(layout.control(), QubitId(0));
    }

    #[test]
    fn test_bin_map_uses_odd_qubits() {
        let layout = BoardLayout::new(2).unwrap();
        assert_eq!(
            layout.bin_map(),
            vec![
                (QubitId(1), ClbitId(0)),
                (QubitId(3), ClbitId(1)),
                (QubitId(5), ClbitId(2)),
            ]
        );
        assert_eq!(layout.bin_qubit(3), None);
    }

    #[test]
    fn test_zero_layers_rejected() {
        assert!(matches!(BoardLayout::new(0), Err(BoardError::ZeroLayers)));
    }

    #[test]
    fn test_too_many_layers_rejected() {
        assert!(matches!(
            BoardLayout::new(MAX_LAYERS + 1),
            Err(BoardError::TooManyLayers { .. })
        ));
        assert!(BoardLayout::new(MAX_LAYERS).is_ok());
    }
}
