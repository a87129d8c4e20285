//! Galton board circuit construction.

use std::collections::BTreeMap;

use qgb_ir::Circuit;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::balls::ActiveBalls;
use crate::error::{BoardError, BoardResult};
use crate::layout::BoardLayout;
use crate::peg::{apply_peg, decouple};

/// A built board: the circuit plus the geometry that produced it.
///
/// Immutable once built; rebuild to change the layer count or angle.
#[derive(Debug, Clone)]
pub struct GaltonBoard {
    layout: BoardLayout,
    bias_angle: Option<f64>,
    history: Vec<ActiveBalls>,
    circuit: Circuit,
}

impl GaltonBoard {
    /// Build an `n_layers` board.
    ///
    /// `bias_angle` is the `Rx` angle applied to the control each layer;
    /// `None` uses a Hadamard (an even split). With `include_measurements`
    /// every odd board qubit is measured into its bin's classical bit.
    #[instrument(level = "debug", skip(include_measurements))]
    pub fn build(
        n_layers: u32,
        bias_angle: Option<f64>,
        include_measurements: bool,
    ) -> BoardResult<Self> {
        let layout = BoardLayout::new(n_layers)?;
        if let Some(theta) = bias_angle {
            if !theta.is_finite() {
                return Err(BoardError::InvalidAngle(theta));
            }
        }

        let name = match bias_angle {
            Some(theta) => format!("qgb_n{n_layers}_rx{theta:.4}"),
            None => format!("qgb_n{n_layers}"),
        };
        let mut circuit = Circuit::with_size(name, layout.num_qubits(), layout.num_clbits());
        let control = layout.control();

        circuit.x(layout.start())?;
        let mut active = ActiveBalls::single(layout.start());
        let mut history = vec![active.clone()];

        for layer in 0..n_layers {
            circuit.reset(control)?;
            match bias_angle {
                Some(theta) => circuit.rx(theta, control)?,
                None => circuit.h(control)?,
            };

            let balls: Vec<_> = active.iter().collect();
            for (i, &ball) in balls.iter().enumerate() {
                apply_peg(&mut circuit, control, ball)?;
                if i + 1 < balls.len() {
                    decouple(&mut circuit, control, ball)?;
                }
            }

            active = active.advance();
            debug!(layer, active = ?active.positions(), "layer routed");
            history.push(active.clone());
            circuit.barrier_all()?;
        }

        if include_measurements {
            for (qubit, clbit) in layout.bin_map() {
                circuit.measure(qubit, clbit)?;
            }
        }

        Ok(Self {
            layout,
            bias_angle,
            history,
            circuit,
        })
    }

    /// An unbiased board with measurements.
    pub fn unbiased(n_layers: u32) -> BoardResult<Self> {
        Self::build(n_layers, None, true)
    }

    /// The register layout.
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// The bias angle, if one was given.
    pub fn bias_angle(&self) -> Option<f64> {
        self.bias_angle
    }

    /// Probability that a single peg sends the ball left:
    /// `sin²(θ/2)`, or one half without an angle.
    pub fn left_probability(&self) -> f64 {
        self.bias_angle.map_or(0.5, |theta| (theta / 2.0).sin().powi(2))
    }

    /// The built circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Consume the board, keeping only the circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Active positions before the first layer and after each layer.
    pub fn history(&self) -> &[ActiveBalls] {
        &self.history
    }

    /// Serializable description of the board.
    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            name: self.circuit.name().to_string(),
            n_layers: self.layout.n_layers(),
            bias_angle: self.bias_angle,
            num_qubits: self.layout.num_qubits(),
            num_clbits: self.layout.num_clbits(),
            control: self.layout.control().0,
            start: self.layout.start().0,
            bin_qubits: self.layout.output_qubits().iter().map(|q| q.0).collect(),
            active_history: self.history.iter().map(ActiveBalls::positions).collect(),
            depth: self.circuit.depth(),
            gate_counts: self.circuit.gate_counts(),
        }
    }
}

/// Flattened board description for reports and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSummary {
    /// Circuit name.
    pub name: String,
    /// Number of peg layers.
    pub n_layers: u32,
    /// `Rx` angle of the control, if biased.
    pub bias_angle: Option<f64>,
    /// Total qubits.
    pub num_qubits: u32,
    /// Total classical bits.
    pub num_clbits: u32,
    /// Control qubit index.
    pub control: u32,
    /// Injection position.
    pub start: u32,
    /// Measured qubit per classical bit.
    pub bin_qubits: Vec<u32>,
    /// Active positions per layer boundary.
    pub active_history: Vec<Vec<u32>>,
    /// Circuit depth, barriers excluded.
    pub depth: usize,
    /// Operation counts by name.
    pub gate_counts: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgb_ir::{ClbitId, InstructionKind, QubitId, StandardGate};
    use std::f64::consts::PI;

    #[test]
    fn test_three_layer_board() {
        let board = GaltonBoard::build(3, None, true).unwrap();
        let circuit = board.circuit();

        assert_eq!(circuit.num_qubits(), 8);
        assert_eq!(circuit.num_clbits(), 4);

        let history: Vec<_> = board.history().iter().map(|a| a.positions()).collect();
        assert_eq!(
            history,
            vec![vec![4], vec![3, 5], vec![2, 4, 6], vec![1, 3, 5, 7]]
        );
    }

    #[test]
    fn test_gate_counts() {
        // 1 + 2 + 3 pegs; 0 + 1 + 2 decoupling CNOTs.
        let board = GaltonBoard::build(3, None, true).unwrap();
        let counts = board.circuit().gate_counts();

        assert_eq!(counts["x"], 1);
        assert_eq!(counts["reset"], 3);
        assert_eq!(counts["h"], 3);
        assert_eq!(counts["cswap"], 12);
        assert_eq!(counts["cx"], 6 + 3);
        assert_eq!(counts["barrier"], 3);
        assert_eq!(counts["measure"], 4);
    }

    #[test]
    fn test_layer_preamble() {
        let board = GaltonBoard::build(1, Some(2.0 * PI / 3.0), false).unwrap();
        let insts = board.circuit().instructions();

        assert_eq!(insts[0].as_gate(), Some(&StandardGate::X));
        assert_eq!(insts[0].qubits, vec![QubitId(2)]);
        assert!(insts[1].is_reset());
        assert_eq!(insts[1].qubits, vec![QubitId(0)]);
        assert_eq!(insts[2].as_gate(), Some(&StandardGate::Rx(2.0 * PI / 3.0)));
        assert!(insts.last().unwrap().is_barrier());
    }

    #[test]
    fn test_decoupling_between_balls_only() {
        let board = GaltonBoard::build(2, None, false).unwrap();
        let insts = board.circuit().instructions();
        // Second layer: reset, h, peg(2), cx(3 -> 0), peg(4), barrier.
        let second = insts.iter().rposition(|i| i.is_reset()).unwrap();
        let layer: Vec<_> = insts[second..].iter().collect();
        assert_eq!(layer.len(), 2 + 3 + 1 + 3 + 1);
        assert_eq!(layer[5].as_gate(), Some(&StandardGate::CX));
        assert_eq!(layer[5].qubits, vec![QubitId(3), QubitId(0)]);
        assert!(layer[9].is_barrier());
    }

    #[test]
    fn test_measurements_follow_bins() {
        let board = GaltonBoard::unbiased(2).unwrap();
        let measures: Vec<_> = board
            .circuit()
            .instructions()
            .iter()
            .filter(|i| matches!(i.kind, InstructionKind::Measure))
            .map(|i| (i.qubits[0], i.clbits[0]))
            .collect();
        assert_eq!(
            measures,
            vec![
                (QubitId(1), ClbitId(0)),
                (QubitId(3), ClbitId(1)),
                (QubitId(5), ClbitId(2)),
            ]
        );
    }

    #[test]
    fn test_without_measurements() {
        let board = GaltonBoard::build(2, None, false).unwrap();
        assert!(!board.circuit().has_measurements());
        assert_eq!(board.circuit().num_clbits(), 3);
    }

    #[test]
    fn test_zero_layers_rejected() {
        assert!(matches!(
            GaltonBoard::build(0, None, true),
            Err(BoardError::ZeroLayers)
        ));
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        assert!(matches!(
            GaltonBoard::build(2, Some(f64::NAN), true),
            Err(BoardError::InvalidAngle(_))
        ));
    }

    #[test]
    fn test_left_probability() {
        let board = GaltonBoard::build(1, Some(2.0 * PI / 3.0), true).unwrap();
        assert!((board.left_probability() - 0.75).abs() < 1e-12);
        assert_eq!(GaltonBoard::unbiased(1).unwrap().left_probability(), 0.5);
    }

    #[test]
    fn test_summary_json() {
        let summary = GaltonBoard::unbiased(2).unwrap().summary();
        assert_eq!(summary.bin_qubits, vec![1, 3, 5]);
        assert_eq!(summary.active_history.last().unwrap(), &vec![1, 3, 5]);

        let json = serde_json::to_string(&summary).unwrap();
        let back: BoardSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
