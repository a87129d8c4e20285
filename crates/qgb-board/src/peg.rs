//! The peg operator.
//!
//! A peg routes the excitation at board position `b` to `b - 1` when the
//! control reads |1⟩ and to `b + 1` when it reads |0⟩:
//!
//! ```text
//!   control ──●────⊕────●──
//!   b - 1   ──×────┼────┼──
//!   b       ──×────●────×──
//!   b + 1   ────────────×──
//! ```

use qgb_ir::{Circuit, IrError, IrResult, QubitId};

/// Append the peg sequence for the ball at `ball`.
pub fn apply_peg(circuit: &mut Circuit, control: QubitId, ball: QubitId) -> IrResult<()> {
    let left = ball
        .0
        .checked_sub(1)
        .map(QubitId)
        .ok_or_else(|| IrError::QubitNotFound {
            qubit: ball,
            gate_name: Some("peg".into()),
        })?;
    let right = QubitId(ball.0.saturating_add(1));

    circuit
        .cswap(control, left, ball)?
        .cx(ball, control)?
        .cswap(control, ball, right)?;
    Ok(())
}

/// Re-entangle the control with the right output of the ball just routed,
/// before the next ball in the same layer is processed.
pub fn decouple(circuit: &mut Circuit, control: QubitId, ball: QubitId) -> IrResult<()> {
    circuit.cx(QubitId(ball.0 + 1), control)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgb_ir::StandardGate;

    #[test]
    fn test_peg_sequence() {
        let mut circuit = Circuit::with_size("peg", 4, 0);
        apply_peg(&mut circuit, QubitId(0), QubitId(2)).unwrap();

        let ops: Vec<_> = circuit
            .instructions()
            .iter()
            .map(|i| (*i.as_gate().unwrap(), i.qubits.clone()))
            .collect();
        assert_eq!(
            ops,
            vec![
                (StandardGate::CSwap, vec![QubitId(0), QubitId(1), QubitId(2)]),
                (StandardGate::CX, vec![QubitId(2), QubitId(0)]),
                (StandardGate::CSwap, vec![QubitId(0), QubitId(2), QubitId(3)]),
            ]
        );
    }

    #[test]
    fn test_peg_outside_board_fails() {
        let mut circuit = Circuit::with_size("edge", 3, 0);
        assert!(apply_peg(&mut circuit, QubitId(0), QubitId(2)).is_err());
    }

    #[test]
    fn test_decouple_targets_control() {
        let mut circuit = Circuit::with_size("d", 4, 0);
        decouple(&mut circuit, QubitId(0), QubitId(2)).unwrap();
        assert_eq!(circuit.instructions()[0].qubits, vec![QubitId(3), QubitId(0)]);
    }
}
