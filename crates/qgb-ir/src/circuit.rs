//! High-level circuit builder API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// Registers are fixed at construction. Every builder method validates its
/// operands before appending, so the instruction list is always consistent
/// with the register sizes. Deserialization replays the instructions
/// through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircuitData")]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

/// Unchecked wire form of a [`Circuit`].
#[derive(Deserialize)]
struct CircuitData {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl TryFrom<CircuitData> for Circuit {
    type Error = IrError;

    fn try_from(data: CircuitData) -> IrResult<Self> {
        let mut circuit = Circuit::with_size(data.name, data.num_qubits, data.num_clbits);
        for instruction in data.instructions {
            circuit.append(instruction)?;
        }
        Ok(circuit)
    }
}

impl Circuit {
    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::H, &[qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::X, &[qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::Rx(theta), &[qubit])
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::CX, &[control, target])
    }

    /// Apply Fredkin (CSWAP) gate: swaps `a` and `b` when `control` is |1⟩.
    pub fn cswap(&mut self, control: QubitId, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::CSwap, &[control, a, b])
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::reset(qubit))
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.append(Instruction::measure(qubit, clbit))
    }

    /// Add a barrier across the given qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))
    }

    /// Add a barrier across every qubit of the circuit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        self.barrier((0..self.num_qubits).map(QubitId))
    }

    /// Append an arbitrary instruction after checking its operands against
    /// the registers. On error the circuit is unchanged.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.check(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn apply_gate(&mut self, gate: StandardGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits.iter().copied()))
    }

    fn check(&self, inst: &Instruction) -> IrResult<()> {
        let name = inst.name();
        let (qubits, clbits) = match &inst.kind {
            InstructionKind::Gate(gate) => (Some(gate.num_qubits()), 0),
            InstructionKind::Measure => (Some(1), 1),
            InstructionKind::Reset => (Some(1), 0),
            InstructionKind::Barrier => (None, 0),
        };
        match qubits {
            Some(expected) if inst.qubits.len() as u32 != expected => {
                return Err(IrError::QubitCountMismatch {
                    gate_name: name.into(),
                    expected,
                    got: inst.qubits.len() as u32,
                });
            }
            _ => {}
        }
        if inst.clbits.len() as u32 != clbits {
            return Err(IrError::ClbitCountMismatch {
                name: name.into(),
                expected: clbits,
                got: inst.clbits.len() as u32,
            });
        }
        self.check_qubits(&inst.qubits, name)?;
        for &clbit in &inst.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: Some(name.into()),
                });
            }
        }
        Ok(())
    }

    fn check_qubits(&self, qubits: &[QubitId], name: &str) -> IrResult<()> {
        for (i, &q) in qubits.iter().enumerate() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit: q,
                    gate_name: Some(name.into()),
                });
            }
            if qubits[..i].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: Some(name.into()),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// The instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Circuit depth: the longest chain of operations sharing a qubit or
    /// classical bit. Barriers are not counted.
    pub fn depth(&self) -> usize {
        let mut qubit_depth = vec![0usize; self.num_qubits()];
        let mut clbit_depth = vec![0usize; self.num_clbits()];
        let mut depth = 0;

        for inst in &self.instructions {
            if inst.is_barrier() {
                continue;
            }
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_depth[q.index()])
                .chain(inst.clbits.iter().map(|c| clbit_depth[c.index()]))
                .max()
                .unwrap_or(0);
            let level = start + 1;
            for q in &inst.qubits {
                qubit_depth[q.index()] = level;
            }
            for c in &inst.clbits {
                clbit_depth[c.index()] = level;
            }
            depth = depth.max(level);
        }
        depth
    }

    /// Number of occurrences of each operation, keyed by name.
    pub fn gate_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// `(qubit, clbit)` pairs of every measurement, in program order.
    pub fn measurements(&self) -> Vec<(QubitId, ClbitId)> {
        self.instructions
            .iter()
            .filter(|i| matches!(i.kind, InstructionKind::Measure))
            .map(|i| (i.qubits[0], i.clbits[0]))
            .collect()
    }

    /// Whether the circuit contains any measurement.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_state() {
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.measure(QubitId(1), ClbitId(1)).unwrap();

        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.instructions().len(), 4);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::with_size("small", 2, 0);
        let err = circuit.x(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { .. }));
        assert!(err.to_string().contains("gate: x"));
    }

    #[test]
    fn test_clbit_out_of_range() {
        let mut circuit = Circuit::with_size("small", 2, 1);
        let err = circuit.measure(QubitId(0), ClbitId(1)).unwrap_err();
        assert!(matches!(err, IrError::ClbitNotFound { .. }));
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut circuit = Circuit::with_size("dup", 3, 0);
        let err = circuit
            .cswap(QubitId(0), QubitId(1), QubitId(1))
            .unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
        assert!(circuit.instructions().is_empty());
    }

    #[test]
    fn test_barrier_not_counted_in_depth() {
        let mut circuit = Circuit::with_size("b", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.h(QubitId(1)).unwrap();

        assert_eq!(circuit.depth(), 1);
        assert_eq!(circuit.gate_counts()["barrier"], 1);
    }

    #[test]
    fn test_gate_counts_and_measurements() {
        let mut circuit = Circuit::with_size("counts", 3, 1);
        circuit.reset(QubitId(0)).unwrap();
        circuit.rx(1.0, QubitId(0)).unwrap();
        circuit.cswap(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        circuit.measure(QubitId(2), ClbitId(0)).unwrap();

        let counts = circuit.gate_counts();
        assert_eq!(counts["reset"], 1);
        assert_eq!(counts["rx"], 1);
        assert_eq!(counts["cswap"], 1);
        assert_eq!(counts["measure"], 1);
        assert_eq!(circuit.measurements(), vec![(QubitId(2), ClbitId(0))]);
        assert!(circuit.has_measurements());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut circuit = Circuit::with_size("json", 2, 1);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }

    #[test]
    fn test_append_checks_arity() {
        let mut circuit = Circuit::with_size("arity", 3, 1);
        let err = circuit
            .append(Instruction::gate(StandardGate::CX, [QubitId(0)]))
            .unwrap_err();
        assert!(matches!(err, IrError::QubitCountMismatch { expected: 2, got: 1, .. }));

        let mut malformed = Instruction::reset(QubitId(0));
        malformed.clbits.push(ClbitId(0));
        let err = circuit.append(malformed).unwrap_err();
        assert!(matches!(err, IrError::ClbitCountMismatch { expected: 0, got: 1, .. }));
        assert!(circuit.instructions().is_empty());

        circuit
            .append(Instruction::gate(StandardGate::Ry(0.5), [QubitId(2)]))
            .unwrap();
        assert_eq!(circuit.gate_counts()["ry"], 1);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_operands() {
        let json = r#"{
            "name": "bad",
            "num_qubits": 2,
            "num_clbits": 1,
            "instructions": [
                {"kind": {"Gate": "H"}, "qubits": [5]},
                {"kind": "Measure", "qubits": [0], "clbits": [3]}
            ]
        }"#;
        let err = serde_json::from_str::<Circuit>(json).unwrap_err();
        assert!(err.to_string().contains("Qubit q5 not found"), "{err}");

        let json = r#"{
            "name": "bad",
            "num_qubits": 2,
            "num_clbits": 1,
            "instructions": [{"kind": "Measure", "qubits": [0], "clbits": [3]}]
        }"#;
        assert!(serde_json::from_str::<Circuit>(json).is_err());
    }

    #[test]
    fn test_deserialized_circuit_is_usable() {
        let json = r#"{
            "name": "ok",
            "num_qubits": 2,
            "num_clbits": 1,
            "instructions": [
                {"kind": {"Gate": "H"}, "qubits": [0]},
                {"kind": "Measure", "qubits": [1], "clbits": [0]}
            ]
        }"#;
        let circuit: Circuit = serde_json::from_str(json).unwrap();
        assert_eq!(circuit.depth(), 1);
        assert_eq!(circuit.measurements(), vec![(QubitId(1), ClbitId(0))]);
    }
}
