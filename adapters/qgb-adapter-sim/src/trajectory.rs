//! Shot-by-shot execution with stochastic noise.
//!
//! Every shot replays the circuit on a fresh [`Statevector`]. Resets and
//! measurements sample and collapse mid-circuit, depolarizing channels draw
//! a Pauli string after their operation, and readout error flips the
//! recorded bit.

use qgb_hal::Counts;
use qgb_ir::{Circuit, ErrorChannel, Instruction, InstructionKind, NoiseModel, StandardGate};
use rand::Rng;
use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::statevector::{Pauli, Statevector};

/// A circuit paired with the noise parameters each instruction draws from.
pub(crate) struct Program<'a> {
    circuit: &'a Circuit,
    depolarizing: Vec<Option<f64>>,
    readout: Option<f64>,
}

impl<'a> Program<'a> {
    /// Resolve `noise` against every instruction of `circuit`.
    pub(crate) fn compile(circuit: &'a Circuit, noise: &NoiseModel) -> SimResult<Self> {
        let depolarizing = circuit
            .instructions()
            .iter()
            .map(|inst| depolarizing_for(inst, noise))
            .collect::<SimResult<Vec<_>>>()?;

        let readout = match noise.readout {
            None => None,
            Some(ErrorChannel::ReadoutError { p }) => Some(p).filter(|p| *p > 0.0),
            Some(other) => return Err(SimError::UnsupportedChannel(other.to_string())),
        };

        Ok(Self {
            circuit,
            depolarizing,
            readout,
        })
    }

    /// Run `shots` trajectories and tally the classical registers.
    pub(crate) fn sample<R: Rng + ?Sized>(&self, shots: u32, rng: &mut R) -> SimResult<Counts> {
        let mut counts = Counts::new();
        for shot in 0..shots {
            let bits = self.run_once(rng)?;
            counts.insert(bitstring(&bits), 1);
            if shot > 0 && shot % 1000 == 0 {
                trace!(shot, "trajectory progress");
            }
        }
        debug!(
            shots,
            outcomes = counts.len(),
            noisy = self.is_noisy(),
            "sampling complete"
        );
        Ok(counts)
    }

    fn is_noisy(&self) -> bool {
        self.readout.is_some() || self.depolarizing.iter().any(Option::is_some)
    }

    fn run_once<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<Vec<bool>> {
        let mut state = Statevector::new(self.circuit.num_qubits())?;
        let mut clbits = vec![false; self.circuit.num_clbits()];

        for (inst, depol) in self.circuit.instructions().iter().zip(&self.depolarizing) {
            match &inst.kind {
                InstructionKind::Gate(gate) => apply_gate(&mut state, gate, inst)?,
                InstructionKind::Reset => state.reset(operand(inst, 0)?, rng),
                InstructionKind::Measure => {
                    let qubit = operand(inst, 0)?;
                    let clbit = inst
                        .clbits
                        .first()
                        .map(|c| c.index())
                        .filter(|&c| c < clbits.len())
                        .ok_or_else(|| missing(inst))?;
                    let mut outcome = state.measure(qubit, rng);
                    if let Some(p) = self.readout {
                        if rng.gen_range(0.0..1.0) < p {
                            outcome = !outcome;
                        }
                    }
                    clbits[clbit] = outcome;
                }
                InstructionKind::Barrier => {}
            }

            if let Some(p) = depol {
                if rng.gen_range(0.0..1.0) < *p {
                    for q in &inst.qubits {
                        state.apply_pauli(q.index(), Pauli::from_index(rng.gen_range(0..4)));
                    }
                }
            }
        }
        Ok(clbits)
    }
}

fn depolarizing_for(inst: &Instruction, noise: &NoiseModel) -> SimResult<Option<f64>> {
    if inst.is_barrier() || inst.is_measure() {
        return Ok(None);
    }
    match noise.channel_for(inst.name()) {
        None => Ok(None),
        Some(ErrorChannel::Depolarizing { p }) => Ok(Some(*p).filter(|p| *p > 0.0)),
        Some(other) => Err(SimError::UnsupportedChannel(format!(
            "{other} on '{}'",
            inst.name()
        ))),
    }
}

fn apply_gate(state: &mut Statevector, gate: &StandardGate, inst: &Instruction) -> SimResult<()> {
    match gate {
        StandardGate::X => state.apply_x(operand(inst, 0)?),
        StandardGate::Y => state.apply_y(operand(inst, 0)?),
        StandardGate::Z => state.apply_z(operand(inst, 0)?),
        StandardGate::H => state.apply_h(operand(inst, 0)?),
        StandardGate::Rx(theta) => state.apply_rx(operand(inst, 0)?, *theta),
        StandardGate::Ry(theta) => state.apply_ry(operand(inst, 0)?, *theta),
        StandardGate::Rz(theta) => state.apply_rz(operand(inst, 0)?, *theta),
        StandardGate::CX => state.apply_cx(operand(inst, 0)?, operand(inst, 1)?),
        StandardGate::CSwap => {
            state.apply_cswap(operand(inst, 0)?, operand(inst, 1)?, operand(inst, 2)?);
        }
    }
    Ok(())
}

fn operand(inst: &Instruction, position: usize) -> SimResult<usize> {
    inst.qubits
        .get(position)
        .map(|q| q.index())
        .ok_or_else(|| missing(inst))
}

fn missing(inst: &Instruction) -> SimError {
    SimError::MissingOperand {
        instruction: inst.name().to_string(),
    }
}

/// Classical register as a bitstring, bit 0 rightmost.
pub(crate) fn bitstring(bits: &[bool]) -> String {
    bits.iter()
        .rev()
        .map(|&b| if b { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgb_ir::{ClbitId, NoiseModelBuilder, QubitId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bitstring_orders_clbit_zero_rightmost() {
        assert_eq!(bitstring(&[true, false, false]), "001");
        assert_eq!(bitstring(&[]), "");
    }

    #[test]
    fn test_measure_writes_requested_clbit() {
        let mut circuit = Circuit::with_size("x1", 2, 2);
        circuit.x(QubitId(1)).unwrap();
        circuit.measure(QubitId(1), ClbitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(1)).unwrap();

        let program = Program::compile(&circuit, &NoiseModel::ideal()).unwrap();
        let counts = program.sample(50, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(counts.get("01"), 50);
    }

    #[test]
    fn test_no_clbits_gives_empty_key() {
        let mut circuit = Circuit::with_size("bare", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        let program = Program::compile(&circuit, &NoiseModel::ideal()).unwrap();
        let counts = program.sample(10, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(counts.get(""), 10);
    }

    #[test]
    fn test_certain_readout_error_flips_every_shot() {
        let mut circuit = Circuit::with_size("m", 1, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        let noise = NoiseModelBuilder::new("flip").readout_error(1.0).build().unwrap();

        let program = Program::compile(&circuit, &noise).unwrap();
        let counts = program.sample(20, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(counts.get("1"), 20);
    }

    #[test]
    fn test_barrier_attracts_no_noise() {
        let mut circuit = Circuit::with_size("b", 1, 1);
        circuit.barrier_all().unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        let noise = NoiseModelBuilder::new("b")
            .depolarizing(1.0, ["barrier", "measure"])
            .build()
            .unwrap();

        let program = Program::compile(&circuit, &noise).unwrap();
        let counts = program.sample(100, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(counts.get("0"), 100);
    }

    #[test]
    fn test_full_depolarizing_randomizes_x() {
        let mut circuit = Circuit::with_size("dx", 1, 1);
        circuit.x(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        let noise = NoiseModelBuilder::new("dep")
            .depolarizing(1.0, ["x"])
            .build()
            .unwrap();

        let program = Program::compile(&circuit, &noise).unwrap();
        let counts = program.sample(4000, &mut StdRng::seed_from_u64(9)).unwrap();
        // X or Y flips back to |0⟩ half of the time.
        let zeros = counts.get("0") as f64 / 4000.0;
        assert!((zeros - 0.5).abs() < 0.05, "P(0) = {zeros}");
    }

    #[test]
    fn test_readout_channel_on_gate_is_rejected() {
        let mut circuit = Circuit::with_size("c", 1, 0);
        circuit.x(QubitId(0)).unwrap();
        let mut noise = NoiseModel::ideal();
        noise
            .gate_errors
            .insert("x".into(), ErrorChannel::ReadoutError { p: 0.1 });
        assert!(matches!(
            Program::compile(&circuit, &noise),
            Err(SimError::UnsupportedChannel(_))
        ));
    }
}
