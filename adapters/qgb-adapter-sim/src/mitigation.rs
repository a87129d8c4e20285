//! Tensored readout-error mitigation.
//!
//! Calibration prepares every measured qubit in `|0⟩` and then in `|1⟩` on
//! the target backend and records the per-qubit assignment probabilities
//! `P(0|0)` and `P(1|1)`. Correction applies the inverse of each qubit's
//! 2×2 assignment matrix along that qubit's axis of the outcome vector,
//! which yields a quasi-probability distribution (entries may be negative).

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use qgb_hal::{Backend, Counts, HalResult, MitigationService, QuasiDistribution};
use qgb_ir::{Circuit, ClbitId, QubitId};

use crate::error::MitigationError;

/// Largest register whose full outcome space is inverted.
pub const DEFAULT_MAX_QUBITS: usize = 16;

/// Readout response of one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QubitCalibration {
    /// Physical qubit index.
    pub qubit: u32,
    /// Probability of reading 0 after preparing `|0⟩`.
    pub p0_given_0: f64,
    /// Probability of reading 1 after preparing `|1⟩`.
    pub p1_given_1: f64,
}

impl QubitCalibration {
    /// Mean assignment fidelity.
    pub fn fidelity(&self) -> f64 {
        0.5 * (self.p0_given_0 + self.p1_given_1)
    }

    /// Inverse of `[[P(0|0), P(0|1)], [P(1|0), P(1|1)]]`.
    fn inverse(&self) -> Result<[[f64; 2]; 2], MitigationError> {
        let (p00, p11) = (self.p0_given_0, self.p1_given_1);
        let det = p00 + p11 - 1.0;
        if det.abs() < 1e-9 {
            return Err(MitigationError::SingularMatrix {
                qubit: self.qubit,
                p00,
                p11,
            });
        }
        Ok([
            [p11 / det, -(1.0 - p11) / det],
            [-(1.0 - p00) / det, p00 / det],
        ])
    }
}

/// Readout mitigation over independently calibrated qubits.
#[derive(Debug, Clone)]
pub struct ReadoutMitigator {
    calibrations: FxHashMap<u32, QubitCalibration>,
    max_qubits: usize,
}

impl ReadoutMitigator {
    /// An uncalibrated mitigator.
    pub fn new() -> Self {
        Self {
            calibrations: FxHashMap::default(),
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Change the largest register [`apply_correction`](MitigationService::apply_correction)
    /// accepts.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Install calibration data directly, replacing any earlier data for
    /// the same qubit.
    pub fn with_calibration(mut self, calibration: QubitCalibration) -> Self {
        self.calibrations.insert(calibration.qubit, calibration);
        self
    }

    /// Calibration data for `qubit`.
    pub fn calibration(&self, qubit: QubitId) -> Option<&QubitCalibration> {
        self.calibrations.get(&qubit.0)
    }

    /// All calibration data, ordered by qubit.
    pub fn calibrations(&self) -> Vec<QubitCalibration> {
        let mut all: Vec<_> = self.calibrations.values().copied().collect();
        all.sort_by_key(|c| c.qubit);
        all
    }

    fn calibration_circuit(qubits: &[QubitId], excited: bool) -> HalResult<Circuit> {
        let width = qubits.iter().map(|q| q.0 + 1).max().unwrap_or(0);
        let name = if excited { "readout_cal_1" } else { "readout_cal_0" };
        let mut circuit = Circuit::with_size(name, width, qubits.len() as u32);
        for (i, &q) in qubits.iter().enumerate() {
            if excited {
                circuit.x(q).map_err(invalid)?;
            }
            circuit.measure(q, ClbitId(i as u32)).map_err(invalid)?;
        }
        Ok(circuit)
    }
}

impl Default for ReadoutMitigator {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(err: qgb_ir::IrError) -> qgb_hal::HalError {
    qgb_hal::HalError::InvalidCircuit(err.to_string())
}

/// Fraction of shots in which classical bit `clbit` read `expected`.
fn bit_fraction(counts: &Counts, clbit: usize, expected: char) -> Result<f64, MitigationError> {
    let mut hits = 0u64;
    let mut total = 0u64;
    for (bits, &n) in counts.iter() {
        let Some(c) = bits.len().checked_sub(clbit + 1).and_then(|i| bits.chars().nth(i)) else {
            continue;
        };
        total += n;
        if c == expected {
            hits += n;
        }
    }
    if total == 0 {
        return Err(MitigationError::EmptyCalibration);
    }
    Ok(hits as f64 / total as f64)
}

/// Parse a `width`-character bitstring, bit 0 rightmost.
fn parse_outcome(bits: &str, width: usize) -> Option<usize> {
    if bits.len() != width || !bits.chars().all(|c| c == '0' || c == '1') {
        return None;
    }
    usize::from_str_radix(bits, 2).ok()
}

#[async_trait]
impl MitigationService for ReadoutMitigator {
    #[instrument(skip(self, backend, qubits), fields(backend = backend.name(), qubits = qubits.len()))]
    async fn calibrate(
        &mut self,
        backend: &dyn Backend,
        qubits: &[QubitId],
        shots: u32,
    ) -> HalResult<()> {
        if qubits.is_empty() {
            return Err(MitigationError::NoQubits.into());
        }
        let zeros = backend
            .run(&Self::calibration_circuit(qubits, false)?, shots)
            .await?;
        let ones = backend
            .run(&Self::calibration_circuit(qubits, true)?, shots)
            .await?;

        for (i, q) in qubits.iter().enumerate() {
            let calibration = QubitCalibration {
                qubit: q.0,
                p0_given_0: bit_fraction(&zeros.counts, i, '0')?,
                p1_given_1: bit_fraction(&ones.counts, i, '1')?,
            };
            debug!(
                qubit = q.0,
                p00 = calibration.p0_given_0,
                p11 = calibration.p1_given_1,
                "qubit calibrated"
            );
            self.calibrations.insert(q.0, calibration);
        }
        info!(qubits = qubits.len(), shots, "readout calibration complete");
        Ok(())
    }

    fn apply_correction(
        &self,
        counts: &Counts,
        qubits: &[QubitId],
    ) -> HalResult<QuasiDistribution> {
        let width = qubits.len();
        if width == 0 {
            return Err(MitigationError::NoQubits.into());
        }
        if width > self.max_qubits {
            return Err(MitigationError::TooManyQubits {
                requested: width,
                max: self.max_qubits,
            }
            .into());
        }
        let inverses = qubits
            .iter()
            .map(|q| {
                self.calibrations
                    .get(&q.0)
                    .ok_or(MitigationError::Uncalibrated(q.0))
                    .and_then(QubitCalibration::inverse)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut vector = vec![0.0f64; 1 << width];
        let mut total = 0u64;
        let mut skipped = 0u64;
        for (bits, &n) in counts.iter() {
            match parse_outcome(bits, width) {
                Some(index) => {
                    vector[index] += n as f64;
                    total += n;
                }
                None => skipped += n,
            }
        }
        if skipped > 0 {
            warn!(skipped, width, "outcomes with unexpected width ignored");
        }
        if total == 0 {
            return Ok(QuasiDistribution::default());
        }
        for v in &mut vector {
            *v /= total as f64;
        }

        for (axis, inv) in inverses.iter().enumerate() {
            let mask = 1usize << axis;
            for index in (0..vector.len()).filter(|i| i & mask == 0) {
                let (a, b) = (vector[index], vector[index | mask]);
                vector[index] = inv[0][0] * a + inv[0][1] * b;
                vector[index | mask] = inv[1][0] * a + inv[1][1] * b;
            }
        }

        Ok(vector
            .into_iter()
            .enumerate()
            .filter(|(_, p)| p.abs() > 1e-12)
            .map(|(index, p)| (format!("{index:0width$b}"), p))
            .collect())
    }

    fn is_calibrated(&self, qubits: &[QubitId]) -> bool {
        qubits.iter().all(|q| self.calibrations.contains_key(&q.0))
    }
}
