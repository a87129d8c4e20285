//! Readout-error mitigation interface.
//!
//! A [`MitigationService`] is calibrated against a backend for a set of
//! measured qubits and then corrects raw counts taken on that backend.

use async_trait::async_trait;
use qgb_ir::QubitId;

use crate::backend::Backend;
use crate::error::HalResult;
use crate::result::{Counts, QuasiDistribution};

/// Calibrate-then-correct readout mitigation.
#[async_trait]
pub trait MitigationService: Send + Sync {
    /// Measure the readout response of `qubits` on `backend`.
    async fn calibrate(
        &mut self,
        backend: &dyn Backend,
        qubits: &[QubitId],
        shots: u32,
    ) -> HalResult<()>;

    /// Correct `counts` whose bitstrings were measured from `qubits`,
    /// listed in classical-bit order (the first qubit wrote the rightmost
    /// character).
    fn apply_correction(&self, counts: &Counts, qubits: &[QubitId])
    -> HalResult<QuasiDistribution>;

    /// Whether every qubit in `qubits` has calibration data.
    fn is_calibrated(&self, qubits: &[QubitId]) -> bool;
}
