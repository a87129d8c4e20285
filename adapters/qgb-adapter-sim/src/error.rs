//! Simulator and mitigation error types.

use qgb_hal::HalError;
use thiserror::Error;

/// Errors raised while executing a circuit.
#[derive(Debug, Error)]
pub enum SimError {
    /// The register is wider than a basis index can address.
    #[error("Circuit needs {requested} qubits, simulator supports at most {max}")]
    TooManyQubits { requested: usize, max: usize },

    /// An instruction references a qubit or classical bit outside the register.
    #[error("Instruction '{instruction}' is missing an operand")]
    MissingOperand { instruction: String },

    /// The noise model carries a channel the simulator cannot apply.
    #[error("Unsupported noise channel: {0}")]
    UnsupportedChannel(String),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

impl From<SimError> for HalError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::TooManyQubits { .. } => HalError::CircuitTooLarge(err.to_string()),
            SimError::MissingOperand { .. } => HalError::InvalidCircuit(err.to_string()),
            SimError::UnsupportedChannel(_) => HalError::Unsupported(err.to_string()),
        }
    }
}

/// Errors raised by readout mitigation.
#[derive(Debug, Error)]
pub enum MitigationError {
    /// No calibration data for a requested qubit.
    #[error("Qubit {0} has not been calibrated")]
    Uncalibrated(u32),

    /// A per-qubit assignment matrix cannot be inverted.
    #[error("Assignment matrix for qubit {qubit} is singular (P(0|0)={p00:.4}, P(1|1)={p11:.4})")]
    SingularMatrix { qubit: u32, p00: f64, p11: f64 },

    /// The full outcome space is too large to invert.
    #[error("Cannot mitigate {requested} qubits, limit is {max}")]
    TooManyQubits { requested: usize, max: usize },

    /// No qubits were given.
    #[error("No qubits to mitigate")]
    NoQubits,

    /// Calibration returned no usable shots.
    #[error("Calibration returned no counts")]
    EmptyCalibration,
}

impl From<MitigationError> for HalError {
    fn from(err: MitigationError) -> Self {
        HalError::Mitigation(err.to_string())
    }
}
