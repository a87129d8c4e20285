//! Error types for board construction.

use qgb_ir::IrError;
use thiserror::Error;

/// Errors raised while building a Galton board circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BoardError {
    /// A board needs at least one layer of pegs.
    #[error("A Galton board needs at least one layer, got 0")]
    ZeroLayers,

    /// The register would not fit the qubit index space.
    #[error("{n_layers} layers exceed the maximum of {max}")]
    TooManyLayers {
        /// Requested layer count.
        n_layers: u32,
        /// Largest supported layer count.
        max: u32,
    },

    /// The bias angle is NaN or infinite.
    #[error("Bias angle must be finite, got {0}")]
    InvalidAngle(f64),

    /// The underlying circuit rejected an operation.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for board construction.
pub type BoardResult<T> = Result<T, BoardError>;
