//! Errors raised by backends and mitigation services.

use thiserror::Error;

/// Failure of a backend or mitigation call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    // Submission
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    // Job lifecycle
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job cancelled")]
    JobCancelled,

    /// The job did not reach a terminal state within the wait budget.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// Calibration or correction failed; the message comes from the service.
    #[error("Mitigation error: {0}")]
    Mitigation(String),
}

impl HalError {
    /// True for errors caused by the submitted circuit or shot count rather
    /// than by the backend.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            HalError::CircuitTooLarge(_)
                | HalError::InvalidCircuit(_)
                | HalError::InvalidShots(_)
                | HalError::Unsupported(_)
        )
    }
}

/// Result type for backend operations.
pub type HalResult<T> = Result<T, HalError>;
