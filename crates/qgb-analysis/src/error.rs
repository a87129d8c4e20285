//! Analysis error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while analysing counts or writing reports.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// Normalizing by zero shots.
    #[error("Shot count must be positive")]
    ZeroShots,

    /// A fit or plot was requested without any usable data.
    #[error("No data: {0}")]
    NoData(String),

    /// Writing a report failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Target file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing a report failed.
    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}
