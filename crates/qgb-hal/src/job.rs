//! Job records kept by backends between `submit` and `result`.
//!
//! A job moves `Queued → Running → {Completed | Failed | Cancelled}`.
//! Once terminal, its status never changes again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned job handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed(String),
    Cancelled,
}

impl JobStatus {
    /// Completed, failed or cancelled.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("queued"),
            JobStatus::Running => f.write_str("running"),
            JobStatus::Completed => f.write_str("completed"),
            JobStatus::Failed(reason) => write!(f, "failed ({reason})"),
            JobStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// One submission of a circuit to a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub circuit_name: String,
    pub shots: u32,
    pub backend: String,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A freshly queued job, stamped with the current time.
    pub fn queued(
        id: impl Into<JobId>,
        circuit_name: impl Into<String>,
        shots: u32,
        backend: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            circuit_name: circuit_name.into(),
            shots,
            backend: backend.into(),
            status: JobStatus::Queued,
            submitted_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Move to `status`. Returns `false`, leaving the job untouched, when the
    /// job has already finished.
    pub fn advance(&mut self, status: JobStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if status.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.status = status;
        true
    }

    /// Wall time from submission to the terminal state, once there is one.
    pub fn turnaround_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.submitted_at).num_milliseconds())
    }
}
