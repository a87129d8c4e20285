//! The execution seam between the drivers and whatever runs circuits.
//!
//! A backend accepts a circuit and a shot count, hands back a [`JobId`],
//! and later yields the measured [`Counts`](crate::Counts) for that job.
//! Drivers normally call [`Backend::run`], which chains `submit` and
//! `wait`.

use std::time::Duration;

use async_trait::async_trait;
use qgb_ir::Circuit;
use tracing::{debug, trace};

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Delay between status polls in [`Backend::wait`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Polls before [`Backend::wait`] gives up.
pub const MAX_POLLS: u32 = 1500;

/// Something that executes circuits.
///
/// `capabilities()` is fixed for the lifetime of the backend. `result()`
/// succeeds only for jobs whose status is `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &Capabilities;

    /// Check `circuit` against the capabilities without running it.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a job. Finished jobs keep their status.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Poll until the job finishes, then fetch its result.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        for poll in 0..MAX_POLLS {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(reason) => return Err(HalError::JobFailed(reason)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    trace!(job = %job_id, poll, "job pending");
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
        Err(HalError::Timeout(job_id.to_string()))
    }

    /// Submit `circuit` and wait for its counts.
    async fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let job_id = self.submit(circuit, shots).await?;
        debug!(backend = self.name(), job = %job_id, circuit = circuit.name(), shots, "submitted");
        self.wait(&job_id).await
    }
}

/// Outcome of [`Backend::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid { reasons: Vec<String> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// `Valid` when `reasons` is empty.
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }

    /// The problems found, empty for a valid circuit.
    pub fn reasons(&self) -> &[String] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid { reasons } => reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Counts;
    use std::sync::Mutex;

    /// Reports `Running` a fixed number of times before completing.
    struct SlowBackend {
        capabilities: Capabilities,
        pending_polls: Mutex<u32>,
        outcome: JobStatus,
    }

    impl SlowBackend {
        fn new(pending_polls: u32, outcome: JobStatus) -> Self {
            Self {
                capabilities: Capabilities::simulator(4),
                pending_polls: Mutex::new(pending_polls),
                outcome,
            }
        }
    }

    #[async_trait]
    impl Backend for SlowBackend {
        fn name(&self) -> &str {
            "slow"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.capabilities
        }

        async fn validate(&self, _circuit: &Circuit) -> HalResult<ValidationResult> {
            Ok(ValidationResult::Valid)
        }

        async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
            Ok(JobId::new("slow-1"))
        }

        async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
            let mut pending = self.pending_polls.lock().unwrap();
            if *pending > 0 {
                *pending -= 1;
                return Ok(JobStatus::Running);
            }
            Ok(self.outcome.clone())
        }

        async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
            let counts: Counts = [("01", 3)].into_iter().collect();
            Ok(ExecutionResult::new(counts, 3))
        }

        async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_for_completion() {
        let backend = SlowBackend::new(3, JobStatus::Completed);
        let circuit = Circuit::with_size("c", 1, 1);
        let result = backend.run(&circuit, 3).await.unwrap();
        assert_eq!(result.counts.get("01"), 3);
        assert_eq!(*backend.pending_polls.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_surfaces_failure() {
        let backend = SlowBackend::new(1, JobStatus::Failed("lost".into()));
        let err = backend.wait(&JobId::new("slow-1")).await.unwrap_err();
        assert!(matches!(err, HalError::JobFailed(reason) if reason == "lost"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out() {
        let backend = SlowBackend::new(MAX_POLLS + 1, JobStatus::Completed);
        let err = backend.wait(&JobId::new("slow-1")).await.unwrap_err();
        assert!(matches!(err, HalError::Timeout(_)));
    }

    #[test]
    fn test_validation_reasons() {
        assert!(ValidationResult::from_reasons(vec![]).is_valid());
        let invalid = ValidationResult::from_reasons(vec!["too wide".into()]);
        assert!(!invalid.is_valid());
        assert_eq!(invalid.reasons(), ["too wide".to_string()]);
    }
}
