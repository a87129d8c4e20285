//! Backend abstraction for Galton board experiments.
//!
//! Every analysis driver talks to execution through the [`Backend`] trait
//! and to readout correction through the [`MitigationService`] trait, so a
//! local simulator and any other execution target are interchangeable.
//!
//! - [`Backend`] covers job submission and retrieval.
//! - [`Capabilities`] describes qubit count, gate set and shot limits.
//! - [`Counts`] and [`ExecutionResult`] carry measured outcomes.
//! - [`QuasiDistribution`] carries mitigated, possibly negative, outcomes.
//!
//! # Implementing a backend
//!
//! A backend that runs synchronously can finish the job inside `submit`
//! and serve `status`/`result` from a job table; the provided
//! [`Backend::run`] then returns on the first poll.
//!
//! ```ignore
//! use async_trait::async_trait;
//! use qgb_hal::{Backend, Capabilities, ExecutionResult, HalResult, JobId, JobStatus, ValidationResult};
//! use qgb_ir::Circuit;
//!
//! struct Replay {
//!     capabilities: Capabilities,
//!     recorded: ExecutionResult,
//! }
//!
//! #[async_trait]
//! impl Backend for Replay {
//!     fn name(&self) -> &str { "replay" }
//!     fn capabilities(&self) -> &Capabilities { &self.capabilities }
//!     async fn validate(&self, _: &Circuit) -> HalResult<ValidationResult> {
//!         Ok(ValidationResult::Valid)
//!     }
//!     async fn submit(&self, _: &Circuit, _: u32) -> HalResult<JobId> {
//!         Ok(JobId::new("replay-0"))
//!     }
//!     async fn status(&self, _: &JobId) -> HalResult<JobStatus> {
//!         Ok(JobStatus::Completed)
//!     }
//!     async fn result(&self, _: &JobId) -> HalResult<ExecutionResult> {
//!         Ok(self.recorded.clone())
//!     }
//!     async fn cancel(&self, _: &JobId) -> HalResult<()> { Ok(()) }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod mitigation;
pub mod result;

pub use backend::{Backend, MAX_POLLS, POLL_INTERVAL, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use mitigation::MitigationService;
pub use result::{Counts, ExecutionResult, QuasiDistribution};
