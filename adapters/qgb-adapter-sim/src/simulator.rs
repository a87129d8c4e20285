//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use qgb_hal::{
    Backend, Capabilities, ExecutionResult, HalError, HalResult, Job, JobId, JobStatus,
    ValidationResult,
};
use qgb_ir::{Circuit, NoiseModel};

use crate::statevector::MAX_QUBITS;
use crate::trajectory::Program;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local trajectory simulator.
///
/// Every shot is simulated independently on a sparse statevector, so
/// mid-circuit resets and measurements collapse the state the way hardware
/// does. An attached [`NoiseModel`] turns it into a noisy backend.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    noise: NoiseModel,
    rng: Mutex<StdRng>,
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
}

impl SimulatorBackend {
    /// An ideal simulator addressing up to 64 qubits, seeded from entropy.
    pub fn new() -> Self {
        Self::with_max_qubits(MAX_QUBITS as u32)
    }

    /// An ideal simulator with a smaller qubit limit.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        let max_qubits = max_qubits.min(MAX_QUBITS as u32);
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            noise: NoiseModel::ideal(),
            rng: Mutex::new(StdRng::from_entropy()),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Reseed the sampler. Two backends with the same seed and the same
    /// submissions produce identical counts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Attach a noise model applied to every job.
    pub fn with_noise_model(mut self, noise: NoiseModel) -> Self {
        if !noise.is_ideal() {
            self.capabilities.name = format!("simulator[{}]", noise.name);
            self.capabilities = self.capabilities.with_feature("noise_model");
        }
        self.noise = noise;
        self
    }

    /// The attached noise model.
    pub fn noise_model(&self) -> &NoiseModel {
        &self.noise
    }

    fn check(&self, circuit: &Circuit) -> Vec<String> {
        let caps = &self.capabilities;
        let mut reasons = Vec::new();
        if circuit.num_qubits() > caps.num_qubits as usize {
            reasons.push(format!(
                "circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                caps.num_qubits
            ));
        }
        for gate in circuit.instructions().iter().filter_map(|i| i.as_gate()) {
            if !caps.gate_set.contains(gate.name()) {
                reasons.push(format!("unsupported gate '{}'", gate.name()));
            }
        }
        reasons
    }

    /// Sample `program` on the calling task.
    #[instrument(skip(self, program))]
    fn run_simulation(&self, program: &Program<'_>, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        let counts = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            program.sample(shots, &mut *rng)?
        };
        let elapsed = start.elapsed();
        debug!(shots, elapsed_ms = elapsed.as_millis() as u64, "trajectories sampled");

        Ok(ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64))
    }

    fn update(&self, job_id: &JobId, f: impl FnOnce(&mut SimJob)) {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            f(sim_job);
        }
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::from_reasons(self.check(circuit)))
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        let max_shots = self.capabilities.max_shots;
        if shots == 0 || shots > max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots requested, expected 1..={max_shots}"
            )));
        }
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }
        let reasons = self.check(circuit);
        if !reasons.is_empty() {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }
        let program = Program::compile(circuit, &self.noise)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::queued(job_id.clone(), circuit.name(), shots, self.name());
        {
            let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
            jobs.insert(job_id.0.clone(), SimJob { job, result: None });
        }
        debug!(job = %job_id, shots, "job accepted");

        self.update(&job_id, |j| {
            j.job.advance(JobStatus::Running);
        });
        match self.run_simulation(&program, shots) {
            Ok(result) => {
                self.update(&job_id, |j| {
                    j.result = Some(result);
                    j.job.advance(JobStatus::Completed);
                });
                Ok(job_id)
            }
            Err(err) => {
                warn!(job = %job_id, error = %err, "simulation failed");
                let message = err.to_string();
                self.update(&job_id, |j| {
                    j.job.advance(JobStatus::Failed(message));
                });
                Err(err)
            }
        }
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (_, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(msg), None) => Err(HalError::JobFailed(msg.clone())),
            (_, None) => Err(HalError::JobNotFound(job_id.0.clone())),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            if !sim_job.job.advance(JobStatus::Cancelled) {
                debug!(job = %job_id, status = %sim_job.job.status, "job already finished");
            }
            Ok(())
        } else {
            Err(HalError::JobNotFound(job_id.0.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgb_ir::{ClbitId, NoiseModelBuilder, QubitId};

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.measure(QubitId(1), ClbitId(1)).unwrap();
        circuit
    }

    #[tokio::test]
    async fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 64);
        assert!(caps.has_feature("mid_circuit_reset"));
        assert!(!caps.has_feature("noise_model"));
    }

    #[tokio::test]
    async fn test_noise_model_marks_capabilities() {
        let noise = NoiseModelBuilder::new("ro").readout_error(0.1).build().unwrap();
        let backend = SimulatorBackend::new().with_noise_model(noise);
        assert!(backend.capabilities().has_feature("noise_model"));
        assert_eq!(backend.name(), "simulator[ro]");
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new().with_seed(42);

        let job_id = backend.submit(&bell(), 1000).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);

        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert!(counts.get("00") > 400 && counts.get("11") > 400);
    }

    #[tokio::test]
    async fn test_seed_reproduces_counts() {
        let a = SimulatorBackend::new().with_seed(7);
        let b = SimulatorBackend::new().with_seed(7);
        let ra = a.run(&bell(), 500).await.unwrap();
        let rb = b.run(&bell(), 500).await.unwrap();
        assert_eq!(ra.counts, rb.counts);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let circuit = Circuit::with_size("test", 10, 0);
        let result = backend.submit(&circuit, 100).await;

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
        let validation = backend.validate(&circuit).await.unwrap();
        assert!(!validation.is_valid());
    }

    #[tokio::test]
    async fn test_shots_out_of_range() {
        let backend = SimulatorBackend::new();
        assert!(matches!(
            backend.submit(&bell(), 0).await,
            Err(HalError::InvalidShots(_))
        ));
        assert!(matches!(
            backend.submit(&bell(), 100_001).await,
            Err(HalError::InvalidShots(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("nope");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.cancel(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_completed_job_stays_completed_after_cancel() {
        let backend = SimulatorBackend::new().with_seed(1);
        let job_id = backend.submit(&bell(), 10).await.unwrap();
        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);
        assert!(backend.result(&job_id).await.is_ok());
    }
}
