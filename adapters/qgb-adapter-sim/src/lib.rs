//! Local trajectory simulator and readout mitigation for Galton board
//! circuits.
//!
//! [`SimulatorBackend`] implements [`qgb_hal::Backend`]. Each shot runs the
//! circuit on a sparse statevector, sampling mid-circuit resets and
//! measurements, so the reusable control qubit of a Galton board behaves
//! as it would on hardware. Attaching a [`qgb_ir::NoiseModel`] adds
//! depolarizing errors after labelled operations and readout flips on
//! measurement.
//!
//! [`ReadoutMitigator`] implements [`qgb_hal::MitigationService`] with
//! per-qubit (tensored) assignment-matrix inversion.
//!
//! # Capacity
//!
//! Memory grows with the number of basis states in superposition, not
//! with the register width. A Galton board with `n` layers never holds
//! more than `2(n + 1)` basis states, so boards far beyond dense
//! statevector limits are cheap. Registers are capped at 64 qubits.
//!
//! # Example
//!
//! ```ignore
//! use qgb_adapter_sim::SimulatorBackend;
//! use qgb_hal::Backend;
//! use qgb_ir::{Circuit, ClbitId, QubitId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new().with_seed(42);
//!
//!     let mut circuit = Circuit::with_size("bell", 2, 2);
//!     circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
//!     circuit.measure(QubitId(0), ClbitId(0))?;
//!     circuit.measure(QubitId(1), ClbitId(1))?;
//!
//!     let result = backend.run(&circuit, 1000).await?;
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```

mod error;
mod mitigation;
mod simulator;
pub mod statevector;
mod trajectory;

pub use error::{MitigationError, SimError, SimResult};
pub use mitigation::{DEFAULT_MAX_QUBITS, QubitCalibration, ReadoutMitigator};
pub use simulator::SimulatorBackend;
