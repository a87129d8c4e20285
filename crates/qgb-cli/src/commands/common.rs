//! Shared helpers for the drivers.

use std::f64::consts::PI;

use anyhow::{Context, Result};

use qgb_adapter_sim::SimulatorBackend;
use qgb_board::GaltonBoard;
use qgb_hal::{Backend, Counts};
use qgb_ir::NoiseModel;

use crate::output::spinner;

/// An ideal simulator. Each `stream` of a seeded run gets its own seed so
/// that backends within one driver do not replay the same random numbers.
pub fn simulator(seed: Option<u64>, stream: u64) -> SimulatorBackend {
    match seed {
        Some(seed) => SimulatorBackend::new().with_seed(seed.wrapping_add(stream)),
        None => SimulatorBackend::new(),
    }
}

/// A simulator with `noise` attached.
pub fn noisy_simulator(seed: Option<u64>, stream: u64, noise: NoiseModel) -> SimulatorBackend {
    simulator(seed, stream).with_noise_model(noise)
}

/// Run `board` on `backend` and return the raw counts.
pub async fn sample(backend: &dyn Backend, board: &GaltonBoard, shots: u32) -> Result<Counts> {
    let circuit = board.circuit();
    let progress = spinner(format!(
        "Running {} on {} ({shots} shots)...",
        circuit.name(),
        backend.name()
    ));
    let result = backend.run(circuit, shots).await;
    progress.finish_and_clear();
    let result = result.with_context(|| {
        format!("Failed to run {} on {}", circuit.name(), backend.name())
    })?;
    Ok(result.counts)
}

/// Bin numbers as axis labels.
pub fn bin_labels(n_layers: usize) -> Vec<String> {
    (0..=n_layers).map(|k| k.to_string()).collect()
}

/// Human-readable angle, written as a fraction of π where one fits.
pub fn angle_label(theta: f64) -> String {
    const FRACTIONS: [(f64, &str); 7] = [
        (1.0 / 4.0, "π/4"),
        (1.0 / 3.0, "π/3"),
        (1.0 / 2.0, "π/2"),
        (2.0 / 3.0, "2π/3"),
        (3.0 / 4.0, "3π/4"),
        (1.0, "π"),
        (2.0, "2π"),
    ];
    FRACTIONS
        .iter()
        .find(|(f, _)| (theta - f * PI).abs() < 1e-9)
        .map_or_else(|| format!("{theta:.4}"), |(_, label)| (*label).to_string())
}
