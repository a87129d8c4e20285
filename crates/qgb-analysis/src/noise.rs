//! Noise model presets used by the analysis drivers.
//!
//! The two presets deliberately differ: one models weak gate noise across
//! the whole gate set, the other strong readout error with noisier one- and
//! two-qubit gates and a noiseless `cswap`.

use qgb_ir::{IrResult, NoiseModel, NoiseModelBuilder};

/// Depolarizing probability of [`gate_depolarizing_model`].
pub const GATE_ERROR_RATE: f64 = 0.005;

/// Readout flip probability of [`readout_heavy_model`].
pub const READOUT_ERROR_RATE: f64 = 0.15;

/// One-qubit depolarizing probability of [`readout_heavy_model`].
pub const SINGLE_QUBIT_ERROR_RATE: f64 = 0.05;

/// Two-qubit depolarizing probability of [`readout_heavy_model`].
pub const TWO_QUBIT_ERROR_RATE: f64 = 0.10;

/// Weak depolarizing noise on every gate the board uses, resets included.
pub fn gate_depolarizing_model() -> IrResult<NoiseModel> {
    gate_depolarizing_model_with(GATE_ERROR_RATE)
}

/// [`gate_depolarizing_model`] with a custom probability.
pub fn gate_depolarizing_model_with(p: f64) -> IrResult<NoiseModel> {
    NoiseModelBuilder::new(format!("gate_depolarizing_{p}"))
        .depolarizing(p, ["u", "h", "rx", "x", "reset"])
        .depolarizing(p, ["cx"])
        .depolarizing(p, ["cswap"])
        .build()
}

/// Strong readout error plus depolarizing noise on one- and two-qubit gates.
pub fn readout_heavy_model() -> IrResult<NoiseModel> {
    NoiseModelBuilder::new("readout_heavy")
        .readout_error(READOUT_ERROR_RATE)
        .depolarizing(SINGLE_QUBIT_ERROR_RATE, ["x", "h", "rx", "ry", "rz"])
        .depolarizing(TWO_QUBIT_ERROR_RATE, ["cx"])
        .build()
}
