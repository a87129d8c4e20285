//! Backend capability introspection.
//!
//! [`Capabilities`] tells a caller how large a circuit a backend accepts,
//! which operations it understands and how many shots it will run.

use serde::{Deserialize, Serialize};

/// Hardware capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM 3 naming convention).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Additional capability flags such as `"mid_circuit_reset"` or
    /// `"noise_model"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::standard(),
            max_shots: 100_000,
            is_simulator: true,
            features: vec!["mid_circuit_reset".into()],
        }
    }

    /// Add a capability flag.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Check whether a capability flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Gate set supported by a backend.
///
/// Gate names are lowercase: `h`, `cx`, `rx`, `cswap`. Non-unitary
/// operations (`measure`, `reset`, `barrier`) are not listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// Every gate the circuit IR can express.
    pub fn standard() -> Self {
        Self {
            single_qubit: ["x", "y", "z", "h", "rx", "ry", "rz"]
                .map(String::from)
                .to_vec(),
            two_qubit: vec!["cx".into()],
            three_qubit: vec!["cswap".into()],
        }
    }

    /// Check if a gate is supported (single-qubit, two-qubit, or three-qubit).
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate)
            || self.two_qubit.iter().any(|g| g == gate)
            || self.three_qubit.iter().any(|g| g == gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(20);
        assert_eq!(caps.num_qubits, 20);
        assert!(caps.is_simulator);
        assert!(caps.gate_set.contains("cswap"));
        assert!(caps.gate_set.contains("rx"));
        assert!(!caps.gate_set.contains("ccx"));
        assert!(caps.has_feature("mid_circuit_reset"));
        assert!(!caps.has_feature("noise_model"));
    }

    #[test]
    fn test_with_feature() {
        let caps = Capabilities::simulator(4).with_feature("noise_model");
        assert!(caps.has_feature("noise_model"));
    }
}
