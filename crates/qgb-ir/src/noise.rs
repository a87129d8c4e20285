//! Noise-model description types.
//!
//! A [`NoiseModel`] only *describes* errors: which operation labels carry a
//! channel and with what probability. Applying it is the business of a
//! simulation backend.
//!
//! # Example
//!
//! ```rust
//! use qgb_ir::NoiseModelBuilder;
//!
//! let model = NoiseModelBuilder::new("flaky")
//!     .depolarizing(0.05, ["x", "h"])
//!     .depolarizing(0.10, ["cx"])
//!     .readout_error(0.15)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(model.depolarizing_probability("cx"), Some(0.10));
//! assert_eq!(model.depolarizing_probability("cswap"), None);
//! assert_eq!(model.readout_probability(), Some(0.15));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// A single error channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorChannel {
    /// With probability `p`, a uniformly random Pauli string over the
    /// operation's qubits (identity included) follows the operation.
    Depolarizing {
        /// Error probability (0.0 to 1.0).
        p: f64,
    },

    /// Measurement reports the wrong outcome with probability `p`.
    ReadoutError {
        /// Misclassification probability (0.0 to 1.0).
        p: f64,
    },
}

impl ErrorChannel {
    /// Get a human-readable name for this channel.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorChannel::Depolarizing { .. } => "depolarizing",
            ErrorChannel::ReadoutError { .. } => "readout_error",
        }
    }

    /// The channel's error probability.
    pub fn error_param(&self) -> f64 {
        match self {
            ErrorChannel::Depolarizing { p } | ErrorChannel::ReadoutError { p } => *p,
        }
    }
}

impl fmt::Display for ErrorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(p={:.4})", self.name(), self.error_param())
    }
}

/// Error channels keyed by operation label, plus an optional readout error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Descriptive name, used in logs and reports.
    pub name: String,
    /// Channel applied after each operation with the given label.
    pub gate_errors: BTreeMap<String, ErrorChannel>,
    /// Readout flip probability applied to every measurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readout: Option<ErrorChannel>,
}

impl NoiseModel {
    /// A model with no errors at all.
    pub fn ideal() -> Self {
        Self {
            name: "ideal".into(),
            ..Self::default()
        }
    }

    /// The channel attached to an operation label, if any.
    pub fn channel_for(&self, label: &str) -> Option<&ErrorChannel> {
        self.gate_errors.get(label)
    }

    /// Depolarizing probability attached to `label`.
    pub fn depolarizing_probability(&self, label: &str) -> Option<f64> {
        match self.gate_errors.get(label) {
            Some(ErrorChannel::Depolarizing { p }) => Some(*p),
            _ => None,
        }
    }

    /// Readout flip probability, if the model has one.
    pub fn readout_probability(&self) -> Option<f64> {
        self.readout.map(|c| c.error_param())
    }

    /// True when the model would not perturb any execution.
    pub fn is_ideal(&self) -> bool {
        self.gate_errors.values().all(|c| c.error_param() == 0.0)
            && self.readout_probability().is_none_or(|p| p == 0.0)
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (label, channel) in &self.gate_errors {
            write!(f, " {label}:{channel}")?;
        }
        if let Some(readout) = &self.readout {
            write!(f, " measure:{readout}")?;
        }
        Ok(())
    }
}

/// Fluent builder for [`NoiseModel`].
///
/// Probabilities are checked in [`build`](Self::build); the first value
/// outside `[0, 1]` is reported.
#[derive(Debug, Clone)]
pub struct NoiseModelBuilder {
    model: NoiseModel,
    invalid: Option<(String, f64)>,
}

impl NoiseModelBuilder {
    /// Start an empty model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            model: NoiseModel {
                name: name.into(),
                ..NoiseModel::default()
            },
            invalid: None,
        }
    }

    /// Attach a depolarizing channel of probability `p` to every label.
    ///
    /// A later call for the same label replaces the earlier channel.
    pub fn depolarizing<I, S>(mut self, p: f64, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for label in labels {
            let label = label.into();
            self.check(&label, p);
            self.model
                .gate_errors
                .insert(label, ErrorChannel::Depolarizing { p });
        }
        self
    }

    /// Set the readout flip probability applied to every measurement.
    pub fn readout_error(mut self, p: f64) -> Self {
        self.check("measure", p);
        self.model.readout = Some(ErrorChannel::ReadoutError { p });
        self
    }

    /// Finish the model.
    pub fn build(self) -> IrResult<NoiseModel> {
        match self.invalid {
            Some((label, p)) => Err(IrError::InvalidProbability { label, p }),
            None => Ok(self.model),
        }
    }

    fn check(&mut self, label: &str, p: f64) {
        if self.invalid.is_none() && !(0.0..=1.0).contains(&p) {
            self.invalid = Some((label.to_string(), p));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_channels() {
        let model = NoiseModelBuilder::new("m")
            .depolarizing(0.005, ["h", "rx", "x", "reset"])
            .depolarizing(0.005, ["cx"])
            .build()
            .unwrap();

        assert_eq!(model.gate_errors.len(), 5);
        assert_eq!(model.depolarizing_probability("reset"), Some(0.005));
        assert!(model.readout.is_none());
        assert!(!model.is_ideal());
    }

    #[test]
    fn test_later_channel_replaces_earlier() {
        let model = NoiseModelBuilder::new("m")
            .depolarizing(0.1, ["x"])
            .depolarizing(0.2, ["x"])
            .build()
            .unwrap();
        assert_eq!(model.depolarizing_probability("x"), Some(0.2));
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = NoiseModelBuilder::new("bad")
            .depolarizing(1.5, ["cx"])
            .readout_error(-0.1)
            .build()
            .unwrap_err();
        match err {
            IrError::InvalidProbability { label, p } => {
                assert_eq!(label, "cx");
                assert_eq!(p, 1.5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_rejected() {
        assert!(
            NoiseModelBuilder::new("nan")
                .readout_error(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_ideal_model() {
        let model = NoiseModel::ideal();
        assert!(model.is_ideal());
        assert_eq!(model.readout_probability(), None);
        assert_eq!(model.to_string(), "ideal");
    }

    #[test]
    fn test_display() {
        let model = NoiseModelBuilder::new("ro")
            .readout_error(0.15)
            .build()
            .unwrap();
        assert_eq!(model.to_string(), "ro measure:readout_error(p=0.1500)");
    }
}
