//! Analysis toolkit for Galton board runs.
//!
//! - [`metrics`]: total variation distance and Jensen-Shannon divergence
//!   between two count maps.
//! - [`bins`]: turning bitstrings into bin indices and bin distributions.
//! - [`binomial`]: the analytical `Binomial(n, p)` reference.
//! - [`stats`]: bin variance and Gaussian fitting.
//! - [`noise`]: the noise-model presets the drivers run under.
//! - [`report`]: SVG plots and JSON data files.
//!
//! ```rust
//! use qgb_analysis::{BinDistribution, analytical_distribution, total_variation_distance};
//! use qgb_hal::Counts;
//!
//! let measured: Counts = [("001", 260), ("010", 500), ("100", 264)].into_iter().collect();
//! let dist = BinDistribution::from_counts(&measured, 2);
//! let reference = analytical_distribution(2, 0.5);
//! assert!(dist.max_deviation(&reference) < 0.02);
//!
//! let tvd = total_variation_distance(&measured, &measured, 1024).unwrap();
//! assert_eq!(tvd, 0.0);
//! ```

pub mod binomial;
pub mod bins;
pub mod error;
pub mod metrics;
pub mod noise;
pub mod report;
pub mod stats;

pub use binomial::{
    analytical_distribution, bias_probability, binomial_coefficient, theoretical_mean,
    theoretical_variance,
};
pub use bins::{BinDistribution, bin_index};
pub use error::{AnalysisError, AnalysisResult};
pub use metrics::{js_divergence, total_variation_distance};
pub use noise::{gate_depolarizing_model, gate_depolarizing_model_with, readout_heavy_model};
pub use report::ReportWriter;
pub use stats::{GaussianFit, bin_variance, fit_gaussian};
