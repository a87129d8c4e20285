//! Readout-error mitigation and its effect on the bin variance.

use std::f64::consts::FRAC_PI_2;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use qgb_adapter_sim::{QubitCalibration, ReadoutMitigator};
use qgb_analysis::report::{BarChart, Series};
use qgb_analysis::{ReportWriter, bin_variance, readout_heavy_model, theoretical_variance};
use qgb_board::GaltonBoard;
use qgb_hal::{Counts, MitigationService, QuasiDistribution};

use super::common::{noisy_simulator, sample, simulator};
use crate::config::QgbConfig;
use crate::output::{print_header, print_result, print_section, print_written};

const LABELS: [&str; 4] = ["Theoretical", "Noiseless Sim", "Raw Noisy", "Mitigated"];
const COLORS: [&str; 4] = ["#4CAF50", "#2196F3", "#F44336", "#FFC107"];

#[derive(Debug, Serialize)]
struct VarianceReport {
    n_layers: u32,
    shots: u32,
    theoretical: f64,
    noiseless: f64,
    raw_noisy: f64,
    mitigated: f64,
    calibration: Vec<QubitCalibration>,
}

/// Synthetic counts from a probability distribution, `floor(p * shots)`.
pub fn synthetic_counts(probs: &QuasiDistribution, shots: u32) -> Counts {
    probs
        .iter()
        .map(|(bits, p)| (bits.clone(), (p * f64::from(shots)).floor().max(0.0) as u64))
        .filter(|(_, n)| *n > 0)
        .collect()
}

/// Execute the mitigation driver.
pub async fn execute(config: &QgbConfig) -> Result<()> {
    let cfg = &config.mitigation;
    print_header(&format!(
        "Readout mitigation: {} layers, {} shots",
        cfg.n_layers, cfg.shots
    ));

    let board = GaltonBoard::build(cfg.n_layers, Some(FRAC_PI_2), true)
        .context("Failed to build board")?;
    let qubits = board.layout().output_qubits();

    let ideal = simulator(config.seed, 0);
    let noisy = noisy_simulator(
        config.seed,
        1,
        readout_heavy_model().context("Failed to build noise model")?,
    );

    print_section("Calibration");
    let mut mitigator = ReadoutMitigator::new();
    mitigator
        .calibrate(&noisy, &qubits, cfg.calibration_shots)
        .await
        .context("Readout calibration failed")?;
    let calibration = mitigator.calibrations();
    for cal in &calibration {
        print_result(
            &format!("q{}", cal.qubit),
            format!(
                "P(0|0)={:.4}  P(1|1)={:.4}",
                cal.p0_given_0, cal.p1_given_1
            ),
        );
    }

    print_section("Variances");
    let ideal_counts = sample(&ideal, &board, cfg.shots).await?;
    let noisy_counts = sample(&noisy, &board, cfg.shots).await?;

    let quasi = mitigator
        .apply_correction(&noisy_counts, &qubits)
        .context("Readout correction failed")?;
    let probs = quasi.nearest_probability_distribution();
    debug!(
        quasi_total = quasi.total(),
        outcomes = probs.len(),
        "mitigated distribution"
    );
    let mitigated_counts = synthetic_counts(&probs, cfg.shots);

    let report = VarianceReport {
        n_layers: cfg.n_layers,
        shots: cfg.shots,
        theoretical: theoretical_variance(cfg.n_layers as usize, 0.5),
        noiseless: bin_variance(&ideal_counts),
        raw_noisy: bin_variance(&noisy_counts),
        mitigated: bin_variance(&mitigated_counts),
        calibration,
    };
    let values = [
        report.theoretical,
        report.noiseless,
        report.raw_noisy,
        report.mitigated,
    ];
    for (label, value) in LABELS.iter().zip(values) {
        print_result(&format!("{label} variance"), format!("{value:.4}"));
    }
    info!(
        theoretical = report.theoretical,
        noiseless = report.noiseless,
        raw = report.raw_noisy,
        mitigated = report.mitigated,
        "variance comparison"
    );

    let chart = BarChart::new("Comparison of Variances with Measurement Error Mitigation")
        .axes("", "Variance")
        .categories(LABELS)
        .series(Series::new("Variance", values.to_vec(), COLORS[0]))
        .bar_colors(COLORS)
        .with_value_labels();

    let writer = ReportWriter::new(&config.report_dir);
    print_written(&writer.write_svg("variance_comparison", &chart.render())?);
    print_written(&writer.write_json("variance_comparison", &report)?);
    Ok(())
}
