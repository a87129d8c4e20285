//! Ideal simulation and validation against the binomial distribution.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use qgb_analysis::report::{BarChart, PALETTE, Series};
use qgb_analysis::{BinDistribution, ReportWriter, analytical_distribution, bias_probability};
use qgb_board::GaltonBoard;

use super::common::{angle_label, bin_labels, sample, simulator};
use crate::config::QgbConfig;
use crate::output::{print_bins, print_header, print_result, print_section, print_written};

/// One simulated board and its comparison against the analytical pmf.
#[derive(Debug, Serialize)]
struct IdealRun {
    angle: f64,
    p: f64,
    bins: BinDistribution,
    analytical: Vec<f64>,
    max_deviation: f64,
    tvd: f64,
}

/// Execute the ideal driver.
pub async fn execute(config: &QgbConfig) -> Result<()> {
    let cfg = &config.ideal;
    let n = cfg.n_layers as usize;
    print_header(&format!("Ideal Galton board: {} layers, {} shots", n, cfg.shots));

    let backend = simulator(config.seed, 0);
    let mut runs = Vec::with_capacity(cfg.angles.len());

    for &angle in &cfg.angles {
        let board = GaltonBoard::build(cfg.n_layers, Some(angle), true)
            .with_context(|| format!("Failed to build board for angle {angle}"))?;
        print_section(&format!("Rx({})", angle_label(angle)));
        print_result("qubits", board.layout().num_qubits());
        print_result("depth", board.circuit().depth());

        let counts = sample(&backend, &board, cfg.shots).await?;
        let bins = BinDistribution::from_counts(&counts, n);
        let p = bias_probability(Some(angle));
        let analytical = analytical_distribution(n, p);

        print_bins(&bins.probabilities, &analytical);
        let max_deviation = bins.max_deviation(&analytical);
        let tvd = bins.total_variation(&analytical);
        print_result("peg bias p", format!("{p:.4}"));
        print_result("max |Δ|", format!("{max_deviation:.4}"));
        print_result("TVD vs Binomial", format!("{tvd:.4}"));
        if bins.skipped > 0 {
            warn!(skipped = bins.skipped, angle, "shots without a bin");
            print_result("skipped shots", bins.skipped);
        }
        info!(angle, p, max_deviation, tvd, "ideal board validated");

        runs.push(IdealRun {
            angle,
            p,
            bins,
            analytical,
            max_deviation,
            tvd,
        });
    }

    let writer = ReportWriter::new(&config.report_dir);
    let labels = bin_labels(n);

    let mut histogram = BarChart::new("Quantum Galton Board Ideal Simulation Results")
        .axes("Output Bin", "Probability")
        .categories(labels.clone());
    for (i, run) in runs.iter().enumerate() {
        histogram = histogram.series(Series::new(
            format!("Rx({}) - {} layers", angle_label(run.angle), n),
            run.bins.probabilities.clone(),
            PALETTE[(i * 2) % PALETTE.len()],
        ));
    }
    print_written(&writer.write_svg("QGB_Ideal_simulation", &histogram.render())?);

    let mut validation = BarChart::new(format!(
        "Validation: Quantum Simulation vs. Analytical Formula ({n} Layers)"
    ))
    .axes("Output Bin", "Probability")
    .categories(labels);
    for (i, run) in runs.iter().enumerate() {
        validation = validation
            .series(Series::new(
                format!("Simulation Rx({})", angle_label(run.angle)),
                run.bins.probabilities.clone(),
                PALETTE[(i * 2) % PALETTE.len()],
            ))
            .series(Series::new(
                format!("Binomial({n}, {:.2})", run.p),
                run.analytical.clone(),
                PALETTE[(i * 2 + 1) % PALETTE.len()],
            ));
    }
    print_written(&writer.write_svg("Quantumsimulation_vs_analytical", &validation.render())?);
    print_written(&writer.write_json("ideal", &runs)?);

    Ok(())
}
