//! Ideal versus gate-noisy standard board, plus a Gaussian fit.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use qgb_analysis::report::{BarChart, PALETTE, Series};
use qgb_analysis::{GaussianFit, ReportWriter, fit_gaussian, gate_depolarizing_model, js_divergence};
use qgb_board::GaltonBoard;
use qgb_hal::Counts;

use super::common::{noisy_simulator, sample, simulator};
use crate::config::QgbConfig;
use crate::output::{print_header, print_result, print_written};

/// Samples of the fitted density kept in the data file.
pub const FIT_POINTS: usize = 100;

#[derive(Debug, Serialize)]
struct Comparison {
    n_layers: u32,
    shots: u32,
    js_divergence: f64,
    ideal: Counts,
    noisy: Counts,
    fit: GaussianFit,
    curve: Vec<(f64, f64)>,
}

/// Observed outcome values with their probabilities, in ascending value
/// order. Bitstrings that do not parse as base-2 integers are skipped.
pub fn observed_values(counts: &Counts) -> Vec<(u64, f64)> {
    let total = counts.total_shots().max(1) as f64;
    let mut values: Vec<(u64, f64)> = counts
        .iter()
        .filter_map(|(bits, &c)| u64::from_str_radix(bits, 2).ok().map(|v| (v, c as f64 / total)))
        .collect();
    values.sort_by_key(|&(v, _)| v);
    values
}

/// Histogram of the observed values with the fitted density evaluated at
/// each of them.
pub fn fitted_chart(counts: &Counts, fit: &GaussianFit) -> BarChart {
    let observed = observed_values(counts);
    BarChart::new(format!(
        "Fitted Gaussian: μ={:.2}, σ={:.2}",
        fit.mean, fit.std
    ))
    .axes("Outcome value", "Probability")
    .categories(observed.iter().map(|(v, _)| v.to_string()))
    .series(Series::new(
        "Ideal (Simulator)",
        observed.iter().map(|&(_, p)| p).collect(),
        PALETTE[0],
    ))
    .overlay(Series::new(
        "Fitted Gaussian",
        observed.iter().map(|&(v, _)| fit.pdf(v as f64)).collect(),
        PALETTE[2],
    ))
}

/// Execute the comparison driver.
pub async fn execute(config: &QgbConfig) -> Result<()> {
    let cfg = &config.compare;
    print_header(&format!(
        "Ideal vs noisy standard board: {} layers, {} shots",
        cfg.n_layers, cfg.shots
    ));

    let board = GaltonBoard::unbiased(cfg.n_layers).context("Failed to build board")?;
    let ideal = simulator(config.seed, 0);
    let noisy = noisy_simulator(
        config.seed,
        1,
        gate_depolarizing_model().context("Failed to build noise model")?,
    );
    print_result("noise model", noisy.noise_model());

    let counts_ideal = sample(&ideal, &board, cfg.shots).await?;
    let counts_noisy = sample(&noisy, &board, cfg.shots).await?;
    let jsd = js_divergence(&counts_ideal, &counts_noisy, u64::from(cfg.shots))?;
    print_result(
        "Jensen-Shannon Divergence between Ideal and Noisy",
        format!("{jsd:.4}"),
    );

    let fit = fit_gaussian(&counts_ideal)?;
    print_result("fitted μ", format!("{:.2}", fit.mean));
    print_result("fitted σ", format!("{:.2}", fit.std));
    info!(js = jsd, mean = fit.mean, std = fit.std, "comparison complete");

    let outcomes: BTreeSet<&String> = counts_ideal
        .iter()
        .chain(counts_noisy.iter())
        .map(|(bits, _)| bits)
        .collect();
    let total_ideal = counts_ideal.total_shots().max(1) as f64;
    let total_noisy = counts_noisy.total_shots().max(1) as f64;
    let histogram = BarChart::new(format!(
        "Ideal vs. Noisy Results for {}-Layer Standard QGB",
        cfg.n_layers
    ))
    .axes("Outcome", "Probability")
    .categories(outcomes.iter().map(|s| s.as_str()))
    .series(Series::new(
        "Ideal (Simulator)",
        outcomes
            .iter()
            .map(|b| counts_ideal.get(b) as f64 / total_ideal)
            .collect(),
        PALETTE[0],
    ))
    .series(Series::new(
        "Noisy (Custom Model)",
        outcomes
            .iter()
            .map(|b| counts_noisy.get(b) as f64 / total_noisy)
            .collect(),
        PALETTE[1],
    ));

    let fitted = fitted_chart(&counts_ideal, &fit);

    let writer = ReportWriter::new(&config.report_dir);
    print_written(&writer.write_svg("ideal_vs_noisy_standard_QGB", &histogram.render())?);
    print_written(&writer.write_svg("Fitted_Gaussian", &fitted.render())?);
    print_written(&writer.write_json(
        "ideal_vs_noisy_standard_QGB",
        &Comparison {
            n_layers: cfg.n_layers,
            shots: cfg.shots,
            js_divergence: jsd,
            ideal: counts_ideal,
            noisy: counts_noisy,
            fit,
            curve: fit.curve(FIT_POINTS),
        },
    )?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_values_sorted_by_value() {
        let counts: Counts = [("100", 3), ("001", 1), ("zz", 4)].into_iter().collect();
        assert_eq!(observed_values(&counts), vec![(1, 0.125), (4, 0.375)]);
    }

    #[test]
    fn test_fitted_chart_size_tracks_outcomes_not_value_range() {
        // One-hot outcomes of a 30-layer board span values up to 2^30.
        let counts: Counts = (0..31)
            .map(|k| (format!("{:031b}", 1u64 << k), 10))
            .collect();
        let fit = fit_gaussian(&counts).unwrap();
        let svg = fitted_chart(&counts, &fit).render().render();
        // Background + one bar per outcome + two legend swatches.
        assert_eq!(svg.matches("<rect").count(), 1 + 31 + 2);
        assert!(svg.len() < 64 * 1024, "svg is {} bytes", svg.len());
    }

    #[test]
    fn test_fit_curve_has_fixed_resolution() {
        let wide = format!("1{}", "0".repeat(40));
        let counts: Counts = [("1".to_string(), 1), (wide, 1)].into_iter().collect();
        let fit = fit_gaussian(&counts).unwrap();
        assert_eq!(fit.curve(FIT_POINTS).len(), FIT_POINTS);
    }
}
