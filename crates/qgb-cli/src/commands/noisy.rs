//! Noise impact versus board depth.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use tracing::info;

use qgb_analysis::report::{LineChart, Series};
use qgb_analysis::{ReportWriter, js_divergence, readout_heavy_model, total_variation_distance};
use qgb_board::GaltonBoard;

use super::common::{angle_label, noisy_simulator, sample, simulator};
use crate::config::QgbConfig;
use crate::output::{print_header, print_result, print_written};

#[derive(Debug, Serialize)]
struct DepthPoint {
    n_layers: u32,
    num_qubits: u32,
    depth: usize,
    js_divergence: f64,
    tvd: f64,
}

/// Execute the depth sweep.
pub async fn execute(config: &QgbConfig) -> Result<()> {
    let cfg = &config.noisy;
    print_header(&format!(
        "Noise vs depth: 1..={} layers, Rx({}), {} shots",
        cfg.max_layers,
        angle_label(cfg.angle),
        cfg.shots
    ));

    let noise = readout_heavy_model().context("Failed to build noise model")?;
    print_result("noise model", &noise);

    let ideal = simulator(config.seed, 0);
    let noisy = noisy_simulator(config.seed, 1, noise);
    let shots = u64::from(cfg.shots);

    println!(
        "\n  {:>6}  {:>6}  {:>6}  {:>8}  {:>8}",
        style("layers").bold(),
        style("qubits").bold(),
        style("depth").bold(),
        style("JS").bold(),
        style("TVD").bold()
    );

    let mut points = Vec::with_capacity(cfg.max_layers as usize);
    for n in 1..=cfg.max_layers {
        let board = GaltonBoard::build(n, Some(cfg.angle), true)
            .with_context(|| format!("Failed to build {n}-layer board"))?;
        let counts_ideal = sample(&ideal, &board, cfg.shots).await?;
        let counts_noisy = sample(&noisy, &board, cfg.shots).await?;

        let point = DepthPoint {
            n_layers: n,
            num_qubits: board.layout().num_qubits(),
            depth: board.circuit().depth(),
            js_divergence: js_divergence(&counts_ideal, &counts_noisy, shots)?,
            tvd: total_variation_distance(&counts_ideal, &counts_noisy, shots)?,
        };
        println!(
            "  {:>6}  {:>6}  {:>6}  {:>8.4}  {:>8.4}",
            point.n_layers, point.num_qubits, point.depth, point.js_divergence, point.tvd
        );
        info!(
            n_layers = n,
            js = point.js_divergence,
            tvd = point.tvd,
            "depth point"
        );
        points.push(point);
    }

    let chart = LineChart::new("Noise Impact vs. Circuit Depth")
        .axes("Number of Layers", "Divergence from Ideal")
        .x_values(points.iter().map(|p| f64::from(p.n_layers)).collect())
        .series(Series::new(
            "Jensen-Shannon Divergence",
            points.iter().map(|p| p.js_divergence).collect(),
            "#1e90ff",
        ))
        .series(Series::new(
            "Total Variation Distance",
            points.iter().map(|p| p.tvd).collect(),
            "#dc143c",
        ));

    let writer = ReportWriter::new(&config.report_dir);
    print_written(&writer.write_svg("noise_vs_depth", &chart.render())?);
    print_written(&writer.write_json("noise_vs_depth", &points)?);
    Ok(())
}
