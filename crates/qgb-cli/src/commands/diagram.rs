//! Circuit diagram of a small unbiased board.

use anyhow::{Context, Result};
use tracing::info;

use qgb_analysis::ReportWriter;
use qgb_analysis::report::circuit_diagram;
use qgb_board::GaltonBoard;

use crate::config::QgbConfig;
use crate::output::{print_header, print_result, print_written};

/// Execute the diagram driver.
pub fn execute(config: &QgbConfig) -> Result<()> {
    let n = config.diagram.n_layers;
    print_header(&format!("Circuit diagram: {n} layers"));

    let board = GaltonBoard::build(n, None, false).context("Failed to build board")?;
    let circuit = board.circuit();
    print_result("qubits", circuit.num_qubits());
    print_result("clbits", circuit.num_clbits());
    print_result("instructions", circuit.instructions().len());
    info!(n_layers = n, depth = circuit.depth(), "rendering diagram");

    let writer = ReportWriter::new(&config.report_dir);
    print_written(&writer.write_svg("circuit_diagram", &circuit_diagram(circuit))?);
    Ok(())
}
