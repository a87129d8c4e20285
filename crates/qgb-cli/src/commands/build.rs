//! Build a board and describe it without running it.

use anyhow::{Context, Result};
use console::style;

use qgb_board::GaltonBoard;

use super::common::angle_label;
use crate::output::{print_header, print_result, print_section};

/// Execute the build command.
pub fn execute(n_layers: u32, angle: Option<f64>, measure: bool, json: bool) -> Result<()> {
    let board = GaltonBoard::build(n_layers, angle, measure).context("Failed to build board")?;
    let summary = board.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_header(&format!("Galton board: {}", summary.name));
    print_result("layers", summary.n_layers);
    print_result(
        "control",
        summary
            .bias_angle
            .map_or_else(|| "H".to_string(), |theta| format!("Rx({})", angle_label(theta))),
    );
    print_result("p(left)", format!("{:.4}", board.left_probability()));
    print_result("qubits", summary.num_qubits);
    print_result("clbits", summary.num_clbits);
    print_result("control qubit", format!("q{}", summary.control));
    print_result("start", format!("q{}", summary.start));
    print_result("depth", summary.depth);

    print_section("Active positions");
    for (layer, positions) in summary.active_history.iter().enumerate() {
        let row: Vec<String> = positions.iter().map(|q| format!("q{q}")).collect();
        println!("  {:>3}  {}", style(layer).dim(), row.join(" "));
    }

    if measure {
        print_section("Measurement");
        for (clbit, qubit) in summary.bin_qubits.iter().enumerate() {
            println!("  q{qubit} -> c{clbit}");
        }
    }

    print_section("Gate counts");
    for (name, count) in &summary.gate_counts {
        print_result(name, count);
    }
    Ok(())
}
