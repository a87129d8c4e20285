//! Report writing against a temporary directory.

use qgb_analysis::report::{BarChart, LineChart, PALETTE, Series, circuit_diagram};
use qgb_analysis::{BinDistribution, ReportWriter, analytical_distribution};
use qgb_hal::Counts;
use qgb_ir::{Circuit, QubitId};

#[test]
fn writes_svg_and_json_into_new_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(tmp.path().join("report").join("plots"));

    let counts: Counts = [("01", 48), ("10", 52)].into_iter().collect();
    let dist = BinDistribution::from_counts(&counts, 1);
    let chart = BarChart::new("Validation")
        .axes("Output Bin", "Probability")
        .categories(["0", "1"])
        .series(Series::new("simulated", dist.probabilities.clone(), PALETTE[0]))
        .series(Series::new("binomial", analytical_distribution(1, 0.5), PALETTE[1]));

    let svg_path = writer.write_svg("validation", &chart.render()).unwrap();
    let json_path = writer.write_json("validation", &dist).unwrap();

    assert_eq!(svg_path.file_name().unwrap(), "validation.svg");
    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains("Validation"));
    assert!(svg.contains("binomial"));

    let back: BinDistribution =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(back, dist);
}

#[test]
fn rerun_overwrites_previous_plot() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(tmp.path());

    let first = LineChart::new("first").x_values(vec![1.0]).series(Series::new(
        "js",
        vec![0.1],
        PALETTE[0],
    ));
    let second = LineChart::new("second").x_values(vec![1.0]).series(Series::new(
        "js",
        vec![0.2],
        PALETTE[0],
    ));
    writer.write_svg("noise_vs_depth", &first.render()).unwrap();
    let path = writer.write_svg("noise_vs_depth", &second.render()).unwrap();

    let svg = std::fs::read_to_string(path).unwrap();
    assert!(svg.contains("second"));
    assert!(!svg.contains("first"));
}

#[test]
fn diagram_renders_to_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut circuit = Circuit::with_size("bell", 2, 0);
    circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

    let path = ReportWriter::new(tmp.path())
        .write_svg("circuit_diagram", &circuit_diagram(&circuit))
        .unwrap();
    assert!(std::fs::read_to_string(path).unwrap().contains("<circle"));
}

#[test]
fn unwritable_target_reports_path() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("file");
    std::fs::write(&blocker, "x").unwrap();

    let err = ReportWriter::new(blocker.join("sub"))
        .write_json("x", &1)
        .unwrap_err();
    assert!(err.to_string().contains("sub"));
}
