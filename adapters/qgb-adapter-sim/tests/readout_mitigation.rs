//! Calibrating and applying readout mitigation against noisy simulators.

use std::f64::consts::FRAC_PI_2;

use qgb_adapter_sim::{ReadoutMitigator, SimulatorBackend};
use qgb_analysis::{BinDistribution, analytical_distribution};
use qgb_board::GaltonBoard;
use qgb_hal::{Backend, Counts, MitigationService};
use qgb_ir::{NoiseModelBuilder, QubitId};

fn synthetic_counts(mitigated: &qgb_hal::QuasiDistribution, shots: u32) -> Counts {
    mitigated
        .iter()
        .map(|(bits, p)| (bits.clone(), (p * f64::from(shots)).floor() as u64))
        .collect()
}

#[tokio::test]
async fn test_ideal_backend_calibrates_to_perfect_readout() {
    let backend = SimulatorBackend::new().with_seed(1);
    let qubits = [QubitId(1), QubitId(3)];
    let mut mitigator = ReadoutMitigator::new();
    mitigator.calibrate(&backend, &qubits, 500).await.unwrap();

    assert!(mitigator.is_calibrated(&qubits));
    for cal in mitigator.calibrations() {
        assert_eq!(cal.p0_given_0, 1.0);
        assert_eq!(cal.p1_given_1, 1.0);
    }
}

#[tokio::test]
async fn test_calibration_measures_readout_error() {
    let noise = NoiseModelBuilder::new("ro").readout_error(0.2).build().unwrap();
    let backend = SimulatorBackend::new().with_seed(8).with_noise_model(noise);
    let mut mitigator = ReadoutMitigator::new();
    mitigator
        .calibrate(&backend, &[QubitId(0)], 8000)
        .await
        .unwrap();

    let cal = mitigator.calibration(QubitId(0)).unwrap();
    assert!((cal.p0_given_0 - 0.8).abs() < 0.03, "{cal:?}");
    assert!((cal.p1_given_1 - 0.8).abs() < 0.03, "{cal:?}");
}

#[tokio::test]
async fn test_mitigation_recovers_board_distribution() {
    let shots = 8192;
    let noise = NoiseModelBuilder::new("ro").readout_error(0.08).build().unwrap();
    let backend = SimulatorBackend::new().with_seed(21).with_noise_model(noise);
    let board = GaltonBoard::build(4, Some(FRAC_PI_2), true).unwrap();
    let qubits: Vec<QubitId> = board.layout().output_qubits();
    let reference = analytical_distribution(4, 0.5);

    let raw = backend.run(board.circuit(), shots).await.unwrap().counts;
    let raw_dev = BinDistribution::from_counts(&raw, 4).max_deviation(&reference);

    let mut mitigator = ReadoutMitigator::new();
    mitigator.calibrate(&backend, &qubits, shots).await.unwrap();
    let quasi = mitigator.apply_correction(&raw, &qubits).unwrap();
    assert!((quasi.total() - 1.0).abs() < 1e-9);

    let probs = quasi.nearest_probability_distribution();
    assert!(probs.is_probability());

    let mitigated = synthetic_counts(&probs, shots);
    let mitigated_dev = BinDistribution::from_counts(&mitigated, 4).max_deviation(&reference);

    assert!(
        mitigated_dev < raw_dev,
        "mitigated {mitigated_dev} vs raw {raw_dev}"
    );
    assert!(mitigated_dev < 0.06, "mitigated {mitigated_dev}");
}

#[tokio::test]
async fn test_correction_before_calibration_fails() {
    let mitigator = ReadoutMitigator::new();
    let counts: Counts = [("01", 5)].into_iter().collect();
    assert!(
        mitigator
            .apply_correction(&counts, &[QubitId(0), QubitId(1)])
            .is_err()
    );
}
