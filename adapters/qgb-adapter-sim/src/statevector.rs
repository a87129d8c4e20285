//! Sparse statevector used for shot-by-shot trajectory simulation.
//!
//! Only non-zero amplitudes are stored, keyed by basis index (bit `q` of the
//! index is qubit `q`). Galton board states stay a handful of basis states
//! wide regardless of qubit count, so memory tracks entanglement rather
//! than `2^n`.

use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::error::{SimError, SimResult};

/// Amplitudes below this magnitude are dropped after each gate.
const PRUNE_EPS: f64 = 1e-14;

/// Widest register a basis index can address.
pub const MAX_QUBITS: usize = 64;

type Matrix2 = [[Complex64; 2]; 2];

/// One of the four single-qubit Pauli operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    /// Pauli from an index in `0..4`: I, X, Y, Z.
    pub fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Pauli::I,
            1 => Pauli::X,
            2 => Pauli::Y,
            _ => Pauli::Z,
        }
    }
}

/// A pure state over `num_qubits` qubits.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: FxHashMap<u64, Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// `|0...0⟩` over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut amplitudes = FxHashMap::default();
        amplitudes.insert(0, Complex64::new(1.0, 0.0));
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of stored (non-zero) amplitudes.
    pub fn support(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: u64) -> Complex64 {
        self.amplitudes
            .get(&index)
            .copied()
            .unwrap_or_else(|| Complex64::new(0.0, 0.0))
    }

    /// Probability of reading `1` on `qubit`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1u64 << qubit;
        self.amplitudes
            .iter()
            .filter(|(idx, _)| *idx & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    pub fn apply_x(&mut self, qubit: usize) {
        let mask = 1u64 << qubit;
        self.permute(|idx| idx ^ mask);
    }

    pub fn apply_y(&mut self, qubit: usize) {
        let i = Complex64::new(0.0, 1.0);
        let zero = Complex64::new(0.0, 0.0);
        self.apply_matrix(qubit, [[zero, -i], [i, zero]]);
    }

    pub fn apply_z(&mut self, qubit: usize) {
        let mask = 1u64 << qubit;
        for (idx, amp) in &mut self.amplitudes {
            if idx & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    pub fn apply_h(&mut self, qubit: usize) {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        self.apply_matrix(qubit, [[h, h], [h, -h]]);
    }

    pub fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new(0.0, -(theta / 2.0).sin());
        self.apply_matrix(qubit, [[c, s], [s, c]]);
    }

    pub fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        self.apply_matrix(qubit, [[c, -s], [s, c]]);
    }

    pub fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let zero = Complex64::new(0.0, 0.0);
        let lo = Complex64::from_polar(1.0, -theta / 2.0);
        let hi = Complex64::from_polar(1.0, theta / 2.0);
        self.apply_matrix(qubit, [[lo, zero], [zero, hi]]);
    }

    pub fn apply_cx(&mut self, control: usize, target: usize) {
        let c = 1u64 << control;
        let t = 1u64 << target;
        self.permute(|idx| if idx & c != 0 { idx ^ t } else { idx });
    }

    pub fn apply_cswap(&mut self, control: usize, a: usize, b: usize) {
        let c = 1u64 << control;
        let (ma, mb) = (1u64 << a, 1u64 << b);
        self.permute(|idx| {
            let differ = (idx & ma != 0) != (idx & mb != 0);
            if idx & c != 0 && differ {
                idx ^ ma ^ mb
            } else {
                idx
            }
        });
    }

    /// Apply a Pauli operator to `qubit`.
    pub fn apply_pauli(&mut self, qubit: usize, pauli: Pauli) {
        match pauli {
            Pauli::I => {}
            Pauli::X => self.apply_x(qubit),
            Pauli::Y => self.apply_y(qubit),
            Pauli::Z => self.apply_z(qubit),
        }
    }

    /// Projective Z measurement of `qubit`: samples an outcome by the Born
    /// rule and collapses the state onto it.
    pub fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let p1 = self.probability_one(qubit).clamp(0.0, 1.0);
        let outcome = rng.gen_range(0.0..1.0) < p1;
        self.collapse(qubit, outcome, if outcome { p1 } else { 1.0 - p1 });
        outcome
    }

    /// Measure `qubit` and flip it back to `|0⟩` if it read `1`.
    pub fn reset<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) {
        if self.measure(qubit, rng) {
            self.apply_x(qubit);
        }
    }

    fn collapse(&mut self, qubit: usize, outcome: bool, probability: f64) {
        let mask = 1u64 << qubit;
        self.amplitudes
            .retain(|idx, _| (idx & mask != 0) == outcome);
        if probability > 0.0 {
            let scale = 1.0 / probability.sqrt();
            for amp in self.amplitudes.values_mut() {
                *amp *= scale;
            }
        }
    }

    fn permute(&mut self, map: impl Fn(u64) -> u64) {
        self.amplitudes = self
            .amplitudes
            .drain()
            .map(|(idx, amp)| (map(idx), amp))
            .collect();
    }

    fn apply_matrix(&mut self, qubit: usize, m: Matrix2) {
        let mask = 1u64 << qubit;
        let mut next: FxHashMap<u64, Complex64> =
            FxHashMap::with_capacity_and_hasher(self.amplitudes.len() * 2, Default::default());
        for (idx, amp) in self.amplitudes.drain() {
            let bit = usize::from(idx & mask != 0);
            let base = idx & !mask;
            *next.entry(base).or_default() += m[0][bit] * amp;
            *next.entry(base | mask).or_default() += m[1][bit] * amp;
        }
        next.retain(|_, amp| amp.norm_sqr() > PRUNE_EPS * PRUNE_EPS);
        self.amplitudes = next;
    }
}
