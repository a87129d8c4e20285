//! Quantum Galton Board circuit description.
//!
//! This crate holds the data structures every other crate in the workspace
//! speaks: qubit and classical-bit identifiers, the small gate set the board
//! needs, instructions, the [`Circuit`] builder and the [`NoiseModel`]
//! description handed to simulation backends.
//!
//! A [`Circuit`] is a flat, ordered instruction list with fixed register
//! sizes. Builders validate operands as they append, so a finished circuit
//! never references a qubit or classical bit it does not own.
//!
//! # Example: a single peg
//!
//! ```rust
//! use qgb_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("peg", 4, 2);
//! let (c, l, b, r) = (QubitId(0), QubitId(1), QubitId(2), QubitId(3));
//!
//! circuit.x(b).unwrap();
//! circuit.h(c).unwrap();
//! circuit
//!     .cswap(c, l, b)
//!     .unwrap()
//!     .cx(b, c)
//!     .unwrap()
//!     .cswap(c, b, r)
//!     .unwrap();
//! circuit.measure(l, ClbitId(0)).unwrap();
//! circuit.measure(r, ClbitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 4);
//! assert_eq!(circuit.gate_counts()["cswap"], 2);
//! ```
//!
//! # Supported operations
//!
//! | Operation | Qubits | Description |
//! |-----------|--------|-------------|
//! | `x` | 1 | Pauli-X |
//! | `h` | 1 | Hadamard gate |
//! | `rx` | 1 | X rotation |
//! | `cx` | 2 | Controlled-NOT |
//! | `cswap` | 3 | Fredkin (controlled-SWAP) |
//! | `reset` | 1 | Reset to `|0⟩` |
//! | `measure` | 1 | Measure into a classical bit |
//! | `barrier` | n | Layer boundary marker |
//!
//! Other [`StandardGate`]s (`y`, `z`, `ry`, `rz`) go in through
//! [`Circuit::append`].

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod noise;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use noise::{ErrorChannel, NoiseModel, NoiseModelBuilder};
pub use qubit::{ClbitId, QubitId};
