//! Quantum Galton board circuit construction.
//!
//! An `n`-layer board uses `2n + 2` qubits: one control qubit that is reset
//! and reused by every layer, and `2n + 1` board positions. A single
//! excitation injected at the middle position is routed left or right by a
//! peg at every layer; after `n` layers it sits on one of the `n + 1` odd
//! positions, each of which is measured into its own classical bit.
//!
//! ```rust
//! use qgb_board::GaltonBoard;
//!
//! let board = GaltonBoard::build(3, None, true).unwrap();
//! assert_eq!(board.circuit().num_qubits(), 8);
//! assert_eq!(board.circuit().num_clbits(), 4);
//! assert_eq!(board.history().last().unwrap().positions(), vec![1, 3, 5, 7]);
//! ```
//!
//! With a bias angle `θ` the control is prepared with `Rx(θ)`, and each
//! peg sends the ball left with probability `sin²(θ/2)`.

pub mod balls;
pub mod board;
pub mod error;
pub mod layout;
pub mod peg;

pub use balls::ActiveBalls;
pub use board::{BoardSummary, GaltonBoard};
pub use error::{BoardError, BoardResult};
pub use layout::{BoardLayout, MAX_LAYERS};
