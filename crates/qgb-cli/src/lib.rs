//! Drivers behind the `qgb` binary.
//!
//! Each analysis driver builds Galton boards, runs them on the simulator
//! adapter and writes SVG plots plus a JSON data file into the report
//! directory. [`cli::Cli`] is the command-line surface and
//! [`config::QgbConfig`] the layered configuration the drivers read.

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;

pub use cli::{Cli, Commands, GlobalArgs};
pub use config::{ConfigError, QgbConfig};
