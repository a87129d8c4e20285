//! Driver implementations, one per subcommand.

pub mod all;
pub mod build;
pub mod common;
pub mod compare;
pub mod diagram;
pub mod ideal;
pub mod mitigation;
pub mod noisy;
