//! Command-line definition and configuration resolution.

use std::f64::consts::PI;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigError, QgbConfig};

/// Quantum Galton board simulation and analysis
#[derive(Debug, Parser)]
#[command(name = "qgb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every subcommand and forwarded to child drivers.
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// YAML configuration file
    #[arg(long, env = "QGB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory for plots and data files
    #[arg(long, global = true)]
    pub report_dir: Option<PathBuf>,

    /// Base seed for the simulators
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ideal simulation validated against the binomial distribution
    Ideal {
        /// Number of layers
        #[arg(short = 'n', long)]
        layers: Option<u32>,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Bias angle, repeatable (radians, or forms like `pi/2`, `2pi/3`)
        #[arg(long = "angle", value_parser = parse_angle)]
        angles: Vec<f64>,
    },

    /// Divergence between ideal and noisy runs as the board grows
    Noisy {
        /// Largest number of layers in the sweep
        #[arg(long)]
        max_layers: Option<u32>,

        /// Number of shots per run
        #[arg(short, long)]
        shots: Option<u32>,

        /// Bias angle
        #[arg(long, value_parser = parse_angle)]
        angle: Option<f64>,
    },

    /// Readout-error mitigation and its effect on the bin variance
    Mitigation {
        /// Number of layers
        #[arg(short = 'n', long)]
        layers: Option<u32>,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Shots per calibration circuit
        #[arg(long)]
        calibration_shots: Option<u32>,
    },

    /// Ideal versus gate-noisy standard board, with a Gaussian fit
    Compare {
        /// Number of layers
        #[arg(short = 'n', long)]
        layers: Option<u32>,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,
    },

    /// Render the circuit of a small board
    Diagram {
        /// Number of layers
        #[arg(short = 'n', long)]
        layers: Option<u32>,
    },

    /// Build a board and print its structure
    Build {
        /// Number of layers
        #[arg(short = 'n', long, default_value = "3")]
        layers: u32,

        /// Bias angle; Hadamard control when omitted
        #[arg(long, value_parser = parse_angle)]
        angle: Option<f64>,

        /// Leave out the final measurements
        #[arg(long)]
        no_measure: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run ideal, noisy and mitigation in sequence
    All,
}

impl Commands {
    /// Whether the command runs a driver that reads [`QgbConfig`]. `build`
    /// takes everything from its flags and `all` leaves resolution to the
    /// drivers it spawns.
    pub fn reads_config(&self) -> bool {
        !matches!(self, Commands::Build { .. } | Commands::All)
    }
}

impl Cli {
    /// The driver configuration, resolved only for commands that read it.
    pub fn driver_config(&self) -> Result<Option<QgbConfig>, ConfigError> {
        if !self.command.reads_config() {
            return Ok(None);
        }
        self.config().map(Some)
    }

    /// Resolve the driver configuration: file and environment through
    /// [`QgbConfig::load`], then command-line flags on top.
    pub fn config(&self) -> Result<QgbConfig, ConfigError> {
        let mut config = QgbConfig::load(self.global.config.as_deref())?;
        if let Some(dir) = &self.global.report_dir {
            config.report_dir = dir.clone();
        }
        if let Some(seed) = self.global.seed {
            config.seed = Some(seed);
        }

        match &self.command {
            Commands::Ideal {
                layers,
                shots,
                angles,
            } => {
                override_with(&mut config.ideal.n_layers, *layers);
                override_with(&mut config.ideal.shots, *shots);
                if !angles.is_empty() {
                    config.ideal.angles = angles.clone();
                }
            }
            Commands::Noisy {
                max_layers,
                shots,
                angle,
            } => {
                override_with(&mut config.noisy.max_layers, *max_layers);
                override_with(&mut config.noisy.shots, *shots);
                override_with(&mut config.noisy.angle, *angle);
            }
            Commands::Mitigation {
                layers,
                shots,
                calibration_shots,
            } => {
                override_with(&mut config.mitigation.n_layers, *layers);
                override_with(&mut config.mitigation.shots, *shots);
                override_with(&mut config.mitigation.calibration_shots, *calibration_shots);
            }
            Commands::Compare { layers, shots } => {
                override_with(&mut config.compare.n_layers, *layers);
                override_with(&mut config.compare.shots, *shots);
            }
            Commands::Diagram { layers } => {
                override_with(&mut config.diagram.n_layers, *layers);
            }
            Commands::Build { .. } | Commands::All => {}
        }

        config.validate()?;
        Ok(config)
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Parse an angle in radians, accepting multiples and fractions of π.
pub fn parse_angle(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if let Ok(value) = s.parse::<f64>() {
        return Ok(value);
    }

    let lower = s.to_lowercase().replace('π', "pi");
    let (numerator, denominator) = match lower.split_once('/') {
        Some((num, den)) => (
            num.trim(),
            den.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid angle '{s}'"))?,
        ),
        None => (lower.as_str(), 1.0),
    };
    let coefficient = match numerator.strip_suffix("pi").map(str::trim) {
        Some("") => 1.0,
        Some("-") => -1.0,
        Some(c) => c
            .trim_end_matches('*')
            .parse::<f64>()
            .map_err(|_| format!("invalid angle '{s}'"))?,
        None => return Err(format!("invalid angle '{s}'")),
    };
    if denominator == 0.0 {
        return Err(format!("invalid angle '{s}': division by zero"));
    }
    Ok(coefficient * PI / denominator)
}
