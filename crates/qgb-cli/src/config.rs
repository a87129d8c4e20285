//! Configuration for the analysis drivers.
//!
//! Values are resolved with the following precedence (highest first):
//! 1. Command-line flags
//! 2. Environment variables (`QGB_` prefix)
//! 3. A YAML file given by `--config` or `QGB_CONFIG`
//! 4. Built-in defaults
//!
//! ```yaml
//! report_dir: reports
//! seed: 42
//! ideal:
//!   n_layers: 6
//!   shots: 8192
//! noisy:
//!   max_layers: 5
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::path::{Path, PathBuf};

/// Complete driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QgbConfig {
    /// Directory every plot and data file is written into
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Base seed for the simulators; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Log filter; overrides `-v` when set
    #[serde(default)]
    pub log_level: Option<String>,

    /// Ideal simulation and validation driver
    #[serde(default)]
    pub ideal: IdealConfig,

    /// Noise-versus-depth sweep
    #[serde(default)]
    pub noisy: NoisyConfig,

    /// Readout mitigation driver
    #[serde(default)]
    pub mitigation: MitigationConfig,

    /// Ideal-versus-noisy comparison with Gaussian fit
    #[serde(default)]
    pub compare: CompareConfig,

    /// Circuit diagram
    #[serde(default)]
    pub diagram: DiagramConfig,
}

/// Settings for `qgb ideal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealConfig {
    /// Peg layers
    #[serde(default = "default_ideal_layers")]
    pub n_layers: u32,

    /// Shots per board
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Control rotation angles in radians, one board each
    #[serde(default = "default_ideal_angles")]
    pub angles: Vec<f64>,
}

/// Settings for `qgb noisy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoisyConfig {
    /// Deepest board of the sweep; the sweep starts at one layer
    #[serde(default = "default_noisy_max_layers")]
    pub max_layers: u32,

    /// Shots per board and per backend
    #[serde(default = "default_noisy_shots")]
    pub shots: u32,

    /// Control rotation angle in radians
    #[serde(default = "default_angle")]
    pub angle: f64,
}

/// Settings for `qgb mitigation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationConfig {
    /// Peg layers
    #[serde(default = "default_mitigation_layers")]
    pub n_layers: u32,

    /// Shots for the board runs
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Shots for each calibration circuit
    #[serde(default = "default_shots")]
    pub calibration_shots: u32,
}

/// Settings for `qgb compare`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Peg layers
    #[serde(default = "default_compare_layers")]
    pub n_layers: u32,

    /// Shots per backend
    #[serde(default = "default_shots")]
    pub shots: u32,
}

/// Settings for `qgb diagram`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramConfig {
    /// Peg layers
    #[serde(default = "default_diagram_layers")]
    pub n_layers: u32,
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_shots() -> u32 {
    8192
}

fn default_ideal_layers() -> u32 {
    6
}

fn default_ideal_angles() -> Vec<f64> {
    vec![FRAC_PI_2, 2.0 * PI / 3.0]
}

fn default_noisy_max_layers() -> u32 {
    7
}

fn default_noisy_shots() -> u32 {
    4096
}

fn default_angle() -> f64 {
    FRAC_PI_2
}

fn default_mitigation_layers() -> u32 {
    4
}

fn default_compare_layers() -> u32 {
    3
}

fn default_diagram_layers() -> u32 {
    2
}

impl Default for QgbConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            seed: None,
            log_level: None,
            ideal: IdealConfig::default(),
            noisy: NoisyConfig::default(),
            mitigation: MitigationConfig::default(),
            compare: CompareConfig::default(),
            diagram: DiagramConfig::default(),
        }
    }
}

impl Default for IdealConfig {
    fn default() -> Self {
        Self {
            n_layers: default_ideal_layers(),
            shots: default_shots(),
            angles: default_ideal_angles(),
        }
    }
}

impl Default for NoisyConfig {
    fn default() -> Self {
        Self {
            max_layers: default_noisy_max_layers(),
            shots: default_noisy_shots(),
            angle: default_angle(),
        }
    }
}

impl Default for MitigationConfig {
    fn default() -> Self {
        Self {
            n_layers: default_mitigation_layers(),
            shots: default_shots(),
            calibration_shots: default_shots(),
        }
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            n_layers: default_compare_layers(),
            shots: default_shots(),
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            n_layers: default_diagram_layers(),
        }
    }
}

impl QgbConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: QgbConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// File (or defaults) plus environment overrides, validated.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QGB_*` variables from the process environment.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply `QGB_*` overrides looked up through `var`.
    ///
    /// Only variables that are present override the current values; a
    /// present but unparseable value is an error.
    pub fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = var("QGB_REPORT_DIR") {
            self.report_dir = PathBuf::from(v);
        }
        if let Some(v) = var("QGB_SEED") {
            self.seed = Some(parse_var("QGB_SEED", &v)?);
        }
        if let Some(v) = var("QGB_LOG") {
            self.log_level = Some(v);
        }

        // Drivers
        if let Some(v) = var("QGB_IDEAL_LAYERS") {
            self.ideal.n_layers = parse_var("QGB_IDEAL_LAYERS", &v)?;
        }
        if let Some(v) = var("QGB_IDEAL_SHOTS") {
            self.ideal.shots = parse_var("QGB_IDEAL_SHOTS", &v)?;
        }
        if let Some(v) = var("QGB_NOISY_MAX_LAYERS") {
            self.noisy.max_layers = parse_var("QGB_NOISY_MAX_LAYERS", &v)?;
        }
        if let Some(v) = var("QGB_NOISY_SHOTS") {
            self.noisy.shots = parse_var("QGB_NOISY_SHOTS", &v)?;
        }
        if let Some(v) = var("QGB_MITIGATION_LAYERS") {
            self.mitigation.n_layers = parse_var("QGB_MITIGATION_LAYERS", &v)?;
        }
        if let Some(v) = var("QGB_MITIGATION_SHOTS") {
            self.mitigation.shots = parse_var("QGB_MITIGATION_SHOTS", &v)?;
        }
        if let Some(v) = var("QGB_COMPARE_LAYERS") {
            self.compare.n_layers = parse_var("QGB_COMPARE_LAYERS", &v)?;
        }
        if let Some(v) = var("QGB_COMPARE_SHOTS") {
            self.compare.shots = parse_var("QGB_COMPARE_SHOTS", &v)?;
        }
        if let Some(v) = var("QGB_DIAGRAM_LAYERS") {
            self.diagram.n_layers = parse_var("QGB_DIAGRAM_LAYERS", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layers = [
            ("ideal.n_layers", self.ideal.n_layers),
            ("noisy.max_layers", self.noisy.max_layers),
            ("mitigation.n_layers", self.mitigation.n_layers),
            ("compare.n_layers", self.compare.n_layers),
            ("diagram.n_layers", self.diagram.n_layers),
        ];
        for (key, value) in layers {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must be greater than 0"
                )));
            }
        }

        let shots = [
            ("ideal.shots", self.ideal.shots),
            ("noisy.shots", self.noisy.shots),
            ("mitigation.shots", self.mitigation.shots),
            ("mitigation.calibration_shots", self.mitigation.calibration_shots),
            ("compare.shots", self.compare.shots),
        ];
        for (key, value) in shots {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must be greater than 0"
                )));
            }
        }

        if self.ideal.angles.is_empty() {
            return Err(ConfigError::ValidationError(
                "ideal.angles must list at least one angle".to_string(),
            ));
        }
        if let Some(bad) = self
            .ideal
            .angles
            .iter()
            .chain(std::iter::once(&self.noisy.angle))
            .find(|a| !a.is_finite())
        {
            return Err(ConfigError::ValidationError(format!(
                "Invalid rotation angle: {bad}"
            )));
        }

        if let Some(level) = &self.log_level {
            if level.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "log_level must not be empty; omit the field to use -v".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}: cannot parse '{value}'")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
