//! Report output: SVG plots and JSON data files.
//!
//! Each driver writes fixed file names into one report directory; reruns
//! overwrite earlier output.

mod chart;
mod diagram;
mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{AnalysisError, AnalysisResult};

pub use chart::{BarChart, LineChart, PALETTE, Series};
pub use diagram::{circuit_diagram, layout_columns};
pub use svg::{Anchor, SvgDocument};

/// Writes report files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Write into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `doc` as `<name>.svg`.
    pub fn write_svg(&self, name: &str, doc: &SvgDocument) -> AnalysisResult<PathBuf> {
        self.write(&format!("{name}.svg"), doc.render())
    }

    /// Write `value` as pretty-printed `<name>.json`.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> AnalysisResult<PathBuf> {
        let json = serde_json::to_string_pretty(value)?;
        self.write(&format!("{name}.json"), json)
    }

    fn write(&self, file: &str, contents: String) -> AnalysisResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| AnalysisError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(file);
        fs::write(&path, contents).map_err(|source| AnalysisError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "report written");
        Ok(path)
    }
}
