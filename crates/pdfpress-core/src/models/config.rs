//! Configuration structures for the compression pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::level::CompressionLevel;
use crate::error::{PressError, Result};

/// Main configuration for pdfpress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PressConfig {
    /// Compression configuration.
    pub compression: CompressionConfig,

    /// Output file configuration.
    pub output: OutputConfig,

    /// Result reporting configuration.
    pub report: ReportConfig,

    /// Rendering backend configuration.
    pub backend: BackendConfig,
}

/// Compression configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Level used when none is given on the command line.
    pub default_level: CompressionLevel,

    /// Decode and re-encode page content streams on the lossless path.
    pub clean_content: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_level: CompressionLevel::Medium,
            clean_content: true,
        }
    }
}

/// Output file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix prepended to the input file name.
    pub file_prefix: String,

    /// Linearize lossless output for fast web view (requires qpdf).
    pub linearize: bool,

    /// qpdf executable used for linearization.
    pub qpdf_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_prefix: "compressed_".to_string(),
            linearize: false,
            qpdf_path: PathBuf::from("qpdf"),
        }
    }
}

/// Thresholds for the post-compression verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Below this reduction the file is reported as already optimized.
    pub warn_below_percent: f64,

    /// Above this reduction the result is reported as excellent.
    pub celebrate_above_percent: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            warn_below_percent: 5.0,
            celebrate_above_percent: 60.0,
        }
    }
}

/// Rendering backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Directory holding the pdfium shared library.
    ///
    /// When unset, the working directory and then the system library path are tried.
    pub pdfium_library_dir: Option<PathBuf>,
}

impl PressConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PressError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| PressError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Output file name for a given input file name.
    pub fn output_file_name(&self, input_name: &str) -> String {
        format!("{}{}", self.output.file_prefix, input_name)
    }
}
