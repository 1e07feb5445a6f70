//! Subcommands and the helpers they share.

pub mod analyze;
pub mod batch;
pub mod compress;
pub mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use pdfpress_core::lopdf::Document;
use pdfpress_core::models::CompressionLevel;
use pdfpress_core::{
    load_document, CompressOptions, CompressionSummary, LoadedPdf, PdfiumBackend, PdfiumDocument,
    PressConfig,
};

/// Output format for command results.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON output
    Json,
}

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pdfpress")
        .join("config.json")
}

/// Load the configuration from `-c`, the user config file, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PressConfig> {
    if let Some(path) = config_path {
        return PressConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to read config file {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return PressConfig::from_file(&default_path)
            .with_context(|| format!("Failed to read config file {}", default_path.display()));
    }

    Ok(PressConfig::default())
}

/// An input PDF, read and parsed but not yet rendered.
pub struct InputPdf {
    pub data: Vec<u8>,
    pub structure: Document,
}

impl InputPdf {
    /// Read and parse a PDF. Fails on unreadable or malformed input.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        let data = fs::read(path)?;
        let structure =
            load_document(&data).with_context(|| format!("Cannot open {}", path.display()))?;

        Ok(Self { data, structure })
    }
}

/// Pair a parsed structure with a pdfium view of the same bytes.
pub fn open_pdf<'a>(
    backend: &'a PdfiumBackend,
    data: &'a [u8],
    structure: Document,
) -> anyhow::Result<LoadedPdf<PdfiumDocument<'a>>> {
    let source = backend.open(data)?;
    Ok(LoadedPdf::new(structure, source, data.len())?)
}

pub fn bind_backend(config: &PressConfig) -> anyhow::Result<PdfiumBackend> {
    let backend = PdfiumBackend::bind(config.backend.pdfium_library_dir.as_deref())
        .context("pdfium is required for page analysis")?;
    Ok(backend)
}

/// File name of `path`, lossily converted.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.pdf".to_string())
}

/// Analyze and compress one parsed input, writing the result to `output`.
pub fn compress_input(
    backend: &PdfiumBackend,
    input_path: &Path,
    input: InputPdf,
    output: &Path,
    level: CompressionLevel,
    config: &PressConfig,
    options: &CompressOptions,
) -> anyhow::Result<CompressionSummary> {
    let InputPdf { data, structure } = input;
    let pdf = open_pdf(backend, &data, structure)?;

    let analysis = pdf.analyze()?;
    let result = pdf.compress(level, &analysis, options)?;

    fs::write(output, &result.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    debug!("Wrote {} bytes to {}", result.bytes.len(), output.display());

    Ok(CompressionSummary::new(
        file_name(input_path),
        file_name(output),
        level,
        &analysis,
        &result,
        &config.report,
    ))
}
