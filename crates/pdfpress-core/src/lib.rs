//! Core library for content-aware PDF compression.
//!
//! This crate provides:
//! - Page classification (text, image, mixed) from content-block areas
//! - Document classification and compression strategy selection
//! - Lossless cleanup, page rasterization, and hybrid vector/raster rebuilds
//! - Size reporting and configuration models
//!
//! Rendering and page geometry come from pdfium (feature `pdfium`, on by
//! default); document structure is read and written with lopdf.

pub mod analysis;
pub mod compress;
pub mod error;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod report;

pub use lopdf;

pub use analysis::{analyze, classify_document, classify_page};
pub use compress::{compress, CompressOptions, CompressionResult, Strategy};
pub use error::{PressError, Result};
pub use models::{
    CompressionLevel, DocumentAnalysis, DocumentClass, PageClass, PageMetrics, PressConfig,
};
pub use pdf::{load_document, PageSource};
#[cfg(feature = "pdfium")]
pub use pdf::{PdfiumBackend, PdfiumDocument};
pub use pipeline::LoadedPdf;
pub use report::{format_size, reduction, CompressionSummary, Verdict};
