//! Error types for the pdfpress-core library.

use thiserror::Error;

/// Main error type for the pdfpress library.
#[derive(Error, Debug)]
pub enum PressError {
    /// The input could not be opened as a PDF.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Content analysis error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Compression error.
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to opening and reading the input PDF.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page index requested (0-indexed).
    #[error("invalid page index: {0}")]
    InvalidPage(usize),

    /// The page source and the document structure disagree on page count.
    #[error("page count mismatch: renderer sees {rendered}, structure has {structural}")]
    PageCountMismatch { rendered: usize, structural: usize },

    /// A page content stream uses a filter that cannot be decoded.
    #[error("undecodable content stream: {0}")]
    UndecodableContent(String),

    /// The rendering backend could not be bound or failed to load the document.
    #[error("PDF backend error: {0}")]
    Backend(String),
}

/// Errors related to content analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No page metrics were supplied to the document classifier.
    #[error("cannot classify a document with no pages")]
    EmptyDocument,
}

/// Errors raised while producing the compressed document.
#[derive(Error, Debug)]
pub enum CompressionError {
    /// A page could not be rasterized.
    #[error("failed to rasterize page {page}: {reason}")]
    Rasterize { page: usize, reason: String },

    /// A rasterized page could not be JPEG-encoded.
    #[error("failed to encode page {page}: {reason}")]
    Encode { page: usize, reason: String },

    /// Building the output page tree failed.
    #[error("failed to assemble output document: {0}")]
    Assemble(String),

    /// Serializing the output document failed.
    #[error("failed to save PDF: {0}")]
    Save(String),

    /// The external linearizer failed.
    #[error("failed to linearize PDF: {0}")]
    Linearize(String),
}

/// Result type for the pdfpress library.
pub type Result<T> = std::result::Result<T, PressError>;
