//! Strategy selection and execution.

pub mod optimize;
pub mod writer;

pub use writer::PageAssembler;

use std::fmt;
use std::path::PathBuf;

use lopdf::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{CompressionError, PdfError, Result};
use crate::models::{CompressionLevel, DocumentAnalysis, DocumentClass, PageClass, PressConfig};
use crate::pdf::{codec, structure, PageSource};
use crate::report;

/// Document-wide compression procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Structural cleanup of the original document, no re-rendering.
    Lossless,
    /// Every page rasterized and JPEG-encoded.
    Rasterize,
    /// Text pages kept as vectors, all others rasterized.
    Hybrid,
}

/// How a single page is carried into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTreatment {
    /// Rendered to JPEG at the level's resolution.
    Raster,
    /// Embedded as a Form XObject.
    Vector,
}

impl Strategy {
    pub fn for_document(class: DocumentClass) -> Self {
        match class {
            DocumentClass::TextHeavy => Strategy::Lossless,
            DocumentClass::ImageHeavy => Strategy::Rasterize,
            DocumentClass::Mixed => Strategy::Hybrid,
        }
    }

    /// Per-page treatment, or `None` when pages are not rebuilt.
    pub fn treatment(&self, page: PageClass) -> Option<PageTreatment> {
        match (self, page) {
            (Strategy::Lossless, _) => None,
            (Strategy::Rasterize, _) => Some(PageTreatment::Raster),
            (Strategy::Hybrid, PageClass::Text) => Some(PageTreatment::Vector),
            (Strategy::Hybrid, PageClass::Image | PageClass::Mixed) => Some(PageTreatment::Raster),
        }
    }

    /// Whether the compression level changes the output.
    pub fn uses_level(&self) -> bool {
        !matches!(self, Strategy::Lossless)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Lossless => {
                "Lossless optimization (no re-rendering, text and fonts preserved)"
            }
            Strategy::Rasterize => "Image re-compression at reduced DPI",
            Strategy::Hybrid => {
                "Hybrid: text pages preserved as vectors, image pages re-compressed"
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Lossless => "lossless",
            Strategy::Rasterize => "rasterize",
            Strategy::Hybrid => "hybrid",
        })
    }
}

/// Save-time options.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Re-encode content streams on the lossless path.
    pub clean_content: bool,
    /// Linearize lossless output.
    pub linearize: bool,
    /// qpdf executable used for linearization.
    pub qpdf_path: PathBuf,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self::from(&PressConfig::default())
    }
}

impl From<&PressConfig> for CompressOptions {
    fn from(config: &PressConfig) -> Self {
        Self {
            clean_content: config.compression.clean_content,
            linearize: config.output.linearize,
            qpdf_path: config.output.qpdf_path.clone(),
        }
    }
}

/// Output of a compression run.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// Serialized output PDF.
    pub bytes: Vec<u8>,
    pub original_size: usize,
    pub compressed_size: usize,
    pub strategy: Strategy,
    /// Pages in the output.
    pub page_count: usize,
}

impl CompressionResult {
    /// Percentage size reduction; negative when the output grew.
    pub fn reduction_percent(&self) -> f64 {
        report::reduction(self.original_size as u64, self.compressed_size as u64)
    }
}

/// Compress `document` with the strategy chosen by `analysis`.
///
/// `source` must view the same document as `document`; pages are matched by
/// index. Any page failure aborts the whole run.
pub fn compress<S: PageSource + ?Sized>(
    source: &S,
    document: Document,
    original_size: usize,
    level: CompressionLevel,
    analysis: &DocumentAnalysis,
    options: &CompressOptions,
) -> Result<CompressionResult> {
    let page_ids = structure::page_ids(&document);
    if page_ids.len() != source.page_count() || page_ids.len() != analysis.total_pages {
        return Err(PdfError::PageCountMismatch {
            rendered: source.page_count(),
            structural: page_ids.len(),
        }
        .into());
    }

    let strategy = Strategy::for_document(analysis.dominant);
    debug!(
        "Compressing {} document with {} strategy at {} level",
        analysis.dominant, strategy, level
    );

    let (bytes, page_count) = match strategy {
        Strategy::Lossless => {
            let mut document = document;
            if options.clean_content {
                optimize::clean_content_streams(&mut document);
            }
            let mut bytes = optimize::save(document)?;
            if options.linearize {
                bytes = optimize::linearize(&bytes, &options.qpdf_path)?;
            }
            (bytes, page_ids.len())
        }
        Strategy::Rasterize | Strategy::Hybrid => {
            let settings = level.settings();
            let mut assembler = PageAssembler::new(document);

            for (index, &page_id) in page_ids.iter().enumerate() {
                let class = analysis.page_class(index).unwrap_or(PageClass::Mixed);
                match strategy.treatment(class) {
                    Some(PageTreatment::Vector) => {
                        trace!("page {}: {} -> vector", index, class);
                        assembler.place_vector_page(page_id)?;
                    }
                    _ => {
                        trace!("page {}: {} -> raster", index, class);
                        let (width, height) = source.page_size(index)?;
                        let image = source.rasterize(index, settings.dpi)?;
                        let jpeg = codec::encode_jpeg(&image, settings.jpeg_quality).map_err(|e| {
                            CompressionError::Encode {
                                page: index,
                                reason: e.to_string(),
                            }
                        })?;
                        assembler.place_raster_page(width, height, jpeg)?;
                    }
                }
            }

            let page_count = assembler.page_count();
            (optimize::save(assembler.finish()?)?, page_count)
        }
    };

    let compressed_size = bytes.len();
    debug!(
        "Compressed {} -> {} bytes ({:.1}%)",
        original_size,
        compressed_size,
        report::reduction(original_size as u64, compressed_size as u64)
    );

    Ok(CompressionResult {
        bytes,
        original_size,
        compressed_size,
        strategy,
        page_count,
    })
}
