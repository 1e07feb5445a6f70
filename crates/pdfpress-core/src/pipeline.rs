//! End-to-end processing of one PDF: load, analyze, compress.

use lopdf::Document;
use tracing::info;

use crate::analysis;
use crate::compress::{self, CompressOptions, CompressionResult};
use crate::error::{PdfError, Result};
use crate::models::{CompressionLevel, DocumentAnalysis};
use crate::pdf::{structure, PageSource};

/// A PDF opened twice: as an editable structure and as a rendered page source.
pub struct LoadedPdf<S> {
    structure: Document,
    source: S,
    original_size: usize,
}

impl<S: PageSource> LoadedPdf<S> {
    /// Pair a parsed structure with its page source.
    ///
    /// Fails when the two views disagree on the number of pages.
    pub fn new(structure: Document, source: S, original_size: usize) -> Result<Self> {
        let structural = structure::page_ids(&structure).len();
        let rendered = source.page_count();
        if structural != rendered {
            return Err(PdfError::PageCountMismatch {
                rendered,
                structural,
            }
            .into());
        }

        Ok(Self {
            structure,
            source,
            original_size,
        })
    }

    pub fn page_count(&self) -> usize {
        self.source.page_count()
    }

    /// Size of the input in bytes.
    pub fn original_size(&self) -> usize {
        self.original_size
    }

    pub fn analyze(&self) -> Result<DocumentAnalysis> {
        let analysis = analysis::analyze(&self.source)?;
        info!(
            "Classified {} pages as {} ({} text, {} image, {} mixed)",
            analysis.total_pages,
            analysis.dominant,
            analysis.text_pages,
            analysis.image_pages,
            analysis.mixed_pages
        );
        Ok(analysis)
    }

    /// Compress, consuming the structure.
    pub fn compress(
        self,
        level: CompressionLevel,
        analysis: &DocumentAnalysis,
        options: &CompressOptions,
    ) -> Result<CompressionResult> {
        compress::compress(
            &self.source,
            self.structure,
            self.original_size,
            level,
            analysis,
            options,
        )
    }
}
