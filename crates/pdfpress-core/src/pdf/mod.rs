//! PDF collaborators: document structure, page geometry, and rasterization.

pub mod blocks;
pub mod codec;
pub mod content;
pub mod structure;

#[cfg(feature = "pdfium")]
mod pdfium;

#[cfg(feature = "pdfium")]
pub use pdfium::{PdfiumBackend, PdfiumDocument};

pub use structure::load_document;

use image::DynamicImage;

use crate::error::Result;
use crate::models::Page;

/// Per-page access to a rendered view of a PDF.
///
/// Page indices are 0-based and follow page-tree order, the same order as
/// `lopdf::Document::get_pages`.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Geometry and content blocks of a page.
    fn page(&self, index: usize) -> Result<Page>;

    /// Displayed page size in points.
    fn page_size(&self, index: usize) -> Result<(f32, f32)> {
        let page = self.page(index)?;
        Ok((page.width, page.height))
    }

    /// Render a page to pixels at the given resolution.
    fn rasterize(&self, index: usize, dpi: u32) -> Result<DynamicImage>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page(&self, index: usize) -> Result<Page> {
        (**self).page(index)
    }

    fn page_size(&self, index: usize) -> Result<(f32, f32)> {
        (**self).page_size(index)
    }

    fn rasterize(&self, index: usize, dpi: u32) -> Result<DynamicImage> {
        (**self).rasterize(index, dpi)
    }
}
