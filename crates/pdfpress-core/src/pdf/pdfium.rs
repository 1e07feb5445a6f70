//! Page geometry and rasterization using pdfium-render.

use std::path::Path;

use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, trace};

use super::blocks::{form_images, merge_text_segments, FormChild};
use super::codec::raster_dimensions;
use super::PageSource;
use crate::error::{CompressionError, PdfError, Result};
use crate::models::{BlockKind, ContentBlock, Page, Rect};

/// Form XObject nesting followed when looking for images.
const MAX_FORM_DEPTH: usize = 8;

/// A bound pdfium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind pdfium from `library_dir`, the working directory, or the system path.
    pub fn bind(library_dir: Option<&Path>) -> std::result::Result<Self, PdfError> {
        let bindings = match library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./")),
        }
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| PdfError::Backend(format!("failed to bind pdfium library: {}", e)))?;

        debug!("Bound pdfium library");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Open a document. The handle is closed when the returned value drops.
    pub fn open<'a>(&'a self, data: &'a [u8]) -> std::result::Result<PdfiumDocument<'a>, PdfError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| PdfError::Backend(format!("failed to load PDF: {}", e)))?;

        Ok(PdfiumDocument { document })
    }
}

/// An open pdfium document.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl PdfiumDocument<'_> {
    fn load_page(&self, index: usize) -> Result<PdfPage<'_>> {
        let page_index = index.try_into().map_err(|_| PdfError::InvalidPage(index))?;
        self.document
            .pages()
            .get(page_index)
            .map_err(|_| PdfError::InvalidPage(index).into())
    }
}

fn backend_error(e: PdfiumError) -> PdfError {
    PdfError::Backend(e.to_string())
}

fn object_rect(object: &PdfPageObject<'_>) -> std::result::Result<Rect, PdfiumError> {
    let bounds = object.bounds()?;
    Ok(Rect::new(
        bounds.left().value,
        bounds.bottom().value,
        bounds.right().value,
        bounds.top().value,
    ))
}

/// Objects drawn by a form, descending into nested forms.
fn form_children(form: &PdfPageXObjectFormObject<'_>, depth: usize) -> Vec<FormChild> {
    let mut children = Vec::new();

    for index in 0..form.len() {
        let Ok(child) = form.get(index) else {
            continue;
        };
        let Ok(bounds) = object_rect(&child) else {
            continue;
        };
        children.push(match &child {
            PdfPageObject::Image(_) => FormChild::Image(bounds),
            PdfPageObject::XObjectForm(inner) if depth < MAX_FORM_DEPTH => FormChild::Form {
                bounds,
                children: form_children(inner, depth + 1),
            },
            _ => FormChild::Other(bounds),
        });
    }

    children
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> Result<Page> {
        let page = self.load_page(index)?;
        let mut blocks = Vec::new();

        for object in page.objects().iter() {
            // Text is taken from segments below, merged into paragraphs.
            if matches!(object, PdfPageObject::Text(_)) {
                continue;
            }
            let bounds = object_rect(&object).map_err(backend_error)?;

            match &object {
                PdfPageObject::Image(_) => blocks.push(ContentBlock::image(bounds)),
                PdfPageObject::XObjectForm(form) => {
                    let images = form_images(&form_children(form, 1), &bounds);
                    if images.is_empty() {
                        blocks.push(ContentBlock::new(BlockKind::Other, bounds));
                    }
                    blocks.extend(images.into_iter().map(ContentBlock::image));
                }
                _ => blocks.push(ContentBlock::new(BlockKind::Other, bounds)),
            }
        }

        let text = page.text().map_err(backend_error)?;
        let segments: Vec<Rect> = text
            .segments()
            .iter()
            .filter(|segment| !segment.text().trim().is_empty())
            .map(|segment| {
                let bounds = segment.bounds();
                Rect::new(
                    bounds.left().value,
                    bounds.bottom().value,
                    bounds.right().value,
                    bounds.top().value,
                )
            })
            .collect();
        let segment_count = segments.len();
        blocks.extend(merge_text_segments(segments).into_iter().map(ContentBlock::text));

        trace!(
            "page {}: {} objects, {} text segments -> {} blocks",
            index,
            page.objects().len(),
            segment_count,
            blocks.len()
        );

        Ok(Page::new(index, page.width().value, page.height().value).with_blocks(blocks))
    }

    fn page_size(&self, index: usize) -> Result<(f32, f32)> {
        let page = self.load_page(index)?;
        Ok((page.width().value, page.height().value))
    }

    fn rasterize(&self, index: usize, dpi: u32) -> Result<DynamicImage> {
        let page = self.load_page(index)?;
        let (width, height) = raster_dimensions(page.width().value, page.height().value, dpi)
            .ok_or_else(|| CompressionError::Rasterize {
                page: index,
                reason: format!(
                    "unrenderable page size {}x{}pt at {} dpi",
                    page.width().value,
                    page.height().value,
                    dpi
                ),
            })?;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width as i32)
                    .set_target_height(height as i32)
                    .render_form_data(true)
                    .render_annotations(true),
            )
            .map_err(|e| CompressionError::Rasterize {
                page: index,
                reason: e.to_string(),
            })?;

        trace!("Rasterized page {} at {} dpi to {}x{}", index, dpi, width, height);
        Ok(bitmap.as_image())
    }
}
