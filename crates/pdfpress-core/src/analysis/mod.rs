//! Content analysis: page classification and document aggregation.

mod document;
mod page;

pub use document::{classify_document, DOMINANT_FRACTION};
pub use page::{
    classify_page, classify_ratios, IMAGE_PAGE_RATIO, TEXT_PAGE_MAX_IMAGE_RATIO, TEXT_PAGE_RATIO,
};

use crate::error::Result;
use crate::models::DocumentAnalysis;
use crate::pdf::PageSource;

/// Classify every page of a source and aggregate the result.
pub fn analyze<S: PageSource + ?Sized>(source: &S) -> Result<DocumentAnalysis> {
    let page_count = source.page_count();
    let mut metrics = Vec::with_capacity(page_count);

    for index in 0..page_count {
        let page = source.page(index)?;
        metrics.push(classify_page(&page));
    }

    Ok(classify_document(metrics)?)
}
