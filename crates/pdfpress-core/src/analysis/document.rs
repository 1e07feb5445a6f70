//! Document-level aggregation of page classes.

use tracing::debug;

use crate::error::AnalysisError;
use crate::models::{DocumentAnalysis, DocumentClass, PageClass, PageMetrics};

/// Fraction of pages of one class needed to make it dominant.
pub const DOMINANT_FRACTION: f64 = 0.6;

/// Aggregate page metrics into a document analysis.
pub fn classify_document(pages: Vec<PageMetrics>) -> Result<DocumentAnalysis, AnalysisError> {
    let total_pages = pages.len();
    if total_pages == 0 {
        return Err(AnalysisError::EmptyDocument);
    }

    let count = |class: PageClass| pages.iter().filter(|m| m.classification == class).count();
    let text_pages = count(PageClass::Text);
    let image_pages = count(PageClass::Image);
    let mixed_pages = count(PageClass::Mixed);

    let dominant = dominant_class(total_pages, text_pages, image_pages);

    debug!(
        "document analysis: {} pages ({} text, {} image, {} mixed) -> {}",
        total_pages, text_pages, image_pages, mixed_pages, dominant
    );

    Ok(DocumentAnalysis {
        total_pages,
        text_pages,
        image_pages,
        mixed_pages,
        pages,
        dominant,
    })
}

/// Dominant-label rule. Image pages are checked first.
fn dominant_class(total: usize, text_pages: usize, image_pages: usize) -> DocumentClass {
    let image_fraction = image_pages as f64 / total as f64;
    let text_fraction = text_pages as f64 / total as f64;

    if image_fraction > DOMINANT_FRACTION {
        DocumentClass::ImageHeavy
    } else if text_fraction > DOMINANT_FRACTION {
        DocumentClass::TextHeavy
    } else {
        DocumentClass::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn metrics(classes: &[(PageClass, usize)]) -> Vec<PageMetrics> {
        classes
            .iter()
            .flat_map(|&(class, n)| std::iter::repeat(class).take(n))
            .enumerate()
            .map(|(index, classification)| PageMetrics {
                index,
                text_area_ratio: 0.0,
                image_area_ratio: 0.0,
                classification,
            })
            .collect()
    }

    #[test]
    fn test_image_heavy() {
        let pages = metrics(&[(PageClass::Image, 7), (PageClass::Text, 1), (PageClass::Mixed, 2)]);
        let analysis = classify_document(pages).unwrap();
        assert_eq!(analysis.dominant, DocumentClass::ImageHeavy);
        assert_eq!(analysis.total_pages, 10);
        assert_eq!(
            (analysis.text_pages, analysis.image_pages, analysis.mixed_pages),
            (1, 7, 2)
        );
    }

    #[test]
    fn test_no_majority_is_mixed() {
        let pages = metrics(&[(PageClass::Text, 5), (PageClass::Image, 3), (PageClass::Mixed, 2)]);
        assert_eq!(classify_document(pages).unwrap().dominant, DocumentClass::Mixed);
    }

    #[test]
    fn test_text_heavy() {
        let pages = metrics(&[(PageClass::Text, 7), (PageClass::Mixed, 3)]);
        assert_eq!(classify_document(pages).unwrap().dominant, DocumentClass::TextHeavy);
    }

    #[test]
    fn test_fraction_boundary_is_strict() {
        // 6 of 10 is exactly 0.6, not above it.
        let pages = metrics(&[(PageClass::Image, 6), (PageClass::Text, 4)]);
        assert_eq!(classify_document(pages).unwrap().dominant, DocumentClass::Mixed);
    }

    #[test]
    fn test_single_page_documents() {
        let analysis = classify_document(metrics(&[(PageClass::Text, 1)])).unwrap();
        assert_eq!(analysis.dominant, DocumentClass::TextHeavy);
        assert_eq!(analysis.page_class(0), Some(PageClass::Text));
        assert_eq!(analysis.page_class(1), None);

        let analysis = classify_document(metrics(&[(PageClass::Mixed, 1)])).unwrap();
        assert_eq!(analysis.dominant, DocumentClass::Mixed);
    }

    #[test]
    fn test_empty_document_is_rejected() {
        assert!(matches!(
            classify_document(Vec::new()),
            Err(AnalysisError::EmptyDocument)
        ));
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut pages = metrics(&[(PageClass::Image, 7), (PageClass::Mixed, 3)]);
        let forward = classify_document(pages.clone()).unwrap().dominant;
        pages.reverse();
        assert_eq!(classify_document(pages).unwrap().dominant, forward);
    }
}
