//! Per-page content classification.

use tracing::trace;

use crate::models::{BlockKind, Page, PageClass, PageMetrics};

/// Image coverage above which a page is an image page.
pub const IMAGE_PAGE_RATIO: f64 = 0.5;

/// Text coverage above which a page may be a text page.
pub const TEXT_PAGE_RATIO: f64 = 0.3;

/// Image coverage a text page must stay under.
pub const TEXT_PAGE_MAX_IMAGE_RATIO: f64 = 0.2;

/// Compute area ratios for a page and classify it.
///
/// Overlapping blocks are counted once per block, so a ratio can exceed 1.
pub fn classify_page(page: &Page) -> PageMetrics {
    let (text_area, image_area) =
        page.blocks
            .iter()
            .fold((0.0_f64, 0.0_f64), |(text, image), block| match block.kind {
                BlockKind::Text => (text + block.bbox.area(), image),
                BlockKind::Image => (text, image + block.bbox.area()),
                BlockKind::Other => (text, image),
            });

    let total_area = page.area();
    let (text_area_ratio, image_area_ratio) = if total_area > 0.0 {
        (text_area / total_area, image_area / total_area)
    } else {
        (0.0, 0.0)
    };

    let classification = classify_ratios(text_area_ratio, image_area_ratio);

    trace!(
        "page {}: text={:.3} image={:.3} -> {}",
        page.index, text_area_ratio, image_area_ratio, classification
    );

    PageMetrics {
        index: page.index,
        text_area_ratio,
        image_area_ratio,
        classification,
    }
}

/// Threshold rules, first match wins.
pub fn classify_ratios(text_area_ratio: f64, image_area_ratio: f64) -> PageClass {
    if image_area_ratio > IMAGE_PAGE_RATIO {
        PageClass::Image
    } else if text_area_ratio > TEXT_PAGE_RATIO && image_area_ratio < TEXT_PAGE_MAX_IMAGE_RATIO {
        PageClass::Text
    } else {
        PageClass::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentBlock, Rect};

    // 100 x 100 page so block areas read directly as percentages.
    fn page_with(blocks: Vec<ContentBlock>) -> Page {
        Page::new(0, 100.0, 100.0).with_blocks(blocks)
    }

    #[test]
    fn test_image_boundary_is_strict() {
        let exact = page_with(vec![ContentBlock::image(Rect::new(0.0, 0.0, 100.0, 50.0))]);
        let metrics = classify_page(&exact);
        assert_eq!(metrics.image_area_ratio, 0.5);
        assert_ne!(metrics.classification, PageClass::Image);

        let above = page_with(vec![ContentBlock::image(Rect::new(0.0, 0.0, 100.0, 51.0))]);
        assert_eq!(classify_page(&above).classification, PageClass::Image);
    }

    #[test]
    fn test_text_boundary_is_strict() {
        let exact = page_with(vec![ContentBlock::text(Rect::new(0.0, 0.0, 100.0, 30.0))]);
        let metrics = classify_page(&exact);
        assert_eq!(metrics.text_area_ratio, 0.3);
        assert_eq!(metrics.classification, PageClass::Mixed);

        let above = page_with(vec![ContentBlock::text(Rect::new(0.0, 0.0, 100.0, 31.0))]);
        assert_eq!(classify_page(&above).classification, PageClass::Text);
    }

    #[test]
    fn test_text_page_needs_little_imagery() {
        let page = page_with(vec![
            ContentBlock::text(Rect::new(0.0, 0.0, 100.0, 60.0)),
            ContentBlock::image(Rect::new(0.0, 60.0, 100.0, 80.0)),
        ]);
        let metrics = classify_page(&page);
        assert_eq!(metrics.image_area_ratio, 0.2);
        assert_eq!(metrics.classification, PageClass::Mixed);
    }

    #[test]
    fn test_other_blocks_are_ignored() {
        let page = page_with(vec![
            ContentBlock::new(BlockKind::Other, Rect::new(0.0, 0.0, 100.0, 100.0)),
            ContentBlock::text(Rect::new(0.0, 0.0, 100.0, 40.0)),
        ]);
        let metrics = classify_page(&page);
        assert_eq!(metrics.image_area_ratio, 0.0);
        assert_eq!(metrics.classification, PageClass::Text);
    }

    #[test]
    fn test_zero_area_page_defaults_to_zero() {
        let page = Page::new(3, 0.0, 0.0)
            .with_blocks(vec![ContentBlock::image(Rect::new(0.0, 0.0, 10.0, 10.0))]);
        let metrics = classify_page(&page);
        assert_eq!(metrics.index, 3);
        assert_eq!(metrics.text_area_ratio, 0.0);
        assert_eq!(metrics.image_area_ratio, 0.0);
        assert_eq!(metrics.classification, PageClass::Mixed);
    }

    #[test]
    fn test_overlap_may_exceed_one() {
        let full = Rect::new(0.0, 0.0, 100.0, 100.0);
        let page = page_with(vec![ContentBlock::image(full), ContentBlock::image(full)]);
        let metrics = classify_page(&page);
        assert_eq!(metrics.image_area_ratio, 2.0);
        assert_eq!(metrics.classification, PageClass::Image);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let page = page_with(vec![
            ContentBlock::text(Rect::new(5.0, 5.0, 95.0, 40.0)),
            ContentBlock::image(Rect::new(5.0, 45.0, 60.0, 60.0)),
        ]);
        let first = classify_page(&page);
        for _ in 0..10 {
            assert_eq!(classify_page(&page), first);
        }
        assert!(first.text_area_ratio >= 0.0);
        assert!(first.image_area_ratio >= 0.0);
    }
}
