//! Classification results for pages and whole documents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content class of a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageClass {
    /// Mostly text with little imagery.
    Text,
    /// More than half of the page covered by images.
    Image,
    /// Neither of the above.
    Mixed,
}

impl PageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageClass::Text => "text",
            PageClass::Image => "image",
            PageClass::Mixed => "mixed",
        }
    }
}

impl fmt::Display for PageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dominant content class of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentClass {
    TextHeavy,
    ImageHeavy,
    Mixed,
}

impl DocumentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentClass::TextHeavy => "text-heavy",
            DocumentClass::ImageHeavy => "image-heavy",
            DocumentClass::Mixed => "mixed",
        }
    }

    /// Title-cased label for display ("Text Heavy").
    pub fn title(&self) -> &'static str {
        match self {
            DocumentClass::TextHeavy => "Text Heavy",
            DocumentClass::ImageHeavy => "Image Heavy",
            DocumentClass::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for DocumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area metrics and class of one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    /// Page index (0-indexed).
    pub index: usize,
    /// Summed text block area over page area.
    pub text_area_ratio: f64,
    /// Summed image block area over page area.
    pub image_area_ratio: f64,
    /// Resulting classification.
    pub classification: PageClass,
}

/// Aggregated analysis of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub total_pages: usize,
    pub text_pages: usize,
    pub image_pages: usize,
    pub mixed_pages: usize,
    /// Per-page metrics in page order.
    pub pages: Vec<PageMetrics>,
    pub dominant: DocumentClass,
}

impl DocumentAnalysis {
    /// Class of the page at `index`, if present.
    pub fn page_class(&self, index: usize) -> Option<PageClass> {
        self.pages.get(index).map(|m| m.classification)
    }

    /// Number of pages with the given class.
    pub fn count(&self, class: PageClass) -> usize {
        match class {
            PageClass::Text => self.text_pages,
            PageClass::Image => self.image_pages,
            PageClass::Mixed => self.mixed_pages,
        }
    }
}
