//! Page geometry as seen by the content analyzer.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from two corners, normalizing their order.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Area of the rectangle. Inverted extents count as zero.
    pub fn area(&self) -> f64 {
        self.width().max(0.0) as f64 * self.height().max(0.0) as f64
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Carry this rectangle from the `from` frame into the `to` frame by
    /// scaling and translation. `None` when `from` is degenerate.
    pub fn map_between(&self, from: &Rect, to: &Rect) -> Option<Rect> {
        if from.width() <= 0.0 || from.height() <= 0.0 {
            return None;
        }
        let sx = to.width() / from.width();
        let sy = to.height() / from.height();
        Some(Rect::new(
            to.x0 + (self.x0 - from.x0) * sx,
            to.y0 + (self.y0 - from.y0) * sy,
            to.x0 + (self.x1 - from.x0) * sx,
            to.y0 + (self.y1 - from.y0) * sy,
        ))
    }

    /// Length of the overlap of the two horizontal extents (0 if disjoint).
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Length of the overlap of the two vertical extents (0 if disjoint).
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }
}

/// Kind of a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Text paragraph.
    Text,
    /// Raster image.
    Image,
    /// Vector paths, shadings, forms and anything else.
    Other,
}

/// A tagged region of a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub kind: BlockKind,
    pub bbox: Rect,
}

impl ContentBlock {
    pub fn new(kind: BlockKind, bbox: Rect) -> Self {
        Self { kind, bbox }
    }

    pub fn text(bbox: Rect) -> Self {
        Self::new(BlockKind::Text, bbox)
    }

    pub fn image(bbox: Rect) -> Self {
        Self::new(BlockKind::Image, bbox)
    }
}

/// One page of the source document, reduced to the geometry the analyzer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page index (0-indexed, in page-tree order).
    pub index: usize,
    /// Displayed page width in points.
    pub width: f32,
    /// Displayed page height in points.
    pub height: f32,
    /// Content blocks in reading order.
    pub blocks: Vec<ContentBlock>,
}

impl Page {
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Builder-style block attachment.
    pub fn with_blocks(mut self, blocks: Vec<ContentBlock>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Total page area. Zero or negative dimensions give zero.
    pub fn area(&self) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 0.0;
        }
        self.width as f64 * self.height as f64
    }
}
