//! Data models shared across the pipeline.

pub mod analysis;
pub mod config;
pub mod level;
pub mod page;

pub use analysis::{DocumentAnalysis, DocumentClass, PageClass, PageMetrics};
pub use config::PressConfig;
pub use level::{CompressionLevel, RasterSettings};
pub use page::{BlockKind, ContentBlock, Page, Rect};
