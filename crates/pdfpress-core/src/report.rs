//! Size reporting: reduction, human-readable sizes, and verdicts.

use serde::{Deserialize, Serialize};

use crate::compress::{CompressionResult, Strategy};
use crate::models::config::ReportConfig;
use crate::models::{CompressionLevel, DocumentAnalysis, DocumentClass};

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Percentage size reduction. Negative when the output grew, 0 for empty input.
pub fn reduction(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}

/// Format a byte count as KB below 1 MiB and MB otherwise.
pub fn format_size(bytes: u64) -> String {
    let bytes = bytes as f64;
    if bytes < MIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{:.2} MB", bytes / MIB)
    }
}

/// Qualitative outcome of a compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AlreadyOptimized,
    Normal,
    Excellent,
}

impl Verdict {
    pub fn from_reduction(percent: f64, config: &ReportConfig) -> Self {
        if percent < config.warn_below_percent {
            Verdict::AlreadyOptimized
        } else if percent > config.celebrate_above_percent {
            Verdict::Excellent
        } else {
            Verdict::Normal
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::AlreadyOptimized => "This PDF is already well optimized",
            Verdict::Normal => "Compression complete",
            Verdict::Excellent => "Excellent compression",
        }
    }
}

/// Serializable record of one compressed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionSummary {
    pub input: String,
    pub output: String,
    pub dominant: DocumentClass,
    pub strategy: Strategy,
    pub level: CompressionLevel,
    pub total_pages: usize,
    pub text_pages: usize,
    pub image_pages: usize,
    pub mixed_pages: usize,
    pub original_size: u64,
    pub compressed_size: u64,
    pub reduction_percent: f64,
    pub verdict: Verdict,
}

impl CompressionSummary {
    pub fn new(
        input: impl Into<String>,
        output: impl Into<String>,
        level: CompressionLevel,
        analysis: &DocumentAnalysis,
        result: &CompressionResult,
        config: &ReportConfig,
    ) -> Self {
        let reduction_percent = result.reduction_percent();
        Self {
            input: input.into(),
            output: output.into(),
            dominant: analysis.dominant,
            strategy: result.strategy,
            level,
            total_pages: analysis.total_pages,
            text_pages: analysis.text_pages,
            image_pages: analysis.image_pages,
            mixed_pages: analysis.mixed_pages,
            original_size: result.original_size as u64,
            compressed_size: result.compressed_size as u64,
            reduction_percent,
            verdict: Verdict::from_reduction(reduction_percent, config),
        }
    }
}
