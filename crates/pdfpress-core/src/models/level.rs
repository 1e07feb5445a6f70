//! Compression levels and their raster settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User-selected compression strength.
///
/// Only rasterized pages are affected; lossless structural cleanup ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionLevel {
    Low,
    #[default]
    Medium,
    High,
}

/// Rasterization resolution and JPEG quality for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSettings {
    /// Target resolution in dots per inch.
    pub dpi: u32,
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
}

impl CompressionLevel {
    pub const ALL: [CompressionLevel; 3] = [
        CompressionLevel::Low,
        CompressionLevel::Medium,
        CompressionLevel::High,
    ];

    /// Fixed level table.
    pub const fn settings(self) -> RasterSettings {
        match self {
            CompressionLevel::Low => RasterSettings {
                dpi: 150,
                jpeg_quality: 92,
            },
            CompressionLevel::Medium => RasterSettings {
                dpi: 110,
                jpeg_quality: 85,
            },
            CompressionLevel::High => RasterSettings {
                dpi: 80,
                jpeg_quality: 75,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionLevel::Low => "low",
            CompressionLevel::Medium => "medium",
            CompressionLevel::High => "high",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(CompressionLevel::Low),
            "medium" => Ok(CompressionLevel::Medium),
            "high" => Ok(CompressionLevel::High),
            other => Err(format!("unknown compression level: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_table() {
        assert_eq!(
            CompressionLevel::Low.settings(),
            RasterSettings { dpi: 150, jpeg_quality: 92 }
        );
        assert_eq!(
            CompressionLevel::Medium.settings(),
            RasterSettings { dpi: 110, jpeg_quality: 85 }
        );
        assert_eq!(
            CompressionLevel::High.settings(),
            RasterSettings { dpi: 80, jpeg_quality: 75 }
        );
    }

    #[test]
    fn test_higher_level_means_smaller_raster() {
        let dpis: Vec<u32> = CompressionLevel::ALL.iter().map(|l| l.settings().dpi).collect();
        assert!(dpis.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_default_and_parse() {
        assert_eq!(CompressionLevel::default(), CompressionLevel::Medium);
        assert_eq!("HIGH".parse::<CompressionLevel>().unwrap(), CompressionLevel::High);
        assert!("extreme".parse::<CompressionLevel>().is_err());
    }
}
