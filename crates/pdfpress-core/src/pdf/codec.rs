//! Raster sizing and JPEG encoding for rasterized pages.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError};
use tracing::trace;

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Largest raster edge accepted, in pixels.
pub const MAX_RASTER_EDGE: u32 = 20_000;

/// A JPEG-encoded page image.
#[derive(Debug, Clone)]
pub struct JpegImage {
    /// Encoded JPEG bytes.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Pixel size of a page rendered at `dpi`.
///
/// Returns `None` for empty or pathologically large pages.
pub fn raster_dimensions(width_pt: f32, height_pt: f32, dpi: u32) -> Option<(u32, u32)> {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let width = (width_pt * scale).round();
    let height = (height_pt * scale).round();

    if !(width >= 1.0 && height >= 1.0) {
        return None;
    }
    if width > MAX_RASTER_EDGE as f32 || height > MAX_RASTER_EDGE as f32 {
        return None;
    }

    Some((width as u32, height as u32))
}

/// Encode an image as baseline RGB JPEG. Alpha is discarded.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<JpegImage, ImageError> {
    let rgb = image.to_rgb8();
    let mut data = Vec::new();

    let mut encoder = JpegEncoder::new_with_quality(&mut data, quality);
    encoder.encode_image(&rgb)?;

    trace!(
        "Encoded {}x{} JPEG at quality {}: {} bytes",
        rgb.width(),
        rgb.height(),
        quality,
        data.len()
    );

    Ok(JpegImage {
        data,
        width: rgb.width(),
        height: rgb.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_raster_dimensions() {
        // US Letter at 72 dpi is its size in points.
        assert_eq!(raster_dimensions(612.0, 792.0, 72), Some((612, 792)));
        assert_eq!(raster_dimensions(612.0, 792.0, 150), Some((1275, 1650)));
        assert_eq!(raster_dimensions(612.0, 792.0, 80), Some((680, 880)));
    }

    #[test]
    fn test_raster_dimensions_rejects_degenerate_pages() {
        assert_eq!(raster_dimensions(0.0, 792.0, 150), None);
        assert_eq!(raster_dimensions(612.0, f32::NAN, 150), None);
        assert_eq!(raster_dimensions(1_000_000.0, 792.0, 150), None);
    }

    #[test]
    fn test_encode_jpeg() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, Rgb([10, 200, 30])));
        let jpeg = encode_jpeg(&image, 85).unwrap();
        assert_eq!((jpeg.width, jpeg.height), (64, 32));
        // SOI marker
        assert_eq!(&jpeg.data[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory_with_format(&jpeg.data, image::ImageFormat::Jpeg)
            .unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])));
        let jpeg = encode_jpeg(&image, 75).unwrap();
        assert_eq!((jpeg.width, jpeg.height), (8, 8));
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let mut img = RgbImage::new(128, 128);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 2) as u8, (y * 2) as u8, ((x ^ y) * 2) as u8]);
        }
        let image = DynamicImage::ImageRgb8(img);
        let high = encode_jpeg(&image, 92).unwrap();
        let low = encode_jpeg(&image, 75).unwrap();
        assert!(low.data.len() < high.data.len());
    }
}
