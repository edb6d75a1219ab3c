//! Baseline PNG encoding through `image`

use crate::FaviconError;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

/// Encode RGBA8 pixels with best compression and adaptive row filtering
pub fn encode_baseline_png(img: &RgbaImage) -> Result<Vec<u8>, FaviconError> {
    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| FaviconError::encode_failure(format!("Failed to encode PNG: {}", e)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    #[test]
    fn test_baseline_png_roundtrip() {
        let img = RgbaImage::from_pixel(20, 10, Rgba([255, 0, 0, 128]));
        let data = encode_baseline_png(&img).unwrap();

        assert_eq!(image::guess_format(&data).unwrap(), image::ImageFormat::Png);
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (20, 10));
        assert_eq!(decoded.to_rgba8(), img);
    }

    #[test]
    fn test_baseline_png_compresses_flat_image() {
        let img = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
        let data = encode_baseline_png(&img).unwrap();
        assert!(data.len() < 64 * 64);
    }
}
