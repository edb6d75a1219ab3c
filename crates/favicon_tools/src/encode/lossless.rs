//! Uncompressed PNG encoding with the `png` crate

use crate::FaviconError;
use image::RgbaImage;
use png::{BitDepth, ColorType, Compression, Encoder, PixelDimensions, Unit};

/// 300 DPI expressed in pixels per meter (300 / 0.0254)
pub const PIXELS_PER_METER_300_DPI: u32 = 11811;

/// Encode RGBA8 pixels as a non-interlaced PNG with stored deflate blocks
/// and a 300 DPI `pHYs` chunk. No text or metadata chunks are written.
pub fn encode_lossless_png(img: &RgbaImage) -> Result<Vec<u8>, FaviconError> {
    let (width, height) = img.dimensions();
    let mut buffer = Vec::new();

    {
        let mut encoder = Encoder::new(&mut buffer, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(Compression::NoCompression);
        encoder.set_pixel_dims(Some(PixelDimensions {
            xppu: PIXELS_PER_METER_300_DPI,
            yppu: PIXELS_PER_METER_300_DPI,
            unit: Unit::Meter,
        }));

        let mut writer = encoder
            .write_header()
            .map_err(|e| FaviconError::encode_failure(format!("Failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(img.as_raw())
            .map_err(|e| FaviconError::encode_failure(format!("Failed to write PNG data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| FaviconError::encode_failure(format!("Failed to finish PNG: {}", e)))?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    #[test]
    fn test_lossless_png_metadata() {
        let img = RgbaImage::from_pixel(32, 16, Rgba([10, 20, 30, 200]));
        let data = encode_lossless_png(&img).unwrap();

        let decoder = png::Decoder::new(Cursor::new(data.as_slice()));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();

        assert_eq!((info.width, info.height), (32, 16));
        assert_eq!(info.color_type, ColorType::Rgba);
        assert_eq!(info.bit_depth, BitDepth::Eight);
        assert!(!info.interlaced);

        let dims = info.pixel_dims.unwrap();
        assert_eq!(dims.xppu, PIXELS_PER_METER_300_DPI);
        assert_eq!(dims.yppu, PIXELS_PER_METER_300_DPI);
        assert_eq!(dims.unit, Unit::Meter);

        assert!(info.uncompressed_latin1_text.is_empty());
        assert!(info.compressed_latin1_text.is_empty());
        assert!(info.utf8_text.is_empty());
    }

    #[test]
    fn test_lossless_png_is_stored_uncompressed() {
        let img = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
        let data = encode_lossless_png(&img).unwrap();
        // a flat image would deflate to almost nothing
        assert!(data.len() > 64 * 64 * 4);
    }

    #[test]
    fn test_lossless_png_pixels_survive() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(1, 1, Rgba([1, 2, 3, 4]));
        let data = encode_lossless_png(&img).unwrap();

        let decoded = image::load_from_memory(&data).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }
}
