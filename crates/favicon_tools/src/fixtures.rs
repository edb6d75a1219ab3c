//! Test fixtures for favicon_tools
//!
//! Provides generated source images and helpers for unit tests.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

/// Fixture sizes for standard icon dimensions
pub mod sizes {
    pub const SMALL: u32 = 16;
    pub const MEDIUM: u32 = 64;
    pub const SOURCE: u32 = 100;
    pub const LARGE: u32 = 256;
}

/// 100x100 opaque red RGB PNG, the canonical favicon source
pub fn png_rgb_100x100_red() -> Vec<u8> {
    let img = RgbImage::from_pixel(sizes::SOURCE, sizes::SOURCE, Rgb([255, 0, 0]));
    encode_png(DynamicImage::ImageRgb8(img))
}

/// Create a 16x16 PNG suitable for small icon
pub fn png_rgba_16x16() -> Vec<u8> {
    let mut img = RgbaImage::new(sizes::SMALL, sizes::SMALL);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgba([(x * 16) as u8, (y * 16) as u8, 128, 255]);
    }
    encode_png(DynamicImage::ImageRgba8(img))
}

/// Create a 64x64 PNG
pub fn png_rgba_64x64() -> Vec<u8> {
    let mut img = RgbaImage::new(sizes::MEDIUM, sizes::MEDIUM);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgba([(x * 4) as u8, (y * 4) as u8, 128, 255]);
    }
    encode_png(DynamicImage::ImageRgba8(img))
}

/// Create a 256x256 PNG with a blue circle on a transparent background
pub fn png_rgba_256x256_icon() -> Vec<u8> {
    let mut img = RgbaImage::new(sizes::LARGE, sizes::LARGE);
    let center = (sizes::LARGE / 2) as i32;
    let radius = 100i32;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as i32 - center;
        let dy = y as i32 - center;
        let in_circle = dx * dx + dy * dy < radius * radius;

        *pixel = if in_circle {
            Rgba([0, 120, 255, 255])
        } else {
            Rgba([255, 255, 255, 0])
        };
    }
    encode_png(DynamicImage::ImageRgba8(img))
}

/// Fully opaque RGBA image of arbitrary size, for aspect ratio tests
pub fn opaque_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([20, 160, 90, 255]),
    ))
}

/// Non-square 800x400 opaque PNG
pub fn png_rgba_800x400() -> Vec<u8> {
    encode_png(opaque_rgba(800, 400))
}

/// Standard SVG fixture - 100x100 with a blue rectangle
pub fn svg_100x100() -> String {
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
        <rect x="10" y="10" width="80" height="80" fill="blue"/>
    </svg>"#
        .to_string()
}

/// Invalid image data for error testing
pub fn invalid_image_data() -> Vec<u8> {
    vec![0, 1, 2, 3, 4, 5]
}

/// Write fixture bytes into a temp directory and return the path
pub fn write_fixture(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).expect("Failed to write fixture");
    path
}

/// Bounding box `(x, y, width, height)` of pixels with non-zero alpha
pub fn opaque_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

fn encode_png(img: DynamicImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("Failed to encode PNG");
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid_png() {
        let fixtures = [
            ("png_rgb_100x100_red", png_rgb_100x100_red()),
            ("png_rgba_16x16", png_rgba_16x16()),
            ("png_rgba_64x64", png_rgba_64x64()),
            ("png_rgba_256x256_icon", png_rgba_256x256_icon()),
            ("png_rgba_800x400", png_rgba_800x400()),
        ];

        for (name, data) in fixtures {
            let result = image::load_from_memory(&data);
            assert!(result.is_ok(), "Fixture {} failed to load", name);
        }
    }

    #[test]
    fn test_opaque_bounds() {
        let mut img = RgbaImage::new(10, 10);
        img.put_pixel(2, 3, Rgba([0, 0, 0, 255]));
        img.put_pixel(5, 7, Rgba([0, 0, 0, 1]));
        assert_eq!(opaque_bounds(&img), Some((2, 3, 4, 5)));
        assert_eq!(opaque_bounds(&RgbaImage::new(4, 4)), None);
    }
}
