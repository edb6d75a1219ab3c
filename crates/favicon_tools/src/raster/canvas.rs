//! Canvas creation, resizing and compositing

use crate::transform::ResampleFilter;
use image::{imageops, DynamicImage, Rgba, RgbaImage};

/// Fully transparent RGBA canvas
pub fn transparent_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
}

/// Resize to exactly `width` x `height` with the baseline `image` resizer
pub fn resize(source: &DynamicImage, width: u32, height: u32, filter: ResampleFilter) -> RgbaImage {
    source
        .resize_exact(width, height, filter.to_image_filter())
        .to_rgba8()
}

/// Alpha-blend `top` over `canvas` with its top-left corner at (`x`, `y`)
pub fn composite(canvas: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    imageops::overlay(canvas, top, x as i64, y as i64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_canvas() {
        let canvas = transparent_canvas(8, 4);
        assert_eq!(canvas.dimensions(), (8, 4));
        assert!(canvas.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_composite_places_opaque_pixels() {
        let mut canvas = transparent_canvas(10, 10);
        let top = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        composite(&mut canvas, &top, 3, 4);

        assert_eq!(*canvas.get_pixel(3, 4), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(6, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(2, 4)[3], 0);
        assert_eq!(canvas.get_pixel(7, 4)[3], 0);
        assert_eq!(canvas.get_pixel(3, 6)[3], 0);
    }

    #[test]
    fn test_resize_converts_to_rgba() {
        let source = DynamicImage::ImageRgb8(image::RgbImage::new(20, 10));
        let resized = resize(&source, 7, 3, ResampleFilter::Bilinear);
        assert_eq!(resized.dimensions(), (7, 3));
        assert!(resized.pixels().all(|p| p[3] == 255));
    }
}
