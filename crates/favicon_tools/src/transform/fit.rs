//! Exact-fit resizing
//!
//! Produces a raster of exactly the requested size. The source keeps its
//! aspect ratio and is letterboxed, centered on a transparent canvas, instead
//! of being cropped or stretched.

use crate::raster;
use crate::transform::ResampleFilter;
use crate::FaviconError;
use image::{DynamicImage, GenericImageView, RgbaImage};

/// How scaled dimensions are rounded to whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round up, so no gap opens between image and canvas edge
    Ceil,
    /// Round to nearest
    Nearest,
}

/// Placement of a scaled source inside a target canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitGeometry {
    /// Scaled source width
    pub width: u32,
    /// Scaled source height
    pub height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Compute the scaled size and centered offset of a `source_width` x
/// `source_height` image inside a `target_width` x `target_height` canvas.
///
/// The ratio is `min(target_w / source_w, target_h / source_h)`, evaluated with
/// integer arithmetic so the bound side always lands exactly on the target.
/// Scaled dimensions are clamped to `1..=target`.
pub fn fit_geometry(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
    rounding: Rounding,
) -> Result<FitGeometry, FaviconError> {
    if target_width == 0 || target_height == 0 {
        return Err(FaviconError::invalid_dimensions(format!(
            "Target size must be positive, got {}x{}",
            target_width, target_height
        )));
    }
    if source_width == 0 || source_height == 0 {
        return Err(FaviconError::invalid_dimensions(format!(
            "Source size must be positive, got {}x{}",
            source_width, source_height
        )));
    }

    let (sw, sh) = (source_width as u64, source_height as u64);
    let (tw, th) = (target_width as u64, target_height as u64);

    // tw/sw <= th/sh  <=>  tw*sh <= th*sw
    let (width, height) = if tw * sh <= th * sw {
        (tw, scale(sh, tw, sw, rounding))
    } else {
        (scale(sw, th, sh, rounding), th)
    };

    let width = width.clamp(1, tw) as u32;
    let height = height.clamp(1, th) as u32;

    Ok(FitGeometry {
        width,
        height,
        offset_x: (target_width - width) / 2,
        offset_y: (target_height - height) / 2,
    })
}

/// `dim * num / den` with the requested rounding
fn scale(dim: u64, num: u64, den: u64, rounding: Rounding) -> u64 {
    let product = dim * num;
    match rounding {
        Rounding::Ceil => (product + den - 1) / den,
        Rounding::Nearest => (product + den / 2) / den,
    }
}

/// Resize `source` to exactly `target_width` x `target_height`.
///
/// Square sources going to square targets are resized directly; everything
/// else is scaled with [`fit_geometry`] (ceiling rounding) and centered on a
/// transparent canvas.
pub fn fit_exact(
    source: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: ResampleFilter,
) -> Result<RgbaImage, FaviconError> {
    let (source_width, source_height) = source.dimensions();
    let geometry = fit_geometry(
        source_width,
        source_height,
        target_width,
        target_height,
        Rounding::Ceil,
    )?;

    if source_width == source_height && target_width == target_height {
        return Ok(raster::resize(source, target_width, target_height, filter));
    }

    let scaled = raster::resize(source, geometry.width, geometry.height, filter);
    Ok(place_centered(&scaled, target_width, target_height, &geometry))
}

/// Composite an already scaled raster onto a transparent canvas at the
/// offsets of `geometry`.
pub fn place_centered(
    scaled: &RgbaImage,
    target_width: u32,
    target_height: u32,
    geometry: &FitGeometry,
) -> RgbaImage {
    let mut canvas = raster::transparent_canvas(target_width, target_height);
    raster::composite(&mut canvas, scaled, geometry.offset_x, geometry.offset_y);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{opaque_bounds, opaque_rgba};

    #[test]
    fn test_geometry_wide_source_into_square() {
        let geometry = fit_geometry(800, 400, 512, 512, Rounding::Ceil).unwrap();
        assert_eq!(
            geometry,
            FitGeometry {
                width: 512,
                height: 256,
                offset_x: 0,
                offset_y: 128,
            }
        );
    }

    #[test]
    fn test_geometry_tall_source_into_wide_target() {
        let geometry = fit_geometry(30, 90, 100, 40, Rounding::Ceil).unwrap();
        // ratio = 40/90, 30 * 40 / 90 = 13.33 -> 14
        assert_eq!(geometry.width, 14);
        assert_eq!(geometry.height, 40);
        assert_eq!(geometry.offset_x, 43);
        assert_eq!(geometry.offset_y, 0);
    }

    #[test]
    fn test_geometry_nearest_rounding() {
        let geometry = fit_geometry(30, 90, 100, 40, Rounding::Nearest).unwrap();
        assert_eq!(geometry.width, 13);
    }

    #[test]
    fn test_geometry_clamps_to_one_pixel() {
        let geometry = fit_geometry(1000, 1, 10, 10, Rounding::Nearest).unwrap();
        assert_eq!(geometry.width, 10);
        assert_eq!(geometry.height, 1);
    }

    #[test]
    fn test_geometry_rejects_zero_dimensions() {
        assert!(matches!(
            fit_geometry(10, 10, 0, 10, Rounding::Ceil),
            Err(FaviconError::InvalidDimensions { .. })
        ));
        assert!(fit_geometry(0, 10, 10, 10, Rounding::Ceil).is_err());
    }

    #[test]
    fn test_fit_exact_letterboxes_wide_source() {
        let source = opaque_rgba(800, 400);
        let fitted = fit_exact(&source, 512, 512, ResampleFilter::Lanczos3).unwrap();

        assert_eq!(fitted.dimensions(), (512, 512));
        assert_eq!(opaque_bounds(&fitted), Some((0, 128, 512, 256)));
        assert_eq!(fitted.get_pixel(0, 0)[3], 0);
        assert_eq!(fitted.get_pixel(511, 511)[3], 0);
        assert_eq!(fitted.get_pixel(256, 256)[3], 255);
    }

    #[test]
    fn test_fit_exact_square_is_direct_resize() {
        let source = opaque_rgba(100, 100);
        let fitted = fit_exact(&source, 48, 48, ResampleFilter::Bilinear).unwrap();
        assert_eq!(fitted.dimensions(), (48, 48));
        assert_eq!(opaque_bounds(&fitted), Some((0, 0, 48, 48)));
    }

    #[test]
    fn test_fit_exact_preserves_aspect_for_any_target() {
        let sources = [(800, 400), (400, 800), (123, 77), (50, 51), (1, 9)];
        let targets = [(16, 16), (96, 96), (180, 120), (31, 200)];

        for &(sw, sh) in &sources {
            let source = opaque_rgba(sw, sh);
            for &(tw, th) in &targets {
                let fitted = fit_exact(&source, tw, th, ResampleFilter::Nearest).unwrap();
                assert_eq!(fitted.dimensions(), (tw, th));

                let (_, _, w, h) = opaque_bounds(&fitted).unwrap();
                // w/h == sw/sh within one pixel of rounding on either side
                let expected_h = w as f64 * sh as f64 / sw as f64;
                let expected_w = h as f64 * sw as f64 / sh as f64;
                assert!(
                    (expected_h - h as f64).abs() <= 1.0 || (expected_w - w as f64).abs() <= 1.0,
                    "{}x{} -> {}x{} produced {}x{}",
                    sw,
                    sh,
                    tw,
                    th,
                    w,
                    h
                );
            }
        }
    }

    #[test]
    fn test_fit_exact_rejects_zero_target() {
        let source = opaque_rgba(10, 10);
        assert!(fit_exact(&source, 0, 16, ResampleFilter::Lanczos3).is_err());
    }
}
