//! High-fidelity resampling backends

use crate::transform::ResampleFilter;
use crate::FaviconError;
use image::{DynamicImage, RgbaImage};

#[cfg(feature = "high-fidelity")]
use fast_image_resize as fr;

/// Resampler used by the high-quality renderer.
///
/// Implementations return a raster of exactly `width` x `height`; any error
/// makes the renderer fall back to the baseline path.
pub trait HighFidelityBackend: Send + Sync {
    /// Short name for log output
    fn name(&self) -> &str;

    fn resize(
        &self,
        source: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, FaviconError>;
}

/// Backend compiled into this build, if any, resampling with `filter`
pub fn default_backend(filter: ResampleFilter) -> Option<Box<dyn HighFidelityBackend>> {
    #[cfg(feature = "high-fidelity")]
    {
        Some(Box::new(FastResizeBackend::with_filter(filter)))
    }
    #[cfg(not(feature = "high-fidelity"))]
    {
        let _ = filter;
        None
    }
}

/// SIMD convolution resizer from `fast_image_resize`, Lanczos3 by default
#[cfg(feature = "high-fidelity")]
#[derive(Debug, Clone, Copy)]
pub struct FastResizeBackend {
    filter: fr::FilterType,
}

#[cfg(feature = "high-fidelity")]
impl Default for FastResizeBackend {
    fn default() -> Self {
        Self {
            filter: fr::FilterType::Lanczos3,
        }
    }
}

#[cfg(feature = "high-fidelity")]
impl FastResizeBackend {
    pub fn with_filter(filter: ResampleFilter) -> Self {
        let filter = match filter {
            ResampleFilter::Nearest => fr::FilterType::Box,
            ResampleFilter::Bilinear => fr::FilterType::Bilinear,
            ResampleFilter::CatmullRom => fr::FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => fr::FilterType::Lanczos3,
        };
        Self { filter }
    }
}

#[cfg(feature = "high-fidelity")]
impl HighFidelityBackend for FastResizeBackend {
    fn name(&self) -> &str {
        "fast_image_resize"
    }

    fn resize(
        &self,
        source: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, FaviconError> {
        if width == 0 || height == 0 {
            return Err(FaviconError::invalid_dimensions(format!(
                "Cannot resize to {}x{}",
                width, height
            )));
        }

        let src = source.to_rgba8();
        let (src_width, src_height) = src.dimensions();

        let src_image =
            fr::images::Image::from_vec_u8(src_width, src_height, src.into_raw(), fr::PixelType::U8x4)
                .map_err(|e| {
                    FaviconError::backend_unavailable(format!("Failed to wrap source pixels: {}", e))
                })?;
        let mut dst_image = fr::images::Image::new(width, height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options =
            fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(self.filter));
        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| FaviconError::backend_unavailable(format!("Resize failed: {}", e)))?;

        RgbaImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            FaviconError::backend_unavailable("Resized buffer has an unexpected length")
        })
    }
}
