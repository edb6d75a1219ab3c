//! High-quality PNG rendering with graceful fallback
//!
//! The preferred path resizes through a [`HighFidelityBackend`] and writes an
//! uncompressed 300 DPI PNG. When no backend is available, or the backend or
//! encoder fails, the baseline exact-fit resizer and encoder take over. The
//! fallback is reported in the outcome, never raised as an error.

mod backend;

pub use backend::*;

use crate::encode::{encode_baseline_png, encode_lossless_png};
use crate::raster::SourceRaster;
use crate::transform::{fit_exact, fit_geometry, place_centered, ResampleFilter, Rounding};
use crate::FaviconError;
use tracing::{debug, warn};

/// Result of one render request
#[derive(Debug)]
pub enum RenderOutcome {
    /// High-fidelity path produced the PNG
    Succeeded(Vec<u8>),
    /// Baseline path produced the PNG after the high-fidelity path failed
    FellBackTo { bytes: Vec<u8>, reason: String },
    /// Neither path produced a PNG
    Failed(FaviconError),
}

impl RenderOutcome {
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Succeeded(bytes) | Self::FellBackTo { bytes, .. } => Some(bytes),
            Self::Failed(_) => None,
        }
    }

    pub fn fell_back(&self) -> bool {
        matches!(self, Self::FellBackTo { .. })
    }

    /// PNG bytes and whether the fallback path was taken
    pub fn into_result(self) -> Result<(Vec<u8>, bool), FaviconError> {
        match self {
            Self::Succeeded(bytes) => Ok((bytes, false)),
            Self::FellBackTo { bytes, .. } => Ok((bytes, true)),
            Self::Failed(err) => Err(err),
        }
    }
}

pub struct HighQualityRenderer {
    backend: Option<Box<dyn HighFidelityBackend>>,
    /// Filter of the fallback path
    filter: ResampleFilter,
}

impl HighQualityRenderer {
    /// Renderer using the backend compiled into this build; `filter` drives
    /// both the backend and the fallback path
    pub fn new(filter: ResampleFilter) -> Self {
        Self {
            backend: default_backend(filter),
            filter,
        }
    }

    /// Renderer that always takes the baseline path
    pub fn without_backend(filter: ResampleFilter) -> Self {
        Self {
            backend: None,
            filter,
        }
    }

    pub fn with_backend(backend: Box<dyn HighFidelityBackend>, filter: ResampleFilter) -> Self {
        Self {
            backend: Some(backend),
            filter,
        }
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_ref().map(|backend| backend.name())
    }

    /// Render `source` letterboxed onto a transparent `size` x `size` PNG.
    pub fn render_png(&self, source: &SourceRaster, size: u32) -> RenderOutcome {
        self.render_png_sized(source, size, size)
    }

    /// Render `source` letterboxed onto a transparent `width` x `height` PNG.
    pub fn render_png_sized(&self, source: &SourceRaster, width: u32, height: u32) -> RenderOutcome {
        debug!(width, height, backend = ?self.backend_name(), "render.render_png");

        if width == 0 || height == 0 {
            return RenderOutcome::Failed(FaviconError::invalid_dimensions(format!(
                "Render size must be positive, got {}x{}",
                width, height
            )));
        }

        let err = match self.render_high_fidelity(source, width, height) {
            Ok(bytes) => return RenderOutcome::Succeeded(bytes),
            Err(err) => err,
        };

        warn!(width, height, error = %err, "high-fidelity render failed, using baseline encoder");
        match self.render_baseline(source, width, height) {
            Ok(bytes) => RenderOutcome::FellBackTo {
                bytes,
                reason: err.to_string(),
            },
            Err(fallback_err) => RenderOutcome::Failed(fallback_err),
        }
    }

    fn render_high_fidelity(
        &self,
        source: &SourceRaster,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, FaviconError> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            FaviconError::backend_unavailable("no high-fidelity backend in this build")
        })?;

        let geometry =
            fit_geometry(source.width(), source.height(), width, height, Rounding::Nearest)?;
        let scaled = backend.resize(source.image(), geometry.width, geometry.height)?;
        if scaled.dimensions() != (geometry.width, geometry.height) {
            return Err(FaviconError::backend_unavailable(format!(
                "{} returned {}x{}, expected {}x{}",
                backend.name(),
                scaled.width(),
                scaled.height(),
                geometry.width,
                geometry.height
            )));
        }

        let canvas = place_centered(&scaled, width, height, &geometry);
        encode_lossless_png(&canvas)
    }

    fn render_baseline(
        &self,
        source: &SourceRaster,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, FaviconError> {
        let fitted = fit_exact(source.image(), width, height, self.filter)?;
        encode_baseline_png(&fitted)
    }
}
