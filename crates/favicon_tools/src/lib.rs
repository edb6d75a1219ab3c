//! favicon_tools - Favicon set generation from a single source image
//!
//! Produces the standard web favicon assets:
//! - ICO: multi-size PNG-in-ICO container (`favicon.ico`)
//! - PNG: `favicon-96x96.png`, `apple-touch-icon.png`, web app manifest icons
//! - SVG: verbatim copy of SVG sources, raster-in-SVG otherwise
//! - Manifest: `site.webmanifest` describing the manifest icons
//!
//! Rendering prefers a high-fidelity Lanczos3 backend with uncompressed PNG
//! output and falls back to the baseline `image` resize + encode path.

use std::path::{Path, PathBuf};
use tracing::debug;

// Submodules (file-based)
pub mod config;
pub mod convert;
pub mod encode;
pub mod manifest;
pub mod raster;
pub mod render;
pub mod transform;

mod output;

// Test fixtures
#[cfg(test)]
pub mod fixtures;

pub use config::{FaviconConfig, WritePolicy};
pub use convert::{FaviconGenerator, GenerationResult, RunReport, VariantKind, VariantOutcome};
pub use manifest::{ManifestDescriptor, ManifestIcon, ManifestOptions};
pub use raster::SourceRaster;
pub use render::{HighFidelityBackend, HighQualityRenderer, RenderOutcome};
pub use transform::ResampleFilter;

// ============================================================================
// Error Types
// ============================================================================

/// Error code range: 9200-9299
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FaviconErrorCode {
    InputNotFound = 9200,
    DecodeFailure = 9201,
    InvalidDimensions = 9202,
    BackendUnavailable = 9203,
    VariantWriteFailure = 9204,
    IcoAssemblyFailure = 9205,
    ManifestWriteFailure = 9206,
    SvgError = 9207,
    ConfigError = 9208,
    EncodeFailure = 9209,
    IoError = 9210,
}

#[derive(Debug, thiserror::Error)]
pub enum FaviconError {
    #[error("[{code}] Source image not found: {message}")]
    InputNotFound { code: u32, message: String },

    #[error("[{code}] Decode error: {message}")]
    DecodeFailure { code: u32, message: String },

    #[error("[{code}] Invalid dimensions: {message}")]
    InvalidDimensions { code: u32, message: String },

    #[error("[{code}] High-fidelity backend unavailable: {message}")]
    BackendUnavailable { code: u32, message: String },

    #[error("[{code}] Failed to write variant: {message}")]
    VariantWriteFailure { code: u32, message: String },

    #[error("[{code}] ICO assembly error: {message}")]
    IcoAssemblyFailure { code: u32, message: String },

    #[error("[{code}] Failed to write manifest: {message}")]
    ManifestWriteFailure { code: u32, message: String },

    #[error("[{code}] SVG error: {message}")]
    SvgError { code: u32, message: String },

    #[error("[{code}] Configuration error: {message}")]
    ConfigError { code: u32, message: String },

    #[error("[{code}] Encode error: {message}")]
    EncodeFailure { code: u32, message: String },

    #[error("[{code}] IO error: {message}")]
    IoError { code: u32, message: String },
}

impl FaviconError {
    pub fn input_not_found(message: impl Into<String>) -> Self {
        Self::InputNotFound {
            code: FaviconErrorCode::InputNotFound as u32,
            message: message.into(),
        }
    }

    pub fn decode_failure(message: impl Into<String>) -> Self {
        Self::DecodeFailure {
            code: FaviconErrorCode::DecodeFailure as u32,
            message: message.into(),
        }
    }

    pub fn invalid_dimensions(message: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            code: FaviconErrorCode::InvalidDimensions as u32,
            message: message.into(),
        }
    }

    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            code: FaviconErrorCode::BackendUnavailable as u32,
            message: message.into(),
        }
    }

    pub fn variant_write_failure(message: impl Into<String>) -> Self {
        Self::VariantWriteFailure {
            code: FaviconErrorCode::VariantWriteFailure as u32,
            message: message.into(),
        }
    }

    pub fn ico_assembly_failure(message: impl Into<String>) -> Self {
        Self::IcoAssemblyFailure {
            code: FaviconErrorCode::IcoAssemblyFailure as u32,
            message: message.into(),
        }
    }

    pub fn manifest_write_failure(message: impl Into<String>) -> Self {
        Self::ManifestWriteFailure {
            code: FaviconErrorCode::ManifestWriteFailure as u32,
            message: message.into(),
        }
    }

    pub fn svg_error(message: impl Into<String>) -> Self {
        Self::SvgError {
            code: FaviconErrorCode::SvgError as u32,
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            code: FaviconErrorCode::ConfigError as u32,
            message: message.into(),
        }
    }

    pub fn encode_failure(message: impl Into<String>) -> Self {
        Self::EncodeFailure {
            code: FaviconErrorCode::EncodeFailure as u32,
            message: message.into(),
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::IoError {
            code: FaviconErrorCode::IoError as u32,
            message: message.into(),
        }
    }

    /// Numeric code of this error
    pub fn code(&self) -> u32 {
        match self {
            Self::InputNotFound { code, .. }
            | Self::DecodeFailure { code, .. }
            | Self::InvalidDimensions { code, .. }
            | Self::BackendUnavailable { code, .. }
            | Self::VariantWriteFailure { code, .. }
            | Self::IcoAssemblyFailure { code, .. }
            | Self::ManifestWriteFailure { code, .. }
            | Self::SvgError { code, .. }
            | Self::ConfigError { code, .. }
            | Self::EncodeFailure { code, .. }
            | Self::IoError { code, .. } => *code,
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// One rendered output raster, PNG encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizedVariant {
    /// Purpose tag, e.g. `ico-16` or `apple-touch-icon`
    pub tag: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl SizedVariant {
    pub fn new(tag: impl Into<String>, width: u32, height: u32, png: Vec<u8>) -> Self {
        Self {
            tag: tag.into(),
            width,
            height,
            png,
        }
    }
}

/// Ordered list of files written by one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFileSet {
    paths: Vec<PathBuf>,
}

impl GeneratedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }
}

impl IntoIterator for GeneratedFileSet {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Generate the full favicon set for `source` with the default renderer.
pub fn generate(
    config: &FaviconConfig,
    source: &Path,
    options: &ManifestOptions,
) -> Result<GenerationResult, FaviconError> {
    debug!(source = %source.display(), "favicon.generate");
    FaviconGenerator::new(config)?.generate(source, options)
}

/// Assemble PNG blobs into an ICO container.
pub fn png_to_ico(png_data: &[Vec<u8>]) -> Result<Vec<u8>, FaviconError> {
    debug!(count = png_data.len(), "favicon.png_to_ico");
    convert::encode_ico(png_data).map(convert::IcoEncoding::into_bytes)
}
