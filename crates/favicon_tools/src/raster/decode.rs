//! Source decoding and dimension probing

use crate::FaviconError;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Where the decoded pixels came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Raster,
    /// Vector source rasterised with resvg
    Svg,
}

/// Decoded source image, immutable for the rest of the run.
#[derive(Debug, Clone)]
pub struct SourceRaster {
    image: DynamicImage,
    kind: SourceKind,
}

impl SourceRaster {
    /// Load a raster or SVG file.
    ///
    /// SVG sources are rasterised so their longest edge is at least
    /// `min_svg_edge` pixels.
    pub fn open(path: &Path, min_svg_edge: u32) -> Result<Self, FaviconError> {
        if !path.is_file() {
            return Err(FaviconError::input_not_found(path.display().to_string()));
        }

        let data = fs::read(path).map_err(|e| {
            FaviconError::io_error(format!("Failed to read {}: {}", path.display(), e))
        })?;

        if is_svg_path(path) {
            let text = String::from_utf8(data)
                .map_err(|e| FaviconError::decode_failure(format!("SVG is not UTF-8: {}", e)))?;
            Self::from_svg(&text, min_svg_edge)
        } else {
            Self::decode(&data)
        }
    }

    /// Decode any raster format supported by the enabled `image` features
    pub fn decode(data: &[u8]) -> Result<Self, FaviconError> {
        let image = image::load_from_memory(data)
            .map_err(|e| FaviconError::decode_failure(format!("Failed to decode image: {}", e)))?;
        Self::from_image(image)
    }

    /// Rasterise an SVG document
    pub fn from_svg(svg_data: &str, min_edge: u32) -> Result<Self, FaviconError> {
        let options = Options::default();
        let tree = Tree::from_str(svg_data, &options)
            .map_err(|e| FaviconError::decode_failure(format!("Failed to parse SVG: {}", e)))?;

        let svg_size = tree.size;
        let longest = svg_size.width().max(svg_size.height());
        if longest <= 0.0 {
            return Err(FaviconError::invalid_dimensions("SVG has an empty canvas"));
        }
        let scale = (min_edge as f32 / longest).max(1.0);
        let width = (svg_size.width() * scale).ceil() as u32;
        let height = (svg_size.height() * scale).ceil() as u32;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| FaviconError::invalid_dimensions("Failed to create pixmap for SVG"))?;
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha
        let data: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();
        let img = RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| FaviconError::svg_error("Failed to create image from pixmap"))?;

        debug!(width, height, scale, "rasterised SVG source");
        Ok(Self {
            image: DynamicImage::ImageRgba8(img),
            kind: SourceKind::Svg,
        })
    }

    /// Wrap an already decoded image
    pub fn from_image(image: DynamicImage) -> Result<Self, FaviconError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(FaviconError::invalid_dimensions(format!(
                "Source image has no pixels ({}x{})",
                width, height
            )));
        }
        Ok(Self {
            image,
            kind: SourceKind::Raster,
        })
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }
}

/// True when the path has an `svg` extension (any case)
pub fn is_svg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Read the pixel dimensions of a PNG blob from its header
pub fn probe_png_dimensions(data: &[u8]) -> Result<(u32, u32), FaviconError> {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => {}
        Ok(other) => {
            return Err(FaviconError::decode_failure(format!(
                "Expected PNG data, found {:?}",
                other
            )))
        }
        Err(e) => {
            return Err(FaviconError::decode_failure(format!(
                "Unrecognised image data: {}",
                e
            )))
        }
    }

    ImageReader::with_format(Cursor::new(data), ImageFormat::Png)
        .into_dimensions()
        .map_err(|e| FaviconError::decode_failure(format!("Failed to read PNG header: {}", e)))
}
