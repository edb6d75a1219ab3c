//! Favicon set generation
//!
//! One run decodes the source once, renders every configured variant, and
//! writes each file atomically into the output directory. Per-variant results
//! are collected into a [`RunReport`]; the configured [`WritePolicy`] decides
//! whether a failed variant aborts the run or is skipped.

use crate::config::{FaviconConfig, WritePolicy};
use crate::convert::{embed_png_in_svg, encode_ico};
use crate::encode::encode_baseline_png;
use crate::manifest::{build_manifest, ManifestOptions};
use crate::output::{ensure_dir, write_atomic};
use crate::raster::{is_svg_path, SourceRaster};
use crate::render::HighQualityRenderer;
use crate::transform::{fit_exact, fit_geometry, Rounding};
use crate::{FaviconError, GeneratedFileSet, SizedVariant};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Smallest longest edge an SVG source is rasterised to
const MIN_SVG_RASTER_EDGE: u32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Ico,
    Png,
    Svg,
    AppleTouchIcon,
    /// Manifest icon of the given edge length
    ManifestIcon(u32),
    Manifest,
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ico => f.write_str("ico"),
            Self::Png => f.write_str("png"),
            Self::Svg => f.write_str("svg"),
            Self::AppleTouchIcon => f.write_str("apple-touch-icon"),
            Self::ManifestIcon(size) => write!(f, "manifest-{}", size),
            Self::Manifest => f.write_str("manifest"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantStatus {
    /// File written; `fell_back` is set when the baseline renderer stood in
    /// for the high-fidelity one
    Written { fell_back: bool },
    /// Lenient mode only
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOutcome {
    pub kind: VariantKind,
    pub path: PathBuf,
    pub status: VariantStatus,
}

impl VariantOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self.status, VariantStatus::Written { .. })
    }

    pub fn fell_back(&self) -> bool {
        matches!(self.status, VariantStatus::Written { fell_back: true })
    }
}

/// Ordered per-variant outcomes of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    outcomes: Vec<VariantOutcome>,
}

impl RunReport {
    pub fn outcomes(&self) -> &[VariantOutcome] {
        &self.outcomes
    }

    pub fn skipped(&self) -> impl Iterator<Item = &VariantOutcome> {
        self.outcomes.iter().filter(|o| !o.is_written())
    }

    /// True when every variant was written
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(VariantOutcome::is_written)
    }

    pub fn fallback_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.fell_back()).count()
    }

    fn files(&self) -> GeneratedFileSet {
        let mut files = GeneratedFileSet::new();
        for outcome in self.outcomes.iter().filter(|o| o.is_written()) {
            files.push(outcome.path.clone());
        }
        files
    }
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Files that were written, in generation order
    pub files: GeneratedFileSet,
    pub report: RunReport,
}

/// Rendered bytes and whether the fallback renderer produced them
type Produced = Result<(Vec<u8>, bool), FaviconError>;

pub struct FaviconGenerator<'a> {
    config: &'a FaviconConfig,
    renderer: HighQualityRenderer,
}

impl<'a> FaviconGenerator<'a> {
    /// Validate `config` and set up the default renderer
    pub fn new(config: &'a FaviconConfig) -> Result<Self, FaviconError> {
        Self::with_renderer(config, HighQualityRenderer::new(config.resample_filter))
    }

    pub fn with_renderer(
        config: &'a FaviconConfig,
        renderer: HighQualityRenderer,
    ) -> Result<Self, FaviconError> {
        config.validate()?;
        Ok(Self { config, renderer })
    }

    /// Generate every configured favicon file from `source`.
    ///
    /// Nothing is created on disk if the source is missing or cannot be
    /// decoded.
    pub fn generate(
        &self,
        source: &Path,
        options: &ManifestOptions,
    ) -> Result<GenerationResult, FaviconError> {
        let raster = SourceRaster::open(source, self.largest_target())?;
        debug!(
            width = raster.width(),
            height = raster.height(),
            alpha = raster.has_alpha(),
            kind = ?raster.kind(),
            "decoded favicon source"
        );

        let output_dir = self.config.output_dir();
        ensure_dir(&output_dir)?;

        let mut run = Run {
            output_dir,
            policy: self.config.write_policy,
            report: RunReport::default(),
        };
        let types = &self.config.favicon_types;

        // ICO assembly errors are never downgraded by the write policy
        let ico = self.render_ico(&raster)?;
        run.record(VariantKind::Ico, &types.ico.filename, Ok(ico))?;

        run.record(
            VariantKind::Png,
            &types.png.filename,
            self.render_high_quality(&raster, types.png.size),
        )?;

        run.record(
            VariantKind::Svg,
            &types.svg.filename,
            self.render_svg(source, &raster),
        )?;

        run.record(
            VariantKind::AppleTouchIcon,
            &types.apple_touch_icon.filename,
            self.render_high_quality(&raster, types.apple_touch_icon.size),
        )?;

        let icons = &types.web_app_manifest_icons;
        for size in icons.ordered_sizes() {
            let produced = if size >= self.config.high_quality_threshold {
                self.render_high_quality(&raster, size)
            } else {
                self.render_baseline(&raster, size)
            };
            run.record(
                VariantKind::ManifestIcon(size),
                &icons.filename_for(size),
                produced,
            )?;
        }

        let manifest = build_manifest(self.config, options)
            .to_json()
            .map(|json| (json.into_bytes(), false));
        run.record(
            VariantKind::Manifest,
            &self.config.web_manifest.filename,
            manifest,
        )?;

        Ok(run.finish())
    }

    /// Longest edge any PNG variant needs from the source
    fn largest_target(&self) -> u32 {
        let types = &self.config.favicon_types;
        types
            .ico
            .sizes
            .iter()
            .chain(&types.web_app_manifest_icons.sizes)
            .copied()
            .chain([
                types.png.size,
                types.apple_touch_icon.size,
                types.svg.embed_size,
                MIN_SVG_RASTER_EDGE,
            ])
            .max()
            .unwrap_or(MIN_SVG_RASTER_EDGE)
    }

    /// ICO bytes; `true` when any frame came from the fallback renderer
    fn render_ico(&self, raster: &SourceRaster) -> Result<(Vec<u8>, bool), FaviconError> {
        let mut frames = Vec::new();
        let mut fell_back = false;
        for &size in &self.config.favicon_types.ico.sizes {
            let (png, frame_fell_back) = self.render_high_quality(raster, size)?;
            fell_back |= frame_fell_back;
            frames.push(SizedVariant::new(format!("ico-{}", size), size, size, png));
        }
        debug!(
            frames = ?frames.iter().map(|f| f.tag.as_str()).collect::<Vec<_>>(),
            "rendered ICO frames"
        );

        let blobs: Vec<Vec<u8>> = frames.into_iter().map(|frame| frame.png).collect();
        Ok((encode_ico(&blobs)?.into_bytes(), fell_back))
    }

    fn render_high_quality(&self, raster: &SourceRaster, size: u32) -> Produced {
        self.renderer.render_png(raster, size).into_result()
    }

    /// Exact-fit resize and baseline encoder, no high-fidelity attempt
    fn render_baseline(&self, raster: &SourceRaster, size: u32) -> Produced {
        let fitted = fit_exact(raster.image(), size, size, self.config.resample_filter)?;
        let variant = SizedVariant::new(
            format!("manifest-{}", size),
            size,
            size,
            encode_baseline_png(&fitted)?,
        );
        debug!(tag = %variant.tag, bytes = variant.png.len(), "rendered variant");
        Ok((variant.png, false))
    }

    fn render_svg(&self, source: &Path, raster: &SourceRaster) -> Produced {
        if is_svg_path(source) {
            let bytes = fs::read(source).map_err(|e| {
                FaviconError::svg_error(format!("Failed to copy {}: {}", source.display(), e))
            })?;
            return Ok((bytes, false));
        }

        // keep the source aspect; the SVG canvas supplies the square
        let size = self.config.favicon_types.svg.embed_size;
        let geometry = fit_geometry(raster.width(), raster.height(), size, size, Rounding::Nearest)?;
        let (png, fell_back) = self
            .renderer
            .render_png_sized(raster, geometry.width, geometry.height)
            .into_result()?;
        Ok((
            embed_png_in_svg(&png, geometry.width, geometry.height).into_bytes(),
            fell_back,
        ))
    }
}

/// Mutable state of one generation run
struct Run {
    output_dir: PathBuf,
    policy: WritePolicy,
    report: RunReport,
}

impl Run {
    fn record(&mut self, kind: VariantKind, filename: &str, produced: Produced) -> Result<(), FaviconError> {
        let path = self.output_dir.join(filename);

        let written = produced.and_then(|(bytes, fell_back)| {
            write_atomic(&path, &bytes)
                .map(|()| fell_back)
                .map_err(|e| write_error(kind, &path, e))
        });

        match written {
            Ok(fell_back) => {
                info!(kind = %kind, path = %path.display(), fell_back, "wrote favicon file");
                self.report.outcomes.push(VariantOutcome {
                    kind,
                    path,
                    status: VariantStatus::Written { fell_back },
                });
                Ok(())
            }
            Err(err) if self.policy == WritePolicy::Lenient => {
                warn!(kind = %kind, path = %path.display(), error = %err, "skipping favicon file");
                self.report.outcomes.push(VariantOutcome {
                    kind,
                    path,
                    status: VariantStatus::Skipped(err.to_string()),
                });
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn finish(self) -> GenerationResult {
        GenerationResult {
            files: self.report.files(),
            report: self.report,
        }
    }
}

fn write_error(kind: VariantKind, path: &Path, err: std::io::Error) -> FaviconError {
    let message = format!("{}: {}", path.display(), err);
    match kind {
        VariantKind::Manifest => FaviconError::manifest_write_failure(message),
        _ => FaviconError::variant_write_failure(message),
    }
}
