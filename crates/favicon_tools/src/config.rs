//! Generation settings
//!
//! One `FaviconConfig` is built per run and handed to every component by
//! reference. Every field has a default, so a partial TOML document (or none
//! at all) yields the standard favicon set.

use crate::transform::ResampleFilter;
use crate::FaviconError;
use serde::Deserialize;
use std::path::PathBuf;

/// Placeholder replaced by the icon size in manifest icon filenames
pub const SIZE_PLACEHOLDER: &str = "{size}";

/// What to do when a single output file cannot be produced.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Abort the run on the first failed variant
    #[default]
    Strict,
    /// Skip the failed variant, record it in the run report and continue
    Lenient,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaviconConfig {
    /// Directory below `public_dir` receiving the files; also the URL prefix
    /// of manifest icon `src` entries
    pub output_path: String,
    /// Web root on disk
    pub public_dir: PathBuf,
    pub write_policy: WritePolicy,
    /// Filter used by the baseline (fallback) resize path
    pub resample_filter: ResampleFilter,
    /// Manifest icons at or above this size go through the high-quality renderer
    pub high_quality_threshold: u32,
    pub favicon_types: FaviconTypes,
    pub web_manifest: WebManifestConfig,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            output_path: "favicon".to_string(),
            public_dir: PathBuf::from("public"),
            write_policy: WritePolicy::Strict,
            resample_filter: ResampleFilter::Lanczos3,
            high_quality_threshold: 512,
            favicon_types: FaviconTypes::default(),
            web_manifest: WebManifestConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct FaviconTypes {
    pub ico: IcoConfig,
    pub png: SinglePngConfig,
    pub svg: SvgConfig,
    pub apple_touch_icon: AppleTouchIconConfig,
    pub web_app_manifest_icons: ManifestIconsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IcoConfig {
    pub filename: String,
    pub sizes: Vec<u32>,
    /// PNG quality (0-100); frames are always written lossless
    pub quality: u8,
}

impl Default for IcoConfig {
    fn default() -> Self {
        Self {
            filename: "favicon.ico".to_string(),
            sizes: vec![16, 32, 48],
            quality: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SinglePngConfig {
    pub filename: String,
    pub size: u32,
    pub quality: u8,
}

impl Default for SinglePngConfig {
    fn default() -> Self {
        Self {
            filename: "favicon-96x96.png".to_string(),
            size: 96,
            quality: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SvgConfig {
    pub filename: String,
    /// Edge length of the PNG embedded when the source is not an SVG
    pub embed_size: u32,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            filename: "favicon.svg".to_string(),
            embed_size: 512,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppleTouchIconConfig {
    pub filename: String,
    pub size: u32,
    pub quality: u8,
}

impl Default for AppleTouchIconConfig {
    fn default() -> Self {
        Self {
            filename: "apple-touch-icon.png".to_string(),
            size: 180,
            quality: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManifestIconsConfig {
    pub sizes: Vec<u32>,
    pub filename_pattern: String,
    pub quality: u8,
}

impl Default for ManifestIconsConfig {
    fn default() -> Self {
        Self {
            sizes: vec![192, 512],
            filename_pattern: "web-app-manifest-{size}x{size}.png".to_string(),
            quality: 100,
        }
    }
}

impl ManifestIconsConfig {
    /// Configured sizes in ascending order without duplicates
    pub fn ordered_sizes(&self) -> Vec<u32> {
        let mut sizes = self.sizes.clone();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    pub fn filename_for(&self, size: u32) -> String {
        self.filename_pattern
            .replace(SIZE_PLACEHOLDER, &size.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebManifestConfig {
    pub filename: String,
    pub content: ManifestContent,
}

impl Default for WebManifestConfig {
    fn default() -> Self {
        Self {
            filename: "site.webmanifest".to_string(),
            content: ManifestContent::default(),
        }
    }
}

/// Default manifest fields, overridable per run through `ManifestOptions`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManifestContent {
    pub name: String,
    pub short_name: String,
    pub theme_color: String,
    pub background_color: String,
    pub display: String,
}

impl Default for ManifestContent {
    fn default() -> Self {
        Self {
            name: String::new(),
            short_name: String::new(),
            theme_color: "#ffffff".to_string(),
            background_color: "#ffffff".to_string(),
            display: "standalone".to_string(),
        }
    }
}

impl FaviconConfig {
    /// Directory the favicon files are written to
    pub fn output_dir(&self) -> PathBuf {
        let relative = self.output_path.trim_matches('/');
        if relative.is_empty() {
            self.public_dir.clone()
        } else {
            self.public_dir.join(relative)
        }
    }

    /// URL path of a generated file, as referenced from the manifest
    pub fn public_url(&self, filename: &str) -> String {
        let prefix = self.output_path.trim_matches('/');
        if prefix.is_empty() {
            format!("/{}", filename)
        } else {
            format!("/{}/{}", prefix, filename)
        }
    }

    /// Reject settings that cannot produce a valid favicon set
    pub fn validate(&self) -> Result<(), FaviconError> {
        let types = &self.favicon_types;

        check_filename("favicon_types.ico.filename", &types.ico.filename)?;
        check_filename("favicon_types.png.filename", &types.png.filename)?;
        check_filename("favicon_types.svg.filename", &types.svg.filename)?;
        check_filename(
            "favicon_types.apple_touch_icon.filename",
            &types.apple_touch_icon.filename,
        )?;
        check_filename(
            "favicon_types.web_app_manifest_icons.filename_pattern",
            &types.web_app_manifest_icons.filename_pattern,
        )?;
        check_filename("web_manifest.filename", &self.web_manifest.filename)?;

        if types.ico.sizes.is_empty() {
            return Err(FaviconError::config_error(
                "favicon_types.ico.sizes must list at least one size",
            ));
        }
        for &size in types
            .ico
            .sizes
            .iter()
            .chain(&types.web_app_manifest_icons.sizes)
        {
            check_size("icon size", size)?;
        }
        check_size("favicon_types.png.size", types.png.size)?;
        check_size("favicon_types.svg.embed_size", types.svg.embed_size)?;
        check_size(
            "favicon_types.apple_touch_icon.size",
            types.apple_touch_icon.size,
        )?;

        for (key, quality) in [
            ("favicon_types.ico.quality", types.ico.quality),
            ("favicon_types.png.quality", types.png.quality),
            (
                "favicon_types.apple_touch_icon.quality",
                types.apple_touch_icon.quality,
            ),
            (
                "favicon_types.web_app_manifest_icons.quality",
                types.web_app_manifest_icons.quality,
            ),
        ] {
            if quality > 100 {
                return Err(FaviconError::config_error(format!(
                    "{} must be between 0 and 100, got {}",
                    key, quality
                )));
            }
        }

        let icons = &types.web_app_manifest_icons;
        if icons.ordered_sizes().len() > 1 && !icons.filename_pattern.contains(SIZE_PLACEHOLDER) {
            return Err(FaviconError::config_error(format!(
                "filename_pattern '{}' must contain {} when several manifest icon sizes are configured",
                icons.filename_pattern, SIZE_PLACEHOLDER
            )));
        }

        Ok(())
    }
}

fn check_filename(key: &str, value: &str) -> Result<(), FaviconError> {
    if value.trim().is_empty() {
        return Err(FaviconError::config_error(format!("{} must not be empty", key)));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(FaviconError::config_error(format!(
            "{} must be a plain file name, got '{}'",
            key, value
        )));
    }
    Ok(())
}

fn check_size(key: &str, size: u32) -> Result<(), FaviconError> {
    if size == 0 {
        return Err(FaviconError::config_error(format!("{} must be positive", key)));
    }
    Ok(())
}
