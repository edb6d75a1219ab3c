//! Web app manifest assembly

use crate::config::FaviconConfig;
use crate::FaviconError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-run overrides of the configured manifest fields.
///
/// Blank values are ignored, so they never erase a configured default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ManifestOptions {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub theme_color: Option<String>,
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ManifestIcon {
    pub src: String,
    /// `"{w}x{h}"`
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Contents of `site.webmanifest`; serialized in field order
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ManifestDescriptor {
    pub name: String,
    pub short_name: String,
    pub icons: Vec<ManifestIcon>,
    pub theme_color: String,
    pub background_color: String,
    pub display: String,
}

impl ManifestDescriptor {
    /// Pretty-printed JSON without a trailing newline
    pub fn to_json(&self) -> Result<String, FaviconError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            FaviconError::manifest_write_failure(format!("Failed to serialize manifest: {}", e))
        })
    }
}

/// Build the manifest for the configured icon sizes.
pub fn build_manifest(config: &FaviconConfig, options: &ManifestOptions) -> ManifestDescriptor {
    let content = &config.web_manifest.content;
    let icons_config = &config.favicon_types.web_app_manifest_icons;

    let icons: Vec<ManifestIcon> = icons_config
        .ordered_sizes()
        .into_iter()
        .map(|size| ManifestIcon {
            src: config.public_url(&icons_config.filename_for(size)),
            sizes: format!("{}x{}", size, size),
            mime_type: "image/png".to_string(),
        })
        .collect();

    debug!(icons = icons.len(), "manifest.build");

    ManifestDescriptor {
        name: choose(&options.name, &content.name),
        short_name: choose(&options.short_name, &content.short_name),
        icons,
        theme_color: choose(&options.theme_color, &content.theme_color),
        background_color: choose(&options.background_color, &content.background_color),
        display: content.display.clone(),
    }
}

fn choose(supplied: &Option<String>, default: &str) -> String {
    match supplied {
        Some(value) if !value.trim().is_empty() => value.clone(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = build_manifest(&FaviconConfig::default(), &ManifestOptions::default());

        assert_eq!(manifest.name, "");
        assert_eq!(manifest.theme_color, "#ffffff");
        assert_eq!(manifest.display, "standalone");
        assert_eq!(
            manifest.icons,
            vec![
                ManifestIcon {
                    src: "/favicon/web-app-manifest-192x192.png".to_string(),
                    sizes: "192x192".to_string(),
                    mime_type: "image/png".to_string(),
                },
                ManifestIcon {
                    src: "/favicon/web-app-manifest-512x512.png".to_string(),
                    sizes: "512x512".to_string(),
                    mime_type: "image/png".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let mut config = FaviconConfig::default();
        config.web_manifest.content.name = "Configured".to_string();
        config.web_manifest.content.short_name = "Cfg".to_string();

        let options = ManifestOptions {
            name: Some("   ".to_string()),
            short_name: Some("Run".to_string()),
            theme_color: Some(String::new()),
            background_color: Some("#000000".to_string()),
        };
        let manifest = build_manifest(&config, &options);

        assert_eq!(manifest.name, "Configured");
        assert_eq!(manifest.short_name, "Run");
        assert_eq!(manifest.theme_color, "#ffffff");
        assert_eq!(manifest.background_color, "#000000");
    }

    #[test]
    fn test_icons_sorted_and_deduplicated() {
        let mut config = FaviconConfig::default();
        config.favicon_types.web_app_manifest_icons.sizes = vec![512, 144, 192, 512];

        let manifest = build_manifest(&config, &ManifestOptions::default());
        let sizes: Vec<&str> = manifest.icons.iter().map(|i| i.sizes.as_str()).collect();
        assert_eq!(sizes, vec!["144x144", "192x192", "512x512"]);
    }

    #[test]
    fn test_json_layout() {
        let manifest = build_manifest(&FaviconConfig::default(), &ManifestOptions::default());
        let json = manifest.to_json().unwrap();

        assert!(!json.ends_with('\n'));
        assert!(json.contains(r#""src": "/favicon/web-app-manifest-192x192.png""#));
        assert!(json.contains(r#""type": "image/png""#));

        let keys = ["\"name\"", "\"short_name\"", "\"icons\"", "\"theme_color\"", "\"background_color\"", "\"display\""];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
