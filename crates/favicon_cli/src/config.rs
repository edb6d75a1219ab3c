//! favicon.toml loading

use anyhow::{Context, Result};
use favicon_tools::FaviconConfig;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "favicon.toml";

/// Load the run configuration.
///
/// An explicit path must exist. Without one, `fallback` is read if present and
/// the built-in defaults are used otherwise.
pub fn load_config(explicit: Option<&Path>, fallback: &Path) -> Result<FaviconConfig> {
    match explicit {
        Some(path) => from_file(path),
        None if fallback.is_file() => from_file(fallback),
        None => {
            debug!(path = %fallback.display(), "no config file, using defaults");
            Ok(FaviconConfig::default())
        }
    }
}

/// Parse and validate a config file
pub fn from_file(path: &Path) -> Result<FaviconConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let config: FaviconConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config at {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config at {}", path.display()))?;

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
