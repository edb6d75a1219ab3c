//! Atomic file output

use crate::FaviconError;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Write `data` to `path` through a temp file in the same directory.
///
/// The temp file is renamed over `path` only after it has been fully written
/// and synced; on any error it is removed when dropped.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::Builder::new()
        .prefix(".favicon-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp_file.write_all(data)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = data.len(), "output.write_atomic");
    Ok(())
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), FaviconError> {
    fs::create_dir_all(dir).map_err(|e| {
        FaviconError::io_error(format!("Failed to create {}: {}", dir.display(), e))
    })
}
