//! Manifest file reading and atomic writing
//!
//! Writes go to a temporary file in the manifest's own directory and are then
//! renamed over the original, so a manifest is either fully replaced or left
//! untouched. The temporary file is removed on every failure path.

use crate::error::ManifestError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a manifest file content safely
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::unreadable(path, e))
}

/// Replace the full content of a manifest file atomically
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| ManifestError::unwritable(path, e))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| ManifestError::unwritable(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| ManifestError::unwritable(path, e))?;

    // NamedTempFile is created 0600; keep the manifest's own mode
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())
            .map_err(|e| ManifestError::unwritable(path, e))?;
    }

    temp.persist(path)
        .map_err(|e| ManifestError::unwritable(path, e.error))?;
    tracing::debug!(path = %path.display(), "manifest written");
    Ok(())
}
