//! Component discovery under the plugin root
//!
//! Features:
//! - One component per direct subdirectory of the root
//! - Hidden directories (`.git`, `.venv`, ...) are ignored
//! - A missing manifest means the component declares no dependencies
//! - Components are returned sorted by name so scans are reproducible

use crate::error::ManifestError;
use std::fs;
use std::path::{Path, PathBuf};

/// A component directory and its manifest, if it has one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Directory name, used as the owner of its requirements
    pub name: String,
    /// Path to the component directory
    pub dir: PathBuf,
    /// Path to the manifest file when it exists
    pub manifest: Option<PathBuf>,
}

impl Component {
    /// Create a new Component
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            manifest: None,
        }
    }

    /// Set the manifest path (builder pattern)
    pub fn with_manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    /// Returns true if the component has a manifest file
    pub fn has_manifest(&self) -> bool {
        self.manifest.is_some()
    }
}

/// List the components under `root`, looking for `manifest_name` in each
pub fn discover_components(
    root: &Path,
    manifest_name: &str,
) -> Result<Vec<Component>, ManifestError> {
    let entries = fs::read_dir(root).map_err(|e| ManifestError::unreadable(root, e))?;

    let mut components = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ManifestError::unreadable(root, e))?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let manifest_path = dir.join(manifest_name);
        let mut component = Component::new(name, &dir);
        if manifest_path.is_file() {
            component = component.with_manifest(manifest_path);
        } else {
            tracing::debug!(component = %component.name, "no {} found, skipping", manifest_name);
        }
        components.push(component);
    }

    components.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(components)
}
