//! Manifest scanning
//!
//! Turns manifest files into requirements. A line that fails to parse is
//! skipped and recorded as a [`ScanWarning`]; a manifest that cannot be read
//! is recorded as a [`ManifestError`]. Neither stops the rest of the scan.

use super::{read_manifest, Component};
use crate::analysis::RequirementIndex;
use crate::domain::Requirement;
use crate::error::{ManifestError, ParseError};
use crate::parser::{classify_line, parse_requirement, LineKind};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A manifest line that was skipped because it could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub owner: String,
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    pub text: String,
    pub error: ParseError,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}:{}): {}",
            self.owner,
            self.path.display(),
            self.line,
            self.error
        )
    }
}

/// Warning-level outcomes of a scan that leave nothing to check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanNotice {
    /// The root directory has no component subdirectories
    NoComponentsFound,
    /// Components exist but none of them has a manifest
    NoManifestsFound,
}

impl fmt::Display for ScanNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanNotice::NoComponentsFound => write!(f, "no plugin directories found"),
            ScanNotice::NoManifestsFound => {
                write!(f, "plugin directories found, but none has a manifest")
            }
        }
    }
}

/// Requirements and warnings parsed from one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestScan {
    pub owner: String,
    pub path: PathBuf,
    pub requirements: Vec<Requirement>,
    pub warnings: Vec<ScanWarning>,
}

/// Parse manifest content declared by `owner`
pub fn parse_manifest_content(owner: &str, path: &Path, content: &str) -> ManifestScan {
    let mut scan = ManifestScan {
        owner: owner.to_string(),
        path: path.to_path_buf(),
        requirements: Vec::new(),
        warnings: Vec::new(),
    };

    for (idx, line) in content.lines().enumerate() {
        let line_number = idx + 1;
        let LineKind::Requirement(text) = classify_line(line) else {
            continue;
        };

        match parse_requirement(text, owner) {
            Ok(requirement) => scan.requirements.push(requirement.with_line(line_number)),
            Err(error) => {
                warn!(
                    owner,
                    line = line_number,
                    "cannot parse dependency '{}': {}",
                    text,
                    error
                );
                scan.warnings.push(ScanWarning {
                    owner: owner.to_string(),
                    path: path.to_path_buf(),
                    line: line_number,
                    text: text.to_string(),
                    error,
                });
            }
        }
    }

    scan
}

/// Read and parse one manifest file
pub fn scan_manifest(owner: &str, path: &Path) -> Result<ManifestScan, ManifestError> {
    let content = read_manifest(path)?;
    let scan = parse_manifest_content(owner, path, &content);
    tracing::info!(
        owner,
        requirements = scan.requirements.len(),
        "parsed manifest"
    );
    Ok(scan)
}

/// Immutable result of scanning a plugin root
#[derive(Debug)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Number of component directories found
    pub components: usize,
    /// Successfully read manifests, in component order
    pub manifests: Vec<ManifestScan>,
    /// Manifests that could not be read
    pub errors: Vec<ManifestError>,
    pub notice: Option<ScanNotice>,
}

impl ScanResult {
    /// Scan every component's manifest
    pub fn from_components(root: impl Into<PathBuf>, components: &[Component]) -> Self {
        Self::from_components_with(root, components, |_| {})
    }

    /// Scan every component's manifest, calling `on_manifest` after each one
    pub fn from_components_with<F>(
        root: impl Into<PathBuf>,
        components: &[Component],
        mut on_manifest: F,
    ) -> Self
    where
        F: FnMut(&Component),
    {
        let mut manifests = Vec::new();
        let mut errors = Vec::new();

        for component in components {
            let Some(ref path) = component.manifest else {
                continue;
            };
            match scan_manifest(&component.name, path) {
                Ok(scan) => manifests.push(scan),
                Err(e) => {
                    tracing::error!("{}", e);
                    errors.push(e);
                }
            }
            on_manifest(component);
        }

        let notice = if components.is_empty() {
            Some(ScanNotice::NoComponentsFound)
        } else if !components.iter().any(Component::has_manifest) {
            Some(ScanNotice::NoManifestsFound)
        } else {
            None
        };

        Self {
            root: root.into(),
            components: components.len(),
            manifests,
            errors,
            notice,
        }
    }

    /// All requirements in scan order
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.manifests.iter().flat_map(|m| m.requirements.iter())
    }

    /// All skipped-line warnings in scan order
    pub fn warnings(&self) -> impl Iterator<Item = &ScanWarning> {
        self.manifests.iter().flat_map(|m| m.warnings.iter())
    }

    pub fn warning_count(&self) -> usize {
        self.manifests.iter().map(|m| m.warnings.len()).sum()
    }

    pub fn requirement_count(&self) -> usize {
        self.manifests.iter().map(|m| m.requirements.len()).sum()
    }

    /// Fresh index of every requirement in this scan
    pub fn index(&self) -> RequirementIndex {
        RequirementIndex::build(self.requirements().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_content_skips_blank_and_comment_lines() {
        let content = "# core deps\n\nnumpy>=1.24\n   \nrequests\n";
        let scan = parse_manifest_content("a", Path::new("a/requirements.txt"), content);
        assert_eq!(scan.requirements.len(), 2);
        assert!(scan.warnings.is_empty());
        assert_eq!(scan.requirements[0].line(), Some(3));
        assert_eq!(scan.requirements[1].line(), Some(5));
    }

    #[test]
    fn test_parse_content_records_malformed_line() {
        let content = "libX>>1.0\nlibY>=2.0\n";
        let scan = parse_manifest_content("a", Path::new("a/requirements.txt"), content);
        assert_eq!(scan.requirements.len(), 1);
        assert_eq!(scan.requirements[0].name(), "liby");
        assert_eq!(scan.warnings.len(), 1);

        let warning = &scan.warnings[0];
        assert_eq!(warning.owner, "a");
        assert_eq!(warning.line, 1);
        assert_eq!(warning.text, "libX>>1.0");
        assert!(matches!(
            warning.error,
            ParseError::UnsupportedOperator { .. }
        ));
        assert!(warning.to_string().contains("a/requirements.txt:1"));
    }

    #[test]
    fn test_parse_content_rejects_unbounded_prefix() {
        let content = "libX~=1.18446744073709551615.0\nlibX==18446744073709551615.*\nliby>=1\n";
        let scan = parse_manifest_content("a", Path::new("r.txt"), content);
        assert_eq!(scan.requirements.len(), 1);
        assert_eq!(scan.warnings.len(), 2);
        assert!(matches!(
            scan.warnings[1].error,
            ParseError::MalformedVersion { .. }
        ));
    }

    #[test]
    fn test_parse_content_handles_crlf() {
        let scan = parse_manifest_content("a", Path::new("r.txt"), "numpy>=1\r\nscipy\r\n");
        assert_eq!(scan.requirements.len(), 2);
        assert_eq!(scan.requirements[0].range().to_string(), ">=1");
    }

    #[test]
    fn test_scan_manifest_missing_file() {
        let err = scan_manifest("a", Path::new("/nonexistent/requirements.txt")).unwrap_err();
        assert!(matches!(err, ManifestError::Unreadable { .. }));
    }

    #[test]
    fn test_scan_result_notices() {
        let result = ScanResult::from_components("/root", &[]);
        assert_eq!(result.notice, Some(ScanNotice::NoComponentsFound));

        let result = ScanResult::from_components("/root", &[Component::new("a", "/root/a")]);
        assert_eq!(result.notice, Some(ScanNotice::NoManifestsFound));
        assert_eq!(result.components, 1);
        assert!(result.index().is_empty());
    }

    #[test]
    fn test_scan_result_continues_after_unreadable_manifest() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "libx>=1\n").unwrap();

        let components = vec![
            Component::new("broken", dir.path()).with_manifest(dir.path().join("missing.txt")),
            Component::new("good", dir.path()).with_manifest(&good),
        ];
        let mut visited = Vec::new();
        let result = ScanResult::from_components_with(dir.path(), &components, |c| {
            visited.push(c.name.clone())
        });

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.manifests.len(), 1);
        assert_eq!(result.requirement_count(), 1);
        assert_eq!(result.notice, None);
        assert_eq!(visited, vec!["broken", "good"]);
    }
}
