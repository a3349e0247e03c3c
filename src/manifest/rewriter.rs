//! Bulk replacement of dependency lines across manifests
//!
//! This module provides:
//! - ReplaceSpec for selecting lines by name and, optionally, by exact range
//! - Rewriter for applying a replacement to every component manifest
//! - Dry-run mode support (no actual file modifications)
//!
//! Only the requirement parser is used to decide which lines match; lines
//! that do not parse or do not match are copied through byte for byte.

use super::{read_manifest, write_manifest, Component};
use crate::domain::Requirement;
use crate::error::{ConfigError, ManifestError};
use crate::parser::{classify_line, has_operator, parse_requirement, LineKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which lines to replace and what to replace them with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceSpec {
    /// Normalized dependency name to match
    name: String,
    /// Rendered range a line must have, when the old text carried one
    range_filter: Option<String>,
    /// Replacement line text, without terminator
    replacement: String,
}

impl ReplaceSpec {
    /// Build a spec from the old dependency text and the new declaration line
    pub fn parse(old: &str, new: &str) -> Result<Self, ConfigError> {
        let old = old.trim();
        let new = new.trim();
        if old.is_empty() || new.is_empty() {
            return Err(ConfigError::EmptyReplaceSpec);
        }

        let old_req =
            parse_requirement(old, "").map_err(|e| ConfigError::invalid_replace_spec(old, e))?;
        parse_requirement(new, "").map_err(|e| ConfigError::invalid_replace_spec(new, e))?;

        let range_filter = has_operator(old).then(|| old_req.range().to_string());

        Ok(Self {
            name: old_req.name().to_string(),
            range_filter,
            replacement: new.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range_filter(&self) -> Option<&str> {
        self.range_filter.as_deref()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Returns true if the requirement should be replaced
    pub fn matches(&self, requirement: &Requirement) -> bool {
        requirement.name() == self.name
            && self
                .range_filter
                .as_deref()
                .is_none_or(|filter| requirement.range().to_string() == filter)
    }
}

/// Split a line into its body and its original terminator
fn split_terminator(segment: &str) -> (&str, &str) {
    if let Some(body) = segment.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = segment.strip_suffix('\n') {
        (body, "\n")
    } else {
        (segment, "")
    }
}

/// Apply the replacement to manifest content.
///
/// Returns the new content and the number of lines whose text changed.
pub fn rewrite_content(content: &str, spec: &ReplaceSpec) -> (String, usize) {
    let mut output = String::with_capacity(content.len());
    let mut replaced = 0;

    for segment in content.split_inclusive('\n') {
        let (body, terminator) = split_terminator(segment);
        let matched = match classify_line(body) {
            LineKind::Requirement(text) => parse_requirement(text, "")
                .map(|req| spec.matches(&req))
                .unwrap_or(false),
            LineKind::Blank | LineKind::Comment => false,
        };

        if matched && body != spec.replacement {
            output.push_str(&spec.replacement);
            output.push_str(terminator);
            replaced += 1;
        } else {
            output.push_str(segment);
        }
    }

    (output, replaced)
}

/// Outcome of rewriting one manifest
#[derive(Debug)]
pub struct RewriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Component that owns the manifest
    pub owner: String,
    /// Number of lines replaced (or that would be, in dry-run mode)
    pub replacements: usize,
    /// Whether the file was actually written
    pub file_modified: bool,
    /// Read or write failure, if any
    pub error: Option<ManifestError>,
}

impl RewriteResult {
    fn new(owner: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owner: owner.into(),
            replacements: 0,
            file_modified: false,
            error: None,
        }
    }

    /// Returns true if the manifest content changed (or would change)
    pub fn has_changes(&self) -> bool {
        self.replacements > 0 && self.error.is_none()
    }
}

/// Outcome of rewriting every manifest under a root
#[derive(Debug, Default)]
pub struct RewriteSummary {
    pub results: Vec<RewriteResult>,
    pub dry_run: bool,
}

impl RewriteSummary {
    /// Number of manifests changed (or that would be, in dry-run mode)
    pub fn files_changed(&self) -> usize {
        self.results.iter().filter(|r| r.has_changes()).count()
    }

    pub fn total_replacements(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.error.is_none())
            .map(|r| r.replacements)
            .sum()
    }

    /// Results that failed to read or write
    pub fn errors(&self) -> impl Iterator<Item = &RewriteResult> {
        self.results.iter().filter(|r| r.error.is_some())
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.error.is_some())
    }
}

/// Applies a ReplaceSpec to manifest files
#[derive(Debug, Clone, Copy, Default)]
pub struct Rewriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

impl Rewriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Check if this rewriter is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Rewrite one manifest; the file is written only when its content changes
    pub fn rewrite_manifest(
        &self,
        owner: &str,
        path: &Path,
        spec: &ReplaceSpec,
    ) -> Result<RewriteResult, ManifestError> {
        let mut result = RewriteResult::new(owner, path);
        let content = read_manifest(path)?;
        let (updated, replaced) = rewrite_content(&content, spec);
        result.replacements = replaced;

        if replaced > 0 && !self.dry_run {
            write_manifest(path, &updated)?;
            result.file_modified = true;
            info!(owner, replaced, "manifest rewritten");
        } else {
            debug!(
                owner,
                replaced,
                dry_run = self.dry_run,
                "manifest left unchanged"
            );
        }

        Ok(result)
    }

    /// Rewrite every component manifest; a failure is recorded and the rest continue
    pub fn rewrite_all(&self, components: &[Component], spec: &ReplaceSpec) -> RewriteSummary {
        let results = components
            .iter()
            .filter_map(|component| {
                let path = component.manifest.as_ref()?;
                match self.rewrite_manifest(&component.name, path, spec) {
                    Ok(result) => Some(result),
                    Err(e) => {
                        tracing::error!("{}", e);
                        let mut result = RewriteResult::new(&component.name, path);
                        result.error = Some(e);
                        Some(result)
                    }
                }
            })
            .collect();

        RewriteSummary {
            results,
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn spec(old: &str, new: &str) -> ReplaceSpec {
        ReplaceSpec::parse(old, new).unwrap()
    }

    #[test]
    fn test_replace_spec_with_range_filter() {
        let spec = spec("libX>=2.0", "libX==2.5.1");
        assert_eq!(spec.name(), "libx");
        assert_eq!(spec.range_filter(), Some(">=2.0"));
        assert_eq!(spec.replacement(), "libX==2.5.1");
    }

    #[test]
    fn test_replace_spec_name_only() {
        let spec = spec("LibX", "libX>=3");
        assert_eq!(spec.name(), "libx");
        assert_eq!(spec.range_filter(), None);
    }

    #[test]
    fn test_replace_spec_rejects_invalid_input() {
        assert!(matches!(
            ReplaceSpec::parse("  ", "libX==1"),
            Err(ConfigError::EmptyReplaceSpec)
        ));
        assert!(matches!(
            ReplaceSpec::parse("libX", ""),
            Err(ConfigError::EmptyReplaceSpec)
        ));
        assert!(matches!(
            ReplaceSpec::parse("libX>>1", "libX==1"),
            Err(ConfigError::InvalidReplaceSpec { .. })
        ));
        assert!(matches!(
            ReplaceSpec::parse("libX", "libX=>1"),
            Err(ConfigError::InvalidReplaceSpec { .. })
        ));
    }

    #[test]
    fn test_range_filter_ignores_clause_order() {
        let spec = spec("libX<3,>=2", "libX==2.5");
        let req = parse_requirement("libX>=2,<3", "a").unwrap();
        assert!(spec.matches(&req));
    }

    #[test]
    fn test_rewrite_content_replaces_matching_line() {
        let spec = spec("libX>=2.0", "libX==2.5.1");
        let (content, replaced) = rewrite_content("numpy\nlibX>=2.0\nscipy", &spec);
        assert_eq!(content, "numpy\nlibX==2.5.1\nscipy");
        assert_eq!(replaced, 1);
    }

    #[test]
    fn test_rewrite_content_keeps_non_matching_bytes() {
        let spec = spec("libX>=2.0", "libX==2.5.1");
        let original = "# pinned\r\nlibX>=3.0\r\n  bad>>line\r\n\r\n";
        let (content, replaced) = rewrite_content(original, &spec);
        assert_eq!(content, original);
        assert_eq!(replaced, 0);
    }

    #[test]
    fn test_rewrite_content_keeps_crlf_terminator() {
        let spec = spec("libx", "libx>=4");
        let (content, replaced) = rewrite_content("LibX==1\r\nother\r\n", &spec);
        assert_eq!(content, "libx>=4\r\nother\r\n");
        assert_eq!(replaced, 1);
    }

    #[test]
    fn test_rewrite_content_is_idempotent() {
        let spec = spec("libx", "libx>=4");
        let (once, _) = rewrite_content("libx<1\n", &spec);
        let (twice, replaced) = rewrite_content(&once, &spec);
        assert_eq!(once, twice);
        assert_eq!(replaced, 0);
    }

    #[test]
    fn test_rewrite_manifest_dry_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "libX>=2.0\n").unwrap();

        let result = Rewriter::new(true)
            .rewrite_manifest("a", &path, &spec("libX>=2.0", "libX==2.5.1"))
            .unwrap();
        assert_eq!(result.replacements, 1);
        assert!(!result.file_modified);
        assert!(result.has_changes());
        assert_eq!(fs::read_to_string(&path).unwrap(), "libX>=2.0\n");
    }

    #[test]
    fn test_rewrite_all_counts_changed_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "libX>=2.0\n").unwrap();
        fs::write(&b, "libX>=3.0\n").unwrap();

        let components = vec![
            Component::new("a", dir.path()).with_manifest(&a),
            Component::new("b", dir.path()).with_manifest(&b),
            Component::new("c", dir.path()),
            Component::new("d", dir.path()).with_manifest(dir.path().join("missing.txt")),
        ];
        let rewriter = Rewriter::new(false);
        assert!(!rewriter.is_dry_run());
        let summary = rewriter.rewrite_all(&components, &spec("libX>=2.0", "libX==2.5.1"));

        assert_eq!(summary.results.len(), 3);
        assert_eq!(summary.files_changed(), 1);
        assert_eq!(summary.total_replacements(), 1);
        assert_eq!(summary.errors().count(), 1);
        assert_eq!(fs::read_to_string(&a).unwrap(), "libX==2.5.1\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "libX>=3.0\n");
    }
}
