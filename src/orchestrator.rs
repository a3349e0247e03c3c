//! Orchestrator for the check and replace workflows
//!
//! This module provides:
//! - Workflow coordination: discover → scan → index → detect
//! - Bulk replacement across every component manifest
//! - Progress display while manifests are processed
//!
//! Each call starts from the file system again and returns an immutable
//! result value; nothing is carried over between calls.

use crate::analysis::ConflictDetector;
use crate::config::Config;
use crate::domain::Conflict;
use crate::error::AppError;
use crate::manifest::{
    discover_components, Component, ReplaceSpec, RewriteSummary, Rewriter, ScanNotice, ScanResult,
};
use crate::progress::Progress;
use tracing::{info, warn};

/// Result of a check run
#[derive(Debug)]
pub struct CheckReport {
    pub scan: ScanResult,
    /// Conflicts in first-encountered dependency order
    pub conflicts: Vec<Conflict>,
}

impl CheckReport {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Result of a replace run
#[derive(Debug)]
pub struct ReplaceReport {
    pub spec: ReplaceSpec,
    pub summary: RewriteSummary,
    pub notice: Option<ScanNotice>,
}

impl ReplaceReport {
    /// Number of manifests changed (or that would be, in dry-run mode)
    pub fn files_changed(&self) -> usize {
        self.summary.files_changed()
    }
}

/// Runs check and replace against one plugin root
pub struct Orchestrator {
    config: Config,
    show_progress: bool,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            show_progress: false,
        }
    }

    /// Enable or disable the progress display (builder pattern)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn discover(&self, progress: &mut Progress) -> Result<Vec<Component>, AppError> {
        progress.spinner("Discovering plugins...");
        let components = discover_components(&self.config.root, &self.config.manifest_name)?;
        progress.finish_and_clear();
        info!(
            root = %self.config.root.display(),
            components = components.len(),
            "plugins discovered"
        );
        Ok(components)
    }

    /// Scan every manifest under the root
    pub fn scan(&self) -> Result<ScanResult, AppError> {
        let mut progress = Progress::new(self.show_progress);
        let components = self.discover(&mut progress)?;

        let manifests = components.iter().filter(|c| c.has_manifest()).count();
        progress.start(manifests as u64, "Scanning manifests");
        let scan = ScanResult::from_components_with(&self.config.root, &components, |c| {
            progress.inc(&c.name)
        });
        progress.finish_and_clear();

        if let Some(notice) = scan.notice {
            warn!("{}", notice);
        }
        Ok(scan)
    }

    /// Scan the root and detect conflicts
    pub fn check(&self) -> Result<CheckReport, AppError> {
        let scan = self.scan()?;
        let conflicts = ConflictDetector::new().detect(&scan.index());
        Ok(CheckReport { scan, conflicts })
    }

    /// Replace matching dependency lines in every manifest under the root
    pub fn replace(&self, old: &str, new: &str, dry_run: bool) -> Result<ReplaceReport, AppError> {
        let spec = ReplaceSpec::parse(old, new)?;
        let mut progress = Progress::new(self.show_progress);
        let components = self.discover(&mut progress)?;

        let notice = if components.is_empty() {
            Some(ScanNotice::NoComponentsFound)
        } else if !components.iter().any(Component::has_manifest) {
            Some(ScanNotice::NoManifestsFound)
        } else {
            None
        };
        if let Some(notice) = notice {
            warn!("{}", notice);
        }

        let summary = Rewriter::new(dry_run).rewrite_all(&components, &spec);
        info!(
            dependency = spec.name(),
            files_changed = summary.files_changed(),
            dry_run,
            "replace finished"
        );

        Ok(ReplaceReport {
            spec,
            summary,
            notice,
        })
    }
}
