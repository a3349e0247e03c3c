//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of check results, with the same conflict records as
//!   `conflict_report.json`
//! - Per-manifest replace results

use super::report::{conflict_records, ConflictRecord};
use crate::orchestrator::{CheckReport, ReplaceReport};
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a check
#[derive(Serialize)]
struct JsonCheck<'a> {
    root: String,
    summary: JsonScanSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
    conflicts: Vec<ConflictRecord<'a>>,
    /// Skipped lines (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<JsonWarning<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Serialize)]
struct JsonScanSummary {
    plugins: usize,
    manifests: usize,
    requirements: usize,
    skipped_lines: usize,
    conflicts: usize,
}

#[derive(Serialize)]
struct JsonWarning<'a> {
    owner: &'a str,
    path: String,
    line: usize,
    text: &'a str,
    reason: String,
}

/// JSON representation of a replace
#[derive(Serialize)]
struct JsonReplace<'a> {
    dry_run: bool,
    dependency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    range_filter: Option<&'a str>,
    replacement: &'a str,
    files_changed: usize,
    replacements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
    files: Vec<JsonRewrite<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Serialize)]
struct JsonRewrite<'a> {
    owner: &'a str,
    path: String,
    replacements: usize,
    modified: bool,
}

fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(writer, "{}", json)
}

impl OutputFormatter for JsonFormatter {
    fn format_check(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let scan = &report.scan;
        let warnings = if self.verbosity == Verbosity::Verbose {
            scan.warnings()
                .map(|w| JsonWarning {
                    owner: &w.owner,
                    path: w.path.display().to_string(),
                    line: w.line,
                    text: &w.text,
                    reason: w.error.to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let output = JsonCheck {
            root: scan.root.display().to_string(),
            summary: JsonScanSummary {
                plugins: scan.components,
                manifests: scan.manifests.len(),
                requirements: scan.requirement_count(),
                skipped_lines: scan.warning_count(),
                conflicts: report.conflicts.len(),
            },
            notice: scan.notice.map(|n| n.to_string()),
            conflicts: conflict_records(&report.conflicts),
            warnings,
            errors: scan.errors.iter().map(|e| e.to_string()).collect(),
        };
        write_json(&output, writer)
    }

    fn format_replace(
        &self,
        report: &ReplaceReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let summary = &report.summary;
        let files = summary
            .results
            .iter()
            .filter(|r| r.error.is_none())
            .filter(|r| self.verbosity == Verbosity::Verbose || r.has_changes())
            .map(|r| JsonRewrite {
                owner: &r.owner,
                path: r.path.display().to_string(),
                replacements: r.replacements,
                modified: r.file_modified,
            })
            .collect();

        let output = JsonReplace {
            dry_run: summary.dry_run,
            dependency: report.spec.name(),
            range_filter: report.spec.range_filter(),
            replacement: report.spec.replacement(),
            files_changed: summary.files_changed(),
            replacements: summary.total_replacements(),
            notice: report.notice.map(|n| n.to_string()),
            files,
            errors: summary
                .errors()
                .filter_map(|r| r.error.as_ref().map(|e| e.to_string()))
                .collect(),
        };
        write_json(&output, writer)
    }
}
