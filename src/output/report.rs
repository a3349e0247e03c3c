//! Conflict report files
//!
//! Writes `conflict_report.md` and `conflict_report.json` to the report
//! directory. Both files are written on every check, including when no
//! conflict was found, so a stale report never survives a clean run.

use crate::domain::Conflict;
use crate::error::ReportError;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const MARKDOWN_REPORT_NAME: &str = "conflict_report.md";
pub const JSON_REPORT_NAME: &str = "conflict_report.json";

/// Machine-readable record of one conflict
#[derive(Debug, Serialize)]
pub(crate) struct ConflictRecord<'a> {
    dependency_name: &'a str,
    owners: Vec<OwnerRecord<'a>>,
    lower_bound: &'a str,
    upper_bound: &'a str,
}

#[derive(Debug, Serialize)]
struct OwnerRecord<'a> {
    owner: &'a str,
    range_text: &'a str,
}

impl<'a> From<&'a Conflict> for ConflictRecord<'a> {
    fn from(conflict: &'a Conflict) -> Self {
        Self {
            dependency_name: &conflict.dependency_name,
            owners: conflict
                .entries
                .iter()
                .map(|e| OwnerRecord {
                    owner: &e.owner,
                    range_text: &e.range_text,
                })
                .collect(),
            lower_bound: &conflict.lower.bound,
            upper_bound: &conflict.upper.bound,
        }
    }
}

pub(crate) fn conflict_records(conflicts: &[Conflict]) -> Vec<ConflictRecord<'_>> {
    conflicts.iter().map(ConflictRecord::from).collect()
}

/// Paths of the report files that were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub json: PathBuf,
}

/// Render the Markdown report
pub fn render_markdown(conflicts: &[Conflict], generated_at: DateTime<Local>) -> String {
    let mut out = String::from("# Dependency Conflict Report\n\n");
    out.push_str(&format!(
        "Generated: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    if conflicts.is_empty() {
        out.push_str("No dependency conflicts detected.\n");
        return out;
    }

    out.push_str(&format!(
        "Detected {} dependency {}:\n\n",
        conflicts.len(),
        if conflicts.len() == 1 {
            "conflict"
        } else {
            "conflicts"
        }
    ));

    for conflict in conflicts {
        out.push_str(&format!("## Dependency: {}\n\n", conflict.dependency_name));
        out.push_str("| Plugin | Version requirement | Side |\n");
        out.push_str("|--------|---------------------|------|\n");
        for entry in &conflict.entries {
            out.push_str(&format!(
                "| {} | `{}` | {} |\n",
                entry.owner,
                entry.range_text,
                entry.side.label()
            ));
        }
        out.push_str(&format!("\n{}.\n\n", conflict.describe()));
    }

    out
}

/// Render the JSON report
pub fn render_json(conflicts: &[Conflict]) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&conflict_records(conflicts))?)
}

fn write_file(path: &Path, content: &str) -> Result<(), ReportError> {
    fs::write(path, content).map_err(|e| ReportError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write both report files to `dir`, creating it when needed
pub fn write_reports(conflicts: &[Conflict], dir: &Path) -> Result<ReportPaths, ReportError> {
    fs::create_dir_all(dir).map_err(|e| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let paths = ReportPaths {
        markdown: dir.join(MARKDOWN_REPORT_NAME),
        json: dir.join(JSON_REPORT_NAME),
    };
    write_file(&paths.markdown, &render_markdown(conflicts, Local::now()))?;
    write_file(&paths.json, &render_json(conflicts)?)?;

    tracing::info!(dir = %dir.display(), conflicts = conflicts.len(), "reports written");
    Ok(paths)
}
