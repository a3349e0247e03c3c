//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One table per conflicting dependency, with the side each owner is on
//! - Scan statistics, skipped-line warnings, and unreadable manifests
//! - Per-manifest replacement results with a dry-run prefix

use crate::domain::{Conflict, ConflictSide};
use crate::orchestrator::{CheckReport, ReplaceReport};
use crate::output::{OutputFormatter, Verbosity};
use colored::{ColoredString, Colorize};
use std::io::Write;

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Apply a style only when colors are enabled
    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn side_label(&self, side: ConflictSide) -> String {
        match side {
            ConflictSide::Lower => self.paint(side.label(), |s| s.yellow()),
            ConflictSide::Upper => self.paint(side.label(), |s| s.cyan()),
            ConflictSide::Both => self.paint(side.label(), |s| s.red()),
        }
    }

    fn format_conflict(&self, conflict: &Conflict, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            writer,
            "{} {}",
            self.paint("✗", |s| s.red()),
            self.paint(&conflict.dependency_name, |s| s.bold())
        )?;

        let owner_width = conflict
            .entries
            .iter()
            .map(|e| e.owner.len())
            .max()
            .unwrap_or(0)
            .max(12);
        let range_width = conflict
            .entries
            .iter()
            .map(|e| e.range_text.len())
            .max()
            .unwrap_or(0)
            .max(8);

        for entry in &conflict.entries {
            let range = if entry.range_text.is_empty() {
                "(any)"
            } else {
                entry.range_text.as_str()
            };
            writeln!(
                writer,
                "  {:ow$}  {:rw$}  {}",
                entry.owner,
                range,
                self.side_label(entry.side),
                ow = owner_width,
                rw = range_width
            )?;
        }
        let description = conflict.describe();
        writeln!(writer, "  {}", self.paint(&description, |s| s.dimmed()))?;
        writeln!(writer)
    }

    fn format_scan_details(
        &self,
        report: &CheckReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let scan = &report.scan;
        writeln!(
            writer,
            "Scanned {} {} ({} {}, {} {})",
            scan.components,
            plural(scan.components, "plugin", "plugins"),
            scan.manifests.len(),
            plural(scan.manifests.len(), "manifest", "manifests"),
            scan.requirement_count(),
            plural(scan.requirement_count(), "requirement", "requirements"),
        )?;

        if let Some(notice) = scan.notice {
            writeln!(writer, "{} {}", self.paint("!", |s| s.yellow()), notice)?;
        }

        let warnings = scan.warning_count();
        if warnings > 0 {
            if self.verbosity == Verbosity::Verbose {
                writeln!(writer, "{}:", self.paint("Skipped lines", |s| s.yellow()))?;
                for warning in scan.warnings() {
                    writeln!(writer, "  {}", warning)?;
                }
            } else {
                writeln!(
                    writer,
                    "{} {} {} skipped (use --verbose to list)",
                    self.paint("!", |s| s.yellow()),
                    warnings,
                    plural(warnings, "line", "lines")
                )?;
            }
        }

        if !scan.errors.is_empty() {
            writeln!(writer, "{}:", self.paint("Errors", |s| s.red().bold()))?;
            for error in &scan.errors {
                writeln!(writer, "  {} {}", self.paint("✗", |s| s.red()), error)?;
            }
        }

        writeln!(writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format_check(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            for conflict in &report.conflicts {
                writeln!(writer, "{}", conflict)?;
            }
            return Ok(());
        }

        self.format_scan_details(report, writer)?;

        for conflict in &report.conflicts {
            self.format_conflict(conflict, writer)?;
        }

        let count = report.conflicts.len();
        if count == 0 {
            writeln!(
                writer,
                "{} No dependency conflicts detected.",
                self.paint("✓", |s| s.green())
            )
        } else {
            let summary = format!(
                "Found {} dependency {}.",
                count,
                plural(count, "conflict", "conflicts")
            );
            writeln!(writer, "{}", self.paint(&summary, |s| s.red().bold()))
        }
    }

    fn format_replace(
        &self,
        report: &ReplaceReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let summary = &report.summary;
        let prefix = if summary.dry_run {
            format!("{} ", self.paint("(dry-run)", |s| s.cyan()))
        } else {
            String::new()
        };

        if self.verbosity != Verbosity::Quiet {
            if let Some(notice) = report.notice {
                writeln!(writer, "{} {}", self.paint("!", |s| s.yellow()), notice)?;
            }

            for result in summary.results.iter().filter(|r| r.has_changes()) {
                writeln!(
                    writer,
                    "{}{}  {}  {} {} replaced",
                    prefix,
                    self.paint(&result.owner, |s| s.bold()),
                    self.paint(&result.path.display().to_string(), |s| s.dimmed()),
                    result.replacements,
                    plural(result.replacements, "line", "lines")
                )?;
            }

            if summary.has_errors() {
                writeln!(writer, "{}:", self.paint("Errors", |s| s.red().bold()))?;
                for result in summary.errors() {
                    if let Some(ref error) = result.error {
                        writeln!(writer, "  {} {}", self.paint("✗", |s| s.red()), error)?;
                    }
                }
            }
        }

        let changed = summary.files_changed();
        let verb = if summary.dry_run {
            "Would update"
        } else {
            "Updated"
        };
        let count = if changed > 0 {
            self.paint(&changed.to_string(), |s| s.green())
        } else {
            changed.to_string()
        };
        writeln!(
            writer,
            "{}{} {} {} ({} -> {})",
            prefix,
            verb,
            count,
            plural(changed, "file", "files"),
            report.spec.name(),
            report.spec.replacement()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::detect_conflicts;
    use crate::manifest::{parse_manifest_content, Rewriter, ReplaceSpec, ScanResult};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn check_report(manifests: &[(&str, &str)]) -> CheckReport {
        let scans: Vec<_> = manifests
            .iter()
            .map(|(owner, content)| {
                let path = format!("{}/requirements.txt", owner);
                parse_manifest_content(owner, Path::new(&path), content)
            })
            .collect();
        let scan = ScanResult {
            root: PathBuf::from("/plugins"),
            components: scans.len(),
            manifests: scans,
            errors: Vec::new(),
            notice: None,
        };
        let conflicts = detect_conflicts(scan.requirements().cloned());
        CheckReport { scan, conflicts }
    }

    fn render_check(formatter: &TextFormatter, report: &CheckReport) -> String {
        let mut out = Vec::new();
        formatter.format_check(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_check_with_conflict() {
        let report = check_report(&[("plugin-a", "libX>=2.0\n"), ("plugin-b", "libX<1.0\n")]);
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let text = render_check(&formatter, &report);

        assert!(text.contains("Scanned 2 plugins (2 manifests, 2 requirements)"));
        assert!(text.contains("✗ libx"));
        assert!(text.contains("plugin-a"));
        assert!(text.contains(">=2.0"));
        assert!(text.contains("lower"));
        assert!(text.contains("plugin-a requires >=2.0 but plugin-b requires <1.0"));
        assert!(text.contains("Found 1 dependency conflict."));
    }

    #[test]
    fn test_format_check_without_conflicts() {
        let report = check_report(&[("plugin-a", "libX>=1.0\n"), ("plugin-b", "libX<=1.0\n")]);
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let text = render_check(&formatter, &report);
        assert!(text.contains("✓ No dependency conflicts detected."));
    }

    #[test]
    fn test_format_check_warnings_by_verbosity() {
        let report = check_report(&[("plugin-a", "libX>>1\nlibY\n")]);

        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let normal = render_check(&formatter, &report);
        assert!(normal.contains("1 line skipped (use --verbose to list)"));
        assert!(!normal.contains("Skipped lines:"));

        let formatter = TextFormatter::with_color(Verbosity::Verbose, false);
        let verbose = render_check(&formatter, &report);
        assert!(verbose.contains("Skipped lines:"));
        assert!(verbose.contains("plugin-a (plugin-a/requirements.txt:1)"));
    }

    #[test]
    fn test_format_check_quiet() {
        let report = check_report(&[("plugin-a", "libX>=2.0\n"), ("plugin-b", "libX<1.0\n")]);
        let text = render_check(&TextFormatter::with_color(Verbosity::Quiet, false), &report);
        assert_eq!(text, "libx: plugin-a (>=2.0), plugin-b (<1.0)\n");

        let clean = check_report(&[("plugin-a", "libX\n")]);
        let quiet = TextFormatter::with_color(Verbosity::Quiet, false);
        assert!(render_check(&quiet, &clean).is_empty());
    }

    #[test]
    fn test_format_check_with_color() {
        let report = check_report(&[("plugin-a", "libX>=2.0\n"), ("plugin-b", "libX<1.0\n")]);
        let text = render_check(&TextFormatter::new(Verbosity::Normal), &report);
        assert!(text.contains("libx"));
    }

    #[test]
    fn test_format_replace_dry_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "libX>=2.0\n").unwrap();
        let components =
            vec![crate::manifest::Component::new("plugin-a", dir.path()).with_manifest(&path)];
        let spec = ReplaceSpec::parse("libX>=2.0", "libX==2.5.1").unwrap();
        let summary = Rewriter::new(true).rewrite_all(&components, &spec);
        let report = ReplaceReport {
            spec,
            summary,
            notice: None,
        };

        let mut out = Vec::new();
        TextFormatter::with_color(Verbosity::Normal, false)
            .format_replace(&report, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(dry-run) plugin-a"));
        assert!(text.contains("1 line replaced"));
        assert!(text.contains("(dry-run) Would update 1 file (libx -> libX==2.5.1)"));
    }
}
