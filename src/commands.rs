//! Command handlers shared by the one-shot CLI and the interactive menu

use crate::config::Config;
use crate::error::AppError;
use crate::orchestrator::{CheckReport, Orchestrator, ReplaceReport};
use crate::output::{
    create_formatter, write_reports, OutputConfig, OutputFormat, ReportPaths, Verbosity,
};
use std::io::Write;

/// What a check produced
#[derive(Debug)]
pub struct CheckOutcome {
    pub report: CheckReport,
    /// Report files, when writing them is enabled
    pub report_paths: Option<ReportPaths>,
}

impl CheckOutcome {
    pub fn has_conflicts(&self) -> bool {
        self.report.has_conflicts()
    }
}

/// Run a check, print the result, and write the report files
pub fn check_command(
    config: &Config,
    output: OutputConfig,
    writer: &mut dyn Write,
) -> Result<CheckOutcome, AppError> {
    let orchestrator = Orchestrator::new(config.clone()).with_progress(output.show_progress());
    let report = orchestrator.check()?;

    create_formatter(output).format_check(&report, writer)?;

    let report_paths = if config.write_report {
        let paths = write_reports(&report.conflicts, &config.report_dir)?;
        if output.format == OutputFormat::Text && output.verbosity != Verbosity::Quiet {
            writeln!(writer, "Report written to {}", paths.markdown.display())?;
        }
        Some(paths)
    } else {
        None
    };
    writer.flush()?;

    Ok(CheckOutcome {
        report,
        report_paths,
    })
}

/// Run a replace and print the result
pub fn replace_command(
    config: &Config,
    output: OutputConfig,
    old: &str,
    new: &str,
    dry_run: bool,
    writer: &mut dyn Write,
) -> Result<ReplaceReport, AppError> {
    let orchestrator = Orchestrator::new(config.clone()).with_progress(output.show_progress());
    let report = orchestrator.replace(old, new, dry_run)?;

    create_formatter(output).format_replace(&report, writer)?;
    writer.flush()?;
    Ok(report)
}
