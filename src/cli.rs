//! CLI argument parsing module for depconflict

use crate::config::Overrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Plugin dependency conflict checker
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depconflict",
    version,
    about = "Detect and fix version constraint conflicts across plugin requirement manifests"
)]
pub struct CliArgs {
    /// Plugin root directory (one subdirectory per plugin)
    pub path: PathBuf,

    /// Operation to run; without one an interactive menu starts
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Manifest file name looked up in each plugin directory
    #[arg(long, global = true, value_name = "NAME")]
    pub manifest_name: Option<String>,

    /// Directory the conflict report files are written to
    #[arg(long, global = true, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Do not write conflict report files
    #[arg(long, global = true)]
    pub no_report: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - conflicts and errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Operations on the plugin root
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Detect conflicting version ranges across plugins
    #[command(alias = "1")]
    Check,

    /// Replace a dependency line in every plugin manifest
    #[command(alias = "2")]
    Replace {
        /// Dependency to replace: a name, optionally with its exact range (e.g. "libX>=2.0")
        old: String,

        /// Full replacement line (e.g. "libX==2.5.1")
        new: String,

        /// Dry run mode - show what would change without writing files
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

impl CliArgs {
    /// Settings that override depconflict.toml
    pub fn overrides(&self) -> Overrides {
        Overrides {
            manifest_name: self.manifest_name.clone(),
            report_dir: self.report_dir.clone(),
            no_report: self.no_report,
        }
    }

    /// Default log filter when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
