//! depconflict - plugin dependency conflict checker CLI tool
//!
//! Scans every plugin's requirements manifest under a root directory and
//! reports dependencies whose declared version ranges cannot all be met.
//! It can also replace a dependency line across every plugin at once.

use clap::Parser;
use depconflict::cli::{CliArgs, Command};
use depconflict::commands::{check_command, replace_command};
use depconflict::config::Config;
use depconflict::interactive::run_interactive;
use depconflict::output::OutputConfig;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when a check found conflicts
const EXIT_CONFLICTS: u8 = 1;

/// Exit code for fatal errors
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .with_writer(io::stderr)
        .init();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(&args.path, &args.overrides())?;
    let output = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.no_color);

    if args.verbose {
        eprintln!("depconflict v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Root: {}", config.root.display());
        eprintln!("Manifest: {}", config.manifest_name);
    }

    let mut stdout = io::stdout().lock();
    match args.command {
        Some(Command::Check) => {
            let outcome = check_command(&config, output, &mut stdout)?;
            if outcome.has_conflicts() {
                Ok(ExitCode::from(EXIT_CONFLICTS))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Some(Command::Replace { old, new, dry_run }) => {
            replace_command(&config, output, &old, &new, dry_run, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            run_interactive(&config, output, io::stdin().lock(), &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
