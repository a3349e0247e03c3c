//! Interactive menu
//!
//! Reads choices from any `BufRead` and writes to any `Write`, so the loop
//! runs the same against a terminal or an in-memory script. A failing
//! command is reported and the session continues; only the configuration
//! is kept between commands.

use crate::commands::{check_command, replace_command};
use crate::config::Config;
use crate::error::AppError;
use crate::output::OutputConfig;
use std::io::{BufRead, Write};

const MENU: &str = "\
Plugin dependency manager
  1. Check dependency conflicts
  2. Replace a dependency in all plugins
  0. Exit";

/// A menu entry chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Check,
    Replace,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "check" => Some(Choice::Check),
            "2" | "replace" => Some(Choice::Replace),
            "0" | "q" | "quit" | "exit" => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// Print `label` and read one trimmed line; `None` at end of input
fn prompt<R: BufRead>(
    input: &mut R,
    output: &mut dyn Write,
    label: &str,
) -> std::io::Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn run_replace<R: BufRead>(
    config: &Config,
    output_config: OutputConfig,
    input: &mut R,
    output: &mut dyn Write,
) -> Result<(), AppError> {
    let Some(old) = prompt(input, output, "Dependency to replace (e.g. libX>=2.0): ")? else {
        return Ok(());
    };
    let Some(new) = prompt(input, output, "Replacement line (e.g. libX==2.5.1): ")? else {
        return Ok(());
    };
    replace_command(config, output_config, &old, &new, false, output)?;
    Ok(())
}

/// Run the menu loop until the user exits or input ends
pub fn run_interactive<R: BufRead>(
    config: &Config,
    output_config: OutputConfig,
    mut input: R,
    output: &mut dyn Write,
) -> std::io::Result<()> {
    loop {
        writeln!(output, "{}", MENU)?;
        let Some(line) = prompt(&mut input, output, "Select an option: ")? else {
            writeln!(output)?;
            return Ok(());
        };

        let result = match Choice::parse(&line) {
            Some(Choice::Check) => check_command(config, output_config, output).map(|_| ()),
            Some(Choice::Replace) => run_replace(config, output_config, &mut input, output),
            Some(Choice::Exit) => return Ok(()),
            None => {
                writeln!(output, "Invalid option '{}', please enter 1, 2 or 0.", line)?;
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::error!("command failed: {}", e);
            writeln!(output, "Error: {}", e)?;
        }
        writeln!(output)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    fn plugin(root: &Path, name: &str, content: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("requirements.txt"), content).unwrap();
    }

    fn session(config: &Config, script: &str) -> String {
        let mut out = Vec::new();
        run_interactive(
            config,
            OutputConfig::from_cli(false, false, false, true),
            Cursor::new(script.to_string()),
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn config(root: &Path) -> Config {
        let mut config = Config::new(root);
        config.write_report = false;
        config
    }

    #[test]
    fn test_choice_parse() {
        assert_eq!(Choice::parse(" 1 "), Some(Choice::Check));
        assert_eq!(Choice::parse("Replace"), Some(Choice::Replace));
        assert_eq!(Choice::parse("0"), Some(Choice::Exit));
        assert_eq!(Choice::parse("7"), None);
    }

    #[test]
    fn test_exit_immediately() {
        let root = TempDir::new().unwrap();
        let text = session(&config(root.path()), "0\n");
        assert!(text.contains("1. Check dependency conflicts"));
        assert!(!text.contains("Scanned"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let root = TempDir::new().unwrap();
        let text = session(&config(root.path()), "");
        assert!(text.contains("Select an option"));
    }

    #[test]
    fn test_check_then_exit() {
        let root = TempDir::new().unwrap();
        plugin(root.path(), "a", "libX>=2.0\n");
        plugin(root.path(), "b", "libX<1.0\n");
        let text = session(&config(root.path()), "1\n0\n");
        assert!(text.contains("Found 1 dependency conflict."));
    }

    #[test]
    fn test_replace_then_check() {
        let root = TempDir::new().unwrap();
        plugin(root.path(), "a", "libX>=2.0\n");
        plugin(root.path(), "b", "libX<1.0\n");
        let text = session(&config(root.path()), "2\nlibX<1.0\nlibX>=2.0\n1\n0\n");
        assert!(text.contains("Updated 1 file"));
        assert!(text.contains("No dependency conflicts detected."));
    }

    #[test]
    fn test_failed_command_keeps_session() {
        let root = TempDir::new().unwrap();
        let text = session(&config(root.path()), "2\nlibX>>1\nlibX==1\n9\n0\n");
        assert!(text.contains("Error: invalid dependency 'libX>>1'"));
        assert!(text.contains("Invalid option '9'"));
    }
}
