//! Run configuration
//!
//! Reads settings from (in priority order):
//! - CLI flags (--manifest-name, --report-dir, --no-report)
//! - depconflict.toml in the plugin root directory
//! - built-in defaults
//!
//! A relative `report_dir` from depconflict.toml is resolved against the plugin
//! root. The built-in default and the `--report-dir` flag stay relative to the
//! working directory.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Manifest file looked up in every component directory
pub const DEFAULT_MANIFEST_NAME: &str = "requirements.txt";

/// Directory the conflict report files are written to
pub const DEFAULT_REPORT_DIR: &str = "output";

/// Optional per-root configuration file
pub const CONFIG_FILE_NAME: &str = "depconflict.toml";

/// Settings read from depconflict.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub manifest_name: Option<String>,
    /// Relative paths are resolved against the plugin root
    pub report_dir: Option<PathBuf>,
    pub write_report: Option<bool>,
}

impl FileConfig {
    /// Read depconflict.toml from `root`; a missing file yields the defaults
    pub fn from_dir(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::invalid_config_file(&path, e.to_string()))?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_config_file(&path, e.to_string()))
    }
}

/// CLI-level overrides applied on top of the file configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub manifest_name: Option<String>,
    pub report_dir: Option<PathBuf>,
    pub no_report: bool,
}

/// Effective configuration of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one subdirectory per component
    pub root: PathBuf,
    pub manifest_name: String,
    pub report_dir: PathBuf,
    pub write_report: bool,
}

impl Config {
    /// Configuration with defaults for `root`, without touching the file system
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            write_report: true,
        }
    }

    /// Validate the root directory and merge depconflict.toml with CLI overrides
    pub fn load(root: impl Into<PathBuf>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let root = root.into();
        validate_root(&root)?;

        let file = FileConfig::from_dir(&root)?;
        let mut config = Self::new(&root);

        if let Some(name) = file.manifest_name {
            config.manifest_name = name;
        }
        if let Some(dir) = file.report_dir {
            config.report_dir = resolve_report_dir(&root, dir);
        }
        if let Some(write) = file.write_report {
            config.write_report = write;
        }

        if let Some(ref name) = overrides.manifest_name {
            config.manifest_name = name.clone();
        }
        if let Some(ref dir) = overrides.report_dir {
            config.report_dir = dir.clone();
        }
        if overrides.no_report {
            config.write_report = false;
        }

        Ok(config)
    }
}

fn resolve_report_dir(root: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        dir
    } else {
        root.join(dir)
    }
}

/// Ensure the plugin root exists and is a directory
pub fn validate_root(root: &Path) -> Result<(), ConfigError> {
    if !root.exists() {
        return Err(ConfigError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ConfigError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}
