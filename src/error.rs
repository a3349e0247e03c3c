//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ParseError: a single requirement line or clause could not be parsed
//! - ManifestError: a manifest file could not be read or written
//! - ConfigError: invalid root directory, config file, or replace arguments
//! - ReportError: conflict report files could not be written

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Requirement parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Report file related errors
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Console output or input failed
    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while parsing one requirement line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The version part of a clause is not a valid version
    #[error("malformed version '{version}': {reason}")]
    MalformedVersion { version: String, reason: String },

    /// The clause uses an operator outside the supported set
    #[error("unsupported operator '{operator}' in clause '{clause}'")]
    UnsupportedOperator { operator: String, clause: String },

    /// The line is not shaped like a requirement at all
    #[error("malformed requirement '{line}': {reason}")]
    MalformedRequirement { line: String, reason: String },
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to configuration and operation arguments
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Root directory does not exist
    #[error("plugin directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Root path exists but is not a directory
    #[error("plugin path is not a directory: {path}")]
    RootNotDirectory { path: PathBuf },

    /// depconflict.toml could not be read or parsed
    #[error("invalid config file {path}: {message}")]
    InvalidConfigFile { path: PathBuf, message: String },

    /// The old or new dependency text of a replace operation is invalid
    #[error("invalid dependency '{spec}': {source}")]
    InvalidReplaceSpec {
        spec: String,
        #[source]
        source: ParseError,
    },

    /// A replace argument was empty
    #[error("dependency information must not be empty")]
    EmptyReplaceSpec,
}

/// Errors raised while writing conflict report files
#[derive(Error, Debug)]
pub enum ReportError {
    /// Report directory could not be created
    #[error("failed to create report directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report file could not be written
    #[error("failed to write report file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ParseError {
    /// Creates a new MalformedVersion error
    pub fn malformed_version(version: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::MalformedVersion {
            version: version.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new UnsupportedOperator error
    pub fn unsupported_operator(operator: impl Into<String>, clause: impl Into<String>) -> Self {
        ParseError::UnsupportedOperator {
            operator: operator.into(),
            clause: clause.into(),
        }
    }

    /// Creates a new MalformedRequirement error
    pub fn malformed_requirement(line: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::MalformedRequirement {
            line: line.into(),
            reason: reason.into(),
        }
    }
}

impl ManifestError {
    /// Creates a new Unreadable error
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::Unreadable {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Unwritable error
    pub fn unwritable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::Unwritable {
            path: path.into(),
            source,
        }
    }

    /// Path of the manifest the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            ManifestError::Unreadable { path, .. } | ManifestError::Unwritable { path, .. } => path,
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidConfigFile error
    pub fn invalid_config_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidConfigFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidReplaceSpec error
    pub fn invalid_replace_spec(spec: impl Into<String>, source: ParseError) -> Self {
        ConfigError::InvalidReplaceSpec {
            spec: spec.into(),
            source,
        }
    }
}
