//! Parsed dependency declarations

use super::Range;
use std::fmt;

/// One parsed manifest line, owned by the component it came from.
///
/// Fields are private so a requirement cannot change after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    name: String,
    range: Range,
    owner: String,
    raw: String,
    extras: Vec<String>,
    marker: Option<String>,
    line: Option<usize>,
}

impl Requirement {
    /// Creates a new requirement; the name is lowercased
    pub fn new(
        name: impl AsRef<str>,
        range: Range,
        owner: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            name: name.as_ref().to_lowercase(),
            range,
            owner: owner.into(),
            raw: raw.into(),
            extras: Vec::new(),
            marker: None,
            line: None,
        }
    }

    /// Sets the requested extras (builder pattern)
    pub fn with_extras(mut self, extras: Vec<String>) -> Self {
        self.extras = extras;
        self
    }

    /// Sets the environment marker (builder pattern)
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Sets the 1-based manifest line number (builder pattern)
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Normalized (lowercase) dependency name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    /// Component that declared this requirement
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The manifest line as written
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        write!(f, "{}", self.range)?;
        if let Some(ref marker) = self.marker {
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}
