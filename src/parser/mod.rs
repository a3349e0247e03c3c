//! Requirement line parser for `requirements.txt` style manifests
//!
//! Handles line formats:
//! - Bare name: `requests`
//! - Clauses: `requests>=2.28,<3`, `requests >= 2.28`, `requests (>=2.28)`
//! - Extras: `requests[socks,security]>=2.28`
//! - Environment markers: `pywin32>=300; sys_platform == "win32"`
//! - Direct references: `mylib @ https://example.com/mylib.whl` (unconstrained)
//! - Inline comments: `requests>=2.28  # http client`

use crate::domain::{Range, Requirement};
use crate::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$").unwrap());
static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?P<spec>[^;]*?)\s*(?:;\s*(?P<marker>.*?))?\s*$",
    )
    .unwrap()
});
static INLINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+#.*$").unwrap());

/// Classification of a raw manifest line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only line
    Blank,
    /// Line starting with `#`
    Comment,
    /// Anything else, trimmed
    Requirement(&'a str),
}

/// Decide whether a line should be parsed as a requirement
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with('#') {
        LineKind::Comment
    } else {
        LineKind::Requirement(trimmed)
    }
}

/// Returns true if the text contains a clause operator character
pub fn has_operator(text: &str) -> bool {
    text.contains(['<', '>', '=', '!', '~'])
}

/// Parse one requirement line declared by `owner`
pub fn parse_requirement(line: &str, owner: &str) -> Result<Requirement, ParseError> {
    let raw = line.trim();
    let content = INLINE_COMMENT_RE.replace(raw, "");
    let content = content.trim();

    if content.is_empty() {
        return Err(ParseError::malformed_requirement(raw, "empty requirement"));
    }
    if content.starts_with('-') {
        return Err(ParseError::malformed_requirement(
            raw,
            "pip options are not requirements",
        ));
    }

    let caps = REQUIREMENT_RE
        .captures(content)
        .ok_or_else(|| ParseError::malformed_requirement(raw, "missing dependency name"))?;

    let name = &caps["name"];
    let extras = match caps.name("extras") {
        Some(m) => parse_extras(m.as_str(), raw)?,
        None => Vec::new(),
    };

    let spec = caps.name("spec").map(|m| m.as_str().trim()).unwrap_or("");
    let range = if spec.starts_with('@') {
        // Direct reference: no version constraint to compare
        Range::any()
    } else {
        let spec = spec
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(spec);
        Range::parse(spec)?
    };

    let mut requirement = Requirement::new(name, range, owner, raw).with_extras(extras);
    if let Some(marker) = caps.name("marker") {
        let marker = marker.as_str().trim();
        if marker.is_empty() {
            return Err(ParseError::malformed_requirement(raw, "empty environment marker"));
        }
        requirement = requirement.with_marker(marker);
    }

    Ok(requirement)
}

fn parse_extras(text: &str, raw: &str) -> Result<Vec<String>, ParseError> {
    text.split(',')
        .map(str::trim)
        .filter(|extra| !extra.is_empty())
        .map(|extra| {
            if NAME_RE.is_match(extra) {
                Ok(extra.to_lowercase())
            } else {
                Err(ParseError::malformed_requirement(
                    raw,
                    format!("invalid extra '{}'", extra),
                ))
            }
        })
        .collect()
}
