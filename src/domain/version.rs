//! Version parsing and ordering for requirement manifests
//!
//! Versions follow the PEP 440 shape used by `requirements.txt` files:
//! - Epoch: `1!2.0`
//! - Release segments: `1.2.3` (missing trailing segments compare as zero)
//! - Pre-release: `1.0a1`, `1.0b2`, `1.0rc1` (sorts before `1.0`)
//! - Post-release: `1.0.post1`, `1.0-1` (sorts after `1.0`)
//! - Dev-release: `1.0.dev1` (sorts before any pre-release of `1.0`)
//! - Local label: `1.0+ubuntu.1` (sorts after `1.0`)

use crate::error::ParseError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^
        v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?:[-_.]?(?P<pre_l>alpha|beta|preview|pre|rc|a|b|c)[-_.]?(?P<pre_n>[0-9]+)?)?
        (?:-(?P<post_n1>[0-9]+)|[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n2>[0-9]+)?)?
        (?:[-_.]?(?P<dev_l>dev)[-_.]?(?P<dev_n>[0-9]+)?)?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        $",
    )
    .unwrap()
});

/// Pre-release phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreRelease {
    Alpha,
    Beta,
    Rc,
}

impl PreRelease {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreRelease::Alpha,
            "b" | "beta" => PreRelease::Beta,
            _ => PreRelease::Rc,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PreRelease::Alpha => "a",
            PreRelease::Beta => "b",
            PreRelease::Rc => "rc",
        }
    }
}

/// One dot-separated piece of a local version label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LocalSegment {
    // Variant order matters: text segments sort before numeric ones.
    Text(String),
    Number(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Text(s) => write!(f, "{}", s),
            LocalSegment::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Sort key for the pre-release position of a version
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    DevOnly,
    Pre(PreRelease, u64),
    Final,
}

/// A parsed, totally ordered version
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreRelease, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<Vec<LocalSegment>>,
}

fn parse_number(text: &str, raw: &str) -> Result<u64, ParseError> {
    text.parse().map_err(|_| {
        ParseError::malformed_version(raw, format!("number '{}' out of range", text))
    })
}

impl Version {
    /// Parse a version string
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let raw = text.trim();
        if raw.is_empty() {
            return Err(ParseError::malformed_version(raw, "empty version"));
        }

        let caps = VERSION_RE
            .captures(raw)
            .ok_or_else(|| ParseError::malformed_version(raw, "not a valid version"))?;

        let epoch = match caps.name("epoch") {
            Some(m) => parse_number(m.as_str(), raw)?,
            None => 0,
        };

        let release = caps["release"]
            .split('.')
            .map(|segment| parse_number(segment, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match caps.name("pre_l") {
            Some(label) => {
                let number = match caps.name("pre_n") {
                    Some(m) => parse_number(m.as_str(), raw)?,
                    None => 0,
                };
                Some((PreRelease::from_label(label.as_str()), number))
            }
            None => None,
        };

        let post = if let Some(m) = caps.name("post_n1") {
            Some(parse_number(m.as_str(), raw)?)
        } else if caps.name("post_l").is_some() {
            match caps.name("post_n2") {
                Some(m) => Some(parse_number(m.as_str(), raw)?),
                None => Some(0),
            }
        } else {
            None
        };

        let dev = match caps.name("dev_l") {
            Some(_) => match caps.name("dev_n") {
                Some(m) => Some(parse_number(m.as_str(), raw)?),
                None => Some(0),
            },
            None => None,
        };

        let local = caps.name("local").map(|m| {
            m.as_str()
                .split(['.', '-', '_'])
                .map(|segment| match segment.parse::<u64>() {
                    Ok(n) => LocalSegment::Number(n),
                    Err(_) => LocalSegment::Text(segment.to_ascii_lowercase()),
                })
                .collect()
        });

        Ok(Self {
            raw: raw.to_string(),
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Build a plain release version such as `2.0` from its segments
    pub fn from_release(epoch: u64, release: Vec<u64>) -> Self {
        let mut raw = String::new();
        if epoch != 0 {
            raw.push_str(&format!("{}!", epoch));
        }
        let segments: Vec<String> = release.iter().map(|n| n.to_string()).collect();
        raw.push_str(&segments.join("."));
        Self {
            raw,
            epoch,
            release,
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Release segments exactly as written (no zero padding)
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// Returns true for pre-releases and dev-releases
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Returns true if the version carries pre, post, dev or local qualifiers
    pub fn has_qualifiers(&self) -> bool {
        self.pre.is_some() || self.post.is_some() || self.dev.is_some() || self.local.is_some()
    }

    pub fn has_local(&self) -> bool {
        self.local.is_some()
    }

    /// The same version with its local label removed
    pub fn without_local(&self) -> Self {
        let mut version = self.clone();
        if let Some(idx) = version.raw.find('+') {
            version.raw.truncate(idx);
        }
        version.local = None;
        version
    }

    /// Release segment at `index`, zero when the version is shorter
    pub fn segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    /// Returns true if the release segments start with `prefix` (zero padded)
    pub fn starts_with_release(&self, epoch: u64, prefix: &[u64]) -> bool {
        self.epoch == epoch
            && prefix
                .iter()
                .enumerate()
                .all(|(i, segment)| self.segment(i) == *segment)
    }

    /// Canonical spelling. Two equal versions always share it.
    pub fn normalized(&self) -> String {
        let mut out = String::new();
        if self.epoch != 0 {
            out.push_str(&format!("{}!", self.epoch));
        }

        let significant = self
            .release
            .iter()
            .rposition(|n| *n != 0)
            .map(|idx| idx + 1)
            .unwrap_or(1);
        let release: Vec<String> = self.release[..significant]
            .iter()
            .map(|n| n.to_string())
            .collect();
        out.push_str(&release.join("."));

        if let Some((phase, n)) = self.pre {
            out.push_str(&format!("{}{}", phase.label(), n));
        }
        if let Some(n) = self.post {
            out.push_str(&format!(".post{}", n));
        }
        if let Some(n) = self.dev {
            out.push_str(&format!(".dev{}", n));
        }
        if let Some(ref local) = self.local {
            let segments: Vec<String> = local.iter().map(|s| s.to_string()).collect();
            out.push('+');
            out.push_str(&segments.join("."));
        }
        out
    }

    fn pre_key(&self) -> PreKey {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => PreKey::DevOnly,
            (Some((phase, n)), _, _) => PreKey::Pre(phase, n),
            _ => PreKey::Final,
        }
    }

    fn dev_key(&self) -> (u8, u64) {
        match self.dev {
            Some(n) => (0, n),
            None => (1, 0),
        }
    }

    fn cmp_release(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.cmp_release(other))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    #[test]
    fn test_parse_release() {
        let version = v("1.2.3");
        assert_eq!(version.release(), &[1, 2, 3]);
        assert_eq!(version.epoch(), 0);
        assert!(!version.is_prerelease());
        assert_eq!(version.to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_trims_whitespace_and_v_prefix() {
        assert_eq!(v("  v2.0 "), v("2.0"));
        assert_eq!(v("  2.0 ").to_string(), "2.0");
    }

    #[test]
    fn test_missing_segments_are_zero() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
        assert!(v("1.0.1") > v("1.0"));
    }

    #[test]
    fn test_segments_compare_numerically() {
        assert!(v("1.10") > v("1.9"));
        assert!(v("2.0") > v("1.99.99"));
    }

    #[test]
    fn test_prerelease_before_release() {
        assert!(v("1.0a1") < v("1.0"));
        assert!(v("1.0a1") < v("1.0b1"));
        assert!(v("1.0b2") < v("1.0rc1"));
        assert!(v("1.0rc1") < v("1.0"));
        assert!(v("1.0") < v("1.0.1a1"));
    }

    #[test]
    fn test_prerelease_spellings() {
        assert_eq!(v("1.0alpha1"), v("1.0a1"));
        assert_eq!(v("1.0-beta.2"), v("1.0b2"));
        assert_eq!(v("1.0c1"), v("1.0rc1"));
        assert_eq!(v("1.0RC1"), v("1.0rc1"));
    }

    #[test]
    fn test_dev_and_post_ordering() {
        assert!(v("1.0.dev1") < v("1.0a1"));
        assert!(v("1.0a1.dev1") < v("1.0a1"));
        assert!(v("1.0") < v("1.0.post1"));
        assert_eq!(v("1.0-1"), v("1.0.post1"));
        assert!(v("1.0.post1") < v("1.0.1"));
    }

    #[test]
    fn test_local_label_after_release() {
        assert!(v("1.0") < v("1.0+local"));
        assert!(v("1.0+abc") < v("1.0+1"));
        assert!(v("1.0+1") < v("1.0+1.1"));
        assert_eq!(v("1.0+local").without_local(), v("1.0"));
        assert_eq!(v("1.0+local").without_local().to_string(), "1.0");
    }

    #[test]
    fn test_epoch_dominates() {
        assert!(v("1!1.0") > v("2024.1"));
    }

    #[test]
    fn test_equal_versions_share_normalized_form() {
        assert_eq!(v("1.0").normalized(), v("1.0.0").normalized());
        assert_eq!(v("1.0alpha1").normalized(), "1a1");
        assert_eq!(v("1.2-1").normalized(), "1.2.post1");
        assert_eq!(v("1!0.0.dev").normalized(), "1!0.dev0");
        assert_eq!(v("1.0+Ubuntu-1").normalized(), "1+ubuntu.1");
    }

    #[test]
    fn test_parse_malformed() {
        for bad in ["", "abc", "1.x", "1..0", "==1.0", "1.0-", "1.0+"] {
            let err = Version::parse(bad).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedVersion { .. }),
                "expected MalformedVersion for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_number_overflow() {
        assert!(Version::parse("99999999999999999999999.0").is_err());
    }

    #[test]
    fn test_from_release() {
        let version = Version::from_release(0, vec![2, 0]);
        assert_eq!(version.to_string(), "2.0");
        assert_eq!(version, v("2"));
        assert_eq!(Version::from_release(1, vec![3]).to_string(), "1!3");
    }

    #[test]
    fn test_starts_with_release() {
        assert!(v("1.4.2").starts_with_release(0, &[1, 4]));
        assert!(v("1").starts_with_release(0, &[1, 0]));
        assert!(!v("1.5").starts_with_release(0, &[1, 4]));
        assert!(!v("1!1.4").starts_with_release(0, &[1, 4]));
    }

    #[test]
    fn test_from_str() {
        let version: Version = "3.1".parse().unwrap();
        assert_eq!(version, v("3.1.0"));
    }
}
