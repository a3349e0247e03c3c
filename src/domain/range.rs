//! Version constraint clauses and ranges
//!
//! Handles the clause operators found in requirement manifests:
//! - Exact: `==1.2.3`, prefix match `==1.2.*`
//! - Exclusion: `!=1.2.3`, `!=1.2.*`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - Compatible release: `~=1.2.3` (same as `>=1.2.3, ==1.2.*`)
//!
//! A [`Range`] is the conjunction of the clauses of one declaration.

use super::Version;
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The closed set of supported clause operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>=`
    GreaterOrEqual,
    /// `>`
    Greater,
    /// `<=`
    LessOrEqual,
    /// `<`
    Less,
    /// `~=`
    Compatible,
}

impl Operator {
    /// All supported operators
    pub const ALL: [Operator; 7] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterOrEqual,
        Operator::Greater,
        Operator::LessOrEqual,
        Operator::Less,
        Operator::Compatible,
    ];

    /// Look up an operator by its textual form
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Operator::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Textual form of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterOrEqual => ">=",
            Operator::Greater => ">",
            Operator::LessOrEqual => "<=",
            Operator::Less => "<",
            Operator::Compatible => "~=",
        }
    }

    /// Ordering-based comparison of `candidate` against `target`.
    ///
    /// `==`, `!=` and `~=` are answered here on the plain ordering only;
    /// [`Clause::matches`] layers prefix and local-label handling on top.
    pub fn compare(&self, candidate: &Version, target: &Version) -> bool {
        match self {
            Operator::Equal => candidate == target,
            Operator::NotEqual => candidate != target,
            Operator::GreaterOrEqual | Operator::Compatible => candidate >= target,
            Operator::Greater => candidate > target,
            Operator::LessOrEqual => candidate <= target,
            Operator::Less => candidate < target,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Which side of the feasible interval a bound limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundSide {
    Lower,
    Upper,
}

/// An inclusive or exclusive limit derived from a clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub side: BoundSide,
    pub version: Version,
    pub inclusive: bool,
    /// Clause the bound was derived from
    pub clause: Clause,
}

impl Bound {
    fn new(side: BoundSide, version: Version, inclusive: bool, clause: &Clause) -> Self {
        Self {
            side,
            version,
            inclusive,
            clause: clause.clone(),
        }
    }

    /// Returns true if `self` leaves strictly less room than `other` on the same side
    pub fn is_tighter_than(&self, other: &Bound) -> bool {
        let ord = self.version.cmp(&other.version);
        let ord = match self.side {
            BoundSide::Lower => ord,
            BoundSide::Upper => ord.reverse(),
        };
        match ord {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => !self.inclusive && other.inclusive,
        }
    }

    /// Returns true if no version lies above `lower` and below `upper`
    pub fn excludes(lower: &Bound, upper: &Bound) -> bool {
        match lower.version.cmp(&upper.version) {
            Ordering::Greater => true,
            Ordering::Equal => !lower.inclusive || !upper.inclusive,
            Ordering::Less => false,
        }
    }

    /// Pick the tightest bound, keeping the earliest one on ties
    pub fn tightest<I>(bounds: I) -> Option<Bound>
    where
        I: IntoIterator<Item = Bound>,
    {
        bounds.into_iter().fold(None, |best, candidate| match best {
            Some(current) if !candidate.is_tighter_than(&current) => Some(current),
            _ => Some(candidate),
        })
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match (self.side, self.inclusive) {
            (BoundSide::Lower, true) => ">=",
            (BoundSide::Lower, false) => ">",
            (BoundSide::Upper, true) => "<=",
            (BoundSide::Upper, false) => "<",
        };
        write!(f, "{}{}", symbol, self.version)
    }
}

/// One operator + version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub operator: Operator,
    pub version: Version,
    /// Trailing `.*` prefix match (only with `==` and `!=`)
    pub wildcard: bool,
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '!' | '~' | '^')
}

impl Clause {
    pub fn new(operator: Operator, version: Version) -> Self {
        Self {
            operator,
            version,
            wildcard: false,
        }
    }

    /// Parse a clause such as `>=1.2` or `!= 2.0.*`
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        let op_len = text
            .find(|c: char| !is_operator_char(c))
            .unwrap_or(text.len());
        let (op_text, rest) = text.split_at(op_len);

        let operator = Operator::from_symbol(op_text)
            .ok_or_else(|| ParseError::unsupported_operator(op_text, text))?;

        let version_text = rest.trim();
        let (version_text, wildcard) = match version_text.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (version_text, false),
        };

        if wildcard && !matches!(operator, Operator::Equal | Operator::NotEqual) {
            return Err(ParseError::malformed_version(
                rest.trim(),
                format!("prefix match is not allowed with '{}'", operator),
            ));
        }

        let version = Version::parse(version_text)?;

        if wildcard && version.has_qualifiers() {
            return Err(ParseError::malformed_version(
                rest.trim(),
                "prefix match needs a plain release",
            ));
        }
        if operator == Operator::Compatible && version.release().len() < 2 {
            return Err(ParseError::malformed_version(
                rest.trim(),
                "compatible release needs at least two release segments",
            ));
        }

        let clause = Self {
            operator,
            version,
            wildcard,
        };
        if let Some(prefix) = clause.bumped_prefix() {
            if clause.bump(prefix).is_none() {
                return Err(ParseError::malformed_version(
                    rest.trim(),
                    "release segment has no successor",
                ));
            }
        }
        Ok(clause)
    }

    /// Returns true if `candidate` satisfies this clause
    pub fn matches(&self, candidate: &Version) -> bool {
        match self.operator {
            Operator::Equal => self.equals(candidate),
            Operator::NotEqual => !self.equals(candidate),
            Operator::Compatible => {
                self.operator.compare(candidate, &self.version)
                    && candidate.starts_with_release(self.version.epoch(), self.compatible_prefix())
            }
            op => op.compare(candidate, &self.version),
        }
    }

    fn equals(&self, candidate: &Version) -> bool {
        if self.wildcard {
            candidate.starts_with_release(self.version.epoch(), self.version.release())
        } else if self.version.has_local() {
            Operator::Equal.compare(candidate, &self.version)
        } else {
            Operator::Equal.compare(&candidate.without_local(), &self.version)
        }
    }

    /// Release prefix locked by `~=`: every segment but the last
    fn compatible_prefix(&self) -> &[u64] {
        let release = self.version.release();
        &release[..release.len().saturating_sub(1)]
    }

    /// First version past the release prefix, e.g. `1.4` -> `1.5`
    ///
    /// None when the last prefix segment is already `u64::MAX`.
    fn bump(&self, prefix: &[u64]) -> Option<Version> {
        let mut release = prefix.to_vec();
        if let Some(last) = release.last_mut() {
            *last = last.checked_add(1)?;
        }
        Some(Version::from_release(self.version.epoch(), release))
    }

    /// Release prefix whose successor is the exclusive upper bound
    fn bumped_prefix(&self) -> Option<&[u64]> {
        match self.operator {
            Operator::Equal if self.wildcard => Some(self.version.release()),
            Operator::Compatible => Some(self.compatible_prefix()),
            _ => None,
        }
    }

    /// Lower bound contributed by this clause, if any
    pub fn lower_bound(&self) -> Option<Bound> {
        let (version, inclusive) = match self.operator {
            Operator::GreaterOrEqual | Operator::Equal | Operator::Compatible => {
                (self.version.clone(), true)
            }
            Operator::Greater => (self.version.clone(), false),
            Operator::LessOrEqual | Operator::Less | Operator::NotEqual => return None,
        };
        Some(Bound::new(BoundSide::Lower, version, inclusive, self))
    }

    /// Upper bound contributed by this clause, if any
    pub fn upper_bound(&self) -> Option<Bound> {
        let (version, inclusive) = match self.operator {
            Operator::Equal if self.wildcard => (self.bump(self.version.release())?, false),
            Operator::Equal | Operator::LessOrEqual => (self.version.clone(), true),
            Operator::Less => (self.version.clone(), false),
            Operator::Compatible => (self.bump(self.compatible_prefix())?, false),
            Operator::GreaterOrEqual | Operator::Greater | Operator::NotEqual => return None,
        };
        Some(Bound::new(BoundSide::Upper, version, inclusive, self))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)?;
        if self.wildcard {
            f.write_str(".*")?;
        }
        Ok(())
    }
}

/// Conjunction of clauses attached to one declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Range {
    clauses: Vec<Clause>,
}

impl Range {
    /// A range with no clauses, matching every version
    pub fn any() -> Self {
        Self::default()
    }

    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    /// Parse comma-separated clauses, e.g. `>=1.0, <2.0`
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::any());
        }

        let clauses = text
            .split(',')
            .map(|part| {
                if part.trim().is_empty() {
                    Err(ParseError::malformed_requirement(text, "empty clause"))
                } else {
                    Clause::parse(part)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns true if the range has no clauses
    pub fn is_any(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns true if `version` satisfies every clause
    pub fn contains(&self, version: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.matches(version))
    }

    /// Tightest lower bound across all clauses
    pub fn lower_bound(&self) -> Option<Bound> {
        Bound::tightest(self.clauses.iter().filter_map(Clause::lower_bound))
    }

    /// Tightest upper bound across all clauses
    pub fn upper_bound(&self) -> Option<Bound> {
        Bound::tightest(self.clauses.iter().filter_map(Clause::upper_bound))
    }

    /// Conjunction of both ranges, dropping clauses that render identically
    pub fn intersect(&self, other: &Range) -> Range {
        let mut clauses = self.clauses.clone();
        for clause in &other.clauses {
            let text = clause.to_string();
            if !clauses.iter().any(|c| c.to_string() == text) {
                clauses.push(clause.clone());
            }
        }
        Range { clauses }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        rendered.sort();
        f.write_str(&rendered.join(","))
    }
}
