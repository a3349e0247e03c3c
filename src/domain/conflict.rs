//! Conflict records produced by the detector

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the infeasibility an owner is responsible for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSide {
    /// The owner's lower bound is above the others' upper bound
    Lower,
    /// The owner's upper bound is below the others' lower bound
    Upper,
    /// The owner's own bounds conflict on both sides
    Both,
}

impl ConflictSide {
    pub fn label(&self) -> &'static str {
        match self {
            ConflictSide::Lower => "lower",
            ConflictSide::Upper => "upper",
            ConflictSide::Both => "both",
        }
    }
}

/// One responsible owner and the range it declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictEntry {
    pub owner: String,
    /// All clauses the owner declared for the dependency
    pub range_text: String,
    pub side: ConflictSide,
}

/// The winning bound on one side and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundOrigin {
    pub owner: String,
    /// Effective bound, e.g. `>=2.0` or `<1.5`
    pub bound: String,
    /// Clause that produced the bound, e.g. `~=1.4.2`
    pub clause: String,
}

/// A dependency whose declared ranges cannot all be satisfied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub dependency_name: String,
    pub entries: Vec<ConflictEntry>,
    pub lower: BoundOrigin,
    pub upper: BoundOrigin,
}

impl Conflict {
    /// Owners responsible for the conflict, in scan order
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.owner.as_str())
    }

    /// One-line explanation of why the ranges do not overlap
    pub fn describe(&self) -> String {
        format!(
            "{} requires {} but {} requires {}",
            self.lower.owner, self.lower.bound, self.upper.owner, self.upper.bound
        )
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{} ({})", e.owner, e.range_text))
            .collect();
        write!(f, "{}: {}", self.dependency_name, entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_conflict() -> Conflict {
        Conflict {
            dependency_name: "libx".to_string(),
            entries: vec![
                ConflictEntry {
                    owner: "plugin-a".to_string(),
                    range_text: ">=2.0".to_string(),
                    side: ConflictSide::Lower,
                },
                ConflictEntry {
                    owner: "plugin-b".to_string(),
                    range_text: "<1.0".to_string(),
                    side: ConflictSide::Upper,
                },
            ],
            lower: BoundOrigin {
                owner: "plugin-a".to_string(),
                bound: ">=2.0".to_string(),
                clause: ">=2.0".to_string(),
            },
            upper: BoundOrigin {
                owner: "plugin-b".to_string(),
                bound: "<1.0".to_string(),
                clause: "<1.0".to_string(),
            },
        }
    }

    #[test]
    fn test_conflict_owners() {
        let conflict = sample_conflict();
        let owners: Vec<_> = conflict.owners().collect();
        assert_eq!(owners, vec!["plugin-a", "plugin-b"]);
    }

    #[test]
    fn test_conflict_describe() {
        assert_eq!(
            sample_conflict().describe(),
            "plugin-a requires >=2.0 but plugin-b requires <1.0"
        );
    }

    #[test]
    fn test_conflict_display() {
        assert_eq!(
            sample_conflict().to_string(),
            "libx: plugin-a (>=2.0), plugin-b (<1.0)"
        );
    }

    #[test]
    fn test_serde_conflict_side() {
        let json = serde_json::to_string(&ConflictSide::Both).unwrap();
        assert_eq!(json, "\"both\"");
    }

    #[test]
    fn test_serde_conflict() {
        let conflict = sample_conflict();
        let json = serde_json::to_string(&conflict).unwrap();
        let parsed: Conflict = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, conflict);
    }
}
