//! Constraint conflict detection
//!
//! For every dependency declared by two or more owners, the detector reduces
//! each owner's clauses to an effective lower and upper bound, takes the
//! tightest of those across owners, and reports a conflict when the
//! resulting interval is empty.
//!
//! `!=` clauses never act as bounds, so an interval that is non-empty but
//! fully covered by exclusions is not reported.

use super::RequirementIndex;
use crate::domain::{
    Bound, BoundOrigin, Conflict, ConflictEntry, ConflictSide, Range, Requirement,
};
use tracing::{debug, info};

/// Effective bounds of one owner for one dependency
#[derive(Debug)]
struct OwnerBounds<'a> {
    owner: &'a str,
    range: Range,
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl<'a> OwnerBounds<'a> {
    fn new(owner: &'a str) -> Self {
        Self {
            owner,
            range: Range::any(),
            lower: None,
            upper: None,
        }
    }
}

/// Partition requirements by owner (first-appearance order) and merge ranges
fn owner_bounds(requirements: &[Requirement]) -> Vec<OwnerBounds<'_>> {
    let mut owners: Vec<OwnerBounds<'_>> = Vec::new();
    for req in requirements {
        let pos = match owners.iter().position(|o| o.owner == req.owner()) {
            Some(pos) => pos,
            None => {
                owners.push(OwnerBounds::new(req.owner()));
                owners.len() - 1
            }
        };
        let entry = &mut owners[pos];
        entry.range = entry.range.intersect(req.range());
    }

    for entry in &mut owners {
        entry.lower = entry.range.lower_bound();
        entry.upper = entry.range.upper_bound();
    }
    owners
}

/// Tightest bound across owners together with the owner that set it
fn winning_bound<'a, F>(owners: &'a [OwnerBounds<'a>], pick: F) -> Option<(&'a str, Bound)>
where
    F: Fn(&'a OwnerBounds<'a>) -> Option<&'a Bound>,
{
    let mut best: Option<(&str, &Bound)> = None;
    for owner in owners {
        if let Some(bound) = pick(owner) {
            match best {
                Some((_, current)) if !bound.is_tighter_than(current) => {}
                _ => best = Some((owner.owner, bound)),
            }
        }
    }
    best.map(|(owner, bound)| (owner, bound.clone()))
}

fn origin(owner: &str, bound: &Bound) -> BoundOrigin {
    BoundOrigin {
        owner: owner.to_string(),
        bound: bound.to_string(),
        clause: bound.clause.to_string(),
    }
}

/// Detects infeasible version ranges across owners
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    pub fn new() -> Self {
        Self
    }

    /// Check every name group, in index order
    pub fn detect(&self, index: &RequirementIndex) -> Vec<Conflict> {
        let conflicts: Vec<Conflict> = index
            .iter()
            .filter_map(|(name, requirements)| self.check_group(name, requirements))
            .collect();
        info!(
            dependencies = index.len(),
            conflicts = conflicts.len(),
            "conflict detection finished"
        );
        conflicts
    }

    /// Check all requirements declared for one dependency name
    pub fn check_group(&self, name: &str, requirements: &[Requirement]) -> Option<Conflict> {
        let owners = owner_bounds(requirements);
        if owners.len() < 2 {
            return None;
        }

        let (lower_owner, lower) = winning_bound(&owners, |o| o.lower.as_ref())?;
        let (upper_owner, upper) = winning_bound(&owners, |o| o.upper.as_ref())?;

        if !Bound::excludes(&lower, &upper) {
            debug!(dependency = name, %lower, %upper, "ranges overlap");
            return None;
        }

        let entries: Vec<ConflictEntry> = owners
            .iter()
            .filter_map(|o| {
                let below = o.lower.as_ref().is_some_and(|b| Bound::excludes(b, &upper));
                let above = o.upper.as_ref().is_some_and(|b| Bound::excludes(&lower, b));
                let side = match (below, above) {
                    (true, true) => ConflictSide::Both,
                    (true, false) => ConflictSide::Lower,
                    (false, true) => ConflictSide::Upper,
                    (false, false) => return None,
                };
                Some(ConflictEntry {
                    owner: o.owner.to_string(),
                    range_text: o.range.to_string(),
                    side,
                })
            })
            .collect();

        info!(
            dependency = name,
            %lower,
            %upper,
            owners = entries.len(),
            "conflicting version ranges"
        );

        Some(Conflict {
            dependency_name: name.to_string(),
            entries,
            lower: origin(lower_owner, &lower),
            upper: origin(upper_owner, &upper),
        })
    }
}

/// Build an index and detect conflicts in one step
pub fn detect_conflicts<I>(requirements: I) -> Vec<Conflict>
where
    I: IntoIterator<Item = Requirement>,
{
    ConflictDetector::new().detect(&RequirementIndex::build(requirements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_requirement;

    fn req(line: &str, owner: &str) -> Requirement {
        parse_requirement(line, owner).unwrap()
    }

    fn detect(reqs: &[(&str, &str)]) -> Vec<Conflict> {
        detect_conflicts(reqs.iter().map(|(owner, line)| req(line, owner)))
    }

    fn owners(conflict: &Conflict) -> Vec<&str> {
        conflict.owners().collect()
    }

    #[test]
    fn test_disjoint_ranges_conflict() {
        let conflicts = detect(&[("A", "libX>=2.0"), ("B", "libX<1.0")]);
        assert_eq!(conflicts.len(), 1);
        let conflict = &conflicts[0];
        assert_eq!(conflict.dependency_name, "libx");
        assert_eq!(owners(conflict), vec!["A", "B"]);
        assert_eq!(conflict.entries[0].side, ConflictSide::Lower);
        assert_eq!(conflict.entries[1].side, ConflictSide::Upper);
        assert_eq!(conflict.lower.bound, ">=2.0");
        assert_eq!(conflict.upper.bound, "<1.0");
    }

    #[test]
    fn test_inclusive_touching_bounds_do_not_conflict() {
        assert!(detect(&[("A", "libX>=1.0"), ("B", "libX<=1.0")]).is_empty());
    }

    #[test]
    fn test_exclusive_touching_bounds_conflict() {
        let conflicts = detect(&[("A", "libX>1.0"), ("B", "libX<=1.0")]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(owners(&conflicts[0]), vec!["A", "B"]);

        let conflicts = detect(&[("A", "libX>=1.0"), ("B", "libX<1.0")]);
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn test_single_owner_is_never_a_conflict() {
        assert!(detect(&[("A", "libX>3"), ("A", "libX<1")]).is_empty());
        assert!(detect(&[("A", "libX==1.0"), ("A", "libX==2.0")]).is_empty());
    }

    #[test]
    fn test_overlapping_ranges() {
        assert!(detect(&[
            ("A", "libX>=1.0,<3"),
            ("B", "libX>=2.0"),
            ("C", "libX<2.5"),
        ])
        .is_empty());
    }

    #[test]
    fn test_unbounded_side_never_conflicts() {
        let manifests = [("A", "libX>=5"), ("B", "libX>=9"), ("C", "libX")];
        assert!(detect(&manifests).is_empty());
        assert!(detect(&[("A", "libX<1"), ("B", "libX<0.5")]).is_empty());
    }

    #[test]
    fn test_exact_pins_conflict() {
        let conflicts = detect(&[("A", "libX==1.0"), ("B", "libX==1.1")]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(owners(&conflicts[0]), vec!["A", "B"]);

        assert!(detect(&[("A", "libX==1.0"), ("B", "libX==1.0.0")]).is_empty());
    }

    #[test]
    fn test_exact_pin_against_range() {
        let conflicts = detect(&[("A", "libX==2.5.1"), ("B", "libX>=1,<2")]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].lower.owner, "A");
        assert_eq!(conflicts[0].upper.owner, "B");
    }

    #[test]
    fn test_compatible_release_upper_bound() {
        let conflicts = detect(&[("A", "libX~=1.4.2"), ("B", "libX>=1.5")]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].upper.bound, "<1.5");
        assert_eq!(conflicts[0].upper.clause, "~=1.4.2");
    }

    #[test]
    fn test_owner_clauses_are_combined() {
        // B's effective upper bound comes from its second line
        let conflicts = detect(&[("A", "libX>=2.0"), ("B", "libX>=1.0"), ("B", "libX<1.5")]);
        assert_eq!(conflicts.len(), 1);
        let entry = conflicts[0].entries.iter().find(|e| e.owner == "B").unwrap();
        assert_eq!(entry.range_text, "<1.5,>=1.0");
        assert_eq!(entry.side, ConflictSide::Upper);
    }

    #[test]
    fn test_all_excluding_owners_are_reported() {
        let conflicts = detect(&[
            ("A", "libX>=3"),
            ("B", "libX>=2.5"),
            ("C", "libX<2"),
            ("D", "libX>=1"),
            ("E", "libX<2.2"),
        ]);
        assert_eq!(conflicts.len(), 1);
        // D's lower bound is compatible with every upper bound, so D is not responsible
        assert_eq!(owners(&conflicts[0]), vec!["A", "B", "C", "E"]);
        assert_eq!(conflicts[0].lower.owner, "A");
        assert_eq!(conflicts[0].upper.owner, "C");
    }

    #[test]
    fn test_owner_listed_once_with_both_sides() {
        let conflicts = detect(&[("A", "libX>5,<1"), ("B", "libX>=0")]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(owners(&conflicts[0]), vec!["A"]);
        assert_eq!(conflicts[0].entries[0].side, ConflictSide::Both);
    }

    #[test]
    fn test_tie_goes_to_first_owner() {
        let conflicts = detect(&[("A", "libX>=2"), ("B", "libX>=2.0"), ("C", "libX<1")]);
        assert_eq!(conflicts[0].lower.owner, "A");
        assert_eq!(owners(&conflicts[0]), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_not_equal_exclusions_are_not_bounds() {
        // Only 1.0 satisfies both bounds, and C excludes it: a known gap.
        let manifests = [("A", "libX>=1.0"), ("B", "libX<=1.0"), ("C", "libX!=1.0")];
        let conflicts = detect(&manifests);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_conflicts_follow_scan_order() {
        let conflicts = detect(&[
            ("A", "zeta>=2"),
            ("A", "alpha>=2"),
            ("B", "alpha<1"),
            ("B", "zeta<1"),
        ]);
        let names: Vec<_> = conflicts.iter().map(|c| c.dependency_name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_detection_is_repeatable() {
        let input = [("A", "libX>=2"), ("B", "libX<1"), ("A", "liby==1"), ("C", "liby==2")];
        assert_eq!(detect(&input), detect(&input));
    }

    #[test]
    fn test_check_group_direct() {
        let reqs = vec![req("libX>=2.0", "A"), req("libX<1.0", "B")];
        let conflict = ConflictDetector::new().check_group("libx", &reqs).unwrap();
        assert_eq!(conflict.describe(), "A requires >=2.0 but B requires <1.0");
    }
}
