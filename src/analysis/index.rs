//! Requirements grouped by dependency name

use crate::domain::Requirement;
use std::collections::HashMap;

/// Normalized dependency name -> every requirement declared for it.
///
/// Names keep the order in which they were first encountered, and each
/// group keeps its requirements in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequirementIndex {
    groups: Vec<(String, Vec<Requirement>)>,
    positions: HashMap<String, usize>,
}

impl RequirementIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from requirements in scan order
    pub fn build<I>(requirements: I) -> Self
    where
        I: IntoIterator<Item = Requirement>,
    {
        let mut index = Self::new();
        for requirement in requirements {
            index.insert(requirement);
        }
        index
    }

    /// Append a requirement to its name group
    pub fn insert(&mut self, requirement: Requirement) {
        match self.positions.get(requirement.name()) {
            Some(&pos) => self.groups[pos].1.push(requirement),
            None => {
                let name = requirement.name().to_string();
                self.positions.insert(name.clone(), self.groups.len());
                self.groups.push((name, vec![requirement]));
            }
        }
    }

    /// Requirements declared for `name` (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&[Requirement]> {
        self.positions
            .get(&name.to_lowercase())
            .map(|&pos| self.groups[pos].1.as_slice())
    }

    /// Iterate over (name, requirements) groups in first-encountered order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Requirement])> {
        self.groups
            .iter()
            .map(|(name, reqs)| (name.as_str(), reqs.as_slice()))
    }

    /// Dependency names in first-encountered order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Distinct owners that declared `name`, in scan order
    pub fn owners_of(&self, name: &str) -> Vec<&str> {
        let mut owners: Vec<&str> = Vec::new();
        for req in self.get(name).unwrap_or_default() {
            if !owners.contains(&req.owner()) {
                owners.push(req.owner());
            }
        }
        owners
    }

    /// Number of distinct dependency names
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of requirements across all names
    pub fn requirement_count(&self) -> usize {
        self.groups.iter().map(|(_, reqs)| reqs.len()).sum()
    }
}
