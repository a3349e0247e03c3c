//! Requirement indexing and conflict detection
//!
//! This module provides:
//! - RequirementIndex for grouping requirements by dependency name
//! - ConflictDetector for deciding whether each group's ranges intersect

mod detector;
mod index;

pub use detector::{detect_conflicts, ConflictDetector};
pub use index::RequirementIndex;
