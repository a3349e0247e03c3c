//! Core domain models for depconflict
//!
//! This module contains the fundamental types used throughout the application:
//! - Versions and their ordering
//! - Clauses, bounds and ranges built from version constraints
//! - Requirements parsed from manifest lines
//! - Conflict records produced by the detector

mod conflict;
mod range;
mod requirement;
mod version;

pub use conflict::{BoundOrigin, Conflict, ConflictEntry, ConflictSide};
pub use range::{Bound, BoundSide, Clause, Operator, Range};
pub use requirement::Requirement;
pub use version::{PreRelease, Version};
