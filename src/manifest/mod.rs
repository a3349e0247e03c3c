//! Component manifests on disk
//!
//! This module provides functionality to:
//! - Discover component directories and their manifest files
//! - Scan manifests into requirements, collecting per-line warnings
//! - Read and atomically write manifest files
//! - Replace dependency lines across every manifest

mod detector;
mod rewriter;
mod scanner;
mod writer;

pub use detector::{discover_components, Component};
pub use rewriter::{rewrite_content, ReplaceSpec, RewriteResult, RewriteSummary, Rewriter};
pub use scanner::{
    parse_manifest_content, scan_manifest, ManifestScan, ScanNotice, ScanResult, ScanWarning,
};
pub use writer::{read_manifest, write_manifest};
