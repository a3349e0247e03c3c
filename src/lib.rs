//! depconflict - plugin dependency conflict checker library
//!
//! This library provides the core functionality for checking plugin
//! `requirements.txt` manifests against each other:
//! - Version and range parsing with the `==`, `!=`, `<`, `<=`, `>`, `>=`, `~=` operators
//! - Grouping requirements by dependency name across plugins
//! - Detecting dependencies whose ranges have an empty intersection
//! - Replacing a dependency line in every plugin manifest

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod interactive;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
