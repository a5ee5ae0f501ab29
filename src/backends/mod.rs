//! Backends module - Filesystem traversal
//!
//! Provides:
//! - walk: Tree walking with walkdir, ignore rules and classification

pub mod walk;
