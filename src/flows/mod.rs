//! Flows module - End-to-end operations
//!
//! Provides:
//! - snapshot: Walk a root and write mapping/markup documents
//! - restore: Rebuild a file tree from a document

pub mod restore;
pub mod snapshot;
