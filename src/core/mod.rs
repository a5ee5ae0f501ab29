//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Snapshot data model (Entry, Document, Report)
//! - Content decoding and binary sniffing
//! - Ignore rules and configuration
//! - Path normalization utilities
//! - Error types
//! - Report rendering

pub mod config;
pub mod decoder;
pub mod error;
pub mod model;
pub mod paths;
pub mod render;
