//! Backends module - File traversal and aggregation
//!
//! Provides:
//! - walk: Directory traversal with walkdir or ignore
//! - aggregate: The aggregation run itself

pub mod aggregate;
pub mod walk;
