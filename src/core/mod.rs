//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Extension-to-output mapping
//! - Run report model and fatal error type
//! - Rendering of combined-file blocks and run reports
//! - Path normalization utilities
//! - Tolerant source file reading

pub mod file_reader;
pub mod mapping;
pub mod model;
pub mod paths;
pub mod render;
