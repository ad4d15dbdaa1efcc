//! Configuration model for gmsd.
//!
//! This module defines the Config struct that represents `.planning/gmsd.yaml`.
//! The file is optional; it supports forward-compatible YAML parsing (unknown
//! fields are ignored), defaults for every field, and validation of values.

mod model;
mod operations;
mod types;


// Re-export public API
pub use model::Config;
