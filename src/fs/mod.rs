//! Filesystem utilities for gmsd.
//!
//! This module provides atomic whole-file replacement for documents that
//! several worker processes read and rewrite.

pub mod atomic;

pub use atomic::atomic_write_file;
