//! Shared utilities.
//!
//! Glob and fnmatch-style pattern matching, dry-run aware file helpers,
//! external process execution, and test helpers.

pub mod fs;
pub mod pattern;
pub mod process;

#[cfg(test)]
pub mod testutil;
