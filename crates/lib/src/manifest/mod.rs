//! Source manifest analysis.
//!
//! A source manifest lists every file that belongs to the distribution, one
//! project-relative path per line. Analysis assigns each non-module file to the
//! package whose source directory contains it; those files then count as
//! package data even when no glob pattern selects them.

mod types;

pub use types::*;
