//! Host platform detection and per-user paths.

pub mod os;
pub mod paths;

pub use os::Os;
