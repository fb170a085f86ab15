//! Options threaded through every build step.
//!
//! These replace process-wide toggles: the CLI builds them once from its flags
//! and each step receives them at construction.

use serde::{Deserialize, Serialize};

/// Options shared by every command in one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOptions {
  /// Report what would happen without touching the filesystem.
  pub dry_run: bool,
  /// Never write compiled artifacts (the `-B` switch).
  pub dont_write_bytecode: bool,
  /// Copy and rebuild even when outputs look up to date.
  pub force: bool,
}

/// Byte-compilation request for a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileFlags {
  /// Compile without optimisation.
  pub compile: bool,
  /// Optimisation level, 0 to 2.
  pub optimize: u8,
}

impl CompileFlags {
  /// Flags used by `build`: nothing is compiled unless asked for.
  pub fn for_build() -> Self {
    Self::default()
  }

  /// Flags used by `install`: plain compilation is on by default.
  pub fn for_install() -> Self {
    Self {
      compile: true,
      optimize: 0,
    }
  }

  /// Whether any compilation was requested.
  pub fn requested(&self) -> bool {
    self.compile || self.optimize > 0
  }
}
