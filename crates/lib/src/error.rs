//! Top-level error type for build commands.
//!
//! Every step returns its own error type; they all convert into [`BuildError`]
//! so a failure anywhere in the pipeline reaches the caller unchanged.

use thiserror::Error;

use crate::compile::CompileError;
use crate::ext::ExtensionError;
use crate::project::ProjectError;
use crate::tables::TablesError;
use crate::util::fs::FsError;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Project(#[from] ProjectError),

  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error(transparent)]
  Fs(#[from] FsError),

  #[error(transparent)]
  Extension(#[from] ExtensionError),

  #[error(transparent)]
  Tables(#[from] TablesError),

  /// No install directory was given and no default could be derived.
  #[error("no install directory: pass --install-dir or set {0}")]
  NoInstallDir(&'static str),
}
