use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::util::process::ProcessError;

/// Where a markup file's compiled form is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
  pub src_path: PathBuf,
  pub cache_dir: PathBuf,
  pub cache_path: PathBuf,
}

/// Errors reported by compiler collaborators.
#[derive(Debug, Error)]
pub enum CompileError {
  /// The markup compiler could not be run or exited with an error.
  #[error("failed to compile {path}: {source}")]
  Markup {
    path: PathBuf,
    #[source]
    source: ProcessError,
  },

  /// The markup compiler rejected the source.
  #[error("failed to compile {path}: {message}")]
  Rejected { path: PathBuf, message: String },

  /// Byte-compiling ordinary modules failed.
  #[error("failed to byte-compile modules: {0}")]
  Modules(#[source] ProcessError),
}

/// What [`compile_markup_files`](super::compile_markup_files) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "count", rename_all = "snake_case")]
pub enum MarkupCompileOutcome {
  /// This many markup files were compiled.
  Compiled(usize),
  BytecodeDisabled,
  DryRun,
  NotRequested,
}

/// The markup front end: parse a source file and write its cached code object.
pub trait MarkupCompiler {
  /// Describe the source file and its cache location.
  fn make_file_info(&self, path: &Path) -> FileInfo;

  /// Parse and compile the file, writing the cache artifact.
  fn compile_code(&self, info: &FileInfo) -> Result<(), CompileError>;
}

/// Byte compiler for ordinary interpreter modules.
pub trait ByteCompiler {
  /// Compile `files` at the given optimisation level (0 means plain).
  fn byte_compile(&self, files: &[PathBuf], optimize: u8) -> Result<(), CompileError>;
}
