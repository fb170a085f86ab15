//! Markup compilation.
//!
//! The markup compiler itself is an external collaborator: this module only
//! decides which files are handed to it and in what order, and applies the
//! byte-compile policy shared by the build and install steps.
//!
//! # Submodules
//!
//! - [`command`] - collaborators that drive the configured interpreter

pub mod command;
mod types;

pub use types::*;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{CompileFlags, GlobalOptions};
use crate::consts::{MARKUP_CACHE_DIR, MARKUP_CACHE_EXTENSION, MARKUP_COMPILER_VERSION, MARKUP_EXTENSION};

/// Whether `path` names a markup source file.
pub fn is_markup(path: &Path) -> bool {
  path.to_string_lossy().ends_with(MARKUP_EXTENSION)
}

/// Cache tag embedded in compiled artifact names, e.g. `enaml-py3-cv24`.
pub fn cache_tag(python_tag: &str) -> String {
  format!("enaml-{}-cv{}", python_tag, MARKUP_COMPILER_VERSION)
}

/// Describe where the compiled form of `src_path` is cached.
///
/// `view.enaml` is cached as `__enamlcache__/view.<tag>.enamlc` in the same
/// directory.
pub fn make_file_info(src_path: &Path, tag: &str) -> FileInfo {
  let root = src_path.parent().map(Path::to_path_buf).unwrap_or_default();
  let stem = src_path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();
  let cache_dir = root.join(MARKUP_CACHE_DIR);
  let cache_path = cache_dir.join(format!("{}.{}.{}", stem, tag, MARKUP_CACHE_EXTENSION));

  FileInfo {
    src_path: src_path.to_path_buf(),
    cache_dir,
    cache_path,
  }
}

/// Compile every markup file in `files`, in order.
///
/// Other files are skipped silently. The first failure aborts the run and is
/// returned unchanged. Returns the number of files compiled.
pub fn compile_all(compiler: &dyn MarkupCompiler, files: &[PathBuf]) -> Result<usize, CompileError> {
  let mut compiled = 0;
  for file in files {
    if !is_markup(file) {
      continue;
    }
    info!(path = %file.display(), "byte-compiling");
    let file_info = compiler.make_file_info(file);
    compiler.compile_code(&file_info)?;
    compiled += 1;
  }
  Ok(compiled)
}

/// Byte-compile policy for markup files, applied after a step's standard
/// byte-compile of ordinary modules.
///
/// - bytecode writing disabled: one warning, nothing compiled
/// - dry run: nothing compiled
/// - neither compile nor optimize requested: nothing compiled
pub fn compile_markup_files(
  options: &GlobalOptions,
  flags: &CompileFlags,
  compiler: &dyn MarkupCompiler,
  files: &[PathBuf],
) -> Result<MarkupCompileOutcome, CompileError> {
  if options.dont_write_bytecode {
    warn!("byte-compiling is disabled, skipping.");
    return Ok(MarkupCompileOutcome::BytecodeDisabled);
  }

  if options.dry_run {
    debug!(count = files.len(), "dry run, not compiling markup");
    return Ok(MarkupCompileOutcome::DryRun);
  }

  if !flags.requested() {
    return Ok(MarkupCompileOutcome::NotRequested);
  }

  compile_all(compiler, files).map(MarkupCompileOutcome::Compiled)
}
