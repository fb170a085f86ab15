//! Dry-run aware filesystem helpers used by the build and install steps.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Errors from copying or removing files.
#[derive(Debug, Error)]
pub enum FsError {
  #[error("failed to create directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to copy {from} to {to}: {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to remove {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to walk {path}: {message}")]
  Walk { path: PathBuf, message: String },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

fn modified(path: &Path) -> Option<SystemTime> {
  fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Returns true if `src` is newer than `dst`, or `dst` does not exist.
pub fn newer(src: &Path, dst: &Path) -> bool {
  match (modified(src), modified(dst)) {
    (_, None) => true,
    (Some(s), Some(d)) => s > d,
    (None, Some(_)) => false,
  }
}

/// Create `path` and its parents unless running dry.
pub fn mkpath(path: &Path, dry_run: bool) -> Result<(), FsError> {
  if path.is_dir() {
    return Ok(());
  }
  info!(path = %path.display(), "creating directory");
  if dry_run {
    return Ok(());
  }
  fs::create_dir_all(path).map_err(|source| FsError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

/// Copy a single file, creating the destination's parent directory.
///
/// With `update` set, the copy is skipped when `dst` is at least as new as
/// `src`. Returns whether the file was (or, when dry, would have been) copied.
pub fn copy_file(src: &Path, dst: &Path, update: bool, dry_run: bool) -> Result<bool, FsError> {
  if update && !newer(src, dst) {
    debug!(path = %dst.display(), "not copying (output up-to-date)");
    return Ok(false);
  }

  if let Some(parent) = dst.parent() {
    mkpath(parent, dry_run)?;
  }

  info!(from = %src.display(), to = %dst.display(), "copying");
  if dry_run {
    return Ok(true);
  }

  fs::copy(src, dst).map_err(|source| FsError::Copy {
    from: src.to_path_buf(),
    to: dst.to_path_buf(),
    source,
  })?;
  Ok(true)
}

/// Copy every regular file under `src` into `dst`, preserving layout.
///
/// Returns the destination path of every file, copied or not.
pub fn copy_tree(src: &Path, dst: &Path, update: bool, dry_run: bool) -> Result<Vec<PathBuf>, FsError> {
  let mut outputs = Vec::new();

  for entry in WalkDir::new(src).sort_by_file_name() {
    let entry = entry.map_err(|e| FsError::Walk {
      path: src.to_path_buf(),
      message: e.to_string(),
    })?;
    if !entry.file_type().is_file() {
      continue;
    }
    let Ok(rel) = entry.path().strip_prefix(src) else {
      continue;
    };
    let target = dst.join(rel);
    copy_file(entry.path(), &target, update, dry_run)?;
    outputs.push(target);
  }

  Ok(outputs)
}

/// Remove a directory tree if it exists.
pub fn remove_tree(path: &Path, dry_run: bool) -> Result<bool, FsError> {
  if !path.exists() {
    debug!(path = %path.display(), "nothing to remove");
    return Ok(false);
  }
  info!(path = %path.display(), "removing");
  if dry_run {
    return Ok(true);
  }
  fs::remove_dir_all(path).map_err(|source| FsError::Remove {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(true)
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str, dry_run: bool) -> Result<(), FsError> {
  if let Some(parent) = path.parent() {
    mkpath(parent, dry_run)?;
  }
  info!(path = %path.display(), "writing");
  if dry_run {
    return Ok(());
  }
  fs::write(path, content).map_err(|source| FsError::Write {
    path: path.to_path_buf(),
    source,
  })
}

/// Read `path`, treating a missing file as empty.
pub fn read_or_empty(path: &Path) -> Result<String, FsError> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(content),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
    Err(source) => Err(FsError::Read {
      path: path.to_path_buf(),
      source,
    }),
  }
}
