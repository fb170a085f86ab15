//! Test utilities for enaml-build-lib.
//!
//! Cross-platform helpers for tests that run external commands, plus
//! recording fakes for the compiler collaborators.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::compile::{ByteCompiler, CompileError, FileInfo, MarkupCompiler, make_file_info};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Markup compiler that records each call and writes a stub cache file.
#[derive(Default)]
pub struct RecordingMarkupCompiler {
  pub compiled: RefCell<Vec<PathBuf>>,
  /// Fail when asked to compile a file with this name.
  pub fail_on: Option<String>,
}

impl MarkupCompiler for RecordingMarkupCompiler {
  fn make_file_info(&self, path: &Path) -> FileInfo {
    make_file_info(path, "test")
  }

  fn compile_code(&self, info: &FileInfo) -> Result<(), CompileError> {
    let name = info.src_path.file_name().map(|n| n.to_string_lossy().into_owned());
    if name.is_some() && name == self.fail_on {
      return Err(CompileError::Rejected {
        path: info.src_path.clone(),
        message: "invalid syntax".to_string(),
      });
    }
    self.compiled.borrow_mut().push(info.src_path.clone());
    if info.src_path.exists() {
      std::fs::create_dir_all(&info.cache_dir).unwrap();
      std::fs::write(&info.cache_path, b"compiled").unwrap();
    }
    Ok(())
  }
}

/// Module byte compiler that records each batch and writes stub `.pyc` files.
#[derive(Default)]
pub struct RecordingByteCompiler {
  pub batches: RefCell<Vec<(Vec<PathBuf>, u8)>>,
}

impl ByteCompiler for RecordingByteCompiler {
  fn byte_compile(&self, files: &[PathBuf], optimize: u8) -> Result<(), CompileError> {
    self.batches.borrow_mut().push((files.to_vec(), optimize));
    for file in files {
      if file.exists() {
        std::fs::write(file.with_extension("pyc"), b"bytecode").unwrap();
      }
    }
    Ok(())
  }
}
