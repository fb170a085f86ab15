//! Compiler collaborators backed by the configured interpreter.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ByteCompiler, CompileError, FileInfo, MarkupCompiler, cache_tag, make_file_info};
use crate::project::ToolchainConfig;
use crate::util::process::run;

/// Entry point the interpreter runs to compile one markup file. The source
/// path is passed as the first argument.
const MARKUP_COMPILE_SNIPPET: &str = "import sys\n\
from enaml.core.import_hooks import make_file_info, EnamlImporter\n\
EnamlImporter(make_file_info(sys.argv[1])).compile_code()\n";

/// Drives the interpreter for both markup and module compilation.
#[derive(Debug, Clone)]
pub struct InterpreterCompiler {
  python: String,
  tag: String,
}

impl InterpreterCompiler {
  pub fn new(toolchain: &ToolchainConfig) -> Self {
    Self {
      python: toolchain.python.clone(),
      tag: cache_tag(&toolchain.python_tag),
    }
  }

  /// Interpreter flags for an optimisation level.
  fn optimize_flag(optimize: u8) -> Option<&'static str> {
    match optimize {
      0 => None,
      1 => Some("-O"),
      _ => Some("-OO"),
    }
  }
}

impl MarkupCompiler for InterpreterCompiler {
  fn make_file_info(&self, path: &Path) -> FileInfo {
    make_file_info(path, &self.tag)
  }

  fn compile_code(&self, info: &FileInfo) -> Result<(), CompileError> {
    let args = vec![
      "-c".to_string(),
      MARKUP_COMPILE_SNIPPET.to_string(),
      info.src_path.to_string_lossy().into_owned(),
    ];
    run(&self.python, &args, None).map_err(|source| CompileError::Markup {
      path: info.src_path.clone(),
      source,
    })?;
    debug!(cache = %info.cache_path.display(), "markup compiled");
    Ok(())
  }
}

impl ByteCompiler for InterpreterCompiler {
  fn byte_compile(&self, files: &[PathBuf], optimize: u8) -> Result<(), CompileError> {
    if files.is_empty() {
      return Ok(());
    }

    let mut args = Vec::new();
    if let Some(flag) = Self::optimize_flag(optimize) {
      args.push(flag.to_string());
    }
    args.push("-m".to_string());
    args.push("py_compile".to_string());
    args.extend(files.iter().map(|f| f.to_string_lossy().into_owned()));

    run(&self.python, &args, None).map_err(CompileError::Modules)?;
    Ok(())
  }
}
