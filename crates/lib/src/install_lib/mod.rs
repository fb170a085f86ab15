//! The "install library" step.
//!
//! [`InstallLib`] copies the build tree into the install directory and
//! byte-compiles what it installed. As with the build step, the stages are
//! exposed through [`InstallLibCommand`] so [`MarkupInstallLib`] can layer the
//! markup compile policy on top.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::build_py::{ByteCompileReport, compile_modules};
use crate::compile::{ByteCompiler, MarkupCompiler, compile_markup_files};
use crate::config::{CompileFlags, GlobalOptions};
use crate::error::BuildError;
use crate::util::fs::{copy_tree, mkpath};

/// Result of running an install step.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallOutput {
  /// Absolute paths of every installed file.
  pub outputs: Vec<PathBuf>,
  pub compiled: ByteCompileReport,
}

/// The standard install step.
pub struct InstallLib<'a> {
  /// Absolute build tree to install from.
  pub build_dir: PathBuf,
  pub install_dir: PathBuf,
  pub options: GlobalOptions,
  pub flags: CompileFlags,
  byte_compiler: &'a dyn ByteCompiler,
}

impl<'a> InstallLib<'a> {
  pub fn new(
    build_dir: PathBuf,
    install_dir: PathBuf,
    options: GlobalOptions,
    flags: CompileFlags,
    byte_compiler: &'a dyn ByteCompiler,
  ) -> Self {
    Self {
      build_dir,
      install_dir,
      options,
      flags,
      byte_compiler,
    }
  }

  /// Copy the build tree into the install directory.
  ///
  /// A missing build tree is not an error: there is simply nothing to install.
  pub fn install(&self) -> Result<Vec<PathBuf>, BuildError> {
    if !self.build_dir.is_dir() {
      warn!(
        path = %self.build_dir.display(),
        "build directory does not exist, no modules to install"
      );
      return Ok(Vec::new());
    }

    mkpath(&self.install_dir, self.options.dry_run)?;
    Ok(copy_tree(
      &self.build_dir,
      &self.install_dir,
      !self.options.force,
      self.options.dry_run,
    )?)
  }

  pub fn standard_byte_compile(&self, files: &[PathBuf]) -> Result<usize, BuildError> {
    Ok(compile_modules(&self.options, &self.flags, self.byte_compiler, files)?)
  }

  pub fn install_dir(&self) -> &Path {
    &self.install_dir
  }
}

/// An install step: the standard [`InstallLib`] or a wrapper around it.
pub trait InstallLibCommand<'a> {
  fn base(&self) -> &InstallLib<'a>;

  fn byte_compile(&mut self, files: &[PathBuf]) -> Result<ByteCompileReport, BuildError> {
    let modules = self.base().standard_byte_compile(files)?;
    Ok(ByteCompileReport { modules, markup: None })
  }

  fn run(&mut self) -> Result<InstallOutput, BuildError> {
    info!(install_dir = %self.base().install_dir().display(), "installing");

    let outputs = self.base().install()?;
    let compiled = self.byte_compile(&outputs)?;
    Ok(InstallOutput { outputs, compiled })
  }
}

impl<'a> InstallLibCommand<'a> for InstallLib<'a> {
  fn base(&self) -> &InstallLib<'a> {
    self
  }
}

/// [`InstallLib`] that also compiles installed markup files.
pub struct MarkupInstallLib<'a> {
  base: InstallLib<'a>,
  compiler: &'a dyn MarkupCompiler,
}

impl<'a> MarkupInstallLib<'a> {
  pub fn new(base: InstallLib<'a>, compiler: &'a dyn MarkupCompiler) -> Self {
    Self { base, compiler }
  }
}

impl<'a> InstallLibCommand<'a> for MarkupInstallLib<'a> {
  fn base(&self) -> &InstallLib<'a> {
    &self.base
  }

  fn byte_compile(&mut self, files: &[PathBuf]) -> Result<ByteCompileReport, BuildError> {
    let modules = self.base.standard_byte_compile(files)?;
    let markup = compile_markup_files(&self.base.options, &self.base.flags, self.compiler, files)?;
    Ok(ByteCompileReport {
      modules,
      markup: Some(markup),
    })
  }
}
