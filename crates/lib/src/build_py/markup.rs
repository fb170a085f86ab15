//! Build step that also ships and compiles markup files.

use std::path::PathBuf;

use super::{BuildPy, BuildPyCommand, BuildTuple, ByteCompileReport};
use crate::compile::{MarkupCompiler, compile_markup_files};
use crate::error::BuildError;

/// [`BuildPy`] plus markup files as package data.
///
/// Markup tuples are located once, on first access, and reused afterwards.
pub struct MarkupBuildPy<'a> {
  base: BuildPy<'a>,
  compiler: &'a dyn MarkupCompiler,
  markup_files: Option<Vec<BuildTuple>>,
}

impl<'a> MarkupBuildPy<'a> {
  pub fn new(base: BuildPy<'a>, compiler: &'a dyn MarkupCompiler) -> Self {
    Self {
      base,
      compiler,
      markup_files: None,
    }
  }

  /// Markup tuples for every declared package.
  pub fn markup_files(&mut self) -> Result<&[BuildTuple], BuildError> {
    if self.markup_files.is_none() {
      self.markup_files = Some(self.base.locate_all_markup()?);
    }
    Ok(self.markup_files.as_deref().unwrap_or(&[]))
  }
}

impl<'a> BuildPyCommand<'a> for MarkupBuildPy<'a> {
  fn base(&self) -> &BuildPy<'a> {
    &self.base
  }

  fn base_mut(&mut self) -> &mut BuildPy<'a> {
    &mut self.base
  }

  fn data_files(&mut self) -> Result<Vec<BuildTuple>, BuildError> {
    let mut files = self.base.package_data_files()?;
    files.extend_from_slice(self.markup_files()?);
    Ok(files)
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
