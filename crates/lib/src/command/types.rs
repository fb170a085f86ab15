use std::path::PathBuf;

use serde::Serialize;

use crate::build_py::BuildPyOutput;
use crate::compile::{ByteCompiler, MarkupCompileOutcome, MarkupCompiler};
use crate::ext::ExtensionCompiler;
use crate::install_lib::InstallOutput;
use crate::tables::TableWriter;

/// External collaborators used by the command pipeline.
#[derive(Clone, Copy)]
pub struct Toolset<'a> {
  pub markup: &'a dyn MarkupCompiler,
  pub bytes: &'a dyn ByteCompiler,
  pub tables: &'a dyn TableWriter,
  pub extensions: &'a dyn ExtensionCompiler,
}

/// Outcome of `build`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
  pub packages: BuildPyOutput,
  /// Extension module paths, built or already up to date.
  pub extensions: Vec<PathBuf>,
}

/// Outcome of `install`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
  pub build: BuildReport,
  pub install: InstallOutput,
  pub install_dir: PathBuf,
}

/// Outcome of `develop`.
#[derive(Debug, Clone, Serialize)]
pub struct DevelopReport {
  pub extensions: Vec<PathBuf>,
  pub markup: MarkupCompileOutcome,
  pub egg_link: PathBuf,
  /// Whether the project root was newly added to `easy-install.pth`.
  pub registered: bool,
}

/// Outcome of `clean`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
  /// Directories removed (or that would be removed in a dry run).
  pub removed: Vec<PathBuf>,
}
