mod build;
mod clean;
mod develop;
mod files;
mod info;
mod install;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use develop::cmd_develop;
pub use files::cmd_files;
pub use info::cmd_info;
pub use install::cmd_install;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use enaml_build_lib::command::Toolset;
use enaml_build_lib::compile::command::InterpreterCompiler;
use enaml_build_lib::error::BuildError;
use enaml_build_lib::ext::ToolchainCompiler;
use enaml_build_lib::platform::Os;
use enaml_build_lib::platform::paths::{self, INSTALL_DIR_ENV};
use enaml_build_lib::project::Project;
use enaml_build_lib::tables::CommandTableWriter;

fn load_project(path: &Path) -> Result<Project> {
  Project::load(path).with_context(|| format!("Failed to load project: {}", path.display()))
}

/// Collaborators backed by the project's configured toolchain.
struct Tools {
  interpreter: InterpreterCompiler,
  tables: CommandTableWriter,
  extensions: ToolchainCompiler,
}

impl Tools {
  fn new(project: &Project, os: Os) -> Result<Self> {
    let toolchain = &project.toolchain;
    Ok(Self {
      interpreter: InterpreterCompiler::new(toolchain),
      tables: CommandTableWriter::for_interpreter(toolchain),
      extensions: ToolchainCompiler::new(toolchain, os).context("Invalid toolchain configuration")?,
    })
  }

  fn toolset(&self) -> Toolset<'_> {
    Toolset {
      markup: &self.interpreter,
      bytes: &self.interpreter,
      tables: &self.tables,
      extensions: &self.extensions,
    }
  }
}

fn resolve_install_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
  explicit
    .or_else(paths::install_dir)
    .ok_or(BuildError::NoInstallDir(INSTALL_DIR_ENV))
    .map_err(Into::into)
}
