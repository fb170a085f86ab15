//! Top-level commands: `build`, `install`, `develop` and `clean`.
//!
//! A [`Pipeline`] holds the loaded project, the invocation's options and the
//! external collaborators, and sequences the build, install and extension
//! steps for each command. Errors from any step stop the command and are
//! returned unchanged.

mod types;

pub use types::*;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::build_py::markup::MarkupBuildPy;
use crate::build_py::{BuildPy, BuildPyCommand};
use crate::compile::compile_markup_files;
use crate::config::{CompileFlags, GlobalOptions};
use crate::consts::EASY_INSTALL_PTH;
use crate::error::BuildError;
use crate::ext::{BuildExt, extensions_for};
use crate::install_lib::{InstallLib, InstallLibCommand, MarkupInstallLib};
use crate::platform::Os;
use crate::project::Project;
use crate::util::fs::{read_or_empty, remove_tree, write_file};
use crate::util::pattern::to_slash;

/// Runs commands for one project.
pub struct Pipeline<'a> {
  pub project: &'a Project,
  pub options: GlobalOptions,
  pub os: Os,
  tools: Toolset<'a>,
}

impl<'a> Pipeline<'a> {
  pub fn new(project: &'a Project, options: GlobalOptions, os: Os, tools: Toolset<'a>) -> Self {
    Self {
      project,
      options,
      os,
      tools,
    }
  }

  fn write_tables(&self) -> Result<(), BuildError> {
    if self.options.dry_run {
      info!("would write parser tables");
      return Ok(());
    }
    Ok(self.tools.tables.write_tables()?)
  }

  fn build_ext(&self, inplace: bool) -> Result<Vec<PathBuf>, BuildError> {
    if !self.project.build.extensions {
      return Ok(Vec::new());
    }
    let mut step = BuildExt::new(self.project, self.options, extensions_for(self.os), self.tools.extensions);
    step.inplace = inplace;
    Ok(step.build_extensions()?)
  }

  /// Copy packages, data and markup into the build tree, compile what
  /// `flags` asks for, then build the native extensions.
  pub fn build(&self, flags: CompileFlags) -> Result<BuildReport, BuildError> {
    info!(project = %self.project.name, "build");

    let base = BuildPy::new(self.project, self.options, flags, self.tools.bytes);
    let mut step = MarkupBuildPy::new(base, self.tools.markup);
    let packages = step.run()?;
    let extensions = self.build_ext(false)?;

    Ok(BuildReport { packages, extensions })
  }

  /// Regenerate parser tables, build, then install the build tree into
  /// `install_dir`. Nothing is built when table generation fails.
  pub fn install(&self, flags: CompileFlags, install_dir: &Path) -> Result<InstallReport, BuildError> {
    info!(project = %self.project.name, install_dir = %install_dir.display(), "install");
    self.write_tables()?;

    let build = self.build(CompileFlags::for_build())?;

    let base = InstallLib::new(
      self.project.abs(&self.project.build.build_lib),
      install_dir.to_path_buf(),
      self.options,
      flags,
      self.tools.bytes,
    );
    let install = MarkupInstallLib::new(base, self.tools.markup).run()?;

    Ok(InstallReport {
      build,
      install,
      install_dir: install_dir.to_path_buf(),
    })
  }

  /// Regenerate parser tables, build extensions next to the sources, compile
  /// markup in place when requested, and link the source tree into
  /// `install_dir`.
  pub fn develop(&self, flags: CompileFlags, install_dir: &Path) -> Result<DevelopReport, BuildError> {
    info!(project = %self.project.name, install_dir = %install_dir.display(), "develop");
    self.write_tables()?;

    let extensions = self.build_ext(true)?;

    let mut locator = BuildPy::new(self.project, self.options, flags, self.tools.bytes);
    let sources: Vec<PathBuf> = locator
      .locate_all_markup()?
      .iter()
      .flat_map(|tuple| {
        tuple
          .filenames
          .iter()
          .map(|name| self.project.abs(&tuple.src_dir.join(name)))
      })
      .collect();
    let markup = compile_markup_files(&self.options, &flags, self.tools.markup, &sources)?;

    let (egg_link, registered) = self.register(install_dir)?;

    Ok(DevelopReport {
      extensions,
      markup,
      egg_link,
      registered,
    })
  }

  /// Write `<name>.egg-link` and add the project root to `easy-install.pth`.
  fn register(&self, install_dir: &Path) -> Result<(PathBuf, bool), BuildError> {
    let root = to_slash(&self.project.root);

    let egg_link = install_dir.join(format!("{}.egg-link", self.project.name));
    write_file(&egg_link, &format!("{}\n.\n", root), self.options.dry_run)?;

    let pth = install_dir.join(EASY_INSTALL_PTH);
    let existing = read_or_empty(&pth)?;
    if existing.lines().any(|line| line.trim() == root) {
      info!(path = %pth.display(), "already registered");
      return Ok((egg_link, false));
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
      content.push('\n');
    }
    content.push_str(&root);
    content.push('\n');
    write_file(&pth, &content, self.options.dry_run)?;

    Ok((egg_link, true))
  }

  /// Remove the build tree and the temporary build directory.
  pub fn clean(&self) -> Result<CleanReport, BuildError> {
    info!(project = %self.project.name, "clean");

    let mut removed = Vec::new();
    for dir in [&self.project.build.build_lib, &self.project.build.build_temp] {
      let path = self.project.abs(dir);
      if remove_tree(&path, self.options.dry_run)? {
        removed.push(path);
      }
    }
    Ok(CleanReport { removed })
  }
}
