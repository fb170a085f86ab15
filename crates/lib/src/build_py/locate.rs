//! Markup file discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{BuildPy, BuildTuple};
use crate::consts::MARKUP_PATTERN;
use crate::project::ProjectError;

/// Pattern table selecting markup files in every package.
pub fn markup_spec() -> BTreeMap<String, Vec<String>> {
  BTreeMap::from([(String::new(), vec![MARKUP_PATTERN.to_string()])])
}

impl BuildPy<'_> {
  /// Markup files of `package`: manifest entries first, then existing files
  /// matching `*.enaml` under `src_dir`, minus excluded ones.
  ///
  /// Paths are project-relative. The same file may appear twice when it is
  /// both listed in the manifest and matched by the glob.
  pub fn find_markup_files(&mut self, package: &str, src_dir: &Path) -> Result<Vec<PathBuf>, ProjectError> {
    self.find_files(package, src_dir, &markup_spec())
  }

  /// Build tuple holding the markup files of `package`.
  pub fn locate_markup(&mut self, package: &str) -> Result<BuildTuple, ProjectError> {
    let tuple = self.build_tuple(package, &markup_spec())?;
    debug!(package = %package, count = tuple.filenames.len(), "located markup files");
    Ok(tuple)
  }

  /// Markup tuples for every package, in declared order.
  pub fn locate_all_markup(&mut self) -> Result<Vec<BuildTuple>, ProjectError> {
    self.analyze_manifest()?;
    let project = self.project;
    project.packages.iter().map(|package| self.locate_markup(package)).collect()
  }
}
