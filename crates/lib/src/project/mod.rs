//! Project definition.
//!
//! A project is described by an `enaml-build.toml` file next to its sources.
//! Loading it yields a [`Project`]: the parsed tables plus the project root and
//! the final package list (explicit, or discovered on disk).
//!
//! # Submodules
//!
//! - [`discover`] - package discovery by `__init__.py` markers

pub mod discover;
mod types;

pub use types::*;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::util::pattern::normalize;

/// A loaded project rooted at a directory.
#[derive(Debug, Clone)]
pub struct Project {
  /// Absolute project root. Every relative path in the project is joined to it.
  pub root: PathBuf,
  pub name: String,
  pub version: Option<String>,
  /// Dotted package names, in the order they are processed.
  pub packages: Vec<String>,
  pub package_dir: BTreeMap<String, String>,
  pub package_data: BTreeMap<String, Vec<String>>,
  pub exclude_package_data: BTreeMap<String, Vec<String>>,
  pub include_package_data: bool,
  pub manifest: Option<PathBuf>,
  pub build: BuildDirs,
  pub toolchain: ToolchainConfig,
}

impl Project {
  /// Load a project from its TOML file.
  pub fn load(path: &Path) -> Result<Self, ProjectError> {
    let content = fs::read_to_string(path).map_err(|source| ProjectError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let file: ProjectFile = toml::from_str(&content).map_err(|source| ProjectError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let parent = match path.parent() {
      Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
      _ => PathBuf::from("."),
    };
    let root = dunce::canonicalize(&parent).map_err(|source| ProjectError::Canonicalize { path: parent, source })?;

    Self::from_file(root, file)
  }

  /// Build a project from already-parsed tables.
  pub fn from_file(root: PathBuf, file: ProjectFile) -> Result<Self, ProjectError> {
    let ProjectFile {
      project,
      package_dir,
      package_data,
      exclude_package_data,
      build,
      toolchain,
    } = file;

    let mut loaded = Self {
      root,
      name: project.name,
      version: project.version,
      packages: Vec::new(),
      package_dir,
      package_data,
      exclude_package_data,
      include_package_data: project.include_package_data,
      manifest: project.manifest,
      build,
      toolchain,
    };

    loaded.packages = match project.packages {
      Some(packages) => packages,
      None => {
        let base = loaded.root.join(loaded.package_dir.get("").map(String::as_str).unwrap_or(""));
        let skip = loaded.root.join(&loaded.build.build_lib);
        discover::find_packages(&base, &project.exclude_packages, &[skip])?
      }
    };
    debug!(count = loaded.packages.len(), "resolved packages");

    Ok(loaded)
  }

  /// Whether `package` is one of this project's packages.
  pub fn has_package(&self, package: &str) -> bool {
    self.packages.iter().any(|p| p == package)
  }

  /// Resolve the source directory of a package, relative to the project root.
  ///
  /// The longest dotted prefix of `package` present in `package_dir` wins; the
  /// remaining segments are appended. Without any match the `""` entry (if
  /// present) is the base.
  pub fn get_package_dir(&self, package: &str) -> Result<PathBuf, ProjectError> {
    if !self.has_package(package) {
      return Err(ProjectError::UnknownPackage(package.to_string()));
    }
    Ok(resolve_package_dir(&self.package_dir, package))
  }

  /// Directory a package is built into, relative to the project root.
  pub fn build_dir(&self, package: &str) -> PathBuf {
    package_path(&self.build.build_lib, package)
  }

  /// Absolute form of a project-relative path.
  pub fn abs(&self, path: &Path) -> PathBuf {
    self.root.join(path)
  }
}

/// Join `base` with the dotted segments of `package`.
pub fn package_path(base: &Path, package: &str) -> PathBuf {
  let mut path = base.to_path_buf();
  for segment in package.split('.').filter(|s| !s.is_empty()) {
    path.push(segment);
  }
  path
}

/// Join mapping values and package segments, dropping `.` components inside
/// values so `./src` and `src` resolve to the same directory.
fn join_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> PathBuf {
  let mut path = PathBuf::new();
  for segment in segments {
    let segment = normalize(Path::new(segment));
    if !segment.as_os_str().is_empty() {
      path.push(segment);
    }
  }
  path
}

fn resolve_package_dir(package_dir: &BTreeMap<String, String>, package: &str) -> PathBuf {
  let mut path: Vec<&str> = package.split('.').filter(|s| !s.is_empty()).collect();
  let mut tail: Vec<&str> = Vec::new();

  while let Some(last) = path.last().copied() {
    if let Some(pdir) = package_dir.get(&path.join(".")) {
      tail.insert(0, pdir.as_str());
      return join_segments(tail);
    }
    tail.insert(0, last);
    path.pop();
  }

  if let Some(pdir) = package_dir.get("") {
    tail.insert(0, pdir.as_str());
  }
  join_segments(tail)
}
