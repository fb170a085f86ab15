use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::MODULE_EXTENSION;
use crate::project::{Project, ProjectError};
use crate::util::pattern::{normalize, to_slash};

/// Files listed in the source manifest, grouped by owning package.
///
/// Paths are project-relative, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFiles {
  files: BTreeMap<String, Vec<PathBuf>>,
}

impl ManifestFiles {
  /// Manifest entries for `package`, or an empty slice.
  pub fn get(&self, package: &str) -> &[PathBuf] {
    self.files.get(package).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  /// Analyse the project's manifest.
  ///
  /// Returns an empty set when the project does not include package data or
  /// declares no manifest file.
  pub fn analyze(project: &Project) -> Result<Self, ProjectError> {
    if !project.include_package_data {
      return Ok(Self::default());
    }
    let Some(manifest) = &project.manifest else {
      return Ok(Self::default());
    };

    let path = project.abs(manifest);
    let content = fs::read_to_string(&path).map_err(|source| ProjectError::ReadManifest { path, source })?;
    let listed: Vec<PathBuf> = content
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty() && !line.starts_with('#'))
      .map(|line| normalize(Path::new(line)))
      .collect();

    let mut src_dirs = HashMap::new();
    for package in &project.packages {
      src_dirs.insert(to_slash(&project.get_package_dir(package)?), package.clone());
    }

    Ok(Self::assign(&src_dirs, &listed))
  }

  /// Assign listed files to packages by walking up from each file's directory
  /// until a package source directory is found.
  ///
  /// A `.py` file sitting directly in a package directory is a module, not
  /// data, and is skipped. One in a plain subdirectory counts as data.
  pub fn assign(src_dirs: &HashMap<String, String>, listed: &[PathBuf]) -> Self {
    let mut files: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for path in listed {
      let mut dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
      let mut nested = false;

      loop {
        let key = to_slash(&dir);
        if let Some(package) = src_dirs.get(&key) {
          if !nested && to_slash(path).ends_with(MODULE_EXTENSION) {
            break;
          }
          debug!(package = %package, path = %path.display(), "manifest data file");
          files.entry(package.clone()).or_default().push(path.clone());
          break;
        }
        if key.is_empty() {
          break;
        }
        dir = dir.parent().map(Path::to_path_buf).unwrap_or_default();
        nested = true;
      }
    }

    Self { files }
  }
}
