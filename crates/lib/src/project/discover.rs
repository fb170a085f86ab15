//! Package discovery.
//!
//! A directory is a package when it contains `__init__.py` and its name has no
//! dots. Descent stops at the first directory that is not a package, so
//! namespace-style trees need an explicit package list.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::ProjectError;
use crate::consts::PACKAGE_MARKER;
use crate::util::pattern::fnmatch;

fn looks_like_package(path: &Path) -> bool {
  path.join(PACKAGE_MARKER).is_file()
}

/// Find every package below `base`, as dotted names in walk order.
///
/// Packages whose dotted name matches any of `exclude` are left out of the
/// result, but their children are still searched. Directories in `skip`
/// (typically the build tree) are never entered.
pub fn find_packages(base: &Path, exclude: &[String], skip: &[PathBuf]) -> Result<Vec<String>, ProjectError> {
  let mut packages = Vec::new();

  let walker = WalkDir::new(base)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| {
      if entry.depth() == 0 {
        return true;
      }
      let name = entry.file_name().to_string_lossy();
      entry.file_type().is_dir()
        && !name.contains('.')
        && !skip.iter().any(|s| s == entry.path())
        && looks_like_package(entry.path())
    });

  for entry in walker {
    let entry = entry.map_err(|e| ProjectError::Discover {
      path: base.to_path_buf(),
      message: e.to_string(),
    })?;
    if entry.depth() == 0 {
      continue;
    }
    let Ok(rel) = entry.path().strip_prefix(base) else {
      continue;
    };
    let package = rel
      .components()
      .map(|c| c.as_os_str().to_string_lossy().into_owned())
      .collect::<Vec<_>>()
      .join(".");

    if exclude.iter().any(|pattern| fnmatch(&package, pattern)) {
      debug!(package = %package, "excluded from discovery");
      continue;
    }
    packages.push(package);
  }

  Ok(packages)
}
