use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_BUILD_LIB, DEFAULT_BUILD_TEMP};

/// Errors raised while loading or querying a project.
#[derive(Debug, Error)]
pub enum ProjectError {
  #[error("failed to read project file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid project file {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("failed to resolve project root {path}: {source}")]
  Canonicalize {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A package was queried that the project does not declare.
  #[error("package '{0}' is not registered in this project")]
  UnknownPackage(String),

  #[error("failed to read manifest {path}: {source}")]
  ReadManifest {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A file selected for a package does not lie under its source directory.
  #[error("{path} is not inside package source directory {src_dir}")]
  OutsideSourceDir { path: PathBuf, src_dir: PathBuf },

  #[error("package discovery failed in {path}: {message}")]
  Discover { path: PathBuf, message: String },
}

/// The `[project]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectMeta {
  pub name: String,
  #[serde(default)]
  pub version: Option<String>,
  /// Explicit package list. When absent, packages are discovered.
  #[serde(default)]
  pub packages: Option<Vec<String>>,
  /// Patterns of dotted package names skipped by discovery.
  #[serde(default)]
  pub exclude_packages: Vec<String>,
  /// Treat non-module files from the source manifest as package data.
  #[serde(default)]
  pub include_package_data: bool,
  /// Source manifest listing one project-relative path per line.
  #[serde(default)]
  pub manifest: Option<PathBuf>,
}

/// The `[build]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildDirs {
  #[serde(default = "default_build_lib")]
  pub build_lib: PathBuf,
  #[serde(default = "default_build_temp")]
  pub build_temp: PathBuf,
  /// Build the framework's native extension modules.
  #[serde(default = "default_true")]
  pub extensions: bool,
}

fn default_build_lib() -> PathBuf {
  PathBuf::from(DEFAULT_BUILD_LIB)
}

fn default_build_temp() -> PathBuf {
  PathBuf::from(DEFAULT_BUILD_TEMP)
}

fn default_true() -> bool {
  true
}

impl Default for BuildDirs {
  fn default() -> Self {
    Self {
      build_lib: default_build_lib(),
      build_temp: default_build_temp(),
      extensions: true,
    }
  }
}

/// The `[toolchain]` table: how external collaborators are invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
  /// Interpreter used for byte compilation, markup compilation and table
  /// generation.
  #[serde(default = "default_python")]
  pub python: String,
  /// C++ compiler driver. Defaults per compiler type.
  #[serde(default)]
  pub cxx: Option<String>,
  /// Force a compiler type instead of picking one for the target platform.
  #[serde(default)]
  pub compiler_type: Option<String>,
  /// Extra include directories for native extensions.
  #[serde(default)]
  pub include_dirs: Vec<PathBuf>,
  /// Extra library directories for native extensions.
  #[serde(default)]
  pub library_dirs: Vec<PathBuf>,
  /// File suffix of built extension modules. Defaults per platform.
  #[serde(default)]
  pub ext_suffix: Option<String>,
  /// Interpreter tag embedded in markup cache file names.
  #[serde(default = "default_python_tag")]
  pub python_tag: String,
}

fn default_python() -> String {
  "python3".to_string()
}

fn default_python_tag() -> String {
  "py3".to_string()
}

impl Default for ToolchainConfig {
  fn default() -> Self {
    Self {
      python: default_python(),
      cxx: None,
      compiler_type: None,
      include_dirs: Vec::new(),
      library_dirs: Vec::new(),
      ext_suffix: None,
      python_tag: default_python_tag(),
    }
  }
}

/// On-disk shape of `enaml-build.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
  pub project: ProjectMeta,
  /// Dotted package name (or `""` for the root) to source directory.
  #[serde(default)]
  pub package_dir: BTreeMap<String, String>,
  /// Extra data-file patterns per package (`""` applies to all).
  #[serde(default)]
  pub package_data: BTreeMap<String, Vec<String>>,
  /// Exclusion patterns per package (`""` applies to all).
  #[serde(default)]
  pub exclude_package_data: BTreeMap<String, Vec<String>>,
  #[serde(default)]
  pub build: BuildDirs,
  #[serde(default)]
  pub toolchain: ToolchainConfig,
}
