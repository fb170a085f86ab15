//! The "build python package" step.
//!
//! [`BuildPy`] copies each package's modules and data files into the build
//! tree and byte-compiles the modules. The step is driven through the
//! [`BuildPyCommand`] trait so that wrappers such as
//! [`MarkupBuildPy`](markup::MarkupBuildPy) can replace individual stages
//! (data-file selection, byte compilation) while reusing [`BuildPyCommand::run`].
//!
//! # Submodules
//!
//! - [`locate`] - markup file discovery per package
//! - [`markup`] - markup-aware build step

pub mod locate;
pub mod markup;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::compile::{ByteCompiler, CompileError, MarkupCompileOutcome};
use crate::config::{CompileFlags, GlobalOptions};
use crate::consts::MODULE_EXTENSION;
use crate::error::BuildError;
use crate::manifest::ManifestFiles;
use crate::project::{Project, ProjectError};
use crate::util::fs::copy_file;
use crate::util::pattern::{fnmatch, glob, normalize, to_slash};

/// Files of one package to copy from its source to its build directory.
///
/// `filenames` are relative to `src_dir`, so they can be joined with either
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTuple {
  pub package: String,
  pub src_dir: PathBuf,
  pub build_dir: PathBuf,
  pub filenames: Vec<PathBuf>,
}

/// Counts from one byte-compile stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ByteCompileReport {
  /// Ordinary modules handed to the byte compiler (once per pass).
  pub modules: usize,
  /// What the markup stage did, if the step has one.
  pub markup: Option<MarkupCompileOutcome>,
}

/// Result of running a build step.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildPyOutput {
  /// Absolute paths of every module and data file in the build tree.
  pub outputs: Vec<PathBuf>,
  pub compiled: ByteCompileReport,
}

/// Expand `spec[""]` and `spec[package]` into patterns rooted at `src_dir`.
pub fn platform_patterns(spec: &BTreeMap<String, Vec<String>>, package: &str, src_dir: &Path) -> Vec<String> {
  let base = to_slash(src_dir);
  spec
    .get("")
    .into_iter()
    .chain(spec.get(package))
    .flatten()
    .map(|pattern| {
      let pattern = pattern.replace('\\', "/");
      if base.is_empty() {
        pattern
      } else {
        format!("{}/{}", base, pattern)
      }
    })
    .collect()
}

/// `path` relative to the package source directory `src_dir`.
fn relpath(path: &Path, src_dir: &Path) -> Result<PathBuf, ProjectError> {
  normalize(path)
    .strip_prefix(src_dir)
    .map(Path::to_path_buf)
    .map_err(|_| ProjectError::OutsideSourceDir {
      path: path.to_path_buf(),
      src_dir: src_dir.to_path_buf(),
    })
}

/// The standard build step.
pub struct BuildPy<'a> {
  pub project: &'a Project,
  pub options: GlobalOptions,
  pub flags: CompileFlags,
  byte_compiler: &'a dyn ByteCompiler,
  manifest_files: Option<ManifestFiles>,
}

impl<'a> BuildPy<'a> {
  pub fn new(
    project: &'a Project,
    options: GlobalOptions,
    flags: CompileFlags,
    byte_compiler: &'a dyn ByteCompiler,
  ) -> Self {
    Self {
      project,
      options,
      flags,
      byte_compiler,
      manifest_files: None,
    }
  }

  /// Root of the build tree, relative to the project root.
  pub fn build_lib(&self) -> &Path {
    &self.project.build.build_lib
  }

  pub fn get_package_dir(&self, package: &str) -> Result<PathBuf, ProjectError> {
    self.project.get_package_dir(package)
  }

  /// Analyse the source manifest once; later calls reuse the result until
  /// [`invalidate_manifest`](Self::invalidate_manifest) is called.
  pub fn analyze_manifest(&mut self) -> Result<&ManifestFiles, ProjectError> {
    if self.manifest_files.is_none() {
      debug!("analyzing source manifest");
      self.manifest_files = Some(ManifestFiles::analyze(self.project)?);
    }
    let files: &ManifestFiles = self.manifest_files.get_or_insert_with(ManifestFiles::default);
    Ok(files)
  }

  /// Drop the cached manifest analysis.
  pub fn invalidate_manifest(&mut self) {
    self.manifest_files = None;
  }

  /// Manifest entries for `package`. Analyses the manifest if needed.
  pub fn manifest_files(&mut self, package: &str) -> Result<Vec<PathBuf>, ProjectError> {
    Ok(self.analyze_manifest()?.get(package).to_vec())
  }

  /// Drop files matching the package's exclusion patterns.
  ///
  /// Order is preserved and duplicates are kept.
  pub fn exclude_data_files(&self, package: &str, src_dir: &Path, files: Vec<PathBuf>) -> Vec<PathBuf> {
    let patterns = platform_patterns(&self.project.exclude_package_data, package, src_dir);
    if patterns.is_empty() {
      return files;
    }
    files
      .into_iter()
      .filter(|file| {
        let name = to_slash(file);
        let excluded = patterns.iter().any(|pattern| fnmatch(&name, pattern));
        if excluded {
          debug!(path = %name, "excluded");
        }
        !excluded
      })
      .collect()
  }

  /// Manifest entries followed by existing regular files matching `spec`,
  /// after exclusion. Paths are project-relative.
  pub fn find_files(
    &mut self,
    package: &str,
    src_dir: &Path,
    spec: &BTreeMap<String, Vec<String>>,
  ) -> Result<Vec<PathBuf>, ProjectError> {
    let mut files = self.manifest_files(package)?;

    let root = &self.project.root;
    for pattern in platform_patterns(spec, package, src_dir) {
      files.extend(glob(root, &pattern).into_iter().filter(|p| root.join(p).is_file()));
    }

    Ok(self.exclude_data_files(package, src_dir, files))
  }

  /// Build the tuple for `package` from the files `spec` selects.
  pub fn build_tuple(
    &mut self,
    package: &str,
    spec: &BTreeMap<String, Vec<String>>,
  ) -> Result<BuildTuple, ProjectError> {
    let src_dir = self.get_package_dir(package)?;
    let build_dir = self.project.build_dir(package);
    let filenames = self
      .find_files(package, &src_dir, spec)?
      .iter()
      .map(|file| relpath(file, &src_dir))
      .collect::<Result<_, _>>()?;

    Ok(BuildTuple {
      package: package.to_string(),
      src_dir,
      build_dir,
      filenames,
    })
  }

  /// Package data tuples from the project's `package_data` patterns.
  pub fn package_data_files(&mut self) -> Result<Vec<BuildTuple>, ProjectError> {
    self.analyze_manifest()?;
    let project = self.project;
    project
      .packages
      .iter()
      .map(|package| self.build_tuple(package, &project.package_data))
      .collect()
  }

  /// Module files directly inside a package's source directory.
  pub fn find_package_modules(&self, src_dir: &Path) -> Result<Vec<PathBuf>, ProjectError> {
    let root = &self.project.root;
    let pattern = match to_slash(src_dir) {
      base if base.is_empty() => format!("*{}", MODULE_EXTENSION),
      base => format!("{}/*{}", base, MODULE_EXTENSION),
    };
    glob(root, &pattern)
      .into_iter()
      .filter(|p| root.join(p).is_file())
      .map(|p| relpath(&p, src_dir))
      .collect()
  }

  /// Copy every package's modules into the build tree.
  pub fn build_packages(&self) -> Result<Vec<PathBuf>, BuildError> {
    let update = !self.options.force;
    let mut outputs = Vec::new();

    for package in &self.project.packages {
      let src_dir = self.get_package_dir(package)?;
      let build_dir = self.project.build_dir(package);
      for module in self.find_package_modules(&src_dir)? {
        let target = self.project.abs(&build_dir.join(&module));
        copy_file(&self.project.abs(&src_dir.join(&module)), &target, update, self.options.dry_run)?;
        outputs.push(target);
      }
    }

    Ok(outputs)
  }

  /// Copy the files of every data tuple into the build tree.
  pub fn build_package_data(&self, data_files: &[BuildTuple]) -> Result<Vec<PathBuf>, BuildError> {
    let update = !self.options.force;
    let mut outputs = Vec::new();

    for tuple in data_files {
      for filename in &tuple.filenames {
        let target = self.project.abs(&tuple.build_dir.join(filename));
        let source = self.project.abs(&tuple.src_dir.join(filename));
        copy_file(&source, &target, update, self.options.dry_run)?;
        outputs.push(target);
      }
    }

    Ok(outputs)
  }

  /// Byte-compile the ordinary modules among `files`.
  ///
  /// Skipped quietly when bytecode writing is disabled, in a dry run, or when
  /// no compilation was requested. Returns the number of modules compiled.
  pub fn standard_byte_compile(&self, files: &[PathBuf]) -> Result<usize, CompileError> {
    compile_modules(&self.options, &self.flags, self.byte_compiler, files)
  }
}

/// Byte-compile the `.py` files in `files`: one plain pass when `compile` is
/// set and one optimised pass when `optimize > 0`.
pub fn compile_modules(
  options: &GlobalOptions,
  flags: &CompileFlags,
  compiler: &dyn ByteCompiler,
  files: &[PathBuf],
) -> Result<usize, CompileError> {
  if options.dont_write_bytecode || options.dry_run {
    debug!("not byte-compiling modules");
    return Ok(0);
  }

  let modules: Vec<PathBuf> = files
    .iter()
    .filter(|f| f.to_string_lossy().ends_with(MODULE_EXTENSION))
    .cloned()
    .collect();
  if modules.is_empty() {
    return Ok(0);
  }

  let mut compiled = 0;
  if flags.compile {
    info!(count = modules.len(), "byte-compiling modules");
    compiler.byte_compile(&modules, 0)?;
    compiled += modules.len();
  }
  if flags.optimize > 0 {
    info!(count = modules.len(), optimize = flags.optimize, "byte-compiling modules");
    compiler.byte_compile(&modules, flags.optimize)?;
    compiled += modules.len();
  }
  Ok(compiled)
}

/// A build step: the standard [`BuildPy`] or a wrapper around it.
///
/// Wrappers override [`data_files`](Self::data_files) and
/// [`byte_compile`](Self::byte_compile); [`run`](Self::run) sequences them.
pub trait BuildPyCommand<'a> {
  fn base(&self) -> &BuildPy<'a>;

  fn base_mut(&mut self) -> &mut BuildPy<'a>;

  /// Data tuples to copy into the build tree.
  fn data_files(&mut self) -> Result<Vec<BuildTuple>, BuildError> {
    Ok(self.base_mut().package_data_files()?)
  }

  /// Byte-compile the build outputs.
  fn byte_compile(&mut self, files: &[PathBuf]) -> Result<ByteCompileReport, BuildError> {
    let modules = self.base().standard_byte_compile(files)?;
    Ok(ByteCompileReport { modules, markup: None })
  }

  /// Copy modules, copy data files, then byte-compile everything copied.
  fn run(&mut self) -> Result<BuildPyOutput, BuildError> {
    info!(build_lib = %self.base().build_lib().display(), "building packages");

    let mut outputs = self.base().build_packages()?;
    let data_files = self.data_files()?;
    outputs.extend(self.base().build_package_data(&data_files)?);

    let compiled = self.byte_compile(&outputs)?;
    Ok(BuildPyOutput { outputs, compiled })
  }
}

impl<'a> BuildPyCommand<'a> for BuildPy<'a> {
  fn base(&self) -> &BuildPy<'a> {
    self
  }

  fn base_mut(&mut self) -> &mut BuildPy<'a> {
    self
  }
}
