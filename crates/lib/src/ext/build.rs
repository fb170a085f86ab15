//! The extension build step.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{CompilerType, Extension, ExtensionError, compile_flags};
use crate::config::GlobalOptions;
use crate::project::{Project, package_path};
use crate::util::fs::newer;

/// Where and how one extension is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTarget {
  /// Absolute path of the module file to produce.
  pub output: PathBuf,
  /// Absolute directory for intermediate objects.
  pub build_temp: PathBuf,
  /// Directory sources are resolved against.
  pub root: PathBuf,
  pub debug: bool,
}

/// Compiles and links one extension module.
pub trait ExtensionCompiler {
  fn compiler_type(&self) -> CompilerType;

  /// File suffix of built modules, e.g. `.so` or `.pyd`.
  fn ext_suffix(&self) -> &str;

  fn build_extension(&self, ext: &Extension, target: &ExtensionTarget) -> Result<(), ExtensionError>;
}

/// Builds a set of extensions with compiler-specific flags applied.
pub struct BuildExt<'a> {
  project: &'a Project,
  options: GlobalOptions,
  compiler: &'a dyn ExtensionCompiler,
  pub extensions: Vec<Extension>,
  /// Put modules next to their package sources instead of the build tree.
  pub inplace: bool,
  pub debug: bool,
}

impl<'a> BuildExt<'a> {
  pub fn new(
    project: &'a Project,
    options: GlobalOptions,
    extensions: Vec<Extension>,
    compiler: &'a dyn ExtensionCompiler,
  ) -> Self {
    Self {
      project,
      options,
      compiler,
      extensions,
      inplace: false,
      debug: false,
    }
  }

  /// Absolute path the module for `ext` is written to.
  pub fn output_path(&self, ext: &Extension) -> PathBuf {
    let package = ext.package();
    let dir = if self.inplace {
      match self.project.get_package_dir(package) {
        Ok(dir) => self.project.abs(&dir),
        Err(_) => package_path(&self.project.root, package),
      }
    } else {
      package_path(&self.project.abs(&self.project.build.build_lib), package)
    };
    dir.join(format!("{}{}", ext.leaf(), self.compiler.ext_suffix()))
  }

  fn up_to_date(&self, ext: &Extension, output: &Path) -> bool {
    output.exists()
      && !ext
        .sources
        .iter()
        .any(|source| newer(&self.project.abs(source), output))
  }

  /// Apply the compiler's extra flags to every extension, then build each in
  /// declared order. Returns the module paths.
  pub fn build_extensions(&mut self) -> Result<Vec<PathBuf>, ExtensionError> {
    let compiler_type = self.compiler.compiler_type();
    let flags = compile_flags(compiler_type.as_str());
    for ext in &mut self.extensions {
      ext.extra_compile_args = flags.clone();
    }
    info!(
      compiler = %compiler_type,
      count = self.extensions.len(),
      inplace = self.inplace,
      "building extensions"
    );

    let mut outputs = Vec::with_capacity(self.extensions.len());
    for ext in &self.extensions {
      let output = self.output_path(ext);

      if !self.options.force && self.up_to_date(ext, &output) {
        debug!(name = %ext.name, "skipping extension (up-to-date)");
      } else if self.options.dry_run {
        info!(name = %ext.name, output = %output.display(), "would build extension");
      } else {
        info!(name = %ext.name, "building extension");
        let target = ExtensionTarget {
          output: output.clone(),
          build_temp: self.project.abs(&self.project.build.build_temp),
          root: self.project.root.clone(),
          debug: self.debug,
        };
        self.compiler.build_extension(ext, &target)?;
      }
      outputs.push(output);
    }

    Ok(outputs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::Os;
  use crate::project::{ProjectFile, ProjectMeta};
  use crate::ext::extensions_for;
  use std::cell::RefCell;
  use std::fs;
  use tempfile::TempDir;

  struct FakeCompiler {
    ty: CompilerType,
    built: RefCell<Vec<(Vec<String>, PathBuf, bool)>>,
  }

  impl FakeCompiler {
    fn new(ty: CompilerType) -> Self {
      Self {
        ty,
        built: RefCell::new(Vec::new()),
      }
    }
  }

  impl ExtensionCompiler for FakeCompiler {
    fn compiler_type(&self) -> CompilerType {
      self.ty
    }

    fn ext_suffix(&self) -> &str {
      ".so"
    }

    fn build_extension(&self, ext: &Extension, target: &ExtensionTarget) -> Result<(), ExtensionError> {
      self
        .built
        .borrow_mut()
        .push((ext.extra_compile_args.clone(), target.output.clone(), target.debug));
      Ok(())
    }
  }

  fn project(root: &Path) -> Project {
    let file = ProjectFile {
      project: ProjectMeta {
        name: "enaml".to_string(),
        packages: Some(vec!["enaml".to_string(), "enaml.core".to_string()]),
        ..Default::default()
      },
      ..Default::default()
    };
    Project::from_file(root.to_path_buf(), file).unwrap()
  }

  #[test]
  fn msvc_flags_reach_every_extension() {
    let temp = TempDir::new().unwrap();
    let project = project(temp.path());
    let compiler = FakeCompiler::new(CompilerType::Msvc);
    let mut step = BuildExt::new(&project, GlobalOptions::default(), extensions_for(Os::Windows), &compiler);

    step.build_extensions().unwrap();

    let built = compiler.built.borrow();
    assert_eq!(built.len(), 11);
    assert!(built.iter().all(|(args, _, _)| args == &vec!["/EHsc".to_string()]));
  }

  #[test]
  fn unix_gets_no_extra_flags_and_debug_is_off() {
    let temp = TempDir::new().unwrap();
    let project = project(temp.path());
    let compiler = FakeCompiler::new(CompilerType::Unix);
    let mut step = BuildExt::new(&project, GlobalOptions::default(), extensions_for(Os::Linux), &compiler);

    step.build_extensions().unwrap();

    let built = compiler.built.borrow();
    assert_eq!(built.len(), 10);
    assert!(built.iter().all(|(args, _, debug)| args.is_empty() && !debug));
  }

  #[test]
  fn outputs_land_in_build_tree_or_in_place() {
    let temp = TempDir::new().unwrap();
    let project = project(temp.path());
    let compiler = FakeCompiler::new(CompilerType::Unix);
    let alias = extensions_for(Os::Linux)
      .into_iter()
      .find(|e| e.name == "enaml.core.alias")
      .unwrap();
    let mut step = BuildExt::new(&project, GlobalOptions::default(), vec![alias.clone()], &compiler);

    assert_eq!(step.output_path(&alias), temp.path().join("build/lib/enaml/core/alias.so"));

    step.inplace = true;
    assert_eq!(step.output_path(&alias), temp.path().join("enaml/core/alias.so"));
  }

  #[test]
  fn dry_run_builds_nothing() {
    let temp = TempDir::new().unwrap();
    let project = project(temp.path());
    let compiler = FakeCompiler::new(CompilerType::Unix);
    let options = GlobalOptions {
      dry_run: true,
      ..Default::default()
    };
    let mut step = BuildExt::new(&project, options, extensions_for(Os::Linux), &compiler);

    let outputs = step.build_extensions().unwrap();

    assert_eq!(outputs.len(), 10);
    assert!(compiler.built.borrow().is_empty());
  }

  #[test]
  fn up_to_date_modules_are_skipped_unless_forced() {
    let temp = TempDir::new().unwrap();
    let project = project(temp.path());
    let alias = extensions_for(Os::Linux)
      .into_iter()
      .find(|e| e.name == "enaml.core.alias")
      .unwrap();
    fs::create_dir_all(temp.path().join("enaml/src")).unwrap();
    fs::write(temp.path().join("enaml/src/alias.cpp"), "").unwrap();
    fs::create_dir_all(temp.path().join("build/lib/enaml/core")).unwrap();
    fs::write(temp.path().join("build/lib/enaml/core/alias.so"), "").unwrap();

    let compiler = FakeCompiler::new(CompilerType::Unix);
    let mut step = BuildExt::new(&project, GlobalOptions::default(), vec![alias.clone()], &compiler);
    step.build_extensions().unwrap();
    assert!(compiler.built.borrow().is_empty());

    let forced = GlobalOptions {
      force: true,
      ..Default::default()
    };
    let mut step = BuildExt::new(&project, forced, vec![alias], &compiler);
    step.build_extensions().unwrap();
    assert_eq!(compiler.built.borrow().len(), 1);
  }
}
