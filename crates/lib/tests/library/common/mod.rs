//! Shared fixtures: a project tree on disk and recording collaborators.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use enaml_build_lib::command::{Pipeline, Toolset};
use enaml_build_lib::compile::{ByteCompiler, CompileError, FileInfo, MarkupCompiler, cache_tag, make_file_info};
use enaml_build_lib::config::GlobalOptions;
use enaml_build_lib::ext::{CompilerType, Extension, ExtensionCompiler, ExtensionError, ExtensionTarget};
use enaml_build_lib::platform::Os;
use enaml_build_lib::project::Project;
use enaml_build_lib::tables::{TableWriter, TablesError};
use tempfile::TempDir;

pub const PROJECT_TOML: &str = r#"
[project]
name = "gallery"
version = "2.0.0"
include_package_data = true
manifest = "SOURCES.txt"

[package_dir]
"" = "src"

[package_data]
"" = ["*.txt"]

[exclude_package_data]
"gallery.views" = ["*_draft.enaml"]
"#;

/// Lay out a two-package project and return its temp root.
pub fn project_tree() -> TempDir {
  let temp = TempDir::new().unwrap();
  let root = temp.path();
  write(root, "src/gallery/__init__.py", "");
  write(root, "src/gallery/app.py", "");
  write(root, "src/gallery/main.enaml", "enamldef Main(Window):\n  pass\n");
  write(root, "src/gallery/README.txt", "readme");
  write(root, "src/gallery/views/__init__.py", "");
  write(root, "src/gallery/views/list.enaml", "");
  write(root, "src/gallery/views/list_draft.enaml", "");
  write(root, "src/gallery/icons/star.svg", "<svg/>");
  write(root, "src/scratch/notes.enaml", "");
  write(root, "SOURCES.txt", "src/gallery/app.py\nsrc/gallery/icons/star.svg\n");
  write(root, "enaml-build.toml", PROJECT_TOML);
  temp
}

pub fn write(root: &Path, rel: &str, content: &str) {
  let path = root.join(rel);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

pub fn load(temp: &TempDir) -> Project {
  Project::load(&temp.path().join("enaml-build.toml")).unwrap()
}

/// Markup compiler that records calls and writes a cache file.
#[derive(Default)]
pub struct FakeMarkup {
  pub compiled: RefCell<Vec<PathBuf>>,
}

impl MarkupCompiler for FakeMarkup {
  fn make_file_info(&self, path: &Path) -> FileInfo {
    make_file_info(path, &cache_tag("py3"))
  }

  fn compile_code(&self, info: &FileInfo) -> Result<(), CompileError> {
    self.compiled.borrow_mut().push(info.src_path.clone());
    fs::create_dir_all(&info.cache_dir).unwrap();
    fs::write(&info.cache_path, b"code").unwrap();
    Ok(())
  }
}

#[derive(Default)]
pub struct FakeBytes {
  pub batches: RefCell<Vec<(Vec<PathBuf>, u8)>>,
}

impl ByteCompiler for FakeBytes {
  fn byte_compile(&self, files: &[PathBuf], optimize: u8) -> Result<(), CompileError> {
    self.batches.borrow_mut().push((files.to_vec(), optimize));
    Ok(())
  }
}

#[derive(Default)]
pub struct FakeTables {
  pub calls: RefCell<usize>,
}

impl TableWriter for FakeTables {
  fn write_tables(&self) -> Result<(), TablesError> {
    *self.calls.borrow_mut() += 1;
    Ok(())
  }
}

#[derive(Default)]
pub struct FakeExtensions {
  pub built: RefCell<Vec<String>>,
  pub flags: RefCell<Vec<Vec<String>>>,
}

impl ExtensionCompiler for FakeExtensions {
  fn compiler_type(&self) -> CompilerType {
    CompilerType::Msvc
  }

  fn ext_suffix(&self) -> &str {
    ".pyd"
  }

  fn build_extension(&self, ext: &Extension, target: &ExtensionTarget) -> Result<(), ExtensionError> {
    self.built.borrow_mut().push(ext.name.clone());
    self.flags.borrow_mut().push(ext.extra_compile_args.clone());
    fs::create_dir_all(target.output.parent().unwrap()).unwrap();
    fs::write(&target.output, b"module").unwrap();
    Ok(())
  }
}

/// All four fakes, owned together so a [`Toolset`] can borrow them.
#[derive(Default)]
pub struct Fakes {
  pub markup: FakeMarkup,
  pub bytes: FakeBytes,
  pub tables: FakeTables,
  pub extensions: FakeExtensions,
}

impl Fakes {
  pub fn pipeline<'a>(&'a self, project: &'a Project, options: GlobalOptions, os: Os) -> Pipeline<'a> {
    let tools = Toolset {
      markup: &self.markup,
      bytes: &self.bytes,
      tables: &self.tables,
      extensions: &self.extensions,
    };
    Pipeline::new(project, options, os, tools)
  }
}
