//! Extension compiler that drives a C++ toolchain on the command line.
//!
//! Unix-style drivers (`c++`, `g++`) compile each source with `-c -fPIC` and
//! link with `-shared`. MSVC compiles with `cl /c` and links with
//! `link /DLL`. Interpreter headers are located once by asking the
//! configured interpreter, unless include directories are configured.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CompilerType, Extension, ExtensionCompiler, ExtensionError, ExtensionTarget};
use crate::platform::Os;
use crate::project::ToolchainConfig;
use crate::util::fs::mkpath;
use crate::util::process::run;

const INCLUDE_QUERY: &str = "import sysconfig; print(sysconfig.get_paths()['include'])";

/// Compiler driven through external toolchain commands.
#[derive(Debug)]
pub struct ToolchainCompiler {
  ty: CompilerType,
  os: Os,
  cxx: String,
  linker: String,
  python: String,
  include_dirs: Vec<PathBuf>,
  library_dirs: Vec<PathBuf>,
  ext_suffix: String,
  headers: RefCell<Option<PathBuf>>,
}

impl ToolchainCompiler {
  /// Configure a compiler for `os` from the project's toolchain table.
  pub fn new(toolchain: &ToolchainConfig, os: Os) -> Result<Self, ExtensionError> {
    let ty = match &toolchain.compiler_type {
      Some(name) => name.parse()?,
      None => CompilerType::default_for(os),
    };
    let default_cxx = match ty {
      CompilerType::Msvc => "cl",
      CompilerType::Mingw32 | CompilerType::Cygwin => "g++",
      CompilerType::Unix => "c++",
    };
    let cxx = toolchain.cxx.clone().unwrap_or_else(|| default_cxx.to_string());
    let linker = if ty.is_msvc() { "link".to_string() } else { cxx.clone() };
    let ext_suffix = toolchain
      .ext_suffix
      .clone()
      .unwrap_or_else(|| if os.is_windows() { ".pyd" } else { ".so" }.to_string());

    Ok(Self {
      ty,
      os,
      cxx,
      linker,
      python: toolchain.python.clone(),
      include_dirs: toolchain.include_dirs.clone(),
      library_dirs: toolchain.library_dirs.clone(),
      ext_suffix,
      headers: RefCell::new(None),
    })
  }

  fn interpreter_headers(&self) -> Result<Option<PathBuf>, ExtensionError> {
    if !self.include_dirs.is_empty() {
      return Ok(None);
    }
    if let Some(dir) = self.headers.borrow().as_ref() {
      return Ok(Some(dir.clone()));
    }
    let out = run(&self.python, &["-c".to_string(), INCLUDE_QUERY.to_string()], None).map_err(ExtensionError::Headers)?;
    let dir = PathBuf::from(out);
    debug!(path = %dir.display(), "interpreter headers");
    *self.headers.borrow_mut() = Some(dir.clone());
    Ok(Some(dir))
  }

  fn object_path(&self, build_temp: &Path, source: &Path) -> PathBuf {
    let ext = if self.ty.is_msvc() { "obj" } else { "o" };
    build_temp.join(source).with_extension(ext)
  }

  /// Arguments compiling `source` into `object`.
  pub fn compile_args(
    &self,
    ext: &Extension,
    source: &Path,
    object: &Path,
    include_dirs: &[PathBuf],
    debug: bool,
  ) -> Vec<String> {
    let mut args = Vec::new();
    if self.ty.is_msvc() {
      args.extend(["/c", "/nologo"].map(String::from));
      args.push(if debug { "/Od".to_string() } else { "/Ox".to_string() });
      args.extend(include_dirs.iter().map(|d| format!("/I{}", d.display())));
      args.extend(ext.extra_compile_args.iter().cloned());
      args.push(format!("/Tp{}", source.display()));
      args.push(format!("/Fo{}", object.display()));
    } else {
      args.extend(["-c", "-fPIC"].map(String::from));
      args.push(if debug { "-g".to_string() } else { "-O2".to_string() });
      args.extend(include_dirs.iter().map(|d| format!("-I{}", d.display())));
      args.extend(ext.extra_compile_args.iter().cloned());
      args.push(source.display().to_string());
      args.push("-o".to_string());
      args.push(object.display().to_string());
    }
    args
  }

  /// Arguments linking `objects` into `output`.
  pub fn link_args(&self, ext: &Extension, objects: &[PathBuf], output: &Path) -> Vec<String> {
    let mut args = Vec::new();
    if self.ty.is_msvc() {
      args.extend(["/DLL", "/nologo"].map(String::from));
      args.extend(objects.iter().map(|o| o.display().to_string()));
      args.extend(self.library_dirs.iter().map(|d| format!("/LIBPATH:{}", d.display())));
      args.extend(ext.libraries.iter().map(|l| format!("{}.lib", l)));
      args.push(format!("/OUT:{}", output.display()));
    } else {
      args.push("-shared".to_string());
      if self.os == Os::MacOs {
        args.extend(["-undefined", "dynamic_lookup"].map(String::from));
      }
      args.extend(objects.iter().map(|o| o.display().to_string()));
      args.extend(self.library_dirs.iter().map(|d| format!("-L{}", d.display())));
      args.extend(ext.libraries.iter().map(|l| format!("-l{}", l)));
      args.push("-o".to_string());
      args.push(output.display().to_string());
    }
    args
  }
}

impl ExtensionCompiler for ToolchainCompiler {
  fn compiler_type(&self) -> CompilerType {
    self.ty
  }

  fn ext_suffix(&self) -> &str {
    &self.ext_suffix
  }

  fn build_extension(&self, ext: &Extension, target: &ExtensionTarget) -> Result<(), ExtensionError> {
    let mut include_dirs = self.include_dirs.clone();
    include_dirs.extend(self.interpreter_headers()?);

    let mut objects = Vec::with_capacity(ext.sources.len());
    for source in &ext.sources {
      let object = self.object_path(&target.build_temp, source);
      if let Some(parent) = object.parent() {
        mkpath(parent, false)?;
      }
      let args = self.compile_args(ext, &target.root.join(source), &object, &include_dirs, target.debug);
      run(&self.cxx, &args, Some(&target.root)).map_err(|source_err| ExtensionError::Compile {
        name: ext.name.clone(),
        source_file: source.clone(),
        source: source_err,
      })?;
      objects.push(object);
    }

    if let Some(parent) = target.output.parent() {
      mkpath(parent, false)?;
    }
    let args = self.link_args(ext, &objects, &target.output);
    run(&self.linker, &args, Some(&target.root)).map_err(|source| ExtensionError::Link {
      name: ext.name.clone(),
      source,
    })?;
    Ok(())
  }
}
