//! Native extension modules.
//!
//! The framework ships a fixed set of hand-written C++ extension modules.
//! [`extensions_for`] lists them for a target platform and [`compile_flags`]
//! holds the per-compiler extra flags that [`BuildExt`] applies to every one
//! before handing them to an [`ExtensionCompiler`].
//!
//! # Submodules
//!
//! - [`build`] - the extension build step
//! - [`toolchain`] - compiler driver invoking a C++ toolchain

pub mod build;
pub mod toolchain;

pub use build::{BuildExt, ExtensionCompiler, ExtensionTarget};
pub use toolchain::ToolchainCompiler;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::platform::Os;
use crate::util::fs::FsError;
use crate::util::process::ProcessError;

/// Errors from building native extensions.
#[derive(Debug, Error)]
pub enum ExtensionError {
  #[error("unknown compiler type '{0}'")]
  UnknownCompilerType(String),

  #[error("failed to compile {source_file} for {name}: {source}")]
  Compile {
    name: String,
    source_file: PathBuf,
    #[source]
    source: ProcessError,
  },

  #[error("failed to link {name}: {source}")]
  Link {
    name: String,
    #[source]
    source: ProcessError,
  },

  #[error("failed to locate interpreter headers: {0}")]
  Headers(#[source] ProcessError),

  #[error(transparent)]
  Fs(#[from] FsError),
}

/// A native extension module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extension {
  /// Dotted module name, e.g. `enaml.core.alias`.
  pub name: String,
  /// Project-relative source files.
  pub sources: Vec<PathBuf>,
  /// Source language, as the toolchain names it (`c++`).
  pub language: String,
  pub libraries: Vec<String>,
  pub extra_compile_args: Vec<String>,
}

impl Extension {
  fn cxx(name: &str, libraries: &[&str]) -> Self {
    let leaf = name.rsplit('.').next().unwrap_or(name);
    Self {
      name: name.to_string(),
      sources: vec![PathBuf::from(format!("enaml/src/{}.cpp", leaf))],
      language: "c++".to_string(),
      libraries: libraries.iter().map(|l| l.to_string()).collect(),
      extra_compile_args: Vec::new(),
    }
  }

  /// Package part of the dotted name (`enaml.core` for `enaml.core.alias`).
  pub fn package(&self) -> &str {
    self.name.rsplit_once('.').map(|(package, _)| package).unwrap_or("")
  }

  /// Last segment of the dotted name.
  pub fn leaf(&self) -> &str {
    self.name.rsplit('.').next().unwrap_or(&self.name)
  }
}

const PORTABLE_EXTENSIONS: [&str; 10] = [
  "enaml.weakmethod",
  "enaml.callableref",
  "enaml.signaling",
  "enaml.core.funchelper",
  "enaml.colorext",
  "enaml.fontext",
  "enaml.core.dynamicscope",
  "enaml.core.alias",
  "enaml.core.declarative_function",
  "enaml.c_compat",
];

/// Extension modules built for `os`.
///
/// Windows additionally gets `enaml.winutil`, linked against the user and GDI
/// system libraries.
pub fn extensions_for(os: Os) -> Vec<Extension> {
  let mut extensions: Vec<Extension> = PORTABLE_EXTENSIONS.iter().map(|name| Extension::cxx(name, &[])).collect();
  if os.is_windows() {
    extensions.push(Extension::cxx("enaml.winutil", &["user32", "gdi32"]));
  }
  extensions
}

/// Extra compile flags per compiler type.
const COMPILE_FLAGS: &[(&str, &[&str])] = &[("msvc", &["/EHsc"])];

/// Extra compile flags for a compiler type; none for unlisted types.
pub fn compile_flags(compiler_type: &str) -> Vec<String> {
  COMPILE_FLAGS
    .iter()
    .find(|(ty, _)| *ty == compiler_type)
    .map(|(_, flags)| flags.iter().map(|f| f.to_string()).collect())
    .unwrap_or_default()
}

/// Family of C++ toolchain an [`ExtensionCompiler`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerType {
  Unix,
  Msvc,
  Mingw32,
  Cygwin,
}

impl CompilerType {
  /// Default compiler type for `os`.
  pub fn default_for(os: Os) -> Self {
    if os.is_windows() { Self::Msvc } else { Self::Unix }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Unix => "unix",
      Self::Msvc => "msvc",
      Self::Mingw32 => "mingw32",
      Self::Cygwin => "cygwin",
    }
  }

  /// Whether the toolchain takes MSVC-style (`/flag`) arguments.
  pub fn is_msvc(&self) -> bool {
    matches!(self, Self::Msvc)
  }
}

impl fmt::Display for CompilerType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for CompilerType {
  type Err = ExtensionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "unix" => Ok(Self::Unix),
      "msvc" => Ok(Self::Msvc),
      "mingw32" => Ok(Self::Mingw32),
      "cygwin" => Ok(Self::Cygwin),
      other => Err(ExtensionError::UnknownCompilerType(other.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ten_portable_extensions_off_windows() {
    let extensions = extensions_for(Os::Linux);

    assert_eq!(extensions.len(), 10);
    assert!(extensions.iter().all(|e| e.language == "c++"));
    assert!(extensions.iter().all(|e| e.libraries.is_empty()));
    assert!(!extensions.iter().any(|e| e.name == "enaml.winutil"));
    assert_eq!(extensions_for(Os::MacOs), extensions);
  }

  #[test]
  fn windows_adds_winutil() {
    let extensions = extensions_for(Os::Windows);

    assert_eq!(extensions.len(), 11);
    let winutil = extensions.last().unwrap();
    assert_eq!(winutil.name, "enaml.winutil");
    assert_eq!(winutil.sources, vec![PathBuf::from("enaml/src/winutil.cpp")]);
    assert_eq!(winutil.libraries, vec!["user32".to_string(), "gdi32".to_string()]);
  }

  #[test]
  fn sources_follow_leaf_name() {
    let extensions = extensions_for(Os::Linux);
    let alias = extensions.iter().find(|e| e.name == "enaml.core.alias").unwrap();

    assert_eq!(alias.sources, vec![PathBuf::from("enaml/src/alias.cpp")]);
    assert_eq!(alias.package(), "enaml.core");
    assert_eq!(alias.leaf(), "alias");
  }

  #[test]
  fn only_msvc_gets_extra_flags() {
    assert_eq!(compile_flags("msvc"), vec!["/EHsc".to_string()]);
    assert!(compile_flags("unix").is_empty());
    assert!(compile_flags("mingw32").is_empty());
    assert!(compile_flags("something-else").is_empty());
  }

  #[test]
  fn compiler_type_defaults_per_platform() {
    assert_eq!(CompilerType::default_for(Os::Windows), CompilerType::Msvc);
    assert_eq!(CompilerType::default_for(Os::Linux), CompilerType::Unix);
    assert_eq!("mingw32".parse::<CompilerType>().unwrap(), CompilerType::Mingw32);
    assert!(matches!(
      "bcpp".parse::<CompilerType>(),
      Err(ExtensionError::UnknownCompilerType(_))
    ));
  }
}
