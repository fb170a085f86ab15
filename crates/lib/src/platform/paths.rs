use std::path::PathBuf;

use crate::consts::APP_NAME;

/// Environment variable overriding the default install directory.
pub const INSTALL_DIR_ENV: &str = "ENAML_BUILD_INSTALL_DIR";

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> Option<PathBuf> {
  std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join(APP_NAME))
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> Option<PathBuf> {
  let data_home = std::env::var_os("XDG_DATA_HOME")
    .map(PathBuf::from)
    .or_else(|| home_dir().map(|h| h.join(".local").join("share")))?;
  Some(data_home.join(APP_NAME))
}

/// Returns the directory `install` copies the built library into when no
/// explicit directory is given.
///
/// `ENAML_BUILD_INSTALL_DIR` takes precedence over the per-user default.
pub fn install_dir() -> Option<PathBuf> {
  if let Some(path) = std::env::var_os(INSTALL_DIR_ENV).filter(|p| !p.is_empty()) {
    return Some(PathBuf::from(path));
  }
  data_dir().map(|d| d.join("site-packages"))
}
