/// Application name used in log output and default file names.
pub const APP_NAME: &str = "enaml-build";

/// Default project file looked up in the working directory.
pub const PROJECT_FILE: &str = "enaml-build.toml";

/// Extension of markup source files, including the leading dot.
pub const MARKUP_EXTENSION: &str = ".enaml";

/// Glob used to discover markup files inside a package source directory.
pub const MARKUP_PATTERN: &str = "*.enaml";

/// Directory created beside each markup file to hold compiled artifacts.
pub const MARKUP_CACHE_DIR: &str = "__enamlcache__";

/// Extension of compiled markup artifacts.
pub const MARKUP_CACHE_EXTENSION: &str = "enamlc";

/// Version of the markup compiler's code generator. Part of the cache tag.
pub const MARKUP_COMPILER_VERSION: u32 = 24;

/// Extension of ordinary interpreter modules, including the leading dot.
pub const MODULE_EXTENSION: &str = ".py";

/// Marker file that turns a directory into an importable package.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// Default build output root, relative to the project root.
pub const DEFAULT_BUILD_LIB: &str = "build/lib";

/// Default scratch directory for native object files.
pub const DEFAULT_BUILD_TEMP: &str = "build/temp";

/// Path-configuration file that `develop` appends the project root to.
pub const EASY_INSTALL_PTH: &str = "easy-install.pth";
