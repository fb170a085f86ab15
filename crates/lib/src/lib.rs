//! enaml-build-lib: build pipeline for enaml projects
//!
//! This crate provides the pieces behind the `enaml-build` tool:
//! - `Project`: the `enaml-build.toml` project model and package lookup
//! - `BuildPy` / `MarkupBuildPy`: the build step, shipping and compiling markup
//! - `InstallLib` / `MarkupInstallLib`: the install step
//! - `BuildExt`: the framework's native extension modules
//! - `Pipeline`: the `build`, `install`, `develop` and `clean` commands

pub mod build_py;
pub mod command;
pub mod compile;
pub mod config;
pub mod consts;
pub mod error;
pub mod ext;
pub mod install_lib;
pub mod manifest;
pub mod platform;
pub mod project;
pub mod tables;
pub mod util;
