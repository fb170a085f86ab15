//! Implementation of the `enaml-build install` command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use enaml_build_lib::command::Pipeline;
use enaml_build_lib::config::{CompileFlags, GlobalOptions};
use enaml_build_lib::platform::Os;

use super::build::describe_markup;
use super::{Tools, load_project, resolve_install_dir};
use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success, print_warning};

/// Regenerate parser tables, build the project, then install the build tree.
///
/// Table generation runs first; if it fails nothing is built or installed.
pub fn cmd_install(
  project: &Path,
  options: GlobalOptions,
  flags: CompileFlags,
  install_dir: Option<PathBuf>,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();
  let project = load_project(project)?;
  let install_dir = resolve_install_dir(install_dir)?;
  let os = Os::current();
  let tools = Tools::new(&project, os)?;

  let report = Pipeline::new(&project, options, os, tools.toolset())
    .install(flags, &install_dir)
    .context("Install failed")?;

  if output.is_json() {
    return print_json(&report);
  }

  println!();
  if options.dry_run {
    print_info("Dry run - no changes made");
  } else {
    print_success("Install complete!");
  }
  if report.install.outputs.is_empty() {
    print_warning("Nothing was installed; the build tree is empty");
  }
  print_stat("Install dir", &install_dir.display().to_string());
  print_stat("Files installed", &report.install.outputs.len().to_string());
  print_stat("Modules compiled", &report.install.compiled.modules.to_string());
  print_stat("Markup", &describe_markup(report.install.compiled.markup));
  print_stat("Extensions", &report.build.extensions.len().to_string());
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
