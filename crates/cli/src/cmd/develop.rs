//! Implementation of the `enaml-build develop` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use enaml_build_lib::command::Pipeline;
use enaml_build_lib::config::{CompileFlags, GlobalOptions};
use enaml_build_lib::platform::Os;

use super::build::describe_markup;
use super::{Tools, load_project, resolve_install_dir};
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_develop(
  project: &Path,
  options: GlobalOptions,
  flags: CompileFlags,
  install_dir: Option<PathBuf>,
  output: OutputFormat,
) -> Result<()> {
  let project = load_project(project)?;
  let install_dir = resolve_install_dir(install_dir)?;
  let os = Os::current();
  let tools = Tools::new(&project, os)?;

  let report = Pipeline::new(&project, options, os, tools.toolset())
    .develop(flags, &install_dir)
    .context("Develop failed")?;

  if output.is_json() {
    return print_json(&report);
  }

  println!();
  if options.dry_run {
    print_info("Dry run - no changes made");
  } else {
    print_success(&format!("{} linked for development", project.name));
  }
  print_stat("Link", &report.egg_link.display().to_string());
  print_stat("Extensions", &report.extensions.len().to_string());
  print_stat("Markup", &describe_markup(Some(report.markup)));
  if !report.registered {
    print_info("Project root was already registered");
  }

  Ok(())
}
