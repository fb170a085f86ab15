use std::path::Path;

use anyhow::{Context, Result};

use enaml_build_lib::command::Pipeline;
use enaml_build_lib::config::GlobalOptions;
use enaml_build_lib::platform::Os;

use super::{Tools, load_project};
use crate::output::{OutputFormat, display_path, print_info, print_json, print_success, symbols};

pub fn cmd_clean(project: &Path, options: GlobalOptions, output: OutputFormat) -> Result<()> {
  let project = load_project(project)?;
  let os = Os::current();
  let tools = Tools::new(&project, os)?;

  let report = Pipeline::new(&project, options, os, tools.toolset())
    .clean()
    .context("Clean failed")?;

  if output.is_json() {
    return print_json(&report);
  }

  if report.removed.is_empty() {
    print_info("Nothing to clean");
    return Ok(());
  }
  for path in &report.removed {
    println!("  {} {}", symbols::REMOVE, display_path(path, &project.root));
  }
  if options.dry_run {
    print_info("Dry run - no changes made");
  } else {
    print_success("Clean complete!");
  }

  Ok(())
}
