//! Implementation of the `enaml-build build` command.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use enaml_build_lib::command::Pipeline;
use enaml_build_lib::compile::MarkupCompileOutcome;
use enaml_build_lib::config::{CompileFlags, GlobalOptions};
use enaml_build_lib::platform::Os;

use super::{Tools, load_project};
use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success};

pub fn cmd_build(project: &Path, options: GlobalOptions, flags: CompileFlags, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let project = load_project(project)?;
  let os = Os::current();
  let tools = Tools::new(&project, os)?;

  let report = Pipeline::new(&project, options, os, tools.toolset())
    .build(flags)
    .context("Build failed")?;

  if output.is_json() {
    return print_json(&report);
  }

  println!();
  if options.dry_run {
    print_info("Dry run - no changes made");
  } else {
    print_success("Build complete!");
  }
  print_stat("Files", &report.packages.outputs.len().to_string());
  print_stat("Modules compiled", &report.packages.compiled.modules.to_string());
  print_stat("Markup", &describe_markup(report.packages.compiled.markup));
  print_stat("Extensions", &report.extensions.len().to_string());
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}

/// One-line summary of a markup compile stage.
pub(super) fn describe_markup(outcome: Option<MarkupCompileOutcome>) -> String {
  match outcome {
    Some(MarkupCompileOutcome::Compiled(n)) => format!("{} compiled", n),
    Some(MarkupCompileOutcome::BytecodeDisabled) => "skipped (bytecode disabled)".to_string(),
    Some(MarkupCompileOutcome::DryRun) => "skipped (dry run)".to_string(),
    Some(MarkupCompileOutcome::NotRequested) | None => "not compiled".to_string(),
  }
}
