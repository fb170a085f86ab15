//! Implementation of the `enaml-build files` command.
//!
//! Lists, per package, the data and markup files a build would copy, without
//! copying anything.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use enaml_build_lib::build_py::{BuildPy, BuildTuple};
use enaml_build_lib::compile::command::InterpreterCompiler;
use enaml_build_lib::config::{CompileFlags, GlobalOptions};

use super::load_project;
use crate::output::{OutputFormat, print_info, print_json, symbols};

#[derive(Serialize)]
struct PackageFiles {
  #[serde(flatten)]
  tuple: BuildTuple,
  kind: &'static str,
}

pub fn cmd_files(project: &Path, package: Option<&str>, output: OutputFormat) -> Result<()> {
  let project = load_project(project)?;
  if let Some(name) = package.filter(|name| !project.has_package(name)) {
    bail!("package '{}' is not registered in this project", name);
  }

  let compiler = InterpreterCompiler::new(&project.toolchain);
  let mut step = BuildPy::new(&project, GlobalOptions::default(), CompileFlags::for_build(), &compiler);

  let data = step.package_data_files().context("Failed to collect package data")?;
  let markup = step.locate_all_markup().context("Failed to locate markup files")?;

  let listing: Vec<PackageFiles> = data
    .into_iter()
    .map(|tuple| PackageFiles { tuple, kind: "data" })
    .chain(markup.into_iter().map(|tuple| PackageFiles { tuple, kind: "markup" }))
    .filter(|entry| package.is_none_or(|name| entry.tuple.package == name))
    .collect();

  if output.is_json() {
    return print_json(&listing);
  }

  let mut shown = 0;
  for entry in &listing {
    if entry.tuple.filenames.is_empty() {
      continue;
    }
    println!(
      "{} ({}) {} {} {}",
      entry.tuple.package,
      entry.kind,
      entry.tuple.src_dir.display(),
      symbols::ARROW,
      entry.tuple.build_dir.display()
    );
    for filename in &entry.tuple.filenames {
      println!("  {} {}", symbols::INFO, filename.display());
      shown += 1;
    }
  }
  if shown == 0 {
    print_info("No data or markup files found");
  }

  Ok(())
}
