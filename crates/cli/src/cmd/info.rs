use std::path::Path;

use anyhow::Result;

use enaml_build_lib::ext::{ExtensionCompiler, extensions_for};
use enaml_build_lib::platform::Os;
use enaml_build_lib::platform::paths::install_dir;

use super::{Tools, load_project};
use crate::output::{OutputFormat, print_json, print_stat, print_success};

pub fn cmd_info(project: &Path, output: OutputFormat) -> Result<()> {
  let project = load_project(project)?;
  let os = Os::current();
  let tools = Tools::new(&project, os)?;
  let compiler = &tools.extensions;
  let extensions: Vec<String> = if project.build.extensions {
    extensions_for(os).into_iter().map(|e| e.name).collect()
  } else {
    Vec::new()
  };
  let default_install = install_dir();

  if output.is_json() {
    let json_output = serde_json::json!({
      "name": project.name,
      "version": project.version,
      "root": project.root,
      "packages": project.packages,
      "build_lib": project.build.build_lib,
      "build_temp": project.build.build_temp,
      "platform": os.as_str(),
      "python": project.toolchain.python,
      "compiler_type": compiler.compiler_type().as_str(),
      "ext_suffix": compiler.ext_suffix(),
      "extensions": extensions,
      "install_dir": default_install,
    });
    return print_json(&json_output);
  }

  match &project.version {
    Some(version) => print_success(&format!("{} {}", project.name, version)),
    None => print_success(&project.name),
  }
  print_stat("Root", &project.root.display().to_string());
  print_stat("Packages", &project.packages.join(", "));
  print_stat("Build dir", &project.build.build_lib.display().to_string());
  print_stat("Platform", os.as_str());
  print_stat("Python", &project.toolchain.python);
  print_stat("Compiler", compiler.compiler_type().as_str());
  print_stat("Extensions", &extensions.len().to_string());
  match default_install {
    Some(dir) => print_stat("Install dir", &dir.display().to_string()),
    None => print_stat("Install dir", "(not set)"),
  }

  Ok(())
}
