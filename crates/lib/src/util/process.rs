//! Running external tools.
//!
//! Every collaborator that lives outside this crate (interpreter, DSL compiler,
//! C++ toolchain) is driven through [`run`], which captures output and turns a
//! non-zero exit into an error carrying the tool's stderr.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

/// Errors from spawning or running an external command.
#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("failed to spawn {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{program} failed with exit code {code:?}: {stderr}")]
  Failed {
    program: String,
    code: Option<i32>,
    stderr: String,
  },
}

/// Render a command line for logs.
pub fn display_command(program: &str, args: &[String]) -> String {
  let mut line = program.to_string();
  for arg in args {
    line.push(' ');
    if arg.contains(' ') {
      line.push('"');
      line.push_str(arg);
      line.push('"');
    } else {
      line.push_str(arg);
    }
  }
  line
}

/// Run `program` with `args`, optionally in `cwd`, and return its trimmed
/// stdout.
pub fn run(program: &str, args: &[String], cwd: Option<&Path>) -> Result<String, ProcessError> {
  info!(cmd = %display_command(program, args), "executing command");

  let mut command = Command::new(program);
  command.args(args);
  if let Some(dir) = cwd {
    command.current_dir(dir);
  }

  let output = command.output().map_err(|source| ProcessError::Spawn {
    program: program.to_string(),
    source,
  })?;

  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
  let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

  if !output.status.success() {
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }
    return Err(ProcessError::Failed {
      program: program.to_string(),
      code: output.status.code(),
      stderr,
    });
  }

  if !stderr.is_empty() {
    debug!(stderr = %stderr, "command stderr");
  }

  Ok(stdout)
}
