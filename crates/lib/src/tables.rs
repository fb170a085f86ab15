//! Parser table generation.
//!
//! The markup parser caches its lexer and parser tables on disk. They are
//! regenerated before `install` and `develop` so the installed tables match
//! the interpreter doing the install.

use thiserror::Error;
use tracing::info;

use crate::project::ToolchainConfig;
use crate::util::process::{ProcessError, run};

const WRITE_TABLES_SNIPPET: &str = "from enaml.core.parsing import write_tables; write_tables()";

#[derive(Debug, Error)]
pub enum TablesError {
  #[error("failed to write parser tables: {0}")]
  Generate(#[source] ProcessError),
}

/// Regenerates the parser's lookup tables.
pub trait TableWriter {
  /// Write the tables. Running it twice leaves the same tables in place.
  fn write_tables(&self) -> Result<(), TablesError>;
}

/// Runs a program that writes the tables, by default the configured
/// interpreter importing the parser.
#[derive(Debug, Clone)]
pub struct CommandTableWriter {
  program: String,
  args: Vec<String>,
}

impl CommandTableWriter {
  pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
    Self {
      program: program.into(),
      args,
    }
  }

  pub fn for_interpreter(toolchain: &ToolchainConfig) -> Self {
    Self::new(
      toolchain.python.clone(),
      vec!["-c".to_string(), WRITE_TABLES_SNIPPET.to_string()],
    )
  }
}

impl TableWriter for CommandTableWriter {
  fn write_tables(&self) -> Result<(), TablesError> {
    info!("writing parser tables");
    run(&self.program, &self.args, None).map_err(TablesError::Generate)?;
    Ok(())
  }
}
