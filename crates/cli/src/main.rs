mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use enaml_build_lib::config::{CompileFlags, GlobalOptions};
use enaml_build_lib::consts::PROJECT_FILE;

use crate::output::OutputFormat;

/// enaml-build - build, install and develop enaml projects
#[derive(Parser)]
#[command(name = "enaml-build")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Do not write compiled artifacts (also set by PYTHONDONTWRITEBYTECODE)
  #[arg(short = 'B', long, global = true)]
  dont_write_bytecode: bool,

  /// Report what would be done without touching the filesystem
  #[arg(short = 'n', long, global = true)]
  dry_run: bool,

  /// Path to the project file
  #[arg(long, global = true, default_value = PROJECT_FILE)]
  project: PathBuf,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

/// Byte-compilation switches shared by build, install and develop.
#[derive(Args, Debug, Clone, Copy)]
struct CompileArgs {
  /// Compile modules and markup
  #[arg(long, overrides_with = "no_compile")]
  compile: bool,

  /// Do not compile
  #[arg(long, overrides_with = "compile")]
  no_compile: bool,

  /// Also compile with optimisation (0 to 2)
  #[arg(short = 'O', long, value_parser = clap::value_parser!(u8).range(0..=2))]
  optimize: Option<u8>,
}

impl CompileArgs {
  fn resolve(self, defaults: CompileFlags) -> CompileFlags {
    let compile = if self.compile {
      true
    } else if self.no_compile {
      false
    } else {
      defaults.compile
    };
    CompileFlags {
      compile,
      optimize: self.optimize.unwrap_or(defaults.optimize),
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Copy packages, data and markup into the build tree and build extensions
  Build {
    #[command(flatten)]
    compile: CompileArgs,

    /// Rebuild everything, even if up to date
    #[arg(short, long)]
    force: bool,
  },

  /// Regenerate parser tables, build, and install into a site directory
  Install {
    #[command(flatten)]
    compile: CompileArgs,

    /// Install directory (default: ENAML_BUILD_INSTALL_DIR or the user data dir)
    #[arg(long)]
    install_dir: Option<PathBuf>,

    /// Overwrite files even if up to date
    #[arg(short, long)]
    force: bool,
  },

  /// Regenerate parser tables, build extensions in place, and link the sources
  Develop {
    #[command(flatten)]
    compile: CompileArgs,

    /// Install directory (default: ENAML_BUILD_INSTALL_DIR or the user data dir)
    #[arg(long)]
    install_dir: Option<PathBuf>,
  },

  /// Remove the build directories
  Clean,

  /// Show project and toolchain information
  Info,

  /// List the markup and data files each package ships
  Files {
    /// Only show this package
    #[arg(short, long)]
    package: Option<String>,
  },
}

/// PYTHONDONTWRITEBYTECODE counts when set to any non-empty value.
fn bytecode_disabled_by_env() -> bool {
  std::env::var_os("PYTHONDONTWRITEBYTECODE").is_some_and(|v| !v.is_empty())
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let mut options = GlobalOptions {
    dry_run: cli.dry_run,
    dont_write_bytecode: cli.dont_write_bytecode || bytecode_disabled_by_env(),
    force: false,
  };
  debug!(project = %cli.project.display(), ?options, "starting");

  let result = match cli.command {
    Commands::Build { compile, force } => {
      options.force = force;
      cmd::cmd_build(&cli.project, options, compile.resolve(CompileFlags::for_build()), cli.output)
    }
    Commands::Install {
      compile,
      install_dir,
      force,
    } => {
      options.force = force;
      cmd::cmd_install(
        &cli.project,
        options,
        compile.resolve(CompileFlags::for_install()),
        install_dir,
        cli.output,
      )
    }
    Commands::Develop { compile, install_dir } => cmd::cmd_develop(
      &cli.project,
      options,
      compile.resolve(CompileFlags::for_build()),
      install_dir,
      cli.output,
    ),
    Commands::Clean => cmd::cmd_clean(&cli.project, options, cli.output),
    Commands::Info => cmd::cmd_info(&cli.project, cli.output),
    Commands::Files { package } => cmd::cmd_files(&cli.project, package.as_deref(), cli.output),
  };

  if let Err(e) = result {
    output::print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
  Ok(())
}
