//! git-hooks CLI library
//!
//! This library contains all the CLI logic for git-hooks, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use githooks_config::Overrides;
use std::path::PathBuf;
use std::sync::LazyLock;

use command::Command;
use common::RuntimeContext;

static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{}\nrustc: {}\nbuilt: {}",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown"),
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
    )
});

/// git-hooks - run a directory of scripts for every git hook
#[derive(Parser)]
#[command(name = "git-hooks", bin_name = "git hooks")]
#[command(about = "Manage git hooks as directories of scripts")]
#[command(version, long_version = LONG_VERSION.as_str())]
#[command(long_about = "Manage git hooks as directories of scripts

git-hooks installs one small entry point per git hook. When git fires a
hook, the entry point runs every executable script found for it in:
  • <repo>/.githooks/<hook>/           project scripts, committed with the code
  • <hooks home>/<hook>/               your scripts for every repository
  • <hooks home>/<identity>/<hook>/    your scripts for one repository
  • <dir>/<hook>/ for each hooks.contrib directory

Scripts run in lexical order within a directory. For hooks that can stop
git (pre-commit, commit-msg, pre-push, ...) the first failure aborts.")]
pub struct Cli {
    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Directory holding global and per-repository scripts
    #[arg(long, global = true, env = "GIT_HOOKS_HOME", value_name = "DIR")]
    pub hooks_home: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, global = true, env = "GIT_HOOKS_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for git-hooks CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Install git-hooks entry points in the current repository
    #[command(long_about = "Install git-hooks entry points in the current repository

An entry point is written for every hook git knows. A hook that already
exists and is not managed by git-hooks is moved to <hook>.origin and keeps
running before any other script.

Fails without changing anything when git-hooks entry points are already
present; pass --force to rewrite them.")]
    Install(cmd::install::InstallCommand),

    /// Remove git-hooks entry points and restore replaced hooks
    Uninstall(cmd::install::UninstallCommand),

    /// Show installation state and the scripts each hook runs
    List(cmd::list::ListCommand),

    /// Install entry points into a template used by every new repository
    #[command(long_about = "Install entry points into a template used by every new repository

The template directory is registered as init.templateDir in your global
git config, so repositories created by `git init` or `git clone` start out
with git-hooks installed. Existing repositories are not changed.")]
    InstallGlobal(cmd::global::InstallGlobalCommand),

    /// Remove the global template and unset init.templateDir
    UninstallGlobal(cmd::global::UninstallGlobalCommand),

    /// Print the repository identity (its root commit)
    Identity(cmd::identity::IdentityCommand),

    /// Update git-hooks to the latest release
    Update(cmd::update::UpdateCommand),

    /// Run the scripts for a hook (invoked by the entry points)
    #[command(hide = true)]
    Run(cmd::run::RunCommand),
}

/// Main entry point for the CLI logic
///
/// Returns the exit status for the process: the aggregate hook status for
/// `run`, zero for every other command that succeeds.
///
/// # Errors
///
/// Returns an error if logging cannot be set up or the command fails.
pub fn run(cli: Cli) -> Result<i32> {
    githooks_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let overrides = Overrides {
        hooks_home: cli.hooks_home,
        template_dir: None,
    };
    let context = RuntimeContext::from_env(cli.directory.as_deref(), overrides)?;

    match cli.command {
        Commands::Install(cmd) => cmd.execute(&context)?,
        Commands::Uninstall(cmd) => cmd.execute(&context)?,
        Commands::List(cmd) => cmd.execute(&context)?,
        Commands::InstallGlobal(cmd) => cmd.execute(&context)?,
        Commands::UninstallGlobal(cmd) => cmd.execute(&context)?,
        Commands::Identity(cmd) => {
            cmd.execute(&context)?;
        }
        Commands::Update(cmd) => cmd.execute(&context)?,
        Commands::Run(cmd) => return Ok(cmd.execute(&context)?),
    }

    Ok(0)
}
