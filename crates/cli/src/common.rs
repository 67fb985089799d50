//! Common utilities and types shared across CLI commands

use anyhow::Context;
use githooks_config::{Config, GitCli, GitProvider, Overrides, Repository};
use githooks_engine::HookResolver;
use githooks_engine::install::open_repository;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Runtime context for CLI commands
///
/// Holds what every command needs: the git provider, the directory the
/// command operates on (`-C`), and the configuration overrides from the
/// command line. Configuration itself is resolved on demand so it always
/// reflects git config at the moment a command runs.
///
/// # Examples
///
/// ```no_run
/// use githooks::common::RuntimeContext;
/// use githooks_config::{GitCli, Overrides};
/// use std::path::Path;
///
/// let context = RuntimeContext::new(GitCli::new()?, Path::new("."), Overrides::default());
/// let repo = context.repository()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Git provider used for every git query
    pub git: GitCli,
    /// Directory the command operates on
    working_dir: PathBuf,
    /// Values from flags and environment
    overrides: Overrides,
}

impl RuntimeContext {
    /// Create a new runtime context
    pub fn new(git: GitCli, working_dir: &Path, overrides: Overrides) -> Self {
        Self {
            git,
            working_dir: working_dir.to_path_buf(),
            overrides,
        }
    }

    /// Create a context for the process's current directory
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be found or the current directory is
    /// unavailable.
    pub fn from_env(directory: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let git = GitCli::new()?;
        let working_dir = match directory {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        Ok(Self::new(git, &working_dir, overrides))
    }

    /// Git provider as the trait object the engine expects
    #[inline]
    pub fn provider(&self) -> &dyn GitProvider {
        &self.git
    }

    /// Directory the command operates on
    #[inline]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Repository containing the working directory
    ///
    /// # Errors
    ///
    /// Returns `NotARepository` outside a repository.
    pub fn repository(&self) -> Result<Repository> {
        Ok(open_repository(&self.git, &self.working_dir)?)
    }

    /// Resolve configuration, reading repository config when `repo` is given
    ///
    /// # Errors
    ///
    /// Returns an error if git config cannot be read.
    pub fn config(&self, repo: Option<&Repository>) -> Result<Config> {
        Ok(Config::resolve(
            &self.git,
            repo.map(|r| r.root.as_path()),
            &self.overrides,
        )?)
    }

    /// Hook resolver for a repository, including its identity scope
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be queried.
    pub fn resolver(&self, repo: &Repository) -> Result<HookResolver> {
        let config = self.config(Some(repo))?;
        let identity = self.git.root_commit(&repo.root)?;
        Ok(HookResolver::for_repository(repo, &config, identity))
    }
}
