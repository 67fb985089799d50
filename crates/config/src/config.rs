//! Runtime configuration
//!
//! Configuration is resolved fresh for every invocation, highest
//! precedence first:
//!
//! 1. command-line flags / environment (passed in as [`Overrides`])
//! 2. git config (`hooks.home`, `hooks.contrib`)
//! 3. built-in defaults (see [`crate::dirs`])

use crate::dirs::{default_hooks_home, default_template_dir, expand_tilde};
use crate::git::{CONTRIB_KEY, GitProvider, HOOKS_HOME_KEY};
use githooks_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Hooks home (`--hooks-home` / `GIT_HOOKS_HOME`)
    pub hooks_home: Option<PathBuf>,
    /// Global template directory (`--template-dir`)
    pub template_dir: Option<PathBuf>,
}

/// Resolved git-hooks configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding global (`<home>/<trigger>`) and identity-scoped
    /// (`<home>/<identity>/<trigger>`) subordinate scripts
    pub hooks_home: PathBuf,
    /// Contributed hook directories, in declaration order
    pub contrib_dirs: Vec<PathBuf>,
    /// Directory used by `install-global`
    pub template_dir: PathBuf,
}

impl Config {
    /// Resolve configuration for an optional repository root
    ///
    /// `repo_root` selects which git configuration is consulted for
    /// `hooks.contrib`: the repository's (merged with global) when given,
    /// global only otherwise. Relative contributed directories are resolved
    /// against the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if git config cannot be read, or if no hooks home or
    /// template directory can be determined (no home directory).
    pub fn resolve(
        git: &dyn GitProvider,
        repo_root: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self> {
        let hooks_home = match &overrides.hooks_home {
            Some(path) => expand_tilde(path),
            None => git
                .config_get_all(repo_root, HOOKS_HOME_KEY)?
                .pop()
                .map(|value| expand_tilde(Path::new(&value)))
                .or_else(default_hooks_home)
                .ok_or_else(|| {
                    Error::Message(
                        "Could not determine hooks home (home directory not found). \
                         Please specify with --hooks-home or GIT_HOOKS_HOME."
                            .to_string(),
                    )
                })?,
        };

        let contrib_dirs = git
            .config_get_all(repo_root, CONTRIB_KEY)?
            .iter()
            .map(|value| {
                let path = expand_tilde(Path::new(value));
                match repo_root {
                    Some(root) if path.is_relative() => root.join(path),
                    _ => path,
                }
            })
            .collect();

        let template_dir = overrides
            .template_dir
            .as_deref()
            .map(expand_tilde)
            .or_else(default_template_dir)
            .ok_or_else(|| {
                Error::Message(
                    "Could not determine template directory. Please specify with --template-dir."
                        .to_string(),
                )
            })?;

        Ok(Self {
            hooks_home,
            contrib_dirs,
            template_dir,
        })
    }
}
