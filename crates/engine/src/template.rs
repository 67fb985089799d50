//! Global template management
//!
//! git copies the contents of `init.templateDir` into every repository it
//! creates or clones. Installing entry points into `<template>/hooks` and
//! pointing `init.templateDir` at the template makes every new repository
//! start out installed. Existing repositories are not affected.

use crate::install::{self, HooksDir, InstallReport, UninstallReport};
use githooks_config::dirs::expand_tilde;
use githooks_config::git::TEMPLATE_DIR_KEY;
use githooks_config::GitProvider;
use githooks_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of [`install_global`]
#[derive(Debug)]
pub struct GlobalInstallReport {
    /// Template directory now configured
    pub template_dir: PathBuf,
    /// Value of `init.templateDir` before the install, if any
    pub previous: Option<String>,
    /// Per-trigger results for the template's hooks directory
    pub install: InstallReport,
}

impl GlobalInstallReport {
    /// Whether a different template directory was configured before
    #[must_use]
    pub fn repointed(&self) -> bool {
        self.previous
            .as_deref()
            .is_some_and(|previous| expand_tilde(Path::new(previous)) != self.template_dir)
    }
}

/// Result of [`uninstall_global`]
#[derive(Debug)]
pub struct GlobalUninstallReport {
    /// Template directory that was configured
    pub template_dir: PathBuf,
    /// Per-trigger results, `None` when the template held no entry points
    pub uninstall: Option<UninstallReport>,
    /// Whether the emptied template directory was removed
    pub removed_dir: bool,
}

/// Install entry points into a template and point git at it
///
/// Entry points are always (re)written: the template is owned by
/// git-hooks. A previously configured template directory is replaced and
/// reported in [`GlobalInstallReport::previous`].
///
/// # Errors
///
/// Returns an error if the template cannot be created or git config
/// cannot be read or written.
#[tracing::instrument(skip(git))]
pub fn install_global(git: &dyn GitProvider, template_dir: &Path) -> Result<GlobalInstallReport> {
    fs::create_dir_all(template_dir)?;
    let template_dir = fs::canonicalize(template_dir)?;

    let install = install::install(&HooksDir::new(template_dir.join("hooks")), true)?;

    let previous = git.global_config_get(TEMPLATE_DIR_KEY)?;
    let value = template_dir.to_string_lossy();
    git.global_config_set(TEMPLATE_DIR_KEY, &value)?;
    tracing::debug!(previous = ?previous, "Set {TEMPLATE_DIR_KEY} to {value}");

    Ok(GlobalInstallReport {
        template_dir,
        previous,
        install,
    })
}

/// Remove the global template configuration and its entry points
///
/// # Errors
///
/// Returns `NotExistHooks` when `init.templateDir` is not set, or an error
/// if git config cannot be changed or the template cannot be read.
#[tracing::instrument(skip(git))]
pub fn uninstall_global(git: &dyn GitProvider) -> Result<GlobalUninstallReport> {
    let Some(configured) = git.global_config_get(TEMPLATE_DIR_KEY)? else {
        return Err(Error::NotExistHooks);
    };
    git.global_config_unset(TEMPLATE_DIR_KEY)?;

    let template_dir = expand_tilde(Path::new(&configured));
    let hooks = HooksDir::new(template_dir.join("hooks"));

    let uninstall = match install::uninstall(&hooks) {
        Ok(report) => Some(report),
        Err(Error::NotExistHooks) => {
            tracing::debug!("No entry points in {}", hooks.path().display());
            None
        }
        Err(e) => return Err(e),
    };

    let removed_dir = remove_if_empty(hooks.path())? && remove_if_empty(&template_dir)?;

    Ok(GlobalUninstallReport {
        template_dir,
        uninstall,
        removed_dir,
    })
}

/// Remove `dir` if it exists and is empty
fn remove_if_empty(dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e.into()),
    };
    if entries.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir)?;
    Ok(true)
}
