//! Hook directory resolution
//!
//! Finds the subordinate scripts to run for a trigger. Candidate
//! directories are visited in a fixed precedence order:
//!
//! 1. legacy: the foreign hook displaced at install time (`<hooks>/<trigger>.origin`)
//! 2. project: `<repo>/.githooks/<trigger>/`
//! 3. global: `<hooks home>/<trigger>/`
//! 4. user: `<hooks home>/<identity>/<trigger>/`
//! 5. contrib: `<dir>/<trigger>/` for each configured contrib directory
//!
//! Within a directory, scripts run in lexical file name order.

use super::script::BACKUP_SUFFIX;
use githooks_config::{Config, PROJECT_HOOKS_DIR, Repository};
use githooks_core::{Result, Trigger};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a hook directory comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookScope {
    /// Hook that was in place before git-hooks was installed
    Legacy,
    /// Checked into the repository
    Project,
    /// Shared by every repository of the user
    Global,
    /// Shared by every clone of one project (keyed by root commit)
    User,
    /// Listed in `hooks.contrib`
    Contrib,
}

impl HookScope {
    /// Lowercase scope name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Project => "project",
            Self::Global => "global",
            Self::User => "user",
            Self::Contrib => "contrib",
        }
    }
}

impl fmt::Display for HookScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A candidate directory of subordinate scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookDirectory {
    /// Scope the directory belongs to
    pub scope: HookScope,
    /// Directory path
    pub path: PathBuf,
}

/// Ordered set of existing hook directories for one trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HookDirectorySet {
    dirs: Vec<HookDirectory>,
}

impl HookDirectorySet {
    /// Iterate directories in precedence order
    pub fn iter(&self) -> std::slice::Iter<'_, HookDirectory> {
        self.dirs.iter()
    }

    /// Number of directories
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Whether no directory exists for the trigger
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Directory paths in precedence order
    #[must_use]
    pub fn paths(&self) -> Vec<&Path> {
        self.dirs.iter().map(|dir| dir.path.as_path()).collect()
    }
}

impl<'a> IntoIterator for &'a HookDirectorySet {
    type Item = &'a HookDirectory;
    type IntoIter = std::slice::Iter<'a, HookDirectory>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}

/// A subordinate script selected for execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookScript {
    /// File name of the script
    pub name: String,
    /// Absolute path of the script
    pub path: PathBuf,
    /// Scope the script was found in
    pub scope: HookScope,
}

/// Resolve hook directories and scripts for a repository
#[derive(Debug, Clone)]
pub struct HookResolver {
    project_root: PathBuf,
    hooks_home: PathBuf,
    identity: Option<String>,
    contrib: Vec<PathBuf>,
    legacy_dir: Option<PathBuf>,
}

impl HookResolver {
    /// Create a resolver for a project root and hooks home
    ///
    /// User-scoped, contributed and legacy hooks are opted into with the
    /// `with_*` builder methods.
    pub fn new(project_root: impl Into<PathBuf>, hooks_home: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            hooks_home: hooks_home.into(),
            identity: None,
            contrib: Vec::new(),
            legacy_dir: None,
        }
    }

    /// Resolver for a repository with its resolved configuration
    #[must_use]
    pub fn for_repository(repo: &Repository, config: &Config, identity: Option<String>) -> Self {
        Self::new(&repo.root, &config.hooks_home)
            .with_identity(identity)
            .with_contrib(config.contrib_dirs.clone())
            .with_legacy_hooks(&repo.hooks_dir)
    }

    /// Set the project identity used for the user scope
    #[must_use]
    pub fn with_identity(mut self, identity: Option<String>) -> Self {
        self.identity = identity.filter(|id| !id.is_empty());
        self
    }

    /// Set the contributed directories, in declaration order
    #[must_use]
    pub fn with_contrib(mut self, dirs: Vec<PathBuf>) -> Self {
        self.contrib = dirs;
        self
    }

    /// Run hooks displaced by install from `hooks_dir` first
    #[must_use]
    pub fn with_legacy_hooks(mut self, hooks_dir: impl Into<PathBuf>) -> Self {
        self.legacy_dir = Some(hooks_dir.into());
        self
    }

    /// Every candidate directory for `trigger`, existing or not
    #[must_use]
    pub fn candidates(&self, trigger: &Trigger) -> Vec<HookDirectory> {
        let name = trigger.name();
        let mut dirs = Vec::with_capacity(3 + self.contrib.len());

        dirs.push(HookDirectory {
            scope: HookScope::Project,
            path: self.project_root.join(PROJECT_HOOKS_DIR).join(name),
        });
        dirs.push(HookDirectory {
            scope: HookScope::Global,
            path: self.hooks_home.join(name),
        });
        if let Some(identity) = &self.identity {
            dirs.push(HookDirectory {
                scope: HookScope::User,
                path: self.hooks_home.join(identity).join(name),
            });
        }
        dirs.extend(self.contrib.iter().map(|dir| HookDirectory {
            scope: HookScope::Contrib,
            path: dir.join(name),
        }));

        dirs
    }

    /// Existing hook directories for `trigger`, in precedence order
    #[must_use]
    pub fn resolve(&self, trigger: &Trigger) -> HookDirectorySet {
        let dirs = self
            .candidates(trigger)
            .into_iter()
            .filter(|dir| dir.path.is_dir())
            .collect();
        HookDirectorySet { dirs }
    }

    /// Scripts to execute for `trigger`, in execution order
    ///
    /// # Errors
    ///
    /// Returns an error if an existing hook directory cannot be read.
    pub fn scripts(&self, trigger: &Trigger) -> Result<Vec<HookScript>> {
        let mut scripts: Vec<HookScript> = self.legacy_script(trigger).into_iter().collect();
        for dir in &self.resolve(trigger) {
            scripts.extend(collect_scripts(dir)?);
        }

        tracing::debug!(
            trigger = trigger.name(),
            count = scripts.len(),
            "Resolved hook scripts"
        );
        Ok(scripts)
    }

    /// Scripts for `trigger` grouped by scope, in execution order
    ///
    /// # Errors
    ///
    /// Returns an error if an existing hook directory cannot be read.
    pub fn scripts_by_scope(&self, trigger: &Trigger) -> Result<IndexMap<HookScope, Vec<HookScript>>> {
        let mut grouped: IndexMap<HookScope, Vec<HookScript>> = IndexMap::new();
        for script in self.scripts(trigger)? {
            grouped.entry(script.scope).or_default().push(script);
        }
        Ok(grouped)
    }

    fn legacy_script(&self, trigger: &Trigger) -> Option<HookScript> {
        let name = format!("{}{BACKUP_SUFFIX}", trigger.name());
        let path = self.legacy_dir.as_ref()?.join(&name);
        if !path.is_file() {
            return None;
        }
        if !is_executable(&path) {
            tracing::warn!("Skipping non-executable legacy hook: {}", path.display());
            return None;
        }
        Some(HookScript {
            name,
            path,
            scope: HookScope::Legacy,
        })
    }
}

/// Collect the executable scripts of a hook directory
///
/// Hidden files, editor backups (`*~`, `*.swp`) and subdirectories are
/// ignored. Non-executable files are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn collect_scripts(dir: &HookDirectory) -> Result<Vec<HookScript>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir.path)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| {
                    !name.starts_with('.')
                        && !name.ends_with('~')
                        && !name.to_lowercase().ends_with(".swp")
                })
        })
        .collect();

    // 10-fmt runs before 20-lint
    paths.sort();

    let scripts = paths
        .into_iter()
        .filter(|path| {
            let executable = is_executable(path);
            if !executable {
                tracing::warn!("Skipping non-executable hook: {}", path.display());
            }
            executable
        })
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            Some(HookScript {
                name,
                path,
                scope: dir.scope,
            })
        })
        .collect();

    Ok(scripts)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|metadata| metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
