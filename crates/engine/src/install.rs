//! Entry point installation
//!
//! Manages the dispatch entry points in a hooks directory. Each trigger's
//! slot is in one of three states ([`HookEntry`]): empty, occupied by a
//! hook git-hooks did not write, or occupied by a managed entry point.
//!
//! Install classifies every slot before touching anything, so a refused
//! install leaves the directory exactly as it found it. Foreign hooks are
//! moved aside to `<trigger>.origin` and keep running through the legacy
//! scope; uninstall moves them back.

use crate::hooks::script::{BACKUP_SUFFIX, parse_marker, synthesize};
use githooks_config::{GitProvider, Repository};
use githooks_core::{Error, Result, Trigger};
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Bytes read from a hook to look for the marker
const HEADER_LEN: u64 = 512;

/// Mode of installed entry points
#[cfg(unix)]
const ENTRY_POINT_MODE: u32 = 0o755;

/// State of one trigger's slot in a hooks directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum HookEntry {
    /// No file at the slot
    Absent,
    /// A hook not written by git-hooks
    Foreign {
        /// Path of the foreign hook
        path: PathBuf,
    },
    /// A managed entry point
    Managed {
        /// Trigger recorded in the marker
        trigger: String,
        /// git-hooks version that wrote it
        version: String,
    },
}

impl HookEntry {
    /// Classify the file at `path`, the slot of `trigger`
    ///
    /// Anything that cannot be read as a managed entry point (binaries,
    /// dangling symlinks, directories) is foreign.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot's metadata cannot be read.
    pub fn inspect(path: &Path, trigger: &Trigger) -> Result<Self> {
        match fs::symlink_metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::Absent),
            Err(e) => return Err(e.into()),
        }

        let Ok(header) = read_header(path) else {
            return Ok(Self::Foreign {
                path: path.to_path_buf(),
            });
        };

        Ok(match parse_marker(&header) {
            Some(marker) => Self::Managed {
                trigger: marker.trigger.unwrap_or_else(|| trigger.name().to_string()),
                version: marker.version.unwrap_or_else(|| "unknown".to_string()),
            },
            None => Self::Foreign {
                path: path.to_path_buf(),
            },
        })
    }

    /// Whether the slot holds a managed entry point
    #[must_use]
    pub fn is_managed(&self) -> bool {
        matches!(self, Self::Managed { .. })
    }
}

fn read_header(path: &Path) -> std::io::Result<String> {
    let mut header = Vec::new();
    fs::File::open(path)?
        .take(HEADER_LEN)
        .read_to_end(&mut header)?;
    Ok(String::from_utf8_lossy(&header).into_owned())
}

/// A hooks directory git runs hooks from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HooksDir {
    path: PathBuf,
}

impl HooksDir {
    /// Wrap a hooks directory path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The hooks directory of a repository
    #[must_use]
    pub fn of(repo: &Repository) -> Self {
        Self::new(&repo.hooks_dir)
    }

    /// Directory path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Slot path of `trigger`
    #[must_use]
    pub fn hook_path(&self, trigger: &Trigger) -> PathBuf {
        self.path.join(trigger.name())
    }

    /// Backup path of `trigger`
    #[must_use]
    pub fn backup_path(&self, trigger: &Trigger) -> PathBuf {
        self.path.join(format!("{}{BACKUP_SUFFIX}", trigger.name()))
    }

    /// Whether a backup exists for `trigger`
    #[must_use]
    pub fn has_backup(&self, trigger: &Trigger) -> bool {
        fs::symlink_metadata(self.backup_path(trigger)).is_ok()
    }

    /// Classify the slot of `trigger`
    ///
    /// # Errors
    ///
    /// Returns an error if the slot's metadata cannot be read.
    pub fn inspect(&self, trigger: &Trigger) -> Result<HookEntry> {
        HookEntry::inspect(&self.hook_path(trigger), trigger)
    }

    /// Classify every trigger's slot, in catalog order
    ///
    /// # Errors
    ///
    /// Returns an error if any slot's metadata cannot be read.
    pub fn statuses(&self) -> Result<Vec<TriggerStatus>> {
        Trigger::all()
            .iter()
            .map(|trigger| {
                Ok(TriggerStatus {
                    trigger,
                    entry: self.inspect(trigger)?,
                    backup: self.has_backup(trigger),
                })
            })
            .collect()
    }

    /// Write the entry point of `trigger`, replacing the slot atomically
    fn write_entry_point(&self, trigger: &Trigger) -> Result<()> {
        let mut file = NamedTempFile::new_in(&self.path)?;
        file.write_all(synthesize(trigger).as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(ENTRY_POINT_MODE))?;
        }

        file.persist(self.hook_path(trigger)).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Slot state of one trigger, as reported by `list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerStatus {
    /// Trigger name
    #[serde(serialize_with = "serialize_trigger_name")]
    pub trigger: &'static Trigger,
    /// Slot state
    pub entry: HookEntry,
    /// Whether a displaced hook is waiting in the backup slot
    pub backup: bool,
}

fn serialize_trigger_name<S>(trigger: &&'static Trigger, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(trigger.name())
}

/// What install did for one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallAction {
    /// Entry point written into an empty slot
    Installed,
    /// Existing entry point rewritten
    Reinstalled,
    /// Foreign hook moved to its backup slot, entry point written
    BackedUp,
}

/// What uninstall did for one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UninstallAction {
    /// Entry point removed
    Removed,
    /// Entry point removed and the displaced hook moved back
    Restored,
}

/// Per-trigger result of an install or uninstall
#[derive(Debug)]
pub struct TriggerOutcome<A> {
    /// Trigger the outcome is for
    pub trigger: &'static Trigger,
    /// Action taken, or why it failed
    pub result: Result<A>,
}

/// Per-trigger results of a bulk operation
#[derive(Debug)]
pub struct Report<A> {
    /// Hooks directory operated on
    pub hooks_dir: PathBuf,
    /// One outcome per trigger operated on
    pub outcomes: Vec<TriggerOutcome<A>>,
}

/// Result of [`install`]
pub type InstallReport = Report<InstallAction>;

/// Result of [`uninstall`]
pub type UninstallReport = Report<UninstallAction>;

impl<A: Copy + PartialEq> Report<A> {
    /// Whether every trigger succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Number of triggers operated on
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Outcomes that failed
    pub fn failures(&self) -> impl Iterator<Item = (&'static Trigger, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.trigger, e)))
    }

    /// Number of triggers that failed
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Number of triggers where `action` was taken
    #[must_use]
    pub fn count(&self, action: A) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, Ok(a) if a == action))
            .count()
    }
}

/// Find the repository containing `dir`
///
/// # Errors
///
/// Returns `NotARepository` when `dir` is not inside a repository, or the
/// git failure when git cannot be queried.
pub fn open_repository(git: &dyn GitProvider, dir: &Path) -> Result<Repository> {
    git.discover(dir)?.ok_or_else(|| Error::NotARepository {
        path: dir.to_path_buf(),
    })
}

/// Install an entry point for every trigger
///
/// Existing managed entry points are a conflict unless `force` is set. A
/// foreign hook is moved to its backup slot first; if that slot is
/// occupied the trigger fails with `BackupConflict` and is left untouched,
/// while the other triggers proceed.
///
/// # Errors
///
/// Returns `ExistingHooksConflict` without modifying anything when managed
/// entry points exist and `force` is not set, or an error when the hooks
/// directory cannot be created or read. Per-trigger failures are reported
/// in the [`InstallReport`].
#[tracing::instrument(skip(hooks), fields(dir = %hooks.path().display()))]
pub fn install(hooks: &HooksDir, force: bool) -> Result<InstallReport> {
    fs::create_dir_all(hooks.path())?;

    let entries = Trigger::all()
        .iter()
        .map(|trigger| Ok((trigger, hooks.inspect(trigger)?)))
        .collect::<Result<Vec<_>>>()?;

    let managed: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| entry.is_managed())
        .map(|(trigger, _)| trigger.name().to_string())
        .collect();
    if !managed.is_empty() && !force {
        return Err(Error::ExistingHooksConflict { triggers: managed });
    }

    let outcomes = entries
        .into_iter()
        .map(|(trigger, entry)| {
            let result = install_one(hooks, trigger, &entry);
            match &result {
                Ok(action) => tracing::debug!(trigger = trigger.name(), ?action, "Installed entry point"),
                Err(e) => tracing::warn!("{}: {e}", trigger.name()),
            }
            TriggerOutcome { trigger, result }
        })
        .collect();

    Ok(Report {
        hooks_dir: hooks.path().to_path_buf(),
        outcomes,
    })
}

fn install_one(hooks: &HooksDir, trigger: &Trigger, entry: &HookEntry) -> Result<InstallAction> {
    match entry {
        HookEntry::Absent => {
            hooks.write_entry_point(trigger)?;
            Ok(InstallAction::Installed)
        }
        HookEntry::Managed { .. } => {
            hooks.write_entry_point(trigger)?;
            Ok(InstallAction::Reinstalled)
        }
        HookEntry::Foreign { path } => {
            let backup = hooks.backup_path(trigger);
            if hooks.has_backup(trigger) {
                return Err(Error::BackupConflict {
                    trigger: trigger.name().to_string(),
                    path: backup,
                });
            }

            fs::rename(path, &backup)?;
            if let Err(e) = hooks.write_entry_point(trigger) {
                // Put the foreign hook back so the slot is unchanged
                if let Err(restore) = fs::rename(&backup, path) {
                    tracing::warn!("Failed to restore {}: {restore}", path.display());
                }
                return Err(e);
            }
            Ok(InstallAction::BackedUp)
        }
    }
}

/// Remove every managed entry point
///
/// Foreign hooks are never touched. Where a backup exists for a removed
/// entry point it is moved back into the slot.
///
/// # Errors
///
/// Returns `NotExistHooks` when the directory holds no managed entry point,
/// or an error when it cannot be read. Per-trigger failures are reported in
/// the [`UninstallReport`].
#[tracing::instrument(skip(hooks), fields(dir = %hooks.path().display()))]
pub fn uninstall(hooks: &HooksDir) -> Result<UninstallReport> {
    if !hooks.path().is_dir() {
        return Err(Error::NotExistHooks);
    }

    let mut managed = Vec::new();
    for trigger in Trigger::all() {
        if hooks.inspect(trigger)?.is_managed() {
            managed.push(trigger);
        }
    }
    if managed.is_empty() {
        return Err(Error::NotExistHooks);
    }

    let outcomes = managed
        .into_iter()
        .map(|trigger| {
            let result = uninstall_one(hooks, trigger);
            if let Err(e) = &result {
                tracing::warn!("{}: {e}", trigger.name());
            }
            TriggerOutcome { trigger, result }
        })
        .collect();

    Ok(Report {
        hooks_dir: hooks.path().to_path_buf(),
        outcomes,
    })
}

fn uninstall_one(hooks: &HooksDir, trigger: &Trigger) -> Result<UninstallAction> {
    let slot = hooks.hook_path(trigger);
    fs::remove_file(&slot)?;

    if hooks.has_backup(trigger) {
        fs::rename(hooks.backup_path(trigger), &slot)?;
        return Ok(UninstallAction::Restored);
    }
    Ok(UninstallAction::Removed)
}

/// Installation state of a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "hooks", rename_all = "kebab-case")]
pub enum InstallState {
    /// The directory is not inside a repository
    NotARepository,
    /// The repository has no managed entry point
    NotInstalled,
    /// Managed entry points are present; one status per trigger
    Installed(Vec<TriggerStatus>),
}

/// Report the installation state of the repository containing `dir`
///
/// # Errors
///
/// Returns an error if git cannot be queried or the hooks directory cannot
/// be read.
pub fn list(git: &dyn GitProvider, dir: &Path) -> Result<InstallState> {
    let Some(repo) = git.discover(dir)? else {
        return Ok(InstallState::NotARepository);
    };

    let hooks = HooksDir::of(&repo);
    if !hooks.path().is_dir() {
        return Ok(InstallState::NotInstalled);
    }

    let statuses = hooks.statuses()?;
    if statuses.iter().any(|status| status.entry.is_managed()) {
        Ok(InstallState::Installed(statuses))
    } else {
        Ok(InstallState::NotInstalled)
    }
}
