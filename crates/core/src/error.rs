//! Base error types for git-hooks
//!
//! This module provides the error taxonomy shared by every crate. Each
//! variant renders as a single line so it can be reported per trigger.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The directory is not inside a git repository
    #[error("Not a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    /// No managed hooks are installed in the repository
    #[error("git hooks is not installed in this repository")]
    NotInstalled,

    /// Managed hooks are already present and `--force` was not given
    #[error(
        "git hooks is already installed ({} managed hooks found), use --force to reinstall",
        triggers.len()
    )]
    ExistingHooksConflict { triggers: Vec<String> },

    /// Uninstall found nothing managed to remove
    #[error("No managed hooks found, nothing to uninstall")]
    NotExistHooks,

    /// The backup slot for a displaced hook is already occupied
    #[error("Cannot back up '{trigger}': {} already exists", path.display())]
    BackupConflict { trigger: String, path: PathBuf },

    /// The git executable is missing or one of its invocations failed
    #[error("`{command}` failed: {message}")]
    ExternalToolFailure { command: String, message: String },

    /// The trigger name is not part of the catalog
    #[error("Unknown trigger: {0}")]
    UnknownTrigger(String),

    /// Argument count does not match the trigger's calling convention
    #[error("Trigger '{trigger}' expects {expected} arguments, got {got}")]
    InvalidArguments {
        trigger: String,
        expected: String,
        got: usize,
    },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Create an `ExternalToolFailure` for a command line
    pub fn external(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalToolFailure {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
