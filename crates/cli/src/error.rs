//! Error types for CLI commands
//!
//! This module defines structured error types using thiserror. Library
//! errors pass through unchanged so their single-line messages reach the
//! user as-is; per-trigger failures are aggregated into one error after
//! every trigger has been reported.

use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Some triggers could not be installed
    #[error("Install failed: {failed} out of {total} hooks")]
    InstallFailed {
        /// Number of triggers that failed
        failed: usize,
        /// Total number of triggers
        total: usize,
    },

    /// Some triggers could not be uninstalled
    #[error("Uninstall failed: {failed} out of {total} hooks")]
    UninstallFailed {
        /// Number of triggers that failed
        failed: usize,
        /// Total number of triggers
        total: usize,
    },

    /// Error reported by the git-hooks libraries
    #[error(transparent)]
    Hooks(#[from] githooks_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error with context
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;
