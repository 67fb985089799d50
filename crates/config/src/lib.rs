//! Configuration management for git-hooks
//!
//! This crate handles:
//! - Default directories (hooks home, global template)
//! - Git access through the `git` executable
//! - Configuration resolution (flags, environment, git config)
//! - Logging initialization

pub mod config;
pub mod dirs;
pub mod git;
pub mod logging;

// Re-export error types from core
pub use githooks_core::{Error, Result};

// Re-export main types
pub use config::{Config, Overrides};
pub use dirs::{PROJECT_HOOKS_DIR, default_hooks_home, default_template_dir};
pub use git::{GitCli, GitProvider, Repository};
